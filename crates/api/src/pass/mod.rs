pub mod get_diagnostics;
pub mod run_pass;
