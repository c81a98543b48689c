pub mod detect_changes;
