pub mod get_rules;
pub mod remove_rule;
pub mod upsert_rule;
