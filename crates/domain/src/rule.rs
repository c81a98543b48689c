use crate::shared::entity::ID;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

const DEFAULT_MINUTES_BEFORE: i64 = 15;
const MAX_MINUTES_BEFORE: i64 = 60 * 24 * 7;

fn default_minutes_before() -> i64 {
    DEFAULT_MINUTES_BEFORE
}

fn default_enabled() -> bool {
    true
}

/// User configurable reminder policy. Empty filters match everything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRule {
    pub id: ID,
    pub name: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Lead time before the start of an event
    #[serde(default = "default_minutes_before")]
    pub minutes_before: i64,
    #[serde(default)]
    pub event_types: BTreeSet<String>,
    #[serde(default)]
    pub trainer_ids: BTreeSet<String>,
}

#[derive(Error, Debug, PartialEq)]
pub enum RuleValidationError {
    #[error("Rule name can not be blank")]
    BlankName,
    #[error("Lead time must be between 1 and 10080 minutes (7 days), got {0}")]
    InvalidLeadTime(i64),
}

impl NotificationRule {
    pub fn new(name: impl Into<String>, minutes_before: i64) -> Self {
        Self {
            id: ID::new(),
            name: name.into(),
            enabled: true,
            minutes_before,
            event_types: Default::default(),
            trainer_ids: Default::default(),
        }
    }

    /// Rules synthesized when nothing has been configured yet
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new("1 hour before", 60),
            Self::new("5 minutes before", 5),
        ]
    }

    pub fn validate(&self) -> Result<(), RuleValidationError> {
        if self.name.trim().is_empty() {
            return Err(RuleValidationError::BlankName);
        }
        if !(1..=MAX_MINUTES_BEFORE).contains(&self.minutes_before) {
            return Err(RuleValidationError::InvalidLeadTime(self.minutes_before));
        }
        Ok(())
    }

    /// `None` when the lead time is out of the valid range, e.g. for a
    /// rule that was stored by hand
    pub fn lead_time_millis(&self) -> Option<i64> {
        if (1..=MAX_MINUTES_BEFORE).contains(&self.minutes_before) {
            Some(self.minutes_before * 60 * 1000)
        } else {
            None
        }
    }

    pub fn matches(&self, event_type: &str, trainer_ids: &[&str]) -> bool {
        if !self.enabled {
            return false;
        }

        let type_matches = self.event_types.is_empty() || {
            let event_type = event_type.to_lowercase();
            self.event_types
                .iter()
                .any(|t| t.to_lowercase() == event_type)
        };

        let trainer_matches = self.trainer_ids.is_empty()
            || trainer_ids
                .iter()
                .any(|id| self.trainer_ids.contains(*id));

        type_matches && trainer_matches
    }
}

/// Whether any rule wants to hear about changes to an event of this kind
pub fn should_notify(rules: &[NotificationRule], event_type: &str, trainer_ids: &[&str]) -> bool {
    rules.iter().any(|r| r.matches(event_type, trainer_ids))
}

#[cfg(test)]
mod test {
    use super::*;

    fn rule_with(event_types: &[&str], trainer_ids: &[&str]) -> NotificationRule {
        NotificationRule {
            event_types: event_types.iter().map(|s| s.to_string()).collect(),
            trainer_ids: trainer_ids.iter().map(|s| s.to_string()).collect(),
            ..NotificationRule::new("test", 15)
        }
    }

    #[test]
    fn unfiltered_rule_matches_everything() {
        let rule = rule_with(&[], &[]);
        assert!(rule.matches("LESSON", &["t1"]));
        assert!(rule.matches("HOLIDAY", &[]));
        assert!(rule.matches("", &[]));
    }

    #[test]
    fn type_filter_is_case_insensitive() {
        let rule = rule_with(&["LESSON"], &[]);
        assert!(rule.matches("lesson", &[]));
        assert!(rule.matches("Lesson", &["t9"]));
        assert!(!rule.matches("HOLIDAY", &[]));
    }

    #[test]
    fn trainer_filter_needs_one_common_trainer() {
        let rule = rule_with(&[], &["t1", "t2"]);
        assert!(rule.matches("LESSON", &["t3", "t2"]));
        assert!(!rule.matches("LESSON", &["t3"]));
        assert!(!rule.matches("LESSON", &[]));
    }

    #[test]
    fn both_gates_must_pass() {
        let rule = rule_with(&["CAMP"], &["t1"]);
        assert!(rule.matches("camp", &["t1"]));
        assert!(!rule.matches("LESSON", &["t1"]));
        assert!(!rule.matches("CAMP", &["t2"]));
    }

    #[test]
    fn disabled_rule_never_matches() {
        let mut rule = rule_with(&[], &[]);
        rule.enabled = false;
        assert!(!rule.matches("LESSON", &["t1"]));
        assert!(!should_notify(&[rule.clone()], "LESSON", &["t1"]));

        let enabled = rule_with(&["LESSON"], &[]);
        assert!(should_notify(&[rule, enabled], "LESSON", &[]));
    }

    #[test]
    fn defaults_are_enabled_and_unfiltered() {
        let rules = NotificationRule::defaults();
        assert_eq!(rules.len(), 2);
        assert_eq!(
            rules.iter().map(|r| r.minutes_before).collect::<Vec<_>>(),
            vec![60, 5]
        );
        assert!(rules
            .iter()
            .all(|r| r.enabled && r.event_types.is_empty() && r.trainer_ids.is_empty()));
        assert!(rules.iter().all(|r| r.validate().is_ok()));
    }

    #[test]
    fn validates_rules() {
        let mut rule = NotificationRule::new(" ", 10);
        assert_eq!(rule.validate(), Err(RuleValidationError::BlankName));
        rule.name = "ok".into();
        rule.minutes_before = 0;
        assert_eq!(rule.validate(), Err(RuleValidationError::InvalidLeadTime(0)));
        rule.minutes_before = MAX_MINUTES_BEFORE + 1;
        assert!(rule.validate().is_err());
    }

    #[test]
    fn lead_time_outside_of_valid_range_is_none() {
        let raw = r#"{ "id": "r1", "name": "r", "minutesBefore": 200000000000000000 }"#;
        let rule: NotificationRule = serde_json::from_str(raw).unwrap();
        assert_eq!(rule.lead_time_millis(), None);
        assert_eq!(NotificationRule::new("r", -5).lead_time_millis(), None);
        assert_eq!(
            NotificationRule::new("r", 60).lead_time_millis(),
            Some(60 * 60 * 1000)
        );
    }

    #[test]
    fn missing_fields_use_defaults() {
        let rule: NotificationRule =
            serde_json::from_str(r#"{ "id": "r1", "name": "r" }"#).unwrap();
        assert!(rule.enabled);
        assert_eq!(rule.minutes_before, 15);
        assert!(rule.event_types.is_empty());
    }
}
