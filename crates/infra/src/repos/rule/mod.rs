use super::kv::{load_json, save_json, IKeyValueStore};
use event_watch_domain::{NotificationRule, ID};
use std::sync::Arc;
use tracing::{error, info, warn};

const RULES_KEY: &str = "notification_rules";

#[async_trait::async_trait]
pub trait IRuleRepo: Send + Sync {
    /// The ordered rule list. When nothing is configured the default rules
    /// are stored and returned. Stored rules that are invalid are skipped.
    async fn load_rules(&self) -> Vec<NotificationRule>;
    async fn save_rules(&self, rules: &[NotificationRule]) -> anyhow::Result<()>;
    /// Replaces the rule with the same id in place or appends it
    async fn upsert_rule(&self, rule: &NotificationRule) -> anyhow::Result<()>;
    /// Returns the removed rule, if there was one
    async fn remove_rule(&self, rule_id: &ID) -> anyhow::Result<Option<NotificationRule>>;
}

pub struct KvRuleRepo {
    store: Arc<dyn IKeyValueStore>,
}

impl KvRuleRepo {
    pub fn new(store: Arc<dyn IKeyValueStore>) -> Self {
        Self { store }
    }

    async fn stored_rules(&self) -> Vec<NotificationRule> {
        load_json(self.store.as_ref(), RULES_KEY)
            .await
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl IRuleRepo for KvRuleRepo {
    async fn load_rules(&self) -> Vec<NotificationRule> {
        let rules = self.stored_rules().await;
        if !rules.is_empty() {
            return rules
                .into_iter()
                .filter(|rule| match rule.validate() {
                    Ok(()) => true,
                    Err(e) => {
                        warn!("Ignoring stored notification rule {}. Err: {:?}", rule.id, e);
                        false
                    }
                })
                .collect();
        }

        let defaults = NotificationRule::defaults();
        info!("No notification rules configured, storing {} default rules", defaults.len());
        if let Err(e) = self.save_rules(&defaults).await {
            error!("Unable to store default notification rules. Err: {:?}", e);
        }
        defaults
    }

    async fn save_rules(&self, rules: &[NotificationRule]) -> anyhow::Result<()> {
        save_json(self.store.as_ref(), RULES_KEY, rules).await
    }

    async fn upsert_rule(&self, rule: &NotificationRule) -> anyhow::Result<()> {
        let mut rules = self.load_rules().await;
        match rules.iter_mut().find(|r| r.id == rule.id) {
            Some(existing) => *existing = rule.clone(),
            None => rules.push(rule.clone()),
        }
        self.save_rules(&rules).await
    }

    async fn remove_rule(&self, rule_id: &ID) -> anyhow::Result<Option<NotificationRule>> {
        let mut rules = self.load_rules().await;
        let pos = match rules.iter().position(|r| r.id == *rule_id) {
            Some(pos) => pos,
            None => return Ok(None),
        };
        let removed = rules.remove(pos);
        self.save_rules(&rules).await?;
        Ok(Some(removed))
    }
}
