use super::kv::{load_json, save_json, IKeyValueStore};
use event_watch_domain::ScheduledNotificationsState;
use std::sync::Arc;

const SCHEDULED_NOTIFICATIONS_KEY: &str = "scheduled_notifications";

/// Remembers which reminders are live and when scheduling last ran
#[async_trait::async_trait]
pub trait IScheduledNotificationRepo: Send + Sync {
    async fn load(&self) -> ScheduledNotificationsState;
    async fn save(&self, state: &ScheduledNotificationsState) -> anyhow::Result<()>;
}

pub struct KvScheduledNotificationRepo {
    store: Arc<dyn IKeyValueStore>,
}

impl KvScheduledNotificationRepo {
    pub fn new(store: Arc<dyn IKeyValueStore>) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl IScheduledNotificationRepo for KvScheduledNotificationRepo {
    async fn load(&self) -> ScheduledNotificationsState {
        load_json(self.store.as_ref(), SCHEDULED_NOTIFICATIONS_KEY)
            .await
            .unwrap_or_default()
    }

    async fn save(&self, state: &ScheduledNotificationsState) -> anyhow::Result<()> {
        save_json(self.store.as_ref(), SCHEDULED_NOTIFICATIONS_KEY, state).await
    }
}
