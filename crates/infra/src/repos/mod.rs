mod kv;
mod rule;
mod scheduled_notification;
mod snapshot;

pub use kv::{FileKeyValueStore, IKeyValueStore, InMemoryKeyValueStore};
pub use rule::{IRuleRepo, KvRuleRepo};
pub use scheduled_notification::{IScheduledNotificationRepo, KvScheduledNotificationRepo};
pub use snapshot::{ISnapshotRepo, KvSnapshotRepo};

use std::path::Path;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct Repos {
    pub snapshots: Arc<dyn ISnapshotRepo>,
    pub rules: Arc<dyn IRuleRepo>,
    pub scheduled_notifications: Arc<dyn IScheduledNotificationRepo>,
}

impl Repos {
    /// All stores share one key value store
    pub fn create(store: Arc<dyn IKeyValueStore>) -> Self {
        Self {
            snapshots: Arc::new(KvSnapshotRepo::new(store.clone())),
            rules: Arc::new(KvRuleRepo::new(store.clone())),
            scheduled_notifications: Arc::new(KvScheduledNotificationRepo::new(store)),
        }
    }

    pub fn create_file(dir: &Path) -> Self {
        info!("Using file store at {}", dir.display());
        Self::create(Arc::new(FileKeyValueStore::new(dir)))
    }

    pub fn create_inmemory() -> Self {
        Self::create(Arc::new(InMemoryKeyValueStore::new()))
    }
}
