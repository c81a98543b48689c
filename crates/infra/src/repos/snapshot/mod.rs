use super::kv::{load_json, save_json, IKeyValueStore};
use event_watch_domain::SnapshotState;
use std::sync::Arc;

const SNAPSHOTS_KEY: &str = "event_snapshots";

#[async_trait::async_trait]
pub trait ISnapshotRepo: Send + Sync {
    /// Empty when nothing is stored or the stored data is unreadable
    async fn load(&self) -> SnapshotState;
    /// Replaces the stored state as a whole
    async fn save(&self, state: &SnapshotState) -> anyhow::Result<()>;
}

pub struct KvSnapshotRepo {
    store: Arc<dyn IKeyValueStore>,
}

impl KvSnapshotRepo {
    pub fn new(store: Arc<dyn IKeyValueStore>) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl ISnapshotRepo for KvSnapshotRepo {
    async fn load(&self) -> SnapshotState {
        load_json(self.store.as_ref(), SNAPSHOTS_KEY)
            .await
            .unwrap_or_default()
    }

    async fn save(&self, state: &SnapshotState) -> anyhow::Result<()> {
        save_json(self.store.as_ref(), SNAPSHOTS_KEY, state).await
    }
}
