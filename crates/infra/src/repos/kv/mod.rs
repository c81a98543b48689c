mod file;
mod inmemory;

pub use file::FileKeyValueStore;
pub use inmemory::InMemoryKeyValueStore;

use serde::{de::DeserializeOwned, Serialize};
use tracing::warn;

/// Durable string storage that the stores are built upon
#[async_trait::async_trait]
pub trait IKeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    /// Replaces the value for `key` as a whole
    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;
}

/// Reads and decodes the value at `key`. Unreadable or corrupt data is
/// treated as absent.
pub(crate) async fn load_json<T: DeserializeOwned>(
    store: &dyn IKeyValueStore,
    key: &str,
) -> Option<T> {
    let raw = match store.get(key).await {
        Ok(raw) => raw?,
        Err(e) => {
            warn!("Unable to read `{}` from the store. Err: {:?}", key, e);
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Stored `{}` is corrupt and will be ignored. Err: {:?}", key, e);
            None
        }
    }
}

pub(crate) async fn save_json<T: Serialize + ?Sized>(
    store: &dyn IKeyValueStore,
    key: &str,
    value: &T,
) -> anyhow::Result<()> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw).await
}
