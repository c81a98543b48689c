use super::IKeyValueStore;
use anyhow::anyhow;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

pub struct InMemoryKeyValueStore {
    values: Mutex<HashMap<String, String>>,
    fail_writes: AtomicBool,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self {
            values: Mutex::new(HashMap::new()),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Makes every following write fail, used to exercise storage errors
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> anyhow::Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(anyhow!("In memory store is not writable"))
        } else {
            Ok(())
        }
    }
}

impl Default for InMemoryKeyValueStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IKeyValueStore for InMemoryKeyValueStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let values = self.values.lock().unwrap();
        Ok(values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.check_writable()?;
        let mut values = self.values.lock().unwrap();
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
