use super::IKeyValueStore;
use anyhow::Context;
use event_watch_utils::create_random_id;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;

/// Stores every key as a JSON file in `dir`
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

#[async_trait::async_trait]
impl IKeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let path = self.path(key);
        match fs::read_to_string(&path).await {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Unable to read {}", path.display())),
        }
    }

    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Unable to create {}", self.dir.display()))?;

        // Write next to the target and rename so readers never see half a file
        let tmp_path = self
            .dir
            .join(format!(".{}.{}.tmp", key, create_random_id(8)));
        fs::write(&tmp_path, value)
            .await
            .with_context(|| format!("Unable to write {}", tmp_path.display()))?;

        let path = self.path(key);
        if let Err(e) = fs::rename(&tmp_path, &path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(e).with_context(|| format!("Unable to replace {}", path.display()));
        }
        Ok(())
    }
}
