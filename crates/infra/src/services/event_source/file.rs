use super::{overlaps, IEventSource};
use anyhow::Context;
use event_watch_domain::{EventInstance, TimeSpan};
use std::path::PathBuf;
use tokio::fs;

/// Reads event instances from a JSON array on disk, e.g. as written by a
/// separate sync process
pub struct FileEventSource {
    path: PathBuf,
}

impl FileEventSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl IEventSource for FileEventSource {
    async fn fetch_events(&self, timespan: &TimeSpan) -> anyhow::Result<Vec<EventInstance>> {
        let raw = fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Unable to read events from {}", self.path.display()))?;
        let events: Vec<EventInstance> = serde_json::from_str(&raw)
            .with_context(|| format!("Malformed events in {}", self.path.display()))?;

        Ok(events
            .into_iter()
            .filter(|e| overlaps(e, timespan))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_events_in_timespan() {
        let dir = tempfile::tempdir().expect("To create temp dir");
        let path = dir.path().join("events.json");
        let raw = r#"[
            { "id": 1, "name": "Early", "since": 100, "until": 200 },
            { "id": 2, "name": "Inside", "since": 1000, "until": 2000 },
            { "id": 3, "name": "Undated", "since": null, "until": null },
            { "id": 4, "name": "Late", "since": 5000, "until": 6000 }
        ]"#;
        std::fs::write(&path, raw).unwrap();

        let source = FileEventSource::new(&path);
        let events = source
            .fetch_events(&TimeSpan::new(500, 3000))
            .await
            .expect("To read events");
        assert_eq!(events.iter().map(|e| e.id).collect::<Vec<_>>(), vec![2, 3]);
    }

    #[tokio::test]
    async fn missing_or_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().expect("To create temp dir");
        let path = dir.path().join("events.json");
        let source = FileEventSource::new(&path);
        assert!(source.fetch_events(&TimeSpan::new(0, 1)).await.is_err());

        std::fs::write(&path, "[{").unwrap();
        assert!(source.fetch_events(&TimeSpan::new(0, 1)).await.is_err());
    }
}
