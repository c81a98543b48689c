mod file;
mod inmemory;

pub use file::FileEventSource;
pub use inmemory::InMemoryEventSource;

use event_watch_domain::{EventInstance, TimeSpan};

#[async_trait::async_trait]
pub trait IEventSource: Send + Sync {
    /// Event instances overlapping `timespan`. Instances without a start are
    /// always returned.
    async fn fetch_events(&self, timespan: &TimeSpan) -> anyhow::Result<Vec<EventInstance>>;
}

pub(crate) fn overlaps(event: &EventInstance, timespan: &TimeSpan) -> bool {
    match event.since {
        Some(since) => {
            let until = event.until.unwrap_or(since);
            since < timespan.end() && until >= timespan.start()
        }
        None => true,
    }
}
