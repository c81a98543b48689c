use super::{overlaps, IEventSource};
use anyhow::anyhow;
use event_watch_domain::{EventInstance, TimeSpan};
use std::sync::Mutex;

pub struct InMemoryEventSource {
    events: Mutex<Vec<EventInstance>>,
    unavailable: Mutex<bool>,
}

impl InMemoryEventSource {
    pub fn new(events: Vec<EventInstance>) -> Self {
        Self {
            events: Mutex::new(events),
            unavailable: Mutex::new(false),
        }
    }

    pub fn set_events(&self, events: Vec<EventInstance>) {
        *self.events.lock().unwrap() = events;
    }

    /// Makes fetches fail like an unreachable remote service
    pub fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.lock().unwrap() = unavailable;
    }
}

#[async_trait::async_trait]
impl IEventSource for InMemoryEventSource {
    async fn fetch_events(&self, timespan: &TimeSpan) -> anyhow::Result<Vec<EventInstance>> {
        if *self.unavailable.lock().unwrap() {
            return Err(anyhow!("Event source is unavailable"));
        }
        let events = self.events.lock().unwrap();
        Ok(events
            .iter()
            .filter(|e| overlaps(e, timespan))
            .cloned()
            .collect())
    }
}
