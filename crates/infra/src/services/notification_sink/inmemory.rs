use super::INotificationSink;
use anyhow::anyhow;
use event_watch_domain::NotificationRequest;
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub enum SinkCall {
    Notify(NotificationRequest),
    Cancel(i32),
}

/// Records every call and keeps the currently pending notifications by id
pub struct InMemoryNotificationSink {
    enabled: AtomicBool,
    calls: Mutex<Vec<SinkCall>>,
    pending: Mutex<BTreeMap<i32, NotificationRequest>>,
    rejected_ids: Mutex<HashSet<i32>>,
}

impl InMemoryNotificationSink {
    pub fn new() -> Self {
        Self {
            enabled: AtomicBool::new(true),
            calls: Mutex::new(Vec::new()),
            pending: Mutex::new(BTreeMap::new()),
            rejected_ids: Mutex::new(HashSet::new()),
        }
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }

    /// Requests with this id will fail from now on
    pub fn reject(&self, notification_id: i32) {
        self.rejected_ids.lock().unwrap().insert(notification_id);
    }

    pub fn calls(&self) -> Vec<SinkCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Immediate notifications that were shown
    pub fn shown(&self) -> Vec<NotificationRequest> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SinkCall::Notify(request) if request.fire_at.is_none() => Some(request),
                _ => None,
            })
            .collect()
    }

    /// Scheduled notifications that have not been cancelled or replaced
    pub fn pending(&self) -> Vec<NotificationRequest> {
        self.pending.lock().unwrap().values().cloned().collect()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }
}

impl Default for InMemoryNotificationSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl INotificationSink for InMemoryNotificationSink {
    fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    async fn notify(&self, request: &NotificationRequest) -> anyhow::Result<()> {
        if self.rejected_ids.lock().unwrap().contains(&request.id) {
            return Err(anyhow!("Notification {} was rejected", request.id));
        }
        self.calls
            .lock()
            .unwrap()
            .push(SinkCall::Notify(request.clone()));

        let mut pending = self.pending.lock().unwrap();
        if request.fire_at.is_some() {
            pending.insert(request.id, request.clone());
        } else {
            pending.remove(&request.id);
        }
        Ok(())
    }

    async fn cancel(&self, notification_id: i32) -> anyhow::Result<()> {
        if self.rejected_ids.lock().unwrap().contains(&notification_id) {
            return Err(anyhow!("Cancelling {} was rejected", notification_id));
        }
        self.calls
            .lock()
            .unwrap()
            .push(SinkCall::Cancel(notification_id));
        self.pending.lock().unwrap().remove(&notification_id);
        Ok(())
    }
}
