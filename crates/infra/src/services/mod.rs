mod current_user;
mod event_source;
mod notification_sink;

pub use current_user::{ICurrentUserProvider, InMemoryCurrentUserProvider};
pub use event_source::{FileEventSource, IEventSource, InMemoryEventSource};
pub use notification_sink::{
    INotificationSink, InMemoryNotificationSink, LogNotificationSink, SinkCall,
};

use std::sync::Arc;

/// Collaborators the engine talks to but does not own
#[derive(Clone)]
pub struct Services {
    pub event_source: Arc<dyn IEventSource>,
    pub current_user: Arc<dyn ICurrentUserProvider>,
    pub notifications: Arc<dyn INotificationSink>,
}
