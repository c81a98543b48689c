mod inmemory;
mod logging;

pub use logging::LogNotificationSink;
pub use inmemory::{InMemoryNotificationSink, SinkCall};

use event_watch_domain::NotificationRequest;

/// Displays notifications to the user. Issuing a request with an id that is
/// already shown or scheduled replaces it.
#[async_trait::async_trait]
pub trait INotificationSink: Send + Sync {
    /// Whether notifications can currently reach the user at all
    fn is_enabled(&self) -> bool;
    /// Shows the notification now, or at `request.fire_at` when set
    async fn notify(&self, request: &NotificationRequest) -> anyhow::Result<()>;
    async fn cancel(&self, notification_id: i32) -> anyhow::Result<()>;
}
