use super::INotificationSink;
use event_watch_domain::NotificationRequest;
use tracing::info;

/// Sink for headless runs that only writes the notifications to the log
pub struct LogNotificationSink {}

#[async_trait::async_trait]
impl INotificationSink for LogNotificationSink {
    fn is_enabled(&self) -> bool {
        true
    }

    async fn notify(&self, request: &NotificationRequest) -> anyhow::Result<()> {
        match request.fire_at {
            Some(fire_at) => info!(
                id = request.id,
                channel = ?request.channel,
                fire_at,
                "Scheduled notification `{}`: {}",
                request.title,
                request.body
            ),
            None => info!(
                id = request.id,
                channel = ?request.channel,
                "Notification `{}`: {}",
                request.title,
                request.body
            ),
        }
        Ok(())
    }

    async fn cancel(&self, notification_id: i32) -> anyhow::Result<()> {
        info!(id = notification_id, "Cancelled notification");
        Ok(())
    }
}
