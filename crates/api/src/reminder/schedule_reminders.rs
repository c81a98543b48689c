use crate::shared::usecase::UseCase;
use event_watch_domain::{
    plan_reminders, EventInstance, ScheduledNotification, ScheduledNotificationsState,
};
use event_watch_infra::WatchContext;
use std::collections::HashSet;
use tracing::{error, info, warn};

/// Replaces the reminders scheduled by the previous run with reminders for
/// every upcoming event and matching rule
#[derive(Debug)]
pub struct ScheduleRemindersUseCase<'a> {
    pub events: &'a [EventInstance],
    pub now: i64,
}

#[derive(Debug)]
pub enum UseCaseErrors {}

#[async_trait::async_trait]
impl<'a> UseCase for ScheduleRemindersUseCase<'a> {
    /// The reminders the sink accepted
    type Response = Vec<ScheduledNotification>;

    type Error = UseCaseErrors;

    const NAME: &'static str = "ScheduleReminders";

    async fn execute(&mut self, ctx: &WatchContext) -> Result<Self::Response, Self::Error> {
        let notifications = &ctx.services.notifications;
        if !notifications.is_enabled() {
            info!("Notifications are disabled, not scheduling any reminders");
            return Ok(Vec::new());
        }

        let previous = ctx.repos.scheduled_notifications.load().await;
        let stale = previous.is_stale(self.now, ctx.config.staleness_window_millis);
        if stale {
            cancel_all(ctx, previous.ids()).await;
        }

        let rules = ctx.repos.rules.load_rules().await;
        let planned = plan_reminders(self.events, &rules, self.now, &ctx.config.timezone);

        let mut scheduled = Vec::with_capacity(planned.len());
        for reminder in planned {
            match notifications.notify(&reminder.request).await {
                Ok(()) => scheduled.push(reminder.scheduled),
                Err(e) => error!(
                    event_id = reminder.scheduled.event_id,
                    "Unable to schedule reminder {}. Err: {:?}",
                    reminder.scheduled.notification_id,
                    e
                ),
            }
        }

        // Ids that were not issued again would otherwise keep firing
        if !stale {
            let live = scheduled
                .iter()
                .map(|n| n.notification_id)
                .collect::<HashSet<_>>();
            let leftovers = previous
                .ids()
                .into_iter()
                .filter(|id| !live.contains(id))
                .collect();
            cancel_all(ctx, leftovers).await;
        }

        let state = ScheduledNotificationsState {
            notifications: scheduled.clone(),
            last_run: Some(self.now),
        };
        if let Err(e) = ctx.repos.scheduled_notifications.save(&state).await {
            error!("Unable to store scheduled reminders. Err: {:?}", e);
        }

        Ok(scheduled)
    }
}

async fn cancel_all(ctx: &WatchContext, notification_ids: Vec<i32>) {
    for id in notification_ids {
        if let Err(e) = ctx.services.notifications.cancel(id).await {
            warn!("Unable to cancel scheduled reminder {}. Err: {:?}", id, e);
        }
    }
}
