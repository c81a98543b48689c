use crate::shared::usecase::UseCase;
use event_watch_domain::{detect_changes, ChangeNotification, EventInstance};
use event_watch_infra::WatchContext;
use tracing::{error, info, warn};

/// Compares the fetched events with the snapshots of the previous poll,
/// stores the new snapshots and shows a notification for every change.
#[derive(Debug)]
pub struct DetectChangesUseCase<'a> {
    pub events: &'a [EventInstance],
}

#[derive(Debug)]
pub struct DetectChangesResponse {
    pub changes: Vec<ChangeNotification>,
    /// Changes the notification sink accepted
    pub emitted: usize,
}

#[derive(Debug)]
pub enum UseCaseErrors {}

#[async_trait::async_trait]
impl<'a> UseCase for DetectChangesUseCase<'a> {
    type Response = DetectChangesResponse;

    type Error = UseCaseErrors;

    const NAME: &'static str = "DetectChanges";

    async fn execute(&mut self, ctx: &WatchContext) -> Result<Self::Response, Self::Error> {
        let rules = ctx.repos.rules.load_rules().await;
        let previous = ctx.repos.snapshots.load().await;
        let user = match ctx.services.current_user.current_user().await {
            Ok(user) => user,
            Err(e) => {
                warn!(
                    "Unable to resolve the current user, skipping registration changes. Err: {:?}",
                    e
                );
                None
            }
        };

        let detection = detect_changes(self.events, &previous, user.as_ref(), &rules);
        for failure in &detection.failures {
            error!(
                event_id = failure.event_id(),
                "Unable to detect changes for event. Err: {}", failure
            );
        }

        // Only the next run loses history when this fails
        if let Err(e) = ctx.repos.snapshots.save(&detection.state).await {
            error!("Unable to store event snapshots. Err: {:?}", e);
        }

        let notifications = &ctx.services.notifications;
        let mut emitted = 0;
        if notifications.is_enabled() {
            for change in &detection.notifications {
                let request = change.to_request(&ctx.config.timezone);
                match notifications.notify(&request).await {
                    Ok(()) => emitted += 1,
                    Err(e) => error!(
                        event_id = change.event_id(),
                        "Unable to show change notification. Err: {:?}", e
                    ),
                }
            }
        } else if !detection.notifications.is_empty() {
            info!(
                "Notifications are disabled, dropping {} change notifications",
                detection.notifications.len()
            );
        }

        Ok(DetectChangesResponse {
            changes: detection.notifications,
            emitted,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::test_utils::{lesson, person, setup, DAY, HOUR};
    use event_watch_domain::{CurrentUser, NotificationChannel, NotificationRule};
    use event_watch_infra::IKeyValueStore;

    async fn run(events: &[EventInstance], ctx: &WatchContext) -> DetectChangesResponse {
        let mut usecase = DetectChangesUseCase { events };
        usecase.execute(ctx).await.unwrap()
    }

    #[tokio::test]
    async fn first_run_only_stores_snapshots() {
        let t = setup(DAY);
        let events = vec![lesson(1, DAY + 10 * HOUR), lesson(2, DAY + 12 * HOUR)];

        let res = run(&events, &t.ctx).await;
        assert!(res.changes.is_empty());
        assert_eq!(res.emitted, 0);
        assert!(t.sink.calls().is_empty());
        assert_eq!(t.ctx.repos.snapshots.load().await.snapshots.len(), 2);

        // Unchanged input does not emit anything either
        let res = run(&events, &t.ctx).await;
        assert!(res.changes.is_empty());
    }

    #[tokio::test]
    async fn time_change_is_shown_with_event_id() {
        let t = setup(DAY);
        run(&[lesson(42, DAY + 10 * HOUR)], &t.ctx).await;

        let mut moved = lesson(42, DAY + 11 * HOUR);
        moved.until = Some(DAY + 12 * HOUR);
        let res = run(&[moved], &t.ctx).await;
        assert_eq!(res.emitted, 1);

        let shown = t.sink.shown();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].id, 10_042);
        assert_eq!(shown[0].channel, NotificationChannel::Changes);
        assert_eq!(shown[0].title, "Lesson 42");
        assert_eq!(
            shown[0].body,
            "Time changed: Mon 1.3. 10:00-11:00 -> Mon 1.3. 11:00-12:00"
        );
    }

    #[tokio::test]
    async fn registration_is_reported_regardless_of_rules() {
        let t = setup(DAY);
        t.user.set_user(Some(CurrentUser {
            person_id: "jane".into(),
            person_name: None,
            couple_ids: vec![],
        }));
        let holidays_only = NotificationRule {
            event_types: vec!["HOLIDAY".to_string()].into_iter().collect(),
            ..NotificationRule::new("Holidays", 60)
        };
        t.ctx.repos.rules.save_rules(&[holidays_only]).await.unwrap();

        let mut event = lesson(5, DAY + 10 * HOUR);
        event.registrations = vec![person("john", "John Smith")];
        run(&[event.clone()], &t.ctx).await;

        event.registrations.push(person("jane", "Jane Doe"));
        event.location_text = "Hall B".into();
        let res = run(&[event], &t.ctx).await;

        // The location change is filtered out by the rules, the registration is not
        assert_eq!(res.changes.len(), 1);
        assert!(matches!(
            res.changes[0],
            ChangeNotification::YouWereRegistered { event_id: 5, .. }
        ));
        assert_eq!(t.sink.shown().len(), 1);
    }

    #[tokio::test]
    async fn unregistration_is_detected_from_remembered_keys() {
        let t = setup(DAY);
        t.user.set_user(Some(CurrentUser {
            person_id: "jane".into(),
            person_name: None,
            couple_ids: vec![],
        }));

        let mut event = lesson(5, DAY + 10 * HOUR);
        event.registrations = vec![person("jane", "Jane Doe")];
        run(&[event.clone()], &t.ctx).await;

        // Jane is not in any fetched registration anymore
        event.registrations.clear();
        let res = run(&[event], &t.ctx).await;
        assert!(matches!(
            res.changes.as_slice(),
            [ChangeNotification::YouWereUnregistered { event_id: 5, .. }]
        ));
        assert_eq!(t.sink.shown().len(), 1);
    }

    #[tokio::test]
    async fn sink_failures_do_not_stop_other_notifications() {
        let t = setup(DAY);
        let events = vec![lesson(1, DAY + 10 * HOUR), lesson(2, DAY + 10 * HOUR)];
        run(&events, &t.ctx).await;

        t.sink.reject(10_001);
        let mut moved = events.clone();
        for e in moved.iter_mut() {
            e.location_text = "Gym".into();
        }
        let res = run(&moved, &t.ctx).await;
        assert_eq!(res.changes.len(), 2);
        assert_eq!(res.emitted, 1);
        assert_eq!(t.sink.shown()[0].id, 10_002);
    }

    #[tokio::test]
    async fn storage_failure_still_emits_current_changes() {
        let t = setup(DAY);
        run(&[lesson(1, DAY + 10 * HOUR)], &t.ctx).await;

        t.store.set_fail_writes(true);
        let mut cancelled = lesson(1, DAY + 10 * HOUR);
        cancelled.is_cancelled = true;
        let res = run(&[cancelled.clone()], &t.ctx).await;
        assert_eq!(res.emitted, 1);

        // The snapshot was not replaced, so the change is seen again
        t.store.set_fail_writes(false);
        let res = run(&[cancelled], &t.ctx).await;
        assert_eq!(res.changes.len(), 1);
    }

    #[tokio::test]
    async fn corrupt_snapshots_are_a_fresh_baseline() {
        let t = setup(DAY);
        t.store.set("event_snapshots", "[{\"id\":").await.unwrap();

        let mut cancelled = lesson(1, DAY + 10 * HOUR);
        cancelled.is_cancelled = true;
        let res = run(&[cancelled], &t.ctx).await;
        assert!(res.changes.is_empty());
        assert_eq!(t.ctx.repos.snapshots.load().await.snapshots.len(), 1);
    }

    #[tokio::test]
    async fn disabled_sink_drops_changes_but_keeps_snapshots() {
        let t = setup(DAY);
        run(&[lesson(1, DAY + 10 * HOUR)], &t.ctx).await;

        t.sink.set_enabled(false);
        let mut moved = lesson(1, DAY + 10 * HOUR);
        moved.location_text = "Gym".into();
        let res = run(&[moved.clone()], &t.ctx).await;
        assert_eq!(res.changes.len(), 1);
        assert_eq!(res.emitted, 0);
        assert!(t.sink.calls().is_empty());

        t.sink.set_enabled(true);
        let res = run(&[moved], &t.ctx).await;
        assert!(res.changes.is_empty());
    }
}
