mod change;
mod error;
mod job_schedulers;
mod pass;
mod reminder;
mod rule;
mod shared;

use event_watch_domain::{EventInstance, NotificationRule, ID};
use event_watch_infra::WatchContext;
use pass::{get_diagnostics::GetDiagnosticsUseCase, run_pass::RunPassUseCase};
use rule::{
    get_rules::GetRulesUseCase, remove_rule::RemoveRuleUseCase, upsert_rule::UpsertRuleUseCase,
};
use shared::usecase::execute;
use tokio::task::JoinHandle;

pub use error::EventWatchError;
pub use pass::{get_diagnostics::DiagnosticsSnapshot, run_pass::RunReport};

/// Entry point for the rest of the application. Constructed once per process
/// with the collaborators in `WatchContext`.
pub struct EventWatch {
    context: WatchContext,
}

impl EventWatch {
    pub fn new(context: WatchContext) -> Self {
        Self { context }
    }

    /// Called by the foreground and background triggers with the events they
    /// fetched
    pub async fn run_detection_and_scheduling_pass(
        &self,
        events: &[EventInstance],
        now: i64,
    ) -> RunReport {
        match execute(RunPassUseCase { events, now }, &self.context).await {
            Ok(report) => report,
            Err(e) => match e {},
        }
    }

    /// Fetches from the event source itself before running the pass
    pub async fn run_scheduled_pass(&self) -> Option<RunReport> {
        job_schedulers::run_scheduled_pass(&self.context).await
    }

    pub async fn get_diagnostics(&self) -> DiagnosticsSnapshot {
        match execute(GetDiagnosticsUseCase {}, &self.context).await {
            Ok(diagnostics) => diagnostics,
            Err(e) => match e {},
        }
    }

    pub async fn get_rules(&self) -> Vec<NotificationRule> {
        match execute(GetRulesUseCase {}, &self.context).await {
            Ok(rules) => rules,
            Err(e) => match e {},
        }
    }

    pub async fn upsert_rule(
        &self,
        rule: NotificationRule,
    ) -> Result<NotificationRule, EventWatchError> {
        execute(UpsertRuleUseCase { rule }, &self.context)
            .await
            .map_err(EventWatchError::from)
    }

    pub async fn remove_rule(&self, rule_id: &ID) -> Result<NotificationRule, EventWatchError> {
        let usecase = RemoveRuleUseCase {
            rule_id: rule_id.clone(),
        };
        execute(usecase, &self.context)
            .await
            .map_err(EventWatchError::from)
    }

    /// Starts the periodic pass. Abort the handle to stop it.
    pub fn start_job_schedulers(&self) -> JoinHandle<()> {
        job_schedulers::start_detection_job(self.context.clone())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::test_utils::{lesson, DAY, HOUR};

    #[tokio::test]
    async fn inmemory_engine_end_to_end() {
        let watch = EventWatch::new(WatchContext::create_inmemory());
        let now = DAY + 8 * HOUR;

        let rules = watch.get_rules().await;
        let removed = watch.remove_rule(&rules[1].id).await.unwrap();
        assert_eq!(removed.minutes_before, 5);
        assert!(matches!(
            watch.remove_rule(&rules[1].id).await,
            Err(EventWatchError::NotFound(_))
        ));
        assert!(matches!(
            watch.upsert_rule(NotificationRule::new("", 10)).await,
            Err(EventWatchError::BadClientData(_))
        ));

        let events = vec![lesson(1, DAY + 10 * HOUR)];
        let report = watch.run_detection_and_scheduling_pass(&events, now).await;
        assert_eq!(report.reminders_scheduled, 1);

        let mut cancelled = lesson(1, DAY + 10 * HOUR);
        cancelled.is_cancelled = true;
        let report = watch
            .run_detection_and_scheduling_pass(&[cancelled], now + HOUR / 2)
            .await;
        assert_eq!(report.changes_emitted, 1);
        assert_eq!(report.reminders_scheduled, 0);

        let diagnostics = watch.get_diagnostics().await;
        assert!(diagnostics.notifications_enabled);
        assert_eq!(diagnostics.scheduled_count, 0);
        assert_eq!(diagnostics.last_run, Some(now + HOUR / 2));
        assert_eq!(diagnostics.snapshot_count, 1);
        assert_eq!(diagnostics.rule_count, 1);
    }
}
