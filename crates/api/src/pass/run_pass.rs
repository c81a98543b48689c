use crate::{
    change::detect_changes::DetectChangesUseCase,
    reminder::schedule_reminders::ScheduleRemindersUseCase,
    shared::usecase::{execute, UseCase},
};
use event_watch_domain::EventInstance;
use event_watch_infra::WatchContext;
use tracing::info;

/// Detects changes and then schedules reminders over the same events.
///
/// Running it again with unchanged input shows nothing new and reissues the
/// same reminder ids, so overlapping passes are harmless.
#[derive(Debug)]
pub struct RunPassUseCase<'a> {
    pub events: &'a [EventInstance],
    pub now: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunReport {
    pub changes_emitted: usize,
    pub reminders_scheduled: usize,
}

#[derive(Debug)]
pub enum UseCaseErrors {}

#[async_trait::async_trait]
impl<'a> UseCase for RunPassUseCase<'a> {
    type Response = RunReport;

    type Error = UseCaseErrors;

    const NAME: &'static str = "RunPass";

    async fn execute(&mut self, ctx: &WatchContext) -> Result<Self::Response, Self::Error> {
        let usecase = DetectChangesUseCase {
            events: self.events,
        };
        let changes_emitted = match execute(usecase, ctx).await {
            Ok(res) => res.emitted,
            Err(e) => match e {},
        };

        let usecase = ScheduleRemindersUseCase {
            events: self.events,
            now: self.now,
        };
        let reminders_scheduled = match execute(usecase, ctx).await {
            Ok(scheduled) => scheduled.len(),
            Err(e) => match e {},
        };

        let report = RunReport {
            changes_emitted,
            reminders_scheduled,
        };
        info!(
            changes_emitted = report.changes_emitted,
            reminders_scheduled = report.reminders_scheduled,
            "Finished pass over {} events",
            self.events.len()
        );
        Ok(report)
    }
}
