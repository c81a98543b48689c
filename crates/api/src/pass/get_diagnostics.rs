use crate::shared::usecase::UseCase;
use event_watch_infra::WatchContext;

#[derive(Debug)]
pub struct GetDiagnosticsUseCase {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticsSnapshot {
    pub notifications_enabled: bool,
    /// Reminders handed to the sink by the last scheduling run
    pub scheduled_count: usize,
    pub last_run: Option<i64>,
    pub next_fire_at: Option<i64>,
    pub snapshot_count: usize,
    pub rule_count: usize,
}

#[derive(Debug)]
pub enum UseCaseErrors {}

#[async_trait::async_trait]
impl UseCase for GetDiagnosticsUseCase {
    type Response = DiagnosticsSnapshot;

    type Error = UseCaseErrors;

    const NAME: &'static str = "GetDiagnostics";

    async fn execute(&mut self, ctx: &WatchContext) -> Result<Self::Response, Self::Error> {
        let scheduled = ctx.repos.scheduled_notifications.load().await;
        let snapshots = ctx.repos.snapshots.load().await;
        let rules = ctx.repos.rules.load_rules().await;

        Ok(DiagnosticsSnapshot {
            notifications_enabled: ctx.services.notifications.is_enabled(),
            scheduled_count: scheduled.notifications.len(),
            last_run: scheduled.last_run,
            next_fire_at: scheduled.next_fire_at(),
            snapshot_count: snapshots.snapshots.len(),
            rule_count: rules.len(),
        })
    }
}
