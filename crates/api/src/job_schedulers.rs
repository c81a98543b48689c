use crate::{
    pass::run_pass::{RunPassUseCase, RunReport},
    shared::usecase::execute,
};
use chrono::Duration;
use event_watch_domain::TimeSpan;
use event_watch_infra::WatchContext;
use tokio::{task::JoinHandle, time::interval};
use tracing::error;

/// Fetches the events around now from the event source and runs a pass over
/// them. Returns `None` when the event source could not be reached, in which
/// case nothing is touched and the next tick tries again.
pub async fn run_scheduled_pass(ctx: &WatchContext) -> Option<RunReport> {
    let now = ctx.sys.get_timestamp_millis();
    let timespan = TimeSpan::around(
        now,
        Duration::days(ctx.config.lookbehind_days),
        Duration::days(ctx.config.lookahead_days),
    );

    let events = match ctx.services.event_source.fetch_events(&timespan).await {
        Ok(events) => events,
        Err(e) => {
            error!("Unable to fetch events, skipping this pass. Err: {:?}", e);
            return None;
        }
    };

    let usecase = RunPassUseCase {
        events: &events,
        now,
    };
    match execute(usecase, ctx).await {
        Ok(report) => Some(report),
        Err(e) => match e {},
    }
}

/// Runs a pass right away and then once every poll interval. Aborting the
/// returned handle stops the job at its next suspension point.
pub fn start_detection_job(ctx: WatchContext) -> JoinHandle<()> {
    tokio::spawn(async move {
        let period = std::time::Duration::from_secs(ctx.config.poll_interval_secs.max(1));
        let mut interval = interval(period);
        loop {
            interval.tick().await;
            run_scheduled_pass(&ctx).await;
        }
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::test_utils::{lesson, setup, DAY, HOUR};

    #[tokio::test]
    async fn runs_pass_over_fetched_events() {
        let now = DAY + 8 * HOUR;
        let t = setup(now);
        t.source.set_events(vec![
            lesson(1, DAY + 10 * HOUR),
            // Outside of the lookahead
            lesson(2, DAY + 30 * 24 * HOUR),
        ]);

        let report = run_scheduled_pass(&t.ctx).await.unwrap();
        assert_eq!(report.reminders_scheduled, 2);
        assert_eq!(t.ctx.repos.snapshots.load().await.snapshots.len(), 1);
    }

    #[tokio::test]
    async fn uses_the_clock_of_the_context() {
        let now = DAY + 8 * HOUR;
        let t = setup(now);
        t.source.set_events(vec![lesson(1, DAY + 10 * HOUR)]);

        // The lesson has started two hours later
        t.sys.advance(2 * HOUR);
        let report = run_scheduled_pass(&t.ctx).await.unwrap();
        assert_eq!(report.reminders_scheduled, 0);
    }

    #[tokio::test]
    async fn unavailable_source_skips_the_pass() {
        let t = setup(DAY);
        t.source.set_unavailable(true);

        assert!(run_scheduled_pass(&t.ctx).await.is_none());
        assert!(t.sink.calls().is_empty());
        assert_eq!(t.ctx.repos.scheduled_notifications.load().await.last_run, None);
    }

    #[tokio::test]
    async fn job_runs_first_pass_immediately() {
        let now = DAY + 8 * HOUR;
        let t = setup(now);
        t.source.set_events(vec![lesson(1, DAY + 10 * HOUR)]);

        let handle = start_detection_job(t.ctx.clone());
        for _ in 0..100 {
            if t.ctx.repos.scheduled_notifications.load().await.last_run.is_some() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        handle.abort();

        assert_eq!(t.sink.pending().len(), 2);
    }
}
