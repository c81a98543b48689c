mod telemetry;

use event_watch_api::EventWatch;
use event_watch_infra::setup_context;
use telemetry::{get_subscriber, init_subscriber};
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = get_subscriber("event_watch".into(), "info".into());
    init_subscriber(subscriber);

    let context = setup_context();
    info!(
        poll_interval_secs = context.config.poll_interval_secs,
        "Starting event watch"
    );
    let watch = EventWatch::new(context);
    let mut job = watch.start_job_schedulers();

    tokio::select! {
        res = &mut job => {
            if let Err(e) = res {
                error!("Detection job stopped unexpectedly. Err: {:?}", e);
            }
        }
        res = tokio::signal::ctrl_c() => {
            res?;
            info!("Received Ctrl-C, shutting down");
            // Drops the running pass at its next await point
            job.abort();
        }
    }

    Ok(())
}
