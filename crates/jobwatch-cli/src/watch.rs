//! Long-running `watch` command: one run at start-up, then one per interval.
//!
//! Ticks never overlap. A tick that fires while a run is still in progress
//! is skipped and logged. On shutdown the in-flight run is cancelled, so it
//! saves and sends nothing, and the scheduler is stopped.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler};
use tokio_util::sync::CancellationToken;

use crate::monitor::{Monitor, MonitorError};
use crate::run::execute;
use crate::signal::shutdown_signal;

/// # Errors
///
/// Returns an error if the scheduler cannot be created, started, or stopped.
pub(crate) async fn watch(monitor: Monitor, interval: Duration) -> anyhow::Result<()> {
    let monitor = Arc::new(monitor);
    let in_flight = Arc::new(Mutex::new(()));
    let cancel = CancellationToken::new();

    let mut scheduler = JobScheduler::new().await?;

    let job_monitor = Arc::clone(&monitor);
    let job_in_flight = Arc::clone(&in_flight);
    let job_cancel = cancel.clone();
    let job = Job::new_repeated_async(interval, move |_uuid, _lock| {
        let monitor = Arc::clone(&job_monitor);
        let in_flight = Arc::clone(&job_in_flight);
        let cancel = job_cancel.clone();
        Box::pin(async move {
            run_guarded(&monitor, &in_flight, &cancel).await;
        })
    })?;
    scheduler.add(job).await?;
    scheduler.start().await?;

    tracing::info!(
        interval_minutes = interval.as_secs() / 60,
        sites = monitor.sites().len(),
        "watching for new postings"
    );

    tokio::spawn({
        let monitor = Arc::clone(&monitor);
        let in_flight = Arc::clone(&in_flight);
        let cancel = cancel.clone();
        async move { run_guarded(&monitor, &in_flight, &cancel).await }
    });

    shutdown_signal().await;
    cancel.cancel();
    scheduler.shutdown().await?;

    // Wait for a cancelled run to unwind.
    let _idle = in_flight.lock().await;
    tracing::info!("watch stopped");
    Ok(())
}

/// Runs the monitor unless a run is already in progress or shutdown has begun.
async fn run_guarded(monitor: &Monitor, in_flight: &Mutex<()>, cancel: &CancellationToken) {
    if cancel.is_cancelled() {
        return;
    }
    let Ok(_running) = in_flight.try_lock() else {
        tracing::warn!("previous run still in progress; skipping this tick");
        return;
    };

    match execute(monitor, cancel).await {
        Ok(report) => tracing::info!(
            outcome = ?report.outcome,
            failed_sites = report.failed_sites(),
            "run finished"
        ),
        Err(MonitorError::Cancelled) => tracing::info!("run cancelled by shutdown"),
        Err(e) => tracing::error!(error = %e, phase = %monitor.phase(), "run failed"),
    }
}
