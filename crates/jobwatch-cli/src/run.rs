//! One-shot `run` command.

use jobwatch_core::AppConfig;
use tokio_util::sync::CancellationToken;

use crate::monitor::{Monitor, MonitorError, PersistStatus, RunOutcome, RunReport, SiteStatus};
use crate::setup::build_monitor;
use crate::signal::shutdown_signal;

/// Runs the monitor once. Ctrl-C cancels the run before anything is saved.
///
/// # Errors
///
/// Returns an error if setup fails, the run is cancelled, or the digest
/// cannot be delivered. Per-site failures only appear in the summary.
pub(crate) async fn run_once(
    config: &AppConfig,
    cli_sites: &[String],
    dry_run: bool,
) -> anyhow::Result<()> {
    let monitor = build_monitor(config, cli_sites, dry_run)?;
    let cancel = CancellationToken::new();

    let run = execute(&monitor, &cancel);
    tokio::pin!(run);
    let report = tokio::select! {
        result = &mut run => result?,
        () = shutdown_signal() => {
            cancel.cancel();
            run.await?
        }
    };

    print_report(&report);
    Ok(())
}

pub(crate) async fn execute(
    monitor: &Monitor,
    cancel: &CancellationToken,
) -> Result<RunReport, MonitorError> {
    let today = chrono::Local::now().date_naive();
    monitor.run(today, cancel).await
}

pub(crate) fn print_report(report: &RunReport) {
    for site in &report.sites {
        let status = match &site.status {
            SiteStatus::Fetched => format!("{} postings, {} new", site.postings, site.new_postings),
            SiteStatus::BaselineUnreadable(e) => format!("skipped (baseline unreadable: {e})"),
            SiteStatus::FetchFailed(e) => format!("fetch failed: {e}"),
        };
        let persist = match &site.persist {
            PersistStatus::Saved => "baseline saved".to_owned(),
            PersistStatus::NotWritten => "baseline unchanged".to_owned(),
            PersistStatus::Failed(e) => format!("baseline save failed: {e}"),
        };
        println!("{:<24} {status}; {persist}", site.site);
    }

    match &report.outcome {
        RunOutcome::DigestSent {
            new_postings,
            companies,
        } => println!(
            "sent digest: {new_postings} new posting(s) at {}",
            companies.join(", ")
        ),
        RunOutcome::NoNewJobs => println!("no new jobs found"),
    }

    let failed = report.failed_sites();
    if failed > 0 {
        println!("{failed} site(s) had errors; see log for details");
    }
}
