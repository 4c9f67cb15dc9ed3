//! One monitoring run: fetch every enabled site, normalize and diff against
//! the stored baselines, persist the new baselines, then send the digest.
//!
//! Sites are processed strictly in order. A failure confined to one site
//! (unreadable baseline, fetch error, failed save) is logged, recorded in
//! that site's [`SiteReport`], and the run moves on. Only cancellation and
//! digest delivery end a run with an error.

mod report;

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use jobwatch_core::{CategoryTable, NoveltyTracker, PersistPolicy, Posting, SiteConfig};
use jobwatch_notify::{build_digest, DigestOptions, Notifier, NotifyError};
use jobwatch_scraper::{normalize_posting, DetailSource, PostingSource, ScraperError};
use jobwatch_store::BaselineStore;
use thiserror::Error;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

pub use report::{PersistStatus, RunOutcome, RunPhase, RunReport, SiteReport, SiteStatus};

#[derive(Debug, Error)]
pub enum MonitorError {
    /// Baselines were already saved; the digest for this run is lost.
    #[error("digest delivery failed: {0}")]
    Delivery(#[from] NotifyError),
    #[error("run cancelled")]
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct MonitorSettings {
    pub persist_policy: PersistPolicy,
    /// Pause between consecutive site fetches.
    pub site_delay: Duration,
    pub fetch_details: bool,
    /// Compute and send the digest but never write baselines.
    pub dry_run: bool,
}

/// Titles observed for one site, waiting for the persisting phase.
struct Observed {
    report_index: usize,
    site: String,
    titles: BTreeSet<String>,
    new_postings: usize,
}

pub struct Monitor {
    sites: Vec<SiteConfig>,
    default_keywords: CategoryTable,
    settings: MonitorSettings,
    source: Arc<dyn PostingSource>,
    store: Arc<dyn BaselineStore>,
    notifier: Arc<dyn Notifier>,
    details: Option<Arc<dyn DetailSource>>,
    phase: watch::Sender<RunPhase>,
}

impl Monitor {
    /// `sites` is the ordered list of enabled sites to visit each run.
    #[must_use]
    pub fn new(
        sites: Vec<SiteConfig>,
        default_keywords: CategoryTable,
        settings: MonitorSettings,
        source: Arc<dyn PostingSource>,
        store: Arc<dyn BaselineStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let (phase, _) = watch::channel(RunPhase::Idle);
        Self {
            sites,
            default_keywords,
            settings,
            source,
            store,
            notifier,
            details: None,
            phase,
        }
    }

    /// Supplies the lookup used when `fetch_details` is enabled.
    #[must_use]
    pub fn with_details(mut self, details: Arc<dyn DetailSource>) -> Self {
        self.details = Some(details);
        self
    }

    #[must_use]
    pub fn sites(&self) -> &[SiteConfig] {
        &self.sites
    }

    /// The phase of the current or most recent run.
    #[must_use]
    pub fn phase(&self) -> RunPhase {
        self.phase.borrow().clone()
    }

    fn enter(&self, phase: RunPhase) {
        tracing::debug!(phase = %phase, "monitor phase");
        self.phase.send_replace(phase);
    }

    fn fail(&self, err: MonitorError) -> MonitorError {
        self.enter(RunPhase::Failed(err.to_string()));
        err
    }

    /// Executes one run. `date` is printed in the digest.
    ///
    /// Cancellation is honoured until baselines start being written: a
    /// cancelled run saves nothing and sends nothing.
    ///
    /// # Errors
    ///
    /// - [`MonitorError::Cancelled`] if `cancel` fired before persisting.
    /// - [`MonitorError::Delivery`] if the digest could not be sent.
    pub async fn run(
        &self,
        date: NaiveDate,
        cancel: &CancellationToken,
    ) -> Result<RunReport, MonitorError> {
        self.enter(RunPhase::Initializing);
        let mut reports: Vec<SiteReport> = Vec::with_capacity(self.sites.len());
        let (tracker, unreadable) = self.load_baselines().await;

        let mut new_postings: Vec<Posting> = Vec::new();
        let mut observed: Vec<Observed> = Vec::new();
        let mut fetched_any = false;

        for (i, site) in self.sites.iter().enumerate() {
            if let Some(reason) = &unreadable[i] {
                reports.push(SiteReport::failed(
                    &site.name,
                    SiteStatus::BaselineUnreadable(reason.clone()),
                ));
                continue;
            }
            if cancel.is_cancelled() {
                return Err(self.fail(MonitorError::Cancelled));
            }
            if fetched_any && !self.settings.site_delay.is_zero() {
                tokio::select! {
                    () = cancel.cancelled() => return Err(self.fail(MonitorError::Cancelled)),
                    () = tokio::time::sleep(self.settings.site_delay) => {}
                }
            }
            fetched_any = true;
            self.enter(RunPhase::ScrapingSite(i));

            let report_index = reports.len();
            let raw = match self.source.fetch(site, cancel).await {
                Ok(raw) => raw,
                Err(ScraperError::Cancelled) => return Err(self.fail(MonitorError::Cancelled)),
                Err(e) => {
                    tracing::error!(site = %site.name, error = %e, "failed to fetch listings; skipping site");
                    reports.push(SiteReport::failed(&site.name, SiteStatus::FetchFailed(e.to_string())));
                    continue;
                }
            };

            let raw_count = raw.len();
            let postings: Vec<Posting> = raw
                .into_iter()
                .filter_map(|r| normalize_posting(r, site, &self.default_keywords, &tracker))
                .collect();
            let titles: BTreeSet<String> = postings.iter().map(|p| p.title.clone()).collect();
            let site_new: Vec<Posting> = postings.iter().filter(|p| p.is_new).cloned().collect();

            tracing::info!(
                site = %site.name,
                rows = raw_count,
                postings = postings.len(),
                new_postings = site_new.len(),
                "site scraped"
            );

            reports.push(SiteReport {
                site: site.name.clone(),
                postings: postings.len(),
                new_postings: site_new.len(),
                status: SiteStatus::Fetched,
                persist: PersistStatus::NotWritten,
            });
            observed.push(Observed {
                report_index,
                site: site.name.clone(),
                titles,
                new_postings: site_new.len(),
            });
            new_postings.extend(site_new);
        }

        self.enter(RunPhase::Aggregating);
        if cancel.is_cancelled() {
            return Err(self.fail(MonitorError::Cancelled));
        }
        tracing::info!(
            sites = reports.len(),
            new_postings = new_postings.len(),
            "all sites processed"
        );

        self.enter(RunPhase::Persisting);
        self.persist(tracker, observed, &mut reports).await;

        self.enter(RunPhase::Notifying);
        let outcome = self.notify(&new_postings, date).await.map_err(|e| self.fail(e))?;

        self.enter(RunPhase::Done);
        Ok(RunReport {
            outcome,
            sites: reports,
        })
    }

    /// Seeds a tracker from the store. The second value holds, per site, the
    /// reason its baseline could not be read; such sites are not fetched.
    async fn load_baselines(&self) -> (NoveltyTracker, Vec<Option<String>>) {
        let mut tracker = NoveltyTracker::new();
        let mut unreadable = Vec::with_capacity(self.sites.len());

        for site in &self.sites {
            match self.store.load(&site.name).await {
                Ok(titles) => {
                    tracing::debug!(site = %site.name, known = titles.len(), "baseline loaded");
                    tracker.load_baseline(&site.name, titles);
                    unreadable.push(None);
                }
                Err(e) => {
                    tracing::error!(
                        site = %site.name,
                        error = %e,
                        "baseline unreadable; skipping site for this run"
                    );
                    unreadable.push(Some(e.to_string()));
                }
            }
        }

        (tracker, unreadable)
    }

    async fn persist(
        &self,
        mut tracker: NoveltyTracker,
        observed: Vec<Observed>,
        reports: &mut [SiteReport],
    ) {
        for entry in observed {
            let wanted = match self.settings.persist_policy {
                PersistPolicy::Always => !entry.titles.is_empty(),
                PersistPolicy::OnNewPostings => entry.new_postings > 0,
            };
            if !wanted {
                continue;
            }

            tracker.record_observed(&entry.site, entry.titles);
            let Some(titles) = tracker.baseline(&entry.site) else {
                continue;
            };

            if self.settings.dry_run {
                tracing::info!(site = %entry.site, titles = titles.len(), "dry run; baseline not saved");
                continue;
            }

            reports[entry.report_index].persist = match self.store.save(&entry.site, titles).await {
                Ok(()) => PersistStatus::Saved,
                Err(e) => {
                    tracing::error!(site = %entry.site, error = %e, "failed to save baseline");
                    PersistStatus::Failed(e.to_string())
                }
            };
        }
    }

    async fn notify(
        &self,
        new_postings: &[Posting],
        date: NaiveDate,
    ) -> Result<RunOutcome, MonitorError> {
        let options = DigestOptions {
            date,
            monitored_sites: self.sites.iter().map(|s| s.name.clone()).collect(),
            fetch_details: self.settings.fetch_details,
        };

        let Some(digest) = build_digest(new_postings, &options, self.details.as_deref()).await
        else {
            tracing::info!("no new jobs found");
            return Ok(RunOutcome::NoNewJobs);
        };

        self.notifier.send(&digest).await?;
        tracing::info!(
            new_postings = digest.new_postings,
            companies = digest.companies.len(),
            "digest sent"
        );

        Ok(RunOutcome::DigestSent {
            new_postings: digest.new_postings,
            companies: digest.companies,
        })
    }
}

#[cfg(test)]
#[path = "monitor_test.rs"]
mod tests;
