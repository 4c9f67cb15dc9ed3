use std::fmt;

/// Where a run currently is. `ScrapingSite` carries the site's index in the
/// enabled list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    Initializing,
    ScrapingSite(usize),
    Aggregating,
    Persisting,
    Notifying,
    Done,
    Failed(String),
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunPhase::Idle => write!(f, "idle"),
            RunPhase::Initializing => write!(f, "initializing"),
            RunPhase::ScrapingSite(i) => write!(f, "scraping site #{i}"),
            RunPhase::Aggregating => write!(f, "aggregating"),
            RunPhase::Persisting => write!(f, "persisting"),
            RunPhase::Notifying => write!(f, "notifying"),
            RunPhase::Done => write!(f, "done"),
            RunPhase::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    DigestSent {
        new_postings: usize,
        companies: Vec<String>,
    },
    NoNewJobs,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteStatus {
    Fetched,
    /// The stored baseline could not be read; the site was not fetched.
    BaselineUnreadable(String),
    FetchFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistStatus {
    Saved,
    /// Skipped by policy, dry run, or because the site was never fetched.
    NotWritten,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteReport {
    pub site: String,
    pub postings: usize,
    pub new_postings: usize,
    pub status: SiteStatus,
    pub persist: PersistStatus,
}

impl SiteReport {
    pub(crate) fn failed(site: &str, status: SiteStatus) -> Self {
        Self {
            site: site.to_owned(),
            postings: 0,
            new_postings: 0,
            status,
            persist: PersistStatus::NotWritten,
        }
    }
}

/// Result of a completed run. Site entries follow the enabled-site order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub outcome: RunOutcome,
    pub sites: Vec<SiteReport>,
}

impl RunReport {
    #[must_use]
    pub fn failed_sites(&self) -> usize {
        self.sites
            .iter()
            .filter(|s| {
                s.status != SiteStatus::Fetched || matches!(s.persist, PersistStatus::Failed(_))
            })
            .count()
    }
}
