//! Collaborator traits the monitor depends on, plus the HTTP-backed
//! listing source that dispatches on a site's configured backend.

use std::future::Future;

use async_trait::async_trait;
use jobwatch_core::{JobDetail, RawPosting, SiteConfig, SourceConfig};
use tokio_util::sync::CancellationToken;

use crate::client::HttpClient;
use crate::error::ScraperError;
use crate::{greenhouse, html};

/// Retrieves the current listing rows for one site.
#[async_trait]
pub trait PostingSource: Send + Sync {
    /// Returns every row currently listed, or an error if the site could not
    /// be read. An empty `Vec` means the page had no listings.
    ///
    /// Implementations return [`ScraperError::Cancelled`] promptly once
    /// `cancel` fires.
    async fn fetch(
        &self,
        site: &SiteConfig,
        cancel: &CancellationToken,
    ) -> Result<Vec<RawPosting>, ScraperError>;
}

/// Looks up extended information for a single posting URL.
#[async_trait]
pub trait DetailSource: Send + Sync {
    async fn fetch_detail(&self, url: &str) -> Result<JobDetail, ScraperError>;
}

/// Races `operation` against `cancel`; the operation is dropped if the
/// token fires first.
pub async fn run_cancellable<T, Fut>(
    cancel: &CancellationToken,
    operation: Fut,
) -> Result<T, ScraperError>
where
    Fut: Future<Output = Result<T, ScraperError>>,
{
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(ScraperError::Cancelled),
        result = operation => result,
    }
}

/// [`PostingSource`] backed by live HTTP requests.
#[derive(Debug, Clone)]
pub struct HttpPostingSource {
    client: HttpClient,
}

impl HttpPostingSource {
    #[must_use]
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PostingSource for HttpPostingSource {
    async fn fetch(
        &self,
        site: &SiteConfig,
        cancel: &CancellationToken,
    ) -> Result<Vec<RawPosting>, ScraperError> {
        tracing::debug!(site = %site.name, kind = site.source.kind(), "fetching listings");
        match &site.source {
            SourceConfig::Html { selectors } => {
                run_cancellable(cancel, html::fetch_listing(&self.client, &site.url, selectors))
                    .await
            }
            SourceConfig::Greenhouse { board, api_base } => {
                run_cancellable(
                    cancel,
                    greenhouse::fetch_board(&self.client, api_base.as_deref(), board),
                )
                .await
            }
        }
    }
}
