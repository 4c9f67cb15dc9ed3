//! Persisted per-site baselines of previously seen job titles.

use std::collections::BTreeSet;
use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

mod json_file;

pub use json_file::JsonFileStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("baseline I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize baseline for {site}: {source}")]
    Serialize {
        site: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("baseline file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Load/save access to one baseline per site name.
///
/// `save` followed by `load` for the same site returns an equal set.
#[async_trait]
pub trait BaselineStore: Send + Sync {
    /// Returns the titles saved for `site`, or an empty set if nothing has
    /// been saved yet.
    async fn load(&self, site: &str) -> Result<BTreeSet<String>, StoreError>;

    /// Replaces the saved titles for `site`.
    async fn save(&self, site: &str, titles: &BTreeSet<String>) -> Result<(), StoreError>;
}
