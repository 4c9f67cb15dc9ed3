use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use jobwatch_core::slugify;

use crate::{BaselineStore, StoreError};

/// Stores each site's baseline as a sorted JSON array of titles in
/// `<dir>/<slug>.json`.
///
/// Writes go to a sibling `.tmp` file that is then renamed over the target,
/// so a crash mid-write leaves the previous baseline intact.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the baseline file for `site`.
    #[must_use]
    pub fn path_for(&self, site: &str) -> PathBuf {
        self.dir.join(format!("{}.json", slugify(site)))
    }

    /// Deletes the saved baseline for `site` so its next run starts empty.
    ///
    /// Returns `false` if there was nothing to delete.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file exists but cannot be removed.
    pub async fn clear(&self, site: &str) -> Result<bool, StoreError> {
        let path = self.path_for(site);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }
}

#[async_trait]
impl BaselineStore for JsonFileStore {
    async fn load(&self, site: &str) -> Result<BTreeSet<String>, StoreError> {
        let path = self.path_for(site);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(site, path = %path.display(), "no saved baseline; starting empty");
                return Ok(BTreeSet::new());
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        let titles: Vec<String> =
            serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
                path: path.clone(),
                source,
            })?;
        Ok(titles.into_iter().collect())
    }

    async fn save(&self, site: &str, titles: &BTreeSet<String>) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| StoreError::Io {
                path: self.dir.clone(),
                source,
            })?;

        let path = self.path_for(site);
        let tmp = path.with_extension("json.tmp");
        let body = serde_json::to_vec_pretty(titles).map_err(|source| StoreError::Serialize {
            site: site.to_owned(),
            source,
        })?;

        tokio::fs::write(&tmp, &body)
            .await
            .map_err(|source| StoreError::Io {
                path: tmp.clone(),
                source,
            })?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;

        tracing::debug!(site, count = titles.len(), path = %path.display(), "baseline saved");
        Ok(())
    }
}
