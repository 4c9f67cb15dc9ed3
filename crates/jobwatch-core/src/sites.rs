use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::categorize::CategoryTable;
use crate::ConfigError;

/// CSS selectors used by the static HTML backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HtmlSelectors {
    /// Matches one element per listing row.
    pub job_list: String,
    /// Evaluated inside each row; first match's text is the title.
    pub job_title: String,
    /// Evaluated inside each row; first match's `href` is the link.
    pub job_url: String,
    pub location: Option<String>,
    pub department: Option<String>,
}

/// Which fetch backend a site uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SourceConfig {
    /// Static listing page parsed with CSS selectors.
    Html { selectors: HtmlSelectors },
    /// Public Greenhouse job board API.
    Greenhouse {
        board: String,
        /// Overrides `https://boards-api.greenhouse.io`; used by tests.
        #[serde(default)]
        api_base: Option<String>,
    },
}

impl SourceConfig {
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            SourceConfig::Html { .. } => "html",
            SourceConfig::Greenhouse { .. } => "greenhouse",
        }
    }
}

/// One monitored employer career page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Unique display name; also the baseline storage key.
    pub name: String,
    pub url: String,
    /// Prepended to relative links. Falls back to the origin of `url`.
    #[serde(default)]
    pub url_prefix: Option<String>,
    pub source: SourceConfig,
    #[serde(default)]
    pub category_keywords: CategoryTable,
}

impl SiteConfig {
    /// Filesystem-safe slug of the site name. See [`slugify`].
    #[must_use]
    pub fn slug(&self) -> String {
        slugify(&self.name)
    }

    /// The keyword table to categorize this site's postings with: the site's
    /// own table when it has one, otherwise `defaults`.
    #[must_use]
    pub fn keyword_table<'a>(&'a self, defaults: &'a CategoryTable) -> &'a CategoryTable {
        if self.category_keywords.is_empty() {
            defaults
        } else {
            &self.category_keywords
        }
    }
}

/// Lowercases `name`, keeps ASCII letters, digits, and dashes, turns spaces
/// into dashes, and collapses repeated dashes.
///
/// `"Meta AI"` becomes `"meta-ai"`; non-ASCII characters are dropped.
#[must_use]
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' {
                c
            } else if c == ' ' {
                '-'
            } else {
                '\0'
            }
        })
        .filter(|&c| c != '\0')
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[derive(Debug, Deserialize)]
pub struct SitesFile {
    #[serde(default)]
    pub default_category_keywords: CategoryTable,
    pub sites: Vec<SiteConfig>,
}

/// Load and validate the sites configuration from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_sites(path: &Path) -> Result<SitesFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SitesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let sites_file: SitesFile = serde_yaml::from_str(&content)?;

    validate_sites(&sites_file)?;

    Ok(sites_file)
}

fn validate_sites(sites_file: &SitesFile) -> Result<(), ConfigError> {
    let mut seen_names = HashSet::new();
    let mut seen_slugs = HashSet::new();

    validate_keyword_table("default_category_keywords", &sites_file.default_category_keywords)?;

    for site in &sites_file.sites {
        if site.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "site name must be non-empty".to_string(),
            ));
        }

        if !seen_names.insert(site.name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate site name: '{}'",
                site.name
            )));
        }

        let slug = site.slug();
        if slug.is_empty() {
            return Err(ConfigError::Validation(format!(
                "site '{}' has no ASCII letters or digits to build a storage key from",
                site.name
            )));
        }
        if !seen_slugs.insert(slug.clone()) {
            return Err(ConfigError::Validation(format!(
                "duplicate site slug: '{}' (from site '{}')",
                slug, site.name
            )));
        }

        validate_http_url(&site.name, "url", &site.url)?;
        if let Some(prefix) = &site.url_prefix {
            validate_http_url(&site.name, "url_prefix", prefix)?;
        }

        match &site.source {
            SourceConfig::Html { selectors } => {
                let required = [
                    ("job_list", &selectors.job_list),
                    ("job_title", &selectors.job_title),
                    ("job_url", &selectors.job_url),
                ];
                for (field, value) in required {
                    if value.trim().is_empty() {
                        return Err(ConfigError::Validation(format!(
                            "site '{}' has an empty {field} selector",
                            site.name
                        )));
                    }
                }
            }
            SourceConfig::Greenhouse { board, api_base } => {
                if board.trim().is_empty() {
                    return Err(ConfigError::Validation(format!(
                        "site '{}' has an empty greenhouse board token",
                        site.name
                    )));
                }
                if let Some(base) = api_base {
                    validate_http_url(&site.name, "api_base", base)?;
                }
            }
        }

        validate_keyword_table(&site.name, &site.category_keywords)?;
    }

    Ok(())
}

fn validate_http_url(site: &str, field: &str, raw: &str) -> Result<(), ConfigError> {
    let parsed = url::Url::parse(raw).map_err(|e| {
        ConfigError::Validation(format!("site '{site}' has an invalid {field} '{raw}': {e}"))
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::Validation(format!(
            "site '{site}' {field} must use http or https, got '{raw}'"
        )));
    }
    Ok(())
}

fn validate_keyword_table(owner: &str, table: &CategoryTable) -> Result<(), ConfigError> {
    for (category, keywords) in table {
        if category.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "{owner} has an empty category label"
            )));
        }
        if keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "{owner} category '{category}' has an empty keyword"
            )));
        }
    }
    Ok(())
}

/// Resolve the ordered list of sites to monitor.
///
/// With `enabled == None` every configured site is returned in file order.
/// Otherwise sites come back in the order named; names match
/// case-insensitively, unknown names are warned about and skipped, and a
/// name listed twice is processed once.
#[must_use]
pub fn select_enabled_sites<'a>(
    sites: &'a [SiteConfig],
    enabled: Option<&[String]>,
) -> Vec<&'a SiteConfig> {
    let Some(names) = enabled else {
        return sites.iter().collect();
    };

    let mut selected: Vec<&SiteConfig> = Vec::with_capacity(names.len());
    for name in names {
        let wanted = name.trim().to_lowercase();
        match sites.iter().find(|s| s.name.to_lowercase() == wanted) {
            Some(site) if selected.iter().any(|s| s.name == site.name) => {
                tracing::debug!(site = %site.name, "site listed more than once; ignoring repeat");
            }
            Some(site) => selected.push(site),
            None => {
                tracing::warn!(site = %name, "no configuration found for enabled site; skipping");
            }
        }
    }
    selected
}

#[cfg(test)]
#[path = "sites_test.rs"]
mod tests;
