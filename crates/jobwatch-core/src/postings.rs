use serde::{Deserialize, Serialize};

/// A listing row as extracted by a fetch backend, before validation and
/// URL resolution. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawPosting {
    pub title: String,
    /// Link as found on the page; may be relative.
    pub raw_url: String,
    pub location: Option<String>,
    pub department: Option<String>,
}

/// A normalized job posting with an absolute URL and a resolved category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub title: String,
    pub url: String,
    pub category: String,
    /// Name of the site the posting was scraped from.
    pub company: String,
    pub location: Option<String>,
    pub department: Option<String>,
    /// Whether the title was absent from the site's baseline when the run
    /// started. Fixed at normalization time.
    pub is_new: bool,
}

/// Extended information scraped from a single posting page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDetail {
    pub description: String,
    pub requirements: Vec<String>,
    pub location: String,
    pub department: String,
    pub salary: Option<String>,
    pub remote: bool,
}
