//! Converts raw listing rows into canonical [`Posting`]s.

use jobwatch_core::{categorize, CategoryTable, NoveltyTracker, Posting, RawPosting, SiteConfig};

use crate::origin::extract_site_origin;

/// Text some listing tables put in their header row's link column.
const HEADER_ROW_TITLE: &str = "Job";

/// Normalizes one raw row for `site`.
///
/// Returns `None` for rows with a blank title, a blank link, or the literal
/// header title `"Job"`. Rejections are silent.
///
/// `is_new` is decided here against `tracker` and never revisited, so the
/// tracker must still hold the baseline loaded at the start of the run.
#[must_use]
pub fn normalize_posting(
    raw: RawPosting,
    site: &SiteConfig,
    default_keywords: &CategoryTable,
    tracker: &NoveltyTracker,
) -> Option<Posting> {
    let title = raw.title.trim();
    let raw_url = raw.raw_url.trim();

    if title.is_empty() || raw_url.is_empty() || title == HEADER_ROW_TITLE {
        return None;
    }

    let category = categorize(title, site.keyword_table(default_keywords));
    let is_new = tracker.is_new(&site.name, title);

    Some(Posting {
        title: title.to_owned(),
        url: resolve_url(raw_url, site),
        category,
        company: site.name.clone(),
        location: raw.location,
        department: raw.department,
        is_new,
    })
}

/// Makes `raw_url` absolute for `site`.
///
/// Absolute `http://`/`https://` links pass through unchanged. Anything else
/// is appended verbatim to `url_prefix`, or to the origin of the site URL
/// when no prefix is configured.
#[must_use]
pub fn resolve_url(raw_url: &str, site: &SiteConfig) -> String {
    if has_http_scheme(raw_url) {
        return raw_url.to_owned();
    }

    let base = site
        .url_prefix
        .clone()
        .unwrap_or_else(|| extract_site_origin(&site.url));
    format!("{base}{raw_url}")
}

fn has_http_scheme(url: &str) -> bool {
    let lower = url.get(..8).unwrap_or(url).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
