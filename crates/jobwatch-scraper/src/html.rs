//! Static listing pages parsed with CSS selectors.

use std::sync::LazyLock;

use jobwatch_core::{HtmlSelectors, RawPosting};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::client::{HttpClient, ACCEPT_HTML, BROWSER_FALLBACK_UA};
use crate::error::ScraperError;

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Collapses runs of whitespace to a single space and trims both ends.
pub(crate) fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_owned()
}

/// Visible text of `element` with whitespace collapsed.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

pub(crate) fn parse_selector(selector: &str) -> Result<Selector, ScraperError> {
    Selector::parse(selector).map_err(|e| ScraperError::InvalidSelector {
        selector: selector.to_owned(),
        reason: e.to_string(),
    })
}

fn parse_optional_selector(selector: Option<&str>) -> Result<Option<Selector>, ScraperError> {
    selector
        .filter(|s| !s.trim().is_empty())
        .map(parse_selector)
        .transpose()
}

/// Extracts listing rows from a career page.
///
/// Each `job_list` match yields at most one row: the first `job_title`
/// match's text and the first `job_url` match's `href`. Rows missing either
/// element are skipped. Location and department are optional and an empty
/// text counts as absent.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidSelector`] if any configured selector does
/// not parse.
pub fn parse_listing(body: &str, selectors: &HtmlSelectors) -> Result<Vec<RawPosting>, ScraperError> {
    let list = parse_selector(&selectors.job_list)?;
    let title = parse_selector(&selectors.job_title)?;
    let link = parse_selector(&selectors.job_url)?;
    let location = parse_optional_selector(selectors.location.as_deref())?;
    let department = parse_optional_selector(selectors.department.as_deref())?;

    let document = Html::parse_document(body);
    let optional_text = |row: ElementRef<'_>, selector: Option<&Selector>| {
        selector
            .and_then(|s| row.select(s).next())
            .map(element_text)
            .filter(|t| !t.is_empty())
    };

    let rows = document
        .select(&list)
        .filter_map(|row| {
            let title_el = row.select(&title).next()?;
            let href = row.select(&link).next()?.value().attr("href")?;
            Some(RawPosting {
                title: element_text(title_el),
                raw_url: href.trim().to_owned(),
                location: optional_text(row, location.as_ref()),
                department: optional_text(row, department.as_ref()),
            })
        })
        .collect();

    Ok(rows)
}

/// Fetches and parses one listing page.
///
/// A 403 is retried once with a browser-like `User-Agent`, since some
/// career sites filter non-browser clients.
pub(crate) async fn fetch_listing(
    client: &HttpClient,
    url: &str,
    selectors: &HtmlSelectors,
) -> Result<Vec<RawPosting>, ScraperError> {
    let body = match client.get_text(url, ACCEPT_HTML, None).await {
        Err(ScraperError::UnexpectedStatus { status: 403, .. }) => {
            tracing::warn!(url, "listing page returned 403; retrying with browser profile");
            client
                .get_text(url, ACCEPT_HTML, Some(BROWSER_FALLBACK_UA))
                .await?
        }
        other => other?,
    };

    parse_listing(&body, selectors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selectors() -> HtmlSelectors {
        HtmlSelectors {
            job_list: "table tr".to_owned(),
            job_title: "a".to_owned(),
            job_url: "a".to_owned(),
            location: Some(".location".to_owned()),
            department: Some(".department".to_owned()),
        }
    }

    const BOARD: &str = r#"
        <html><body><table>
          <tr><th>Role</th><th>Where</th></tr>
          <tr>
            <td><a href="/xai/jobs/1">  Senior
                 Backend Engineer </a></td>
            <td class="location">Palo Alto, CA</td>
            <td class="department"> </td>
          </tr>
          <tr>
            <td><a href="https://other.example/jobs/2">Research Scientist</a></td>
          </tr>
        </table></body></html>
    "#;

    #[test]
    fn extracts_rows_and_skips_rows_without_links() {
        let rows = parse_listing(BOARD, &selectors()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].title, "Senior Backend Engineer");
        assert_eq!(rows[0].raw_url, "/xai/jobs/1");
        assert_eq!(rows[0].location.as_deref(), Some("Palo Alto, CA"));
        assert_eq!(rows[0].department, None);
        assert_eq!(rows[1].raw_url, "https://other.example/jobs/2");
        assert_eq!(rows[1].location, None);
    }

    #[test]
    fn only_the_first_link_match_is_considered() {
        let html = r#"
            <table>
              <tr><td><a name="anchor">Data Engineer</a> <a href="/jobs/7">Apply</a></td></tr>
              <tr><td><a href="/jobs/8">Product Designer</a> <a href="/jobs/9">Apply</a></td></tr>
            </table>
        "#;
        let rows = parse_listing(html, &selectors()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "Product Designer");
        assert_eq!(rows[0].raw_url, "/jobs/8");
    }

    #[test]
    fn comma_selectors_match_either_alternative() {
        let html = r#"
            <div class="job-listing"><h3>Policy Lead</h3><a href="/a">Apply</a></div>
            <div data-job="1"><span class="job-title">Research Engineer</span><a href="/b">Apply</a></div>
        "#;
        let sel = HtmlSelectors {
            job_list: ".job-listing, [data-job]".to_owned(),
            job_title: ".job-title, h3".to_owned(),
            job_url: "a".to_owned(),
            location: None,
            department: None,
        };
        let rows = parse_listing(html, &sel).unwrap();
        let titles: Vec<_> = rows.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Policy Lead", "Research Engineer"]);
    }

    #[test]
    fn page_without_matches_yields_nothing() {
        let rows = parse_listing("<html><body><p>No openings</p></body></html>", &selectors())
            .unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn invalid_selector_is_an_error() {
        let mut sel = selectors();
        sel.job_list = "tr[".to_owned();
        let err = parse_listing(BOARD, &sel).unwrap_err();
        assert!(matches!(err, ScraperError::InvalidSelector { ref selector, .. } if selector == "tr["));
    }

    #[test]
    fn collapse_whitespace_trims_and_joins() {
        assert_eq!(collapse_whitespace("  a \n\t b  "), "a b");
    }
}
