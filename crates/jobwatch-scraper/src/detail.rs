//! Per-posting detail lookup used to enrich digests.

use async_trait::async_trait;
use jobwatch_core::JobDetail;
use scraper::Html;

use crate::client::{HttpClient, ACCEPT_HTML};
use crate::error::ScraperError;
use crate::html::{collapse_whitespace, element_text, parse_selector};
use crate::source::DetailSource;

const DESCRIPTION_SELECTOR: &str = r#"#content, .job-description, [data-testid="job-description"]"#;
const LOCATION_SELECTOR: &str =
    r#".location, [data-qa="job-location"], [data-testid="job-location"]"#;
const DEPARTMENT_SELECTOR: &str =
    r#".department, [data-qa="job-department"], [data-testid="job-team"]"#;
const SALARY_SELECTOR: &str = r#".salary, .compensation, [data-testid="salary"]"#;
const REQUIREMENT_SELECTOR: &str = "li, p";

const DESCRIPTION_MAX_CHARS: usize = 500;
const MAX_REQUIREMENTS: usize = 5;
const NOT_SPECIFIED: &str = "Not specified";

const REQUIREMENT_MARKERS: [&str; 4] = ["require", "must have", "experience", "skills"];
const REMOTE_MARKERS: [&str; 3] = ["remote", "work from home", "distributed"];

/// Extracts a [`JobDetail`] from a posting page.
///
/// # Errors
///
/// Only fails if one of the built-in selectors does not parse.
pub fn parse_detail(body: &str) -> Result<JobDetail, ScraperError> {
    let document = Html::parse_document(body);

    let first_text = |selector: &str| -> Result<Option<String>, ScraperError> {
        let selector = parse_selector(selector)?;
        Ok(document
            .select(&selector)
            .next()
            .map(element_text)
            .filter(|t| !t.is_empty()))
    };

    let description: String = first_text(DESCRIPTION_SELECTOR)?
        .unwrap_or_default()
        .chars()
        .take(DESCRIPTION_MAX_CHARS)
        .collect();
    let location = first_text(LOCATION_SELECTOR)?.unwrap_or_else(|| NOT_SPECIFIED.to_owned());
    let department =
        first_text(DEPARTMENT_SELECTOR)?.unwrap_or_else(|| NOT_SPECIFIED.to_owned());
    let salary = first_text(SALARY_SELECTOR)?;

    let requirement_selector = parse_selector(REQUIREMENT_SELECTOR)?;
    let requirements = document
        .select(&requirement_selector)
        .map(element_text)
        .filter(|text| {
            let lower = text.to_lowercase();
            REQUIREMENT_MARKERS.iter().any(|m| lower.contains(m))
        })
        .take(MAX_REQUIREMENTS)
        .collect();

    let full_text = collapse_whitespace(&document.root_element().text().collect::<String>())
        .to_lowercase();
    let remote = REMOTE_MARKERS.iter().any(|m| full_text.contains(m));

    Ok(JobDetail {
        description,
        requirements,
        location,
        department,
        salary,
        remote,
    })
}

/// Fetches posting pages over HTTP and parses them with [`parse_detail`].
#[derive(Debug, Clone)]
pub struct HttpDetailSource {
    client: HttpClient,
}

impl HttpDetailSource {
    #[must_use]
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DetailSource for HttpDetailSource {
    async fn fetch_detail(&self, url: &str) -> Result<JobDetail, ScraperError> {
        let body = self.client.get_text(url, ACCEPT_HTML, None).await?;
        parse_detail(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POSTING: &str = r#"
        <html><body>
          <div class="location">San Francisco, CA</div>
          <div id="content">
            <p>We build   reliable systems.</p>
            <ul>
              <li>5+ years of experience with Rust</li>
              <li>Free snacks</li>
              <li>Strong communication skills</li>
              <li>Must have shipped production services</li>
            </ul>
            <p>This role is open to remote candidates.</p>
          </div>
          <span class="compensation">$200k - $250k</span>
        </body></html>
    "#;

    #[test]
    fn extracts_all_fields() {
        let detail = parse_detail(POSTING).unwrap();
        assert!(detail.description.starts_with("We build reliable systems."));
        assert_eq!(detail.location, "San Francisco, CA");
        assert_eq!(detail.department, "Not specified");
        assert_eq!(detail.salary.as_deref(), Some("$200k - $250k"));
        assert!(detail.remote);
        assert_eq!(
            detail.requirements,
            vec![
                "5+ years of experience with Rust",
                "Strong communication skills",
                "Must have shipped production services",
            ]
        );
    }

    #[test]
    fn description_is_truncated_to_500_chars() {
        let long = "x".repeat(800);
        let page = format!(r#"<div class="job-description">{long}</div>"#);
        let detail = parse_detail(&page).unwrap();
        assert_eq!(detail.description.chars().count(), 500);
    }

    #[test]
    fn requirements_are_capped_at_five() {
        let items: String = (0..8)
            .map(|i| format!("<li>Requirement number {i}</li>"))
            .collect();
        let detail = parse_detail(&format!("<ul>{items}</ul>")).unwrap();
        assert_eq!(detail.requirements.len(), 5);
        assert_eq!(detail.requirements[0], "Requirement number 0");
    }

    #[test]
    fn bare_page_uses_fallbacks() {
        let detail = parse_detail("<html><body><h1>Office Manager</h1></body></html>").unwrap();
        assert_eq!(detail.description, "");
        assert_eq!(detail.location, "Not specified");
        assert!(detail.salary.is_none());
        assert!(detail.requirements.is_empty());
        assert!(!detail.remote);
    }
}
