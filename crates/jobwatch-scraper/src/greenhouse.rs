//! Greenhouse public job board API.
//!
//! `GET {api_base}/v1/boards/{board}/jobs` returns every open posting on the
//! board in one response; there is no pagination.

use jobwatch_core::RawPosting;
use serde::Deserialize;

use crate::client::HttpClient;
use crate::error::ScraperError;

pub const DEFAULT_API_BASE: &str = "https://boards-api.greenhouse.io";

#[derive(Debug, Deserialize)]
pub struct BoardJobsResponse {
    #[serde(default)]
    pub jobs: Vec<BoardJob>,
}

#[derive(Debug, Deserialize)]
pub struct BoardJob {
    pub title: String,
    pub absolute_url: String,
    #[serde(default)]
    pub location: Option<NamedRef>,
    #[serde(default)]
    pub departments: Vec<NamedRef>,
}

#[derive(Debug, Deserialize)]
pub struct NamedRef {
    pub name: String,
}

impl From<BoardJob> for RawPosting {
    fn from(job: BoardJob) -> Self {
        let non_empty = |s: String| {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_owned())
        };
        RawPosting {
            title: job.title.trim().to_owned(),
            raw_url: job.absolute_url,
            location: job.location.and_then(|l| non_empty(l.name)),
            department: job
                .departments
                .into_iter()
                .next()
                .and_then(|d| non_empty(d.name)),
        }
    }
}

pub(crate) fn board_jobs_url(api_base: Option<&str>, board: &str) -> String {
    let base = api_base.unwrap_or(DEFAULT_API_BASE).trim_end_matches('/');
    format!("{base}/v1/boards/{}/jobs", board.trim())
}

pub(crate) async fn fetch_board(
    client: &HttpClient,
    api_base: Option<&str>,
    board: &str,
) -> Result<Vec<RawPosting>, ScraperError> {
    let url = board_jobs_url(api_base, board);
    let response: BoardJobsResponse = client
        .get_json(&url, &format!("greenhouse board '{board}'"))
        .await?;
    Ok(response.jobs.into_iter().map(RawPosting::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_url_uses_default_base() {
        assert_eq!(
            board_jobs_url(None, "xai"),
            "https://boards-api.greenhouse.io/v1/boards/xai/jobs"
        );
    }

    #[test]
    fn board_url_trims_trailing_slash_on_override() {
        assert_eq!(
            board_jobs_url(Some("http://127.0.0.1:9999/"), "acme"),
            "http://127.0.0.1:9999/v1/boards/acme/jobs"
        );
    }

    #[test]
    fn maps_first_department_and_location() {
        let json = r#"{
            "jobs": [{
                "id": 1,
                "title": " Data Engineer ",
                "absolute_url": "https://job-boards.greenhouse.io/acme/jobs/1",
                "location": {"name": "Remote"},
                "departments": [{"id": 7, "name": "Data"}, {"id": 8, "name": "Platform"}]
            }, {
                "id": 2,
                "title": "Recruiter",
                "absolute_url": "https://job-boards.greenhouse.io/acme/jobs/2",
                "location": {"name": ""}
            }],
            "meta": {"total": 2}
        }"#;
        let parsed: BoardJobsResponse = serde_json::from_str(json).unwrap();
        let rows: Vec<RawPosting> = parsed.jobs.into_iter().map(RawPosting::from).collect();
        assert_eq!(rows[0].title, "Data Engineer");
        assert_eq!(rows[0].location.as_deref(), Some("Remote"));
        assert_eq!(rows[0].department.as_deref(), Some("Data"));
        assert_eq!(rows[1].location, None);
        assert_eq!(rows[1].department, None);
    }
}
