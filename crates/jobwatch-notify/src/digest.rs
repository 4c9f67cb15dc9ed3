//! Groups new postings by company and category and renders the digest text.

use std::fmt::{self, Write as _};

use chrono::NaiveDate;
use indexmap::IndexMap;
use jobwatch_core::{JobDetail, Posting};
use jobwatch_scraper::DetailSource;

/// Number of requirement lines shown per job.
const REQUIREMENTS_SHOWN: usize = 2;

/// Explicit inputs to rendering besides the postings themselves.
#[derive(Debug, Clone)]
pub struct DigestOptions {
    /// Date printed in the header and subject.
    pub date: NaiveDate,
    /// Every site the run covered, for the footer.
    pub monitored_sites: Vec<String>,
    /// Look up per-job details before rendering.
    pub fetch_details: bool,
}

/// A rendered notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest {
    pub subject: String,
    pub body: String,
    pub new_postings: usize,
    /// Companies with at least one new posting, in first-seen order.
    pub companies: Vec<String>,
}

/// Builds the digest for `postings`, or `None` when there is nothing to
/// report.
///
/// With `options.fetch_details` set and a `details` source supplied, each
/// posting's page is looked up in order. A failed lookup is logged and only
/// drops that job's detail lines.
pub async fn build_digest(
    postings: &[Posting],
    options: &DigestOptions,
    details: Option<&dyn DetailSource>,
) -> Option<Digest> {
    if postings.is_empty() {
        return None;
    }

    let looked_up = match details.filter(|_| options.fetch_details) {
        Some(source) => lookup_details(postings, source).await,
        None => vec![None; postings.len()],
    };

    Some(render_digest(postings, &looked_up, options))
}

async fn lookup_details(postings: &[Posting], source: &dyn DetailSource) -> Vec<Option<JobDetail>> {
    let mut found = Vec::with_capacity(postings.len());
    for posting in postings {
        match source.fetch_detail(&posting.url).await {
            Ok(detail) => found.push(Some(detail)),
            Err(e) => {
                tracing::warn!(
                    company = %posting.company,
                    title = %posting.title,
                    error = %e,
                    "could not fetch job details; omitting detail lines"
                );
                found.push(None);
            }
        }
    }
    found
}

/// Renders `postings` without any I/O.
///
/// `details[i]` belongs to `postings[i]`; a missing or `None` entry renders
/// no detail lines. Companies and categories appear in the order first seen.
#[must_use]
pub fn render_digest(
    postings: &[Posting],
    details: &[Option<JobDetail>],
    options: &DigestOptions,
) -> Digest {
    let mut grouped: IndexMap<&str, IndexMap<&str, Vec<usize>>> = IndexMap::new();
    for (i, posting) in postings.iter().enumerate() {
        grouped
            .entry(posting.company.as_str())
            .or_default()
            .entry(posting.category.as_str())
            .or_default()
            .push(i);
    }

    let date = options.date.format("%Y-%m-%d").to_string();
    let companies: Vec<String> = grouped.keys().map(|c| (*c).to_owned()).collect();

    let mut body = String::new();
    write_body(&mut body, postings, details, &grouped, &date, options)
        .expect("writing to a String cannot fail");

    Digest {
        subject: format!(
            "{} New Job(s) at {} - {date}",
            postings.len(),
            companies.join(", ")
        ),
        body,
        new_postings: postings.len(),
        companies,
    }
}

fn write_body(
    out: &mut String,
    postings: &[Posting],
    details: &[Option<JobDetail>],
    grouped: &IndexMap<&str, IndexMap<&str, Vec<usize>>>,
    date: &str,
    options: &DigestOptions,
) -> fmt::Result {
    writeln!(out, "Job Alert - {date}")?;
    writeln!(
        out,
        "Found {} new job posting(s) across {} companies:",
        postings.len(),
        grouped.len()
    )?;
    writeln!(out)?;

    for (company, categories) in grouped {
        let company_total: usize = categories.values().map(Vec::len).sum();
        writeln!(out, "{company} ({company_total} jobs):")?;

        for (category, indices) in categories {
            writeln!(out, "  {category} ({}):", indices.len())?;

            for &i in indices {
                let posting = &postings[i];
                writeln!(out, "    - {}", posting.title)?;
                writeln!(out, "      URL: {}", posting.url)?;
                if let Some(location) = &posting.location {
                    writeln!(out, "      Location: {location}")?;
                }
                if let Some(department) = &posting.department {
                    writeln!(out, "      Department: {department}")?;
                }
                if let Some(detail) = details.get(i).and_then(Option::as_ref) {
                    write_detail_lines(out, detail)?;
                }
                writeln!(out)?;
            }
        }
        writeln!(out)?;
    }

    writeln!(out, "Monitoring: {}", options.monitored_sites.join(", "))
}

fn write_detail_lines(out: &mut String, detail: &JobDetail) -> fmt::Result {
    if detail.remote {
        writeln!(out, "      Remote-friendly")?;
    }
    if let Some(salary) = &detail.salary {
        writeln!(out, "      Salary: {salary}")?;
    }
    if !detail.requirements.is_empty() {
        let shown: Vec<&str> = detail
            .requirements
            .iter()
            .take(REQUIREMENTS_SHOWN)
            .map(String::as_str)
            .collect();
        writeln!(out, "      Key Requirements: {}", shown.join(", "))?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "digest_test.rs"]
mod tests;
