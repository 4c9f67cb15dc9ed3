//! URL origin and host helpers.

use url::Url;

/// Extracts the scheme+host origin from a page URL.
///
/// Given `"https://jobs.example.com/careers/open"`, returns
/// `"https://jobs.example.com"`. Relative listing links are resolved against
/// this when a site has no `url_prefix`.
#[must_use]
pub fn extract_site_origin(page_url: &str) -> String {
    match Url::parse(page_url) {
        Ok(url) => url.origin().ascii_serialization(),
        Err(e) => {
            tracing::warn!(page_url, error = %e, "site url does not parse; cutting origin by hand");
            origin_prefix(page_url).to_owned()
        }
    }
}

/// Everything up to the end of the authority, or the trimmed input when it
/// has no `scheme://`.
fn origin_prefix(raw: &str) -> &str {
    let raw = raw.trim().trim_end_matches('/');
    let Some(scheme_end) = raw.find("://").map(|i| i + 3) else {
        return raw;
    };
    raw[scheme_end..]
        .find(['/', '?', '#'])
        .map_or(raw, |i| &raw[..scheme_end + i])
}

/// Host of `raw`, or `raw` itself when there is none. Used in error messages.
pub(crate) fn extract_domain(raw: &str) -> String {
    Url::parse(raw)
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned))
        .unwrap_or_else(|| raw.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_strips_path_and_query() {
        assert_eq!(
            extract_site_origin("https://job-boards.greenhouse.io/xai?gh_src=1"),
            "https://job-boards.greenhouse.io"
        );
    }

    #[test]
    fn origin_keeps_explicit_port() {
        assert_eq!(
            extract_site_origin("http://127.0.0.1:8080/jobs"),
            "http://127.0.0.1:8080"
        );
    }

    #[test]
    fn origin_falls_back_on_unparseable_input() {
        assert_eq!(extract_site_origin("not a url/at/all"), "not a url/at/all");
    }

    #[test]
    fn fallback_cuts_after_the_authority() {
        assert_eq!(
            extract_site_origin("https://bad host.example/careers?team=ml"),
            "https://bad host.example"
        );
        assert_eq!(origin_prefix("https://bad host.example/"), "https://bad host.example");
    }

    #[test]
    fn domain_from_url() {
        assert_eq!(extract_domain("https://openai.com/careers"), "openai.com");
        assert_eq!(extract_domain("garbage"), "garbage");
    }
}
