//! Builds a [`Monitor`] from the environment config and the sites file.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use jobwatch_core::{
    load_mail_config, load_sites, select_enabled_sites, AppConfig, ConfigError, MailConfig,
    SitesFile,
};
use jobwatch_notify::{Notifier, SmtpNotifier, StdoutNotifier};
use jobwatch_scraper::{HttpClient, HttpDetailSource, HttpOptions, HttpPostingSource};
use jobwatch_store::JsonFileStore;

use crate::monitor::{Monitor, MonitorSettings};

pub(crate) fn load_sites_file(config: &AppConfig) -> anyhow::Result<SitesFile> {
    load_sites(&config.sites_path)
        .with_context(|| format!("failed to load sites from {}", config.sites_path.display()))
}

/// Sites named on the command line win over `JOBWATCH_ENABLED_SITES`.
fn site_filter<'a>(config: &'a AppConfig, cli_sites: &'a [String]) -> Option<&'a [String]> {
    if cli_sites.is_empty() {
        config.enabled_sites.as_deref()
    } else {
        Some(cli_sites)
    }
}

/// Wires the HTTP sources, the baseline directory, and the notifier.
///
/// `dry_run` prints the digest to stdout instead of mailing it and never
/// writes baselines, so no SMTP settings are required.
///
/// An empty selection is not an error: every run then ends with no new jobs.
///
/// # Errors
///
/// Returns an error if the sites file is invalid, the HTTP client cannot be
/// built, or (outside a dry run) the SMTP settings are missing or invalid.
/// All of these surface before any site is fetched.
pub(crate) fn build_monitor(
    config: &AppConfig,
    cli_sites: &[String],
    dry_run: bool,
) -> anyhow::Result<Monitor> {
    build_monitor_with(config, cli_sites, dry_run, load_mail_config)
}

fn build_monitor_with<F>(
    config: &AppConfig,
    cli_sites: &[String],
    dry_run: bool,
    load_mail: F,
) -> anyhow::Result<Monitor>
where
    F: FnOnce() -> Result<MailConfig, ConfigError>,
{
    let sites_file = load_sites_file(config)?;
    let selected: Vec<_> = select_enabled_sites(&sites_file.sites, site_filter(config, cli_sites))
        .into_iter()
        .cloned()
        .collect();
    if selected.is_empty() {
        tracing::warn!(
            sites_path = %config.sites_path.display(),
            "no enabled sites to monitor; runs will report no new jobs"
        );
    }

    let notifier: Arc<dyn Notifier> = if dry_run {
        Arc::new(StdoutNotifier)
    } else {
        let mail = load_mail().context("mail settings are required unless --dry-run")?;
        Arc::new(SmtpNotifier::new(&mail).context("failed to set up SMTP notifier")?)
    };

    let client = HttpClient::new(&HttpOptions::from_app_config(config))
        .context("failed to build HTTP client")?;

    tracing::info!(
        sites = selected.len(),
        baseline_dir = %config.baseline_dir.display(),
        persist_policy = %config.persist_policy,
        fetch_details = config.fetch_job_details,
        dry_run,
        "monitor configured"
    );

    let settings = MonitorSettings {
        persist_policy: config.persist_policy,
        site_delay: Duration::from_millis(config.site_delay_ms),
        fetch_details: config.fetch_job_details,
        dry_run,
    };

    let monitor = Monitor::new(
        selected,
        sites_file.default_category_keywords,
        settings,
        Arc::new(HttpPostingSource::new(client.clone())),
        Arc::new(JsonFileStore::new(config.baseline_dir.clone())),
        notifier,
    )
    .with_details(Arc::new(HttpDetailSource::new(client)));

    Ok(monitor)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use chrono::NaiveDate;
    use jobwatch_core::{Environment, PersistPolicy};
    use tokio_util::sync::CancellationToken;

    use super::*;
    use crate::monitor::RunOutcome;

    const SITES: &str = r"
sites:
  - name: Acme AI
    url: https://acme.test/careers
    source:
      kind: greenhouse
      board: acme
";

    fn config(dir: &Path, enabled_sites: Option<Vec<String>>) -> AppConfig {
        let sites_path = dir.join("sites.yaml");
        std::fs::write(&sites_path, SITES).unwrap();
        AppConfig {
            env: Environment::Test,
            log_level: "info".to_string(),
            sites_path,
            baseline_dir: dir.join("baselines"),
            enabled_sites,
            fetch_job_details: false,
            persist_policy: PersistPolicy::Always,
            site_delay_ms: 0,
            interval_minutes: 60,
            scraper_request_timeout_secs: 5,
            scraper_user_agent: "jobwatch-test".to_string(),
            scraper_max_retries: 0,
            scraper_retry_backoff_base_ms: 1,
        }
    }

    fn missing_mail() -> Result<MailConfig, ConfigError> {
        Err(ConfigError::MissingEnvVar("JOBWATCH_SMTP_HOST".to_string()))
    }

    #[test]
    fn cli_sites_override_configured_filter() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), Some(vec!["Globex".to_string()]));
        let cli = vec!["Acme AI".to_string()];
        assert_eq!(site_filter(&config, &cli), Some(cli.as_slice()));
        assert_eq!(site_filter(&config, &[]), config.enabled_sites.as_deref());
    }

    #[tokio::test]
    async fn unknown_enabled_sites_build_a_monitor_that_finds_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), Some(vec!["NoSuchSite".to_string()]));

        let monitor = build_monitor_with(&config, &[], true, missing_mail).unwrap();
        assert!(monitor.sites().is_empty());

        let date = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        let report = monitor.run(date, &CancellationToken::new()).await.unwrap();
        assert_eq!(report.outcome, RunOutcome::NoNewJobs);
        assert!(report.sites.is_empty());
        assert!(!config.baseline_dir.exists());
    }

    #[test]
    fn dry_run_does_not_need_mail_settings() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), None);
        let monitor = build_monitor_with(&config, &[], true, missing_mail).unwrap();
        assert_eq!(monitor.sites().len(), 1);
    }

    #[test]
    fn missing_mail_settings_fail_outside_dry_run() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), None);
        let err = build_monitor_with(&config, &[], false, missing_mail).err().unwrap();
        assert!(format!("{err:#}").contains("JOBWATCH_SMTP_HOST"));
    }
}
