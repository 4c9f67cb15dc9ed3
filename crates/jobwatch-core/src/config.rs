use crate::app_config::{AppConfig, Environment, MailConfig, PersistPolicy};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if values are present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Load SMTP delivery settings from the process environment.
///
/// # Errors
///
/// Returns `ConfigError::MissingEnvVar` when the SMTP host, sender address, or
/// recipient is not set, and `ConfigError::InvalidEnvVar` for a bad port.
pub fn load_mail_config() -> Result<MailConfig, ConfigError> {
    dotenvy::dotenv().ok();
    build_mail_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let env = parse_environment(&or_default("JOBWATCH_ENV", "development"))?;
    let log_level = or_default("JOBWATCH_LOG_LEVEL", "info");
    let sites_path = PathBuf::from(or_default("JOBWATCH_SITES_PATH", "./config/sites.yaml"));
    let baseline_dir = PathBuf::from(or_default("JOBWATCH_BASELINE_DIR", "./data/baselines"));
    let enabled_sites = lookup("JOBWATCH_ENABLED_SITES")
        .ok()
        .map(|raw| parse_site_list(&raw))
        .filter(|names| !names.is_empty());
    let fetch_job_details = parse_bool(
        "JOBWATCH_FETCH_JOB_DETAILS",
        &or_default("JOBWATCH_FETCH_JOB_DETAILS", "false"),
    )?;
    let persist_policy = parse_persist_policy(&or_default("JOBWATCH_PERSIST_POLICY", "always"))?;
    let site_delay_ms = parse_u64("JOBWATCH_SITE_DELAY_MS", "2000")?;

    let interval_minutes = parse_u64("JOBWATCH_INTERVAL_MINUTES", "60")?;
    if interval_minutes == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "JOBWATCH_INTERVAL_MINUTES".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    let scraper_request_timeout_secs = parse_u64("JOBWATCH_SCRAPER_REQUEST_TIMEOUT_SECS", "30")?;
    let scraper_user_agent = or_default("JOBWATCH_SCRAPER_USER_AGENT", "jobwatch/0.1 (job-digest)");
    let scraper_max_retries = parse_u32("JOBWATCH_SCRAPER_MAX_RETRIES", "2")?;
    let scraper_retry_backoff_base_ms =
        parse_u64("JOBWATCH_SCRAPER_RETRY_BACKOFF_BASE_MS", "1000")?;

    Ok(AppConfig {
        env,
        log_level,
        sites_path,
        baseline_dir,
        enabled_sites,
        fetch_job_details,
        persist_policy,
        site_delay_ms,
        interval_minutes,
        scraper_request_timeout_secs,
        scraper_user_agent,
        scraper_max_retries,
        scraper_retry_backoff_base_ms,
    })
}

fn build_mail_config<F>(lookup: F) -> Result<MailConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let smtp_host = require("JOBWATCH_SMTP_HOST")?;
    let from_address = require("JOBWATCH_SMTP_FROM_ADDRESS")?;
    let recipient = require("JOBWATCH_NOTIFICATION_EMAIL")?;

    let smtp_port = lookup("JOBWATCH_SMTP_PORT")
        .unwrap_or_else(|_| "587".to_string())
        .parse::<u16>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: "JOBWATCH_SMTP_PORT".to_string(),
            reason: e.to_string(),
        })?;

    let use_tls = parse_bool(
        "JOBWATCH_SMTP_USE_TLS",
        &lookup("JOBWATCH_SMTP_USE_TLS").unwrap_or_else(|_| "true".to_string()),
    )?;

    Ok(MailConfig {
        smtp_host,
        smtp_port,
        smtp_username: lookup("JOBWATCH_SMTP_USERNAME").ok(),
        smtp_password: lookup("JOBWATCH_SMTP_PASSWORD").ok(),
        from_address,
        from_name: lookup("JOBWATCH_SMTP_FROM_NAME").unwrap_or_else(|_| "Job Watch".to_string()),
        recipient,
        use_tls,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for unrecognized values.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "JOBWATCH_ENV".to_string(),
            reason: format!("expected development, test, or production; got '{other}'"),
        }),
    }
}

fn parse_persist_policy(s: &str) -> Result<PersistPolicy, ConfigError> {
    match s {
        "always" => Ok(PersistPolicy::Always),
        "on-new" => Ok(PersistPolicy::OnNewPostings),
        other => Err(ConfigError::InvalidEnvVar {
            var: "JOBWATCH_PERSIST_POLICY".to_string(),
            reason: format!("expected always or on-new; got '{other}'"),
        }),
    }
}

fn parse_bool(var: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("expected a boolean; got '{other}'"),
        }),
    }
}

/// Split a comma-separated site list, trimming blanks.
pub(crate) fn parse_site_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
