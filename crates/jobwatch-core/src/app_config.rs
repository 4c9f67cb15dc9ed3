use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// When the orchestrator flushes a site's observed titles to storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistPolicy {
    /// Every site that yielded at least one posting this run.
    Always,
    /// Only sites that yielded at least one new posting this run.
    OnNewPostings,
}

impl std::fmt::Display for PersistPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PersistPolicy::Always => write!(f, "always"),
            PersistPolicy::OnNewPostings => write!(f, "on-new"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub sites_path: PathBuf,
    pub baseline_dir: PathBuf,
    /// Ordered site names to monitor. `None` means every configured site.
    pub enabled_sites: Option<Vec<String>>,
    pub fetch_job_details: bool,
    pub persist_policy: PersistPolicy,
    pub site_delay_ms: u64,
    pub interval_minutes: u64,
    pub scraper_request_timeout_secs: u64,
    pub scraper_user_agent: String,
    pub scraper_max_retries: u32,
    pub scraper_retry_backoff_base_ms: u64,
}

/// SMTP delivery settings. Only loaded by commands that actually send mail.
#[derive(Clone)]
pub struct MailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    pub from_address: String,
    pub from_name: String,
    pub recipient: String,
    pub use_tls: bool,
}

impl std::fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_username", &self.smtp_username)
            .field(
                "smtp_password",
                &self.smtp_password.as_ref().map(|_| "[redacted]"),
            )
            .field("from_address", &self.from_address)
            .field("from_name", &self.from_name)
            .field("recipient", &self.recipient)
            .field("use_tls", &self.use_tls)
            .finish()
    }
}
