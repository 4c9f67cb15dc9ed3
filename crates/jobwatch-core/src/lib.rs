//! Domain types and configuration for the job digest monitor.
//!
//! Everything here is free of network and storage I/O: the category matcher,
//! the novelty tracker, and config loading are pure apart from reading the
//! environment and the sites file.

pub mod app_config;
pub mod categorize;
pub mod config;
pub mod error;
pub mod novelty;
pub mod postings;
pub mod sites;

pub use app_config::{AppConfig, Environment, MailConfig, PersistPolicy};
pub use categorize::{categorize, CategoryTable, OTHER_CATEGORY};
pub use config::{load_app_config, load_app_config_from_env, load_mail_config};
pub use error::ConfigError;
pub use novelty::NoveltyTracker;
pub use postings::{JobDetail, Posting, RawPosting};
pub use sites::{
    load_sites, select_enabled_sites, slugify, HtmlSelectors, SiteConfig, SitesFile, SourceConfig,
};
