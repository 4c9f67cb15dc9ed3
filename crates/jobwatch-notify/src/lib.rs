//! Digest rendering and delivery.

use async_trait::async_trait;
use thiserror::Error;

pub mod digest;
mod smtp;
mod stdout;

pub use digest::{build_digest, render_digest, Digest, DigestOptions};
pub use smtp::SmtpNotifier;
pub use stdout::StdoutNotifier;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("invalid email address: {0}")]
    Address(String),
    #[error("failed to build message: {0}")]
    Build(String),
    #[error("delivery failed: {0}")]
    Transport(String),
}

/// Delivers a rendered digest.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, digest: &Digest) -> Result<(), NotifyError>;
}
