use async_trait::async_trait;
use jobwatch_core::MailConfig;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::{Digest, Notifier, NotifyError};

/// Sends digests as plain-text email over SMTP.
///
/// The connection is opened lazily on the first send.
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl SmtpNotifier {
    /// # Errors
    ///
    /// Returns [`NotifyError::Address`] if the sender or recipient address does
    /// not parse, or [`NotifyError::Transport`] if the relay cannot be set up.
    pub fn new(config: &MailConfig) -> Result<Self, NotifyError> {
        let from: Mailbox = format!("{} <{}>", config.from_name, config.from_address)
            .parse()
            .map_err(|e| NotifyError::Address(format!("{}: {e}", config.from_address)))?;
        let to: Mailbox = config
            .recipient
            .parse()
            .map_err(|e| NotifyError::Address(format!("{}: {e}", config.recipient)))?;

        let builder = if config.use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
                .map_err(|e| NotifyError::Transport(e.to_string()))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
        };

        let mut builder = builder.port(config.smtp_port);
        if let (Some(username), Some(password)) = (&config.smtp_username, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        tracing::debug!(
            host = %config.smtp_host,
            port = config.smtp_port,
            use_tls = config.use_tls,
            "SMTP notifier initialized"
        );

        Ok(Self {
            transport: builder.build(),
            from,
            to,
        })
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, digest: &Digest) -> Result<(), NotifyError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(digest.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(digest.body.clone())
            .map_err(|e| NotifyError::Build(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        tracing::info!(
            to = %self.to,
            new_postings = digest.new_postings,
            companies = digest.companies.len(),
            "digest email sent"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mail_config() -> MailConfig {
        MailConfig {
            smtp_host: "localhost".to_owned(),
            smtp_port: 2525,
            smtp_username: None,
            smtp_password: None,
            from_address: "alerts@example.com".to_owned(),
            from_name: "Job Watch".to_owned(),
            recipient: "me@example.com".to_owned(),
            use_tls: false,
        }
    }

    #[test]
    fn builds_with_valid_addresses() {
        let notifier = SmtpNotifier::new(&mail_config()).expect("valid config");
        assert_eq!(notifier.from.email.to_string(), "alerts@example.com");
        assert_eq!(notifier.from.name.as_deref(), Some("Job Watch"));
        assert_eq!(notifier.to.email.to_string(), "me@example.com");
    }

    #[test]
    fn rejects_invalid_recipient() {
        let mut config = mail_config();
        config.recipient = "not an address".to_owned();
        assert!(matches!(
            SmtpNotifier::new(&config),
            Err(NotifyError::Address(_))
        ));
    }
}
