use async_trait::async_trait;

use crate::{Digest, Notifier, NotifyError};

/// Prints digests instead of mailing them. Used for `--dry-run`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutNotifier;

#[async_trait]
impl Notifier for StdoutNotifier {
    async fn send(&self, digest: &Digest) -> Result<(), NotifyError> {
        println!("Subject: {}", digest.subject);
        println!();
        print!("{}", digest.body);
        Ok(())
    }
}
