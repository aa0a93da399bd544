//! Pump.io publisher.
//!
//! Pump.io posting goes through the `pump-post-note` helper shipped with the
//! server install rather than a direct API call. Client posts already name
//! their account; generated posts pick one at random from the accounts file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use rand::seq::IndexedRandom;
use tokio::process::Command;

use crate::posts::OutboundPost;

use super::{read_account_lines, Platform, PlatformError, PlatformResult};

/// Publishes posts via the local pump.io helper binary.
pub struct PumpIoPlatform {
    bin_dir: PathBuf,
    accounts: Vec<String>,
}

impl PumpIoPlatform {
    /// Create a publisher using the helper in `bin_dir`, with usernames (one
    /// per line) read from `accounts_path`.
    pub fn new(bin_dir: impl Into<PathBuf>, accounts_path: &Path) -> PlatformResult<Self> {
        Ok(Self {
            bin_dir: bin_dir.into(),
            accounts: read_account_lines(accounts_path)?,
        })
    }

    /// Number of seeded posting accounts.
    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    fn random_account(&self) -> PlatformResult<&str> {
        self.accounts
            .choose(&mut rand::rng())
            .map(String::as_str)
            .ok_or_else(|| PlatformError::Publish("pump.io account list is empty".to_string()))
    }

    async fn post_note(&self, username: &str, message: &str) -> PlatformResult<()> {
        let output = Command::new(self.bin_dir.join("pump-post-note"))
            .current_dir(&self.bin_dir)
            .arg("-u")
            .arg(username)
            .arg("-n")
            .arg(message)
            .output()
            .await?;

        if !output.status.success() {
            return Err(PlatformError::Publish(format!(
                "pump-post-note exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl Platform for PumpIoPlatform {
    fn name(&self) -> &'static str {
        "pumpio"
    }

    async fn publish(&self, post: &OutboundPost) -> PlatformResult<()> {
        let username = match post {
            OutboundPost::Generated(_) => self.random_account()?.to_string(),
            OutboundPost::Client(client) => client.username.clone(),
        };

        self.post_note(&username, post.message()).await?;

        tracing::info!(username = %username, "Pump.io message posted");
        Ok(())
    }
}
