//! Pluggable social-platform publishers.
//!
//! A [`Platform`] takes finished [`OutboundPost`]s and delivers them:
//! generated posts under a randomly chosen seeded account, client posts under
//! the credentials carried in the post itself.

mod friendica;
mod pumpio;

pub use friendica::{Credentials, FriendicaPlatform};
pub use pumpio::PumpIoPlatform;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use clap::ValueEnum;
use serde::Deserialize;
use thiserror::Error;

use crate::config::Settings;
use crate::posts::OutboundPost;

/// Platform-specific error type
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("cannot read accounts file {}: {source}", path.display())]
    AccountsFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("accounts file {} has no usable entries", path.display())]
    NoAccounts { path: PathBuf },

    #[error("malformed account line in {}: expected username,password", path.display())]
    MalformedAccount { path: PathBuf },

    #[error("credential check failed for '{username}': {reason}")]
    Credentials { username: String, reason: String },

    #[error("publish failed: {0}")]
    Publish(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("helper process error: {0}")]
    Process(#[from] std::io::Error),
}

/// Result type for platform operations
pub type PlatformResult<T> = Result<T, PlatformError>;

/// A social platform that can receive posts.
#[async_trait]
pub trait Platform: Send + Sync {
    /// Short platform name for logging.
    fn name(&self) -> &'static str;

    /// Publish one post. Client posts use their embedded credentials;
    /// generated posts use a random seeded account.
    async fn publish(&self, post: &OutboundPost) -> PlatformResult<()>;
}

/// Which platform a run publishes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformKind {
    Friendica,
    #[value(name = "pumpio")]
    PumpIo,
}

impl fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformKind::Friendica => write!(f, "friendica"),
            PlatformKind::PumpIo => write!(f, "pumpio"),
        }
    }
}

/// Build the selected platform from settings.
pub fn create_platform(
    kind: PlatformKind,
    settings: &Settings,
) -> PlatformResult<Arc<dyn Platform>> {
    match kind {
        PlatformKind::Friendica => Ok(Arc::new(FriendicaPlatform::new(
            settings.friendica_base_url(),
            Path::new(&settings.friendica.accounts_file),
        )?)),
        PlatformKind::PumpIo => Ok(Arc::new(PumpIoPlatform::new(
            &settings.pumpio.bin_dir,
            Path::new(&settings.pumpio.accounts_file),
        )?)),
    }
}

/// Read an accounts file: one entry per line, blanks skipped.
fn read_account_lines(path: &Path) -> PlatformResult<Vec<String>> {
    let raw = std::fs::read_to_string(path).map_err(|e| PlatformError::AccountsFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    let lines: Vec<String> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect();

    if lines.is_empty() {
        return Err(PlatformError::NoAccounts {
            path: path.to_path_buf(),
        });
    }

    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_kind_display() {
        assert_eq!(PlatformKind::Friendica.to_string(), "friendica");
        assert_eq!(PlatformKind::PumpIo.to_string(), "pumpio");
    }

    #[test]
    fn test_read_account_lines_skips_blanks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("accounts.txt");
        std::fs::write(&path, "alice,pw1\n\n  \nbob,pw2\n").unwrap();

        let lines = read_account_lines(&path).unwrap();
        assert_eq!(lines, vec!["alice,pw1", "bob,pw2"]);
    }

    #[test]
    fn test_read_account_lines_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("accounts.txt");
        std::fs::write(&path, "\n").unwrap();

        assert!(matches!(
            read_account_lines(&path),
            Err(PlatformError::NoAccounts { .. })
        ));
    }

    #[test]
    fn test_read_account_lines_missing_file() {
        assert!(matches!(
            read_account_lines(Path::new("/nonexistent/accounts.txt")),
            Err(PlatformError::AccountsFile { .. })
        ));
    }
}
