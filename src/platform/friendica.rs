//! Friendica publisher.
//!
//! Talks to the Friendica twitter-compatible API over HTTP Basic auth:
//! credentials are verified with `account/verify_credentials`, then the post
//! goes up via `statuses/update`.

use std::path::Path;

use async_trait::async_trait;
use rand::seq::IndexedRandom;

use crate::posts::OutboundPost;

use super::{read_account_lines, Platform, PlatformError, PlatformResult};

/// One Friendica login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    fn parse(line: &str, path: &Path) -> PlatformResult<Self> {
        let (username, password) =
            line.split_once(',')
                .ok_or_else(|| PlatformError::MalformedAccount {
                    path: path.to_path_buf(),
                })?;

        let username = username.trim();
        let password = password.trim();
        if username.is_empty() || password.is_empty() {
            return Err(PlatformError::MalformedAccount {
                path: path.to_path_buf(),
            });
        }

        Ok(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}

/// Publishes posts to a Friendica server.
pub struct FriendicaPlatform {
    client: reqwest::Client,
    base_url: String,
    accounts: Vec<Credentials>,
}

impl FriendicaPlatform {
    /// Create a publisher for `base_url`, loading seeded accounts
    /// (`username,password` per line) from `accounts_path`.
    pub fn new(base_url: impl Into<String>, accounts_path: &Path) -> PlatformResult<Self> {
        let accounts = read_account_lines(accounts_path)?
            .iter()
            .map(|line| Credentials::parse(line, accounts_path))
            .collect::<PlatformResult<Vec<_>>>()?;

        Ok(Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            accounts,
        })
    }

    /// Number of seeded posting accounts.
    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    fn random_account(&self) -> PlatformResult<Credentials> {
        self.accounts
            .choose(&mut rand::rng())
            .cloned()
            .ok_or_else(|| PlatformError::Publish("friendica account list is empty".to_string()))
    }

    async fn verify_credentials(&self, creds: &Credentials) -> PlatformResult<()> {
        let url = format!("{}/api/account/verify_credentials", self.base_url);
        let response = self
            .client
            .get(&url)
            .basic_auth(&creds.username, Some(&creds.password))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(PlatformError::Credentials {
                username: creds.username.clone(),
                reason: format!("server answered {}", response.status()),
            });
        }

        let account: serde_json::Value = response.json().await?;
        tracing::debug!(
            username = %creds.username,
            screen_name = %account["screen_name"].as_str().unwrap_or(""),
            "Credentials verified"
        );

        Ok(())
    }

    async fn update_status(&self, creds: &Credentials, message: &str) -> PlatformResult<()> {
        let url = format!("{}/api/statuses/update", self.base_url);
        let response = self
            .client
            .post(&url)
            .basic_auth(&creds.username, Some(&creds.password))
            .form(&[("status", message)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(PlatformError::Publish(format!(
                "statuses/update answered {}",
                response.status()
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl Platform for FriendicaPlatform {
    fn name(&self) -> &'static str {
        "friendica"
    }

    async fn publish(&self, post: &OutboundPost) -> PlatformResult<()> {
        let creds = match post {
            OutboundPost::Generated(_) => self.random_account()?,
            OutboundPost::Client(client) => Credentials {
                username: client.username.clone(),
                password: client.password.clone(),
            },
        };

        self.verify_credentials(&creds).await?;
        self.update_status(&creds, post.message()).await?;

        tracing::info!(username = %creds.username, "Friendica message posted");
        Ok(())
    }
}
