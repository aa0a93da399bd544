//! Post batch planning.
//!
//! A run publishes at most `max_posts` posts: every pre-authored client post,
//! topped up with randomly generated posts. Generated posts and raw client
//! lines are merged with set-union semantics, so duplicates collapse and
//! ordering information is deliberately lost (no shuffle needed).
//!
//! Client posts are authored as `CLIENT,username,password,message` lines and
//! publish under their own credentials; everything else is a generated post.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use rand::Rng;
use thiserror::Error;

use crate::generator::{GeneratorError, PostGenerator};

/// Marker prefix identifying a pre-authored client post line.
pub const CLIENT_MARKER: &str = "CLIENT,";

/// Post-planning error type
#[derive(Debug, Error)]
pub enum PostError {
    #[error("cannot read client posts at {}: {source}", path.display())]
    ClientFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed client post line: {0}")]
    MalformedClient(String),

    #[error(transparent)]
    Generator(#[from] GeneratorError),
}

/// Result type for post planning
pub type PostResult<T> = Result<T, PostError>;

/// A pre-authored post carrying its own login.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClientPost {
    pub username: String,
    pub password: String,
    pub message: String,
}

impl ClientPost {
    /// Parse a `CLIENT,username,password,message` line. The message may
    /// itself contain commas.
    pub fn parse(line: &str) -> PostResult<Self> {
        let rest = line
            .split_once(CLIENT_MARKER)
            .map(|(_, rest)| rest)
            .ok_or_else(|| PostError::MalformedClient(line.to_string()))?;

        let mut parts = rest.splitn(3, ',');
        let username = parts.next().unwrap_or_default().trim();
        let password = parts.next().unwrap_or_default().trim();
        let message = parts.next().unwrap_or_default().trim();

        if username.is_empty() || password.is_empty() || message.is_empty() {
            return Err(PostError::MalformedClient(line.to_string()));
        }

        Ok(Self {
            username: username.to_string(),
            password: password.to_string(),
            message: message.to_string(),
        })
    }
}

/// A post ready for dispatch to a platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundPost {
    /// Synthetic post; the platform picks the posting account.
    Generated(String),
    /// Pre-authored post with explicit credentials.
    Client(ClientPost),
}

impl OutboundPost {
    /// The message text to be published.
    pub fn message(&self) -> &str {
        match self {
            OutboundPost::Generated(text) => text,
            OutboundPost::Client(post) => &post.message,
        }
    }
}

/// Plans one run's post batch: client posts plus generated filler.
pub struct PostPlanner {
    generator: PostGenerator,
    client_posts_path: PathBuf,
    max_posts: usize,
}

impl PostPlanner {
    pub fn new(
        generator: PostGenerator,
        client_posts_path: impl Into<PathBuf>,
        max_posts: usize,
    ) -> Self {
        Self {
            generator,
            client_posts_path: client_posts_path.into(),
            max_posts,
        }
    }

    /// Build the batch using the process-wide RNG.
    pub fn plan(&self) -> PostResult<Vec<OutboundPost>> {
        self.plan_with_rng(&mut rand::rng())
    }

    /// Build the batch using the supplied RNG.
    ///
    /// Reads the client posts, generates `max_posts - client_count` random
    /// posts (saturating at zero), merges both sets, and parses out typed
    /// posts. Fails if any generated template cannot be honored or any client
    /// line is malformed.
    pub fn plan_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> PostResult<Vec<OutboundPost>> {
        let client_lines = read_client_lines(&self.client_posts_path)?;
        let quota = self.max_posts.saturating_sub(client_lines.len());
        tracing::info!(
            client_posts = client_lines.len(),
            random_posts = quota,
            "Planning post batch"
        );

        let generated = self.generator.generate_with_rng(quota, rng)?;

        // Set union over the raw strings; duplicates collapse across both
        // groups and ordering is discarded.
        let merged: BTreeSet<String> = generated.into_iter().chain(client_lines).collect();

        merged.into_iter().map(parse_outbound).collect()
    }
}

fn read_client_lines(path: &Path) -> PostResult<Vec<String>> {
    let raw = std::fs::read_to_string(path).map_err(|e| PostError::ClientFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect())
}

fn parse_outbound(line: String) -> PostResult<OutboundPost> {
    if line.matches(CLIENT_MARKER).count() == 1 {
        ClientPost::parse(&line).map(OutboundPost::Client)
    } else {
        Ok(OutboundPost::Generated(line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;
    use std::sync::Arc;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::lexicon::LexiconCache;
    use crate::template::ContentEngine;

    #[test]
    fn test_parse_client_post() {
        let post = ClientPost::parse("CLIENT,alice,secret,Hello there").unwrap();
        assert_eq!(post.username, "alice");
        assert_eq!(post.password, "secret");
        assert_eq!(post.message, "Hello there");
    }

    #[test]
    fn test_parse_client_post_message_keeps_commas() {
        let post = ClientPost::parse("CLIENT,alice,secret,Hello, world, again").unwrap();
        assert_eq!(post.message, "Hello, world, again");
    }

    #[test]
    fn test_parse_client_post_missing_fields() {
        assert!(ClientPost::parse("CLIENT,alice,secret").is_err());
        assert!(ClientPost::parse("CLIENT,,secret,hi").is_err());
    }

    fn planner_in(dir: &Path, client_lines: &str, max_posts: usize) -> PostPlanner {
        let lists = dir.join("lists");
        fs::create_dir_all(&lists).unwrap();
        fs::write(lists.join("default_names.txt"), "Sam\n").unwrap();
        fs::write(lists.join("default_posts.txt"), "Hello {name}\n").unwrap();
        fs::write(lists.join("client_posts.txt"), client_lines).unwrap();

        let engine = ContentEngine::new(Arc::new(LexiconCache::new(format!(
            "{}/lists/default_{{}}s.txt",
            dir.display()
        ))));
        let generator = PostGenerator::new(engine, lists.join("default_posts.txt"));
        PostPlanner::new(generator, lists.join("client_posts.txt"), max_posts)
    }

    #[test]
    fn test_plan_mixes_client_and_generated() {
        let dir = tempfile::tempdir().unwrap();
        let planner = planner_in(dir.path(), "CLIENT,alice,secret,Launch day!\n", 3);

        let mut rng = StdRng::seed_from_u64(5);
        let batch = planner.plan_with_rng(&mut rng).unwrap();

        // One client post, two generated; generated lines are identical with
        // a one-name lexicon, so the union collapses them.
        assert_eq!(batch.len(), 2);
        assert!(batch.contains(&OutboundPost::Generated("Hello Sam".to_string())));
        assert!(batch.iter().any(|p| matches!(
            p,
            OutboundPost::Client(cp) if cp.username == "alice" && cp.message == "Launch day!"
        )));
    }

    #[test]
    fn test_quota_saturates_when_clients_exceed_max() {
        let dir = tempfile::tempdir().unwrap();
        let planner = planner_in(
            dir.path(),
            "CLIENT,a,pw,one\nCLIENT,b,pw,two\nCLIENT,c,pw,three\n",
            2,
        );

        let mut rng = StdRng::seed_from_u64(5);
        let batch = planner.plan_with_rng(&mut rng).unwrap();
        assert_eq!(batch.len(), 3);
        assert!(batch
            .iter()
            .all(|p| matches!(p, OutboundPost::Client(_))));
    }

    #[test]
    fn test_missing_client_posts_file() {
        let dir = tempfile::tempdir().unwrap();
        let planner = planner_in(dir.path(), "", 1);
        let planner = PostPlanner::new(
            planner.generator,
            dir.path().join("nope.txt"),
            planner.max_posts,
        );
        assert!(matches!(
            planner.plan(),
            Err(PostError::ClientFile { .. })
        ));
    }
}
