//! Sequential post dispatch with per-post failure isolation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;

use crate::platform::Platform;
use crate::posts::OutboundPost;

/// Statistics for the post dispatcher
#[derive(Debug, Default)]
pub struct DispatcherStats {
    /// Total posts attempted
    pub total_attempted: AtomicU64,
    /// Total posts published successfully
    pub total_published: AtomicU64,
    /// Total posts that failed to publish
    pub total_failed: AtomicU64,
    /// Generated posts attempted
    pub generated_posts: AtomicU64,
    /// Client posts attempted
    pub client_posts: AtomicU64,
}

impl DispatcherStats {
    pub fn snapshot(&self) -> DispatcherStatsSnapshot {
        DispatcherStatsSnapshot {
            total_attempted: self.total_attempted.load(Ordering::Relaxed),
            total_published: self.total_published.load(Ordering::Relaxed),
            total_failed: self.total_failed.load(Ordering::Relaxed),
            generated_posts: self.generated_posts.load(Ordering::Relaxed),
            client_posts: self.client_posts.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of dispatcher statistics
#[derive(Debug, Clone, Serialize)]
pub struct DispatcherStatsSnapshot {
    pub total_attempted: u64,
    pub total_published: u64,
    pub total_failed: u64,
    pub generated_posts: u64,
    pub client_posts: u64,
}

/// Result of dispatching one batch
#[derive(Debug, Clone, Serialize)]
pub struct DispatchSummary {
    /// Posts in the batch
    pub attempted: usize,
    /// Posts delivered to the platform
    pub published: usize,
    /// Posts the platform rejected
    pub failed: usize,
}

impl DispatchSummary {
    /// Whether every post in the batch went out.
    pub fn all_published(&self) -> bool {
        self.failed == 0
    }
}

/// Dispatches planned posts to the selected platform.
///
/// A publish failure for one post is logged and counted; the rest of the
/// batch still goes out.
pub struct PostDispatcher {
    platform: Arc<dyn Platform>,
    stats: DispatcherStats,
}

impl PostDispatcher {
    /// Create a dispatcher for the given platform.
    pub fn new(platform: Arc<dyn Platform>) -> Self {
        Self {
            platform,
            stats: DispatcherStats::default(),
        }
    }

    /// Get dispatcher statistics
    pub fn stats(&self) -> DispatcherStatsSnapshot {
        self.stats.snapshot()
    }

    /// Publish every post in the batch, one at a time.
    #[tracing::instrument(
        name = "dispatcher.publish_all",
        skip(self, posts),
        fields(platform = %self.platform.name(), batch_size = posts.len())
    )]
    pub async fn publish_all(&self, posts: &[OutboundPost]) -> DispatchSummary {
        let mut published = 0;
        let mut failed = 0;

        for post in posts {
            self.stats.total_attempted.fetch_add(1, Ordering::Relaxed);
            match post {
                OutboundPost::Generated(_) => {
                    self.stats.generated_posts.fetch_add(1, Ordering::Relaxed)
                }
                OutboundPost::Client(_) => self.stats.client_posts.fetch_add(1, Ordering::Relaxed),
            };

            match self.platform.publish(post).await {
                Ok(()) => {
                    self.stats.total_published.fetch_add(1, Ordering::Relaxed);
                    published += 1;
                }
                Err(e) => {
                    self.stats.total_failed.fetch_add(1, Ordering::Relaxed);
                    failed += 1;
                    tracing::error!(
                        platform = %self.platform.name(),
                        error = %e,
                        "Failed to publish post"
                    );
                }
            }
        }

        DispatchSummary {
            attempted: posts.len(),
            published,
            failed,
        }
    }
}
