use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One configured feed, as declared in the feed file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedDescriptor {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub full_content: bool,
}

/// A single feed entry, normalized from RSS or Atom.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedEntry {
    pub title: String,
    pub link: String,
    pub author: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Entries that survived the window filter, in feed declaration order.
pub type PostBatch = Vec<FeedEntry>;

// Object style note:
// A relay run is a short lived single pass (fetch, filter, deliver, exit).
// Implementations of these traits hold only their clients and settings;
// nothing is remembered between runs.

#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetch and parse one feed. Errors are scoped to that feed.
    async fn fetch(&self, feed: &FeedDescriptor) -> Result<Vec<FeedEntry>>;
}

#[async_trait]
pub trait DeliverySink: Send + Sync {
    /// Send one post to the destination.
    async fn deliver(&self, entry: &FeedEntry) -> Result<()>;
}

pub trait AuditLog: Send + Sync {
    /// Record every post of the final batch, delivered or not.
    fn record(&self, batch: &[FeedEntry]);
}
