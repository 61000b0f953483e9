use std::path::PathBuf;
use std::time::Duration;

// Use the interfaces crate for core types
pub use interfaces::defs::{
    AuditLog, DeliverySink, FeedDescriptor, FeedEntry, FeedSource, PostBatch,
};

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub max_feed_size_mb: usize,
    pub follow_redirects: bool,
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "Feed-Relay/1.0".to_string(),
            timeout_seconds: 30,
            max_feed_size_mb: 10,
            follow_redirects: true,
            max_redirects: 5,
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Counters for one aggregation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub feeds_attempted: usize,
    pub feeds_failed: usize,
    pub entries_seen: usize,
    pub entries_kept: usize,
}

/// Counters for one delivery pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub attempted: usize,
    pub delivered: usize,
    pub failed: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("HTTP error")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Feed parse error: {0}")]
    Parse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Feed is {bytes} bytes, over the {limit_mb}MB limit")]
    FeedTooLarge { bytes: usize, limit_mb: usize },

    #[error("Fetching {url} timed out after {seconds}s")]
    Timeout { url: String, seconds: u64 },

    #[error("Telegram API error: {0}")]
    Telegram(String),
}

pub type Result<T> = std::result::Result<T, RelayError>;

/// Startup failures. Any of these stops the process before a feed is fetched.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("bot token and channel id cannot be empty")]
    MissingCredentials,

    #[error("failed to read feed file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid feed file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
