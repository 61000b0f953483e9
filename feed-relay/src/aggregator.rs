use crate::types::{FeedDescriptor, FeedEntry, FeedSource, PostBatch, RelayError, RunSummary};
use crate::window::{entry_timestamp, TimeWindow};
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub lookback_hours: u32,
    pub fetch_timeout: Duration,
    /// Feeds fetched at once. Results are still collected in declaration order.
    pub concurrency: usize,
    /// Log every fetched entry before filtering.
    pub trace_entries: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            lookback_hours: 4,
            fetch_timeout: Duration::from_secs(30),
            concurrency: 1,
            trace_entries: false,
        }
    }
}

pub struct RssAggregator {
    source: Arc<dyn FeedSource>,
    options: RunOptions,
}

impl RssAggregator {
    pub fn new(source: Arc<dyn FeedSource>, options: RunOptions) -> Self {
        Self { source, options }
    }

    /// Collect the entries of every feed that fall inside the window ending at `now`.
    pub async fn run(&self, feeds: &[FeedDescriptor], now: DateTime<Utc>) -> PostBatch {
        self.run_with_summary(feeds, now).await.0
    }

    pub async fn run_with_summary(
        &self,
        feeds: &[FeedDescriptor],
        now: DateTime<Utc>,
    ) -> (PostBatch, RunSummary) {
        // Computed once so every feed sees the same bounds.
        let window = TimeWindow::compute(now, self.options.lookback_hours);
        info!(
            "Collecting {} feeds for window [{}, {})",
            feeds.len(),
            window.start,
            window.end
        );

        // `buffered` yields in submission order, whatever order fetches finish in.
        let fetched: Vec<Option<Vec<FeedEntry>>> = stream::iter(feeds)
            .map(|feed| self.fetch_one(feed))
            .buffered(self.options.concurrency.max(1))
            .collect()
            .await;

        let mut batch = PostBatch::new();
        let mut summary = RunSummary {
            feeds_attempted: feeds.len(),
            ..RunSummary::default()
        };

        for (feed, entries) in feeds.iter().zip(fetched) {
            let Some(entries) = entries else {
                summary.feeds_failed += 1;
                continue;
            };

            summary.entries_seen += entries.len();
            let kept = self.filter_entries(&window, entries);
            debug!("Feed {}: {} entries in window", feed.url, kept.len());
            summary.entries_kept += kept.len();
            batch.extend(kept);
        }

        info!(
            "Collected {} posts from {}/{} feeds ({} entries seen)",
            summary.entries_kept,
            summary.feeds_attempted - summary.feeds_failed,
            summary.feeds_attempted,
            summary.entries_seen
        );

        (batch, summary)
    }

    fn filter_entries(&self, window: &TimeWindow, entries: Vec<FeedEntry>) -> Vec<FeedEntry> {
        entries
            .into_iter()
            .filter(|entry| {
                if self.options.trace_entries {
                    debug!(
                        "Title={}, Url={}, Published={:?}, Updated={:?}",
                        entry.title, entry.link, entry.published_at, entry.updated_at
                    );
                }
                window.admits(entry_timestamp(entry))
            })
            .collect()
    }

    /// A failed or timed out feed yields `None` and never stops the run.
    async fn fetch_one(&self, feed: &FeedDescriptor) -> Option<Vec<FeedEntry>> {
        match tokio::time::timeout(self.options.fetch_timeout, self.source.fetch(feed)).await {
            Ok(Ok(entries)) => Some(entries),
            Ok(Err(e)) => {
                warn!("Failed to fetch feed {}: {:#}", feed.url, e);
                None
            }
            Err(_) => {
                let e = RelayError::Timeout {
                    url: feed.url.clone(),
                    seconds: self.options.fetch_timeout.as_secs(),
                };
                warn!("Failed to fetch feed {}: {}", feed.url, e);
                None
            }
        }
    }
}
