use crate::types::{FeedDescriptor, FeedEntry, FeedSource, FetchConfig, Result};
use crate::{FeedParser, Fetcher};
use async_trait::async_trait;
use tracing::debug;

/// Feed source backed by HTTP and feed-rs. Handles RSS 0.9x/1.0/2.0, Atom and JSON Feed.
pub struct RssFeedSource {
    fetcher: Fetcher,
    parser: FeedParser,
}

impl RssFeedSource {
    pub fn new(fetch_config: FetchConfig) -> Result<Self> {
        Ok(Self {
            fetcher: Fetcher::new(fetch_config)?,
            parser: FeedParser::new(),
        })
    }

    pub async fn pull(&self, feed: &FeedDescriptor) -> Result<Vec<FeedEntry>> {
        debug!(
            "Pulling feed {} ({}, full_content={})",
            feed.title, feed.url, feed.full_content
        );

        let content = self.fetcher.fetch(&feed.url).await?;
        self.parser.parse_feed(&content)
    }
}

#[async_trait]
impl FeedSource for RssFeedSource {
    async fn fetch(&self, feed: &FeedDescriptor) -> anyhow::Result<Vec<FeedEntry>> {
        Ok(self.pull(feed).await?)
    }
}
