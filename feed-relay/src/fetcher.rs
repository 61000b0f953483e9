use crate::types::{FetchConfig, RelayError, Result};
use reqwest::Client;
use std::time::Instant;
use tracing::{debug, info};
use url::Url;

pub struct Fetcher {
    client: Client,
    config: FetchConfig,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let redirect = if config.follow_redirects {
            reqwest::redirect::Policy::limited(config.max_redirects)
        } else {
            reqwest::redirect::Policy::none()
        };

        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout())
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(redirect)
            .build()?;

        Ok(Self { client, config })
    }

    /// Download the raw feed document at `url`.
    pub async fn fetch(&self, url: &str) -> Result<String> {
        let start_time = Instant::now();
        let url = Url::parse(url)?;

        debug!("Fetching feed: {}", url);

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(RelayError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        if let Some(content_length) = response.content_length() {
            self.check_size(content_length as usize)?;
        }

        let content = response.text().await?;

        // Chunked responses carry no content length.
        self.check_size(content.len())?;

        info!(
            "Fetched feed: {} ({} bytes in {}ms)",
            url,
            content.len(),
            start_time.elapsed().as_millis()
        );
        Ok(content)
    }

    fn check_size(&self, bytes: usize) -> Result<()> {
        let limit_mb = self.config.max_feed_size_mb;
        if bytes > limit_mb.saturating_mul(1024 * 1024) {
            return Err(RelayError::FeedTooLarge { bytes, limit_mb });
        }
        Ok(())
    }
}
