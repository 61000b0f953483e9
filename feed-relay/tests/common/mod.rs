#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use feed_relay::{FeedDescriptor, FeedEntry, FeedSource};
use std::collections::HashMap;
use std::sync::Once;
use std::time::Duration;

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// 2024-01-02 at the given time of day, UTC.
pub fn at(hour: u32, minute: u32, second: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 2, hour, minute, second).unwrap()
}

pub fn feed(title: &str) -> FeedDescriptor {
    FeedDescriptor {
        title: title.to_string(),
        url: format!("https://{}.example/feed.xml", title.to_lowercase()),
        full_content: false,
    }
}

pub fn published(title: &str, when: DateTime<Utc>) -> FeedEntry {
    FeedEntry {
        title: title.to_string(),
        link: format!("https://example.com/{}", title),
        author: None,
        published_at: Some(when),
        updated_at: None,
    }
}

enum Canned {
    Entries(Vec<FeedEntry>, Duration),
    Fail(String),
}

/// Answers each feed URL with canned entries, an optional delay, or an error.
#[derive(Default)]
pub struct StubSource {
    responses: HashMap<String, Canned>,
}

impl StubSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ok(mut self, feed: &FeedDescriptor, entries: Vec<FeedEntry>) -> Self {
        self.responses
            .insert(feed.url.clone(), Canned::Entries(entries, Duration::ZERO));
        self
    }

    pub fn slow(mut self, feed: &FeedDescriptor, entries: Vec<FeedEntry>, delay: Duration) -> Self {
        self.responses
            .insert(feed.url.clone(), Canned::Entries(entries, delay));
        self
    }

    pub fn fail(mut self, feed: &FeedDescriptor, reason: &str) -> Self {
        self.responses
            .insert(feed.url.clone(), Canned::Fail(reason.to_string()));
        self
    }
}

#[async_trait]
impl FeedSource for StubSource {
    async fn fetch(&self, feed: &FeedDescriptor) -> anyhow::Result<Vec<FeedEntry>> {
        match self.responses.get(&feed.url) {
            Some(Canned::Entries(entries, delay)) => {
                if !delay.is_zero() {
                    tokio::time::sleep(*delay).await;
                }
                Ok(entries.clone())
            }
            Some(Canned::Fail(reason)) => Err(anyhow::anyhow!("{}", reason)),
            None => Err(anyhow::anyhow!("no stub for {}", feed.url)),
        }
    }
}
