use crate::types::{FeedEntry, RelayError, Result};
use chrono::Utc;
use feed_rs::model::Person;
use feed_rs::parser;
use tracing::debug;

#[derive(Debug, Default, Clone, Copy)]
pub struct FeedParser;

impl FeedParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse an RSS or Atom document into entries, keeping document order.
    pub fn parse_feed(&self, content: &str) -> Result<Vec<FeedEntry>> {
        debug!("Parsing feed content ({} bytes)", content.len());

        let feed = parser::parse(content.as_bytes())
            .map_err(|e| RelayError::Parse(format!("Failed to parse feed: {}", e)))?;

        let entries: Vec<FeedEntry> = feed.entries.into_iter().map(Self::parse_entry).collect();

        debug!("Parsed feed with {} entries", entries.len());
        Ok(entries)
    }

    fn parse_entry(entry: feed_rs::model::Entry) -> FeedEntry {
        let title = entry
            .title
            .map(|t| t.content)
            .unwrap_or_else(|| "Untitled".to_string());

        let link = entry
            .links
            .first()
            .map(|l| l.href.clone())
            .unwrap_or_default();

        let author = entry.authors.first().and_then(author_name);

        FeedEntry {
            title,
            link,
            author,
            published_at: entry.published.map(|dt| dt.with_timezone(&Utc)),
            updated_at: entry.updated.map(|dt| dt.with_timezone(&Utc)),
        }
    }
}

/// Display name for a feed author.
///
/// feed-rs files an RSS 2.0 `<author>` under the placeholder name "author"
/// with the element text in `email`, usually as `addr (Name)`.
fn author_name(person: &Person) -> Option<String> {
    let name = person.name.trim();
    if !name.is_empty() && name != "author" {
        return Some(name.to_string());
    }

    let contact = person.email.as_deref()?.trim();
    let display = match (contact.find('('), contact.strip_suffix(')')) {
        (Some(open), Some(inner)) => match inner[open + 1..].trim() {
            "" => contact,
            named => named,
        },
        _ => contact,
    };

    Some(display.to_string()).filter(|d| !d.is_empty())
}
