pub mod types;
pub mod window;
pub mod fetcher;
pub mod parser;
pub mod sources;
pub mod aggregator;
pub mod delivery;
pub mod config;

pub use aggregator::{RssAggregator, RunOptions};
pub use config::{Cli, RelayConfig};
pub use delivery::{display_message, Dispatcher, TelegramSink, TracingAuditLog};
pub use fetcher::Fetcher;
pub use parser::FeedParser;
pub use sources::RssFeedSource;
pub use types::*;
pub use window::{entry_timestamp, floor_to_hour, resolve_timestamp, TimeWindow};
