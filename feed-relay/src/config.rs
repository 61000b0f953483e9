use crate::aggregator::RunOptions;
use crate::delivery::telegram::DEFAULT_API_BASE;
use crate::types::{ConfigError, FeedDescriptor, FetchConfig};
use clap::Parser;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// Forward recent RSS/Atom entries to a Telegram channel.
#[derive(Clone, Parser)]
#[command(name = "feed-relay", version, about)]
pub struct Cli {
    /// Telegram bot token
    #[arg(long = "tg-bot", env = "TG_BOT_TOKEN", hide_env_values = true)]
    pub bot_token: Option<String>,

    /// Telegram channel id
    #[arg(long = "tg-channel", env = "TG_CHANNEL_ID", allow_negative_numbers = true)]
    pub channel_id: Option<i64>,

    /// Look back this many hours from the start of the current hour
    #[arg(long = "startby", env = "RELAY_START_BY", default_value_t = 4)]
    pub start_by: u32,

    /// Feed list, JSON
    #[arg(long = "rss-filepath", env = "RELAY_RSS_FILEPATH", default_value = "rss.json")]
    pub rss_filepath: PathBuf,

    /// Log every entry and skip delivery
    #[arg(long, env = "RELAY_DEBUG")]
    pub debug: bool,

    /// Give up on a single feed after this many seconds
    #[arg(long, default_value_t = 30)]
    pub fetch_timeout_secs: u64,

    /// Feeds fetched in parallel
    #[arg(long, default_value_t = 1)]
    pub concurrency: usize,

    #[arg(long, default_value = DEFAULT_API_BASE)]
    pub telegram_api_base: String,
}

impl fmt::Debug for Cli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cli")
            .field("bot_token", &self.bot_token.as_ref().map(|_| "[REDACTED]"))
            .field("channel_id", &self.channel_id)
            .field("start_by", &self.start_by)
            .field("rss_filepath", &self.rss_filepath)
            .field("debug", &self.debug)
            .field("fetch_timeout_secs", &self.fetch_timeout_secs)
            .field("concurrency", &self.concurrency)
            .field("telegram_api_base", &self.telegram_api_base)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct FeedFile {
    #[serde(default)]
    rss_info: Vec<FeedDescriptor>,
}

/// Everything a run needs, resolved once at startup.
#[derive(Clone)]
pub struct RelayConfig {
    pub bot_token: String,
    pub channel_id: i64,
    pub lookback_hours: u32,
    pub feeds: Vec<FeedDescriptor>,
    pub debug: bool,
    pub concurrency: usize,
    pub telegram_api_base: String,
    pub fetch: FetchConfig,
}

impl fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayConfig")
            .field("bot_token", &"[REDACTED]")
            .field("channel_id", &self.channel_id)
            .field("lookback_hours", &self.lookback_hours)
            .field("feeds", &self.feeds)
            .field("debug", &self.debug)
            .field("concurrency", &self.concurrency)
            .field("telegram_api_base", &self.telegram_api_base)
            .field("fetch", &self.fetch)
            .finish()
    }
}

impl RelayConfig {
    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        let (bot_token, channel_id) = validate_credentials(cli.bot_token, cli.channel_id)?;
        let feeds = load_feeds(&cli.rss_filepath)?;

        let fetch = FetchConfig {
            timeout_seconds: cli.fetch_timeout_secs,
            ..FetchConfig::default()
        };

        Ok(Self {
            bot_token,
            channel_id,
            lookback_hours: cli.start_by,
            feeds,
            debug: cli.debug,
            concurrency: cli.concurrency.max(1),
            telegram_api_base: cli.telegram_api_base,
            fetch,
        })
    }

    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            lookback_hours: self.lookback_hours,
            fetch_timeout: Duration::from_secs(self.fetch.timeout_seconds),
            concurrency: self.concurrency,
            trace_entries: self.debug,
        }
    }
}

/// Token and channel are both required, even for a dry run.
pub fn validate_credentials(
    bot_token: Option<String>,
    channel_id: Option<i64>,
) -> Result<(String, i64), ConfigError> {
    match (bot_token, channel_id) {
        (Some(token), Some(channel)) if !token.trim().is_empty() && channel != 0 => {
            Ok((token, channel))
        }
        _ => Err(ConfigError::MissingCredentials),
    }
}

pub fn load_feeds(path: &Path) -> Result<Vec<FeedDescriptor>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let file: FeedFile = serde_json::from_str(&content).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    info!("Loaded {} feeds from {}", file.rss_info.len(), path.display());
    Ok(file.rss_info)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn feed_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn cli(path: &Path) -> Cli {
        Cli::parse_from([
            "feed-relay",
            "--tg-bot",
            "123:abc",
            "--tg-channel",
            "-1001234567890",
            "--rss-filepath",
            path.to_str().unwrap(),
        ])
    }

    #[test]
    fn test_load_feeds_keeps_declaration_order() {
        let file = feed_file(
            r#"{"rss_info": [
                {"title": "A", "url": "https://a.example/feed", "full_content": true},
                {"title": "B", "url": "https://b.example/feed"}
            ]}"#,
        );
        let feeds = load_feeds(file.path()).unwrap();
        assert_eq!(feeds.len(), 2);
        assert_eq!(feeds[0].title, "A");
        assert!(feeds[0].full_content);
        assert_eq!(feeds[1].title, "B");
        assert!(!feeds[1].full_content);
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let err = load_feeds(Path::new("/nonexistent/rss.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_malformed_file_is_a_json_error() {
        let file = feed_file("{ not json");
        let err = load_feeds(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Json { .. }));
    }

    #[test]
    fn test_credentials_are_required() {
        assert!(matches!(
            validate_credentials(None, Some(42)),
            Err(ConfigError::MissingCredentials)
        ));
        assert!(matches!(
            validate_credentials(Some("".to_string()), Some(42)),
            Err(ConfigError::MissingCredentials)
        ));
        assert!(matches!(
            validate_credentials(Some("token".to_string()), Some(0)),
            Err(ConfigError::MissingCredentials)
        ));
        assert_eq!(
            validate_credentials(Some("token".to_string()), Some(-42)).unwrap(),
            ("token".to_string(), -42)
        );
    }

    #[test]
    fn test_from_cli_defaults() {
        let file = feed_file(r#"{"rss_info": [{"title": "A", "url": "https://a.example/feed"}]}"#);
        let config = RelayConfig::from_cli(cli(file.path())).unwrap();

        assert_eq!(config.channel_id, -1001234567890);
        assert_eq!(config.lookback_hours, 4);
        assert!(!config.debug);
        assert_eq!(config.feeds.len(), 1);

        let options = config.run_options();
        assert_eq!(options.concurrency, 1);
        assert_eq!(options.fetch_timeout, Duration::from_secs(30));
        assert!(!options.trace_entries);
    }

    #[test]
    fn test_debug_redacts_bot_token() {
        let file = feed_file(r#"{"rss_info": []}"#);
        let parsed = Cli::parse_from([
            "feed-relay",
            "--tg-bot",
            "123456:SECRET-TOKEN",
            "--tg-channel",
            "42",
            "--rss-filepath",
            file.path().to_str().unwrap(),
        ]);

        let debug_output = format!("{:?}", parsed);
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("SECRET-TOKEN"));

        let config = RelayConfig::from_cli(parsed).unwrap();
        let debug_output = format!("{:?}", config);
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("SECRET-TOKEN"));
    }
}
