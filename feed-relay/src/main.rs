use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use feed_relay::{
    Cli, Dispatcher, RelayConfig, RssAggregator, RssFeedSource, TelegramSink, TracingAuditLog,
};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config = RelayConfig::from_cli(cli).map_err(|e| {
        error!("Invalid configuration: {}", e);
        e
    })?;

    info!(
        "Starting feed relay: {} feeds, looking back {}h{}",
        config.feeds.len(),
        config.lookback_hours,
        if config.debug { " (dry run)" } else { "" }
    );

    let source = RssFeedSource::new(config.fetch.clone()).context("failed to build feed client")?;
    let aggregator = RssAggregator::new(Arc::new(source), config.run_options());
    let batch = aggregator.run(&config.feeds, Utc::now()).await;

    let audit = Arc::new(TracingAuditLog);
    let dispatcher = if config.debug {
        Dispatcher::dry_run(audit)
    } else {
        let sink = TelegramSink::new(reqwest::Client::new(), &config.bot_token, config.channel_id)
            .with_api_base(&config.telegram_api_base);
        Dispatcher::new(audit, Arc::new(sink))
    };
    dispatcher.dispatch(&batch).await;

    info!("Feed relay finished");
    Ok(())
}
