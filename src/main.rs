mod config;
mod dictionary;
mod platform;
mod query;
mod relay;
mod reply;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::relay::Relay;

#[tokio::main]
async fn main() -> Result<()> {
    let dotenv_loaded = dotenvy::dotenv().is_ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,dehkhoda_bot=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if dotenv_loaded {
        info!("Loaded environment from .env");
    }

    // An explicit path must exist; the default one is optional
    let explicit = std::env::args().nth(1).map(PathBuf::from);
    let config_path = explicit
        .clone()
        .unwrap_or_else(|| PathBuf::from("config.toml"));

    info!("Loading configuration from: {}", config_path.display());
    let config = Config::load(&config_path, explicit.is_some())
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    info!("Configuration loaded successfully");
    info!("  Trigger: {}", config.telegram.trigger);
    info!("  Group tag: {}", config.telegram.group_tag);
    info!("  Sources: {}", config.lookup.sources.len());
    info!(
        "  Timeout: {}s per source, {}s per lookup",
        config.lookup.timeout_secs, config.lookup.deadline_secs
    );

    let relay = Arc::new(Relay::new(&config)?);

    info!("Bot is starting...");
    platform::telegram::run(relay, &config.telegram.bot_token).await?;

    Ok(())
}
