mod calorie;
mod config;
mod currency;
mod help;
mod platform;
mod plugin;
mod router;

#[cfg(test)]
mod test_support;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::plugin::{calories_currency, PluginHost};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,calorie_currency_bot=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.toml"));

    info!("Loading configuration from: {}", config_path.display());
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    info!("Configuration loaded successfully");
    info!("  Calorie endpoint: {}", config.calorie.endpoint);
    info!("  Exchange-rate API: {}", config.exchange.base_url);
    info!("  HTTP timeout: {}s", config.http.timeout_secs);
    info!("  Allowed users: {:?}", config.telegram.allowed_user_ids);

    // Register plugins
    let mut host = PluginHost::new();
    host.register(calories_currency::registration(&config)?);
    info!("Loaded {} plugin(s)", host.list().len());
    let host = Arc::new(host);

    // Run the Telegram bot
    let bot = teloxide::Bot::new(&config.telegram.bot_token);
    info!("Bot is starting...");
    platform::telegram::run(host, config.telegram, bot).await?;

    Ok(())
}
