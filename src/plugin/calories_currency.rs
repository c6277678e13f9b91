use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::info;

use super::{Event, EventAction, EventContext, EventHandler, PluginMetadata, Registration};
use crate::calorie::{self, CalorieClient};
use crate::config::Config;
use crate::currency::{self, client::ExchangeRateClient};
use crate::help;
use crate::platform::Reply;
use crate::router::{self, Command};

pub const PLUGIN_NAME: &str = "CaloriesAndCurrencyInfo";
const PLUGIN_VERSION: &str = "0.2";
const PLUGIN_DESCRIPTION: &str = "A plugin to fetch calorie information and currency conversion";

/// Answers `卡路里 …` and `汇率 …` messages; everything else passes through.
pub struct CaloriesCurrencyPlugin {
    calories: CalorieClient,
    exchange: ExchangeRateClient,
}

impl CaloriesCurrencyPlugin {
    pub fn new(calories: CalorieClient, exchange: ExchangeRateClient) -> Self {
        Self { calories, exchange }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.http.timeout())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self::new(
            CalorieClient::new(client.clone(), config.calorie.endpoint.clone()),
            ExchangeRateClient::new(
                client,
                config.exchange.base_url.clone(),
                config.exchange.api_key.clone(),
            ),
        ))
    }

    /// Reply text for a text message, or `None` when no command matches.
    pub async fn answer(&self, content: &str) -> Option<String> {
        match router::route(content) {
            Command::CalorieLookup(food) => {
                info!("Calorie lookup for '{}'", food);
                Some(calorie::reply_for(&self.calories, food).await)
            }
            Command::CurrencyConversion(expr) => {
                info!("Currency conversion for '{}'", expr);
                Some(currency::reply_for(&self.exchange, expr).await)
            }
            Command::NoMatch => None,
        }
    }
}

#[async_trait]
impl EventHandler for CaloriesCurrencyPlugin {
    async fn handle(&self, ctx: &mut EventContext) -> Result<()> {
        if !ctx.message.is_text() {
            return Ok(());
        }

        let answer = self.answer(&ctx.message.content).await;
        if let Some(text) = answer {
            ctx.set_reply(Reply::text(text), EventAction::BreakPass);
        }
        Ok(())
    }
}

pub fn metadata(config: &Config) -> PluginMetadata {
    PluginMetadata {
        name: PLUGIN_NAME.to_string(),
        priority: config.plugin.priority,
        description: PLUGIN_DESCRIPTION.to_string(),
        version: PLUGIN_VERSION.to_string(),
        hidden: config.plugin.hidden,
    }
}

/// Build the plugin's registration from startup configuration.
pub fn registration(config: &Config) -> Result<Registration> {
    let plugin: Arc<dyn EventHandler> = Arc::new(CaloriesCurrencyPlugin::from_config(config)?);

    Ok(Registration {
        metadata: metadata(config),
        handlers: HashMap::from([(Event::OnHandleContext, plugin)]),
        help_text: help::help_text(),
    })
}
