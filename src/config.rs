use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub plugin: PluginConfig,
    #[serde(default)]
    pub calorie: CalorieConfig,
    pub exchange: ExchangeConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    /// Empty list means every user may talk to the bot.
    #[serde(default)]
    pub allowed_user_ids: Vec<u64>,
}

/// Overrides for the registration metadata of the calorie/currency plugin.
#[derive(Debug, Deserialize, Clone)]
pub struct PluginConfig {
    #[serde(default = "default_priority")]
    pub priority: i32,
    #[serde(default)]
    pub hidden: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CalorieConfig {
    #[serde(default = "default_calorie_endpoint")]
    pub endpoint: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExchangeConfig {
    pub api_key: String,
    #[serde(default = "default_exchange_base_url")]
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_priority() -> i32 {
    100
}

fn default_calorie_endpoint() -> String {
    "https://shanhe.kim/api/za/calories.php".to_string()
}

fn default_exchange_base_url() -> String {
    "https://v6.exchangerate-api.com/v6".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            priority: default_priority(),
            hidden: false,
        }
    }
}

impl Default for CalorieConfig {
    fn default() -> Self {
        Self {
            endpoint: default_calorie_endpoint(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl TelegramConfig {
    pub fn is_allowed(&self, user_id: u64) -> bool {
        self.allowed_user_ids.is_empty() || self.allowed_user_ids.contains(&user_id)
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;

        if config.exchange.api_key.trim().is_empty() {
            anyhow::bail!("[exchange] api_key must not be empty");
        }

        if config.http.timeout_secs == 0 {
            anyhow::bail!("[http] timeout_secs must be at least 1");
        }

        Ok(config)
    }
}
