//! Calorie & currency bot setup wizard.
//!
//! Prompts on the terminal for the Telegram bot token, the allowed user ids
//! and the exchangerate-api key, then writes `config.toml` to the project
//! root (`BOT_ROOT` env, falling back to the current directory).

use anyhow::{Context, Result};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

// ── Config formatting ──────────────────────────────────────────────────────────

struct ConfigParams<'a> {
    tg_token: &'a str,
    user_ids: &'a str,
    api_key: &'a str,
    calorie_endpoint: &'a str,
    timeout_secs: u64,
}

/// TOML string literal for `value`, escaped as needed.
fn toml_string(value: &str) -> String {
    toml::Value::String(value.to_owned()).to_string()
}

/// Allowed user ids, separated by commas and/or spaces.
fn parse_user_ids(user_ids: &str) -> Result<Vec<u64>> {
    user_ids
        .split([',', ' '])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|id| {
            id.parse::<u64>()
                .with_context(|| format!("Invalid Telegram user id: {id:?}"))
        })
        .collect()
}

/// Produces a valid config.toml string. Extracted so it can be unit-tested.
fn format_config(p: &ConfigParams<'_>) -> Result<String> {
    let ids: Vec<String> = parse_user_ids(p.user_ids)?
        .iter()
        .map(u64::to_string)
        .collect();
    let ids_str = ids.join(", ");

    let tg_token = toml_string(p.tg_token);
    let api_key = toml_string(p.api_key);
    let calorie_endpoint = toml_string(p.calorie_endpoint);
    let timeout_secs = p.timeout_secs;

    Ok(format!(
        r#"[telegram]
bot_token = {tg_token}
# Leave empty to answer everyone
allowed_user_ids = [{ids_str}]

[plugin]
priority = 100
hidden = false

[calorie]
endpoint = {calorie_endpoint}

[exchange]
api_key = {api_key}
base_url = "https://v6.exchangerate-api.com/v6"

[http]
timeout_secs = {timeout_secs}
"#
    ))
}

// ── CLI ────────────────────────────────────────────────────────────────────────

fn run_cli(project_root: &Path) -> Result<()> {
    println!("=== Calorie & Currency Bot Setup ===\n");

    let read_line = |prompt: &str| -> Result<String> {
        print!("{prompt}");
        io::stdout().flush()?;
        let mut buf = String::new();
        io::stdin().read_line(&mut buf)?;
        Ok(buf.trim().to_owned())
    };

    let or_default = |s: String, default: &str| {
        if s.is_empty() {
            default.to_owned()
        } else {
            s
        }
    };

    let tg_token = read_line("Telegram bot token: ")?;
    let user_ids = read_line("Allowed user IDs (comma-separated, empty = everyone): ")?;
    let api_key = read_line("exchangerate-api.com API key: ")?;
    let calorie_endpoint = or_default(
        read_line("Calorie API endpoint [https://shanhe.kim/api/za/calories.php]: ")?,
        "https://shanhe.kim/api/za/calories.php",
    );
    let timeout_secs = or_default(read_line("HTTP timeout in seconds [30]: ")?, "30")
        .parse::<u64>()
        .context("HTTP timeout must be a whole number of seconds")?;
    if timeout_secs == 0 {
        anyhow::bail!("HTTP timeout must be at least one second");
    }

    if tg_token.is_empty() || api_key.is_empty() {
        anyhow::bail!("Bot token and API key are required");
    }

    let config = format_config(&ConfigParams {
        tg_token: &tg_token,
        user_ids: &user_ids,
        api_key: &api_key,
        calorie_endpoint: &calorie_endpoint,
        timeout_secs,
    })?;

    let config_path = project_root.join("config.toml");
    std::fs::write(&config_path, &config)
        .with_context(|| format!("Could not write {}", config_path.display()))?;

    println!("\n✓  config.toml saved to {}", config_path.display());
    println!("   Run the bot with:  cargo run");
    Ok(())
}

fn main() -> Result<()> {
    let project_root =
        PathBuf::from(std::env::var("BOT_ROOT").unwrap_or_else(|_| ".".to_string()));
    run_cli(&project_root)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
