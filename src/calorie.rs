use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error};

/// The calorie API reports success with the *string* "200".
const SUCCESS_CODE: &str = "200";

pub const FETCH_FAILED_REPLY: &str = "未能获取相关卡路里信息，请稍后再试。";

#[derive(Debug, Error)]
pub enum CalorieError {
    #[error("request to calorie API failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed calorie API response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("calorie API error: {0}")]
    Upstream(String),
}

/// Upstream returns calories either as text ("77") or as a bare number.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Calories {
    Text(String),
    Number(serde_json::Number),
}

impl std::fmt::Display for Calories {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Calories::Text(text) => write!(f, "{}", text),
            Calories::Number(number) => write!(f, "{}", number),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CalorieItem {
    pub food: String,
    pub calories: Calories,
}

#[derive(Debug, Deserialize)]
struct CalorieEnvelope {
    #[serde(default)]
    code: Value,
    #[serde(default)]
    msg: Option<Value>,
    #[serde(default)]
    data: Option<Value>,
}

impl CalorieEnvelope {
    fn into_items(self) -> Result<Vec<CalorieItem>, CalorieError> {
        if self.code.as_str() != Some(SUCCESS_CODE) {
            let msg = match self.msg {
                Some(Value::String(msg)) => msg,
                Some(other) => other.to_string(),
                None => format!("unexpected status code {}", self.code),
            };
            return Err(CalorieError::Upstream(msg));
        }

        match self.data {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(data) => Ok(serde_json::from_value(data)?),
        }
    }
}

#[derive(Clone)]
pub struct CalorieClient {
    client: reqwest::Client,
    endpoint: String,
}

impl CalorieClient {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// Look up calorie rows for `food`, in the order the API returns them.
    pub async fn lookup(&self, food: &str) -> Result<Vec<CalorieItem>, CalorieError> {
        debug!("Querying calorie API: {} (food={})", self.endpoint, food);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("food", food)])
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        let envelope: CalorieEnvelope = serde_json::from_str(&body)?;
        envelope.into_items()
    }
}

/// Render a successful lookup. An empty list gets the "nothing found" line.
pub fn format_items(food: &str, items: &[CalorieItem]) -> String {
    if items.is_empty() {
        return format!("未找到与 \"{}\" 相关的卡路里信息。", food);
    }

    let lines: Vec<String> = items
        .iter()
        .map(|item| format!("{}: {}", item.food, item.calories))
        .collect();

    format!("关于 \"{}\" 的卡路里信息：\n{}", food, lines.join("\n"))
}

/// Full calorie command: fetch, then format or fall back to the retry-later reply.
pub async fn reply_for(client: &CalorieClient, food: &str) -> String {
    match client.lookup(food).await {
        Ok(items) => format_items(food, &items),
        Err(e) => {
            error!("Failed to fetch calorie information for '{}': {}", food, e);
            FETCH_FAILED_REPLY.to_string()
        }
    }
}
