use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

use super::ConversionError;

#[derive(Debug, Deserialize)]
struct RatesEnvelope {
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    conversion_rates: HashMap<String, f64>,
    #[serde(rename = "error-type", default)]
    error_type: Option<String>,
}

impl RatesEnvelope {
    fn into_rates(self) -> Result<HashMap<String, f64>, ConversionError> {
        if self.result.as_deref() == Some("success") {
            Ok(self.conversion_rates)
        } else {
            Err(ConversionError::Upstream(
                self.error_type.unwrap_or_else(|| "unknown-error".to_string()),
            ))
        }
    }
}

/// Client for the keyed exchangerate-api v6 `latest` endpoint.
#[derive(Clone)]
pub struct ExchangeRateClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ExchangeRateClient {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// All rates quoted against `source_code`, keyed by target code.
    pub async fn latest_rates(
        &self,
        source_code: &str,
    ) -> Result<HashMap<String, f64>, ConversionError> {
        let base_url = self.base_url.trim_end_matches('/');
        debug!("Fetching exchange rates from {} for {}", base_url, source_code);

        let url = format!("{}/{}/latest/{}", base_url, self.api_key, source_code);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ConversionError::Transport(e.without_url()))?
            .error_for_status()
            .map_err(|e| ConversionError::Transport(e.without_url()))?;

        let envelope: RatesEnvelope = response
            .json()
            .await
            .map_err(|e| ConversionError::Transport(e.without_url()))?;
        envelope.into_rates()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(value: serde_json::Value) -> RatesEnvelope {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_success_envelope() {
        let rates = envelope(json!({
            "result": "success",
            "base_code": "CNY",
            "conversion_rates": {"CNY": 1, "USD": 0.14}
        }))
        .into_rates()
        .unwrap();
        assert_eq!(rates.get("USD"), Some(&0.14));
        assert_eq!(rates.get("CNY"), Some(&1.0));
    }

    #[test]
    fn test_error_envelope_reports_error_type() {
        let err = envelope(json!({"result": "error", "error-type": "invalid-key"}))
            .into_rates()
            .unwrap_err();
        match err {
            ConversionError::Upstream(kind) => assert_eq!(kind, "invalid-key"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_result_flag_is_an_error() {
        let err = envelope(json!({"conversion_rates": {"USD": 0.14}})).into_rates();
        assert!(matches!(err, Err(ConversionError::Upstream(_))));
    }
}
