pub mod client;
pub mod table;

use std::collections::HashMap;
use thiserror::Error;
use tracing::{error, warn};

use self::client::ExchangeRateClient;

/// Splits `<amount> <source>` from `<target>`.
pub const SEPARATOR: char = '到';

#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("输入格式错误")]
    Format,
    #[error("不支持的货币符号：{0}")]
    UnsupportedCurrency(String),
    #[error("汇率接口请求失败：{0}")]
    Transport(reqwest::Error),
    #[error("汇率接口返回错误：{0}")]
    Upstream(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyQuery {
    pub amount: f64,
    pub source_name: String,
    pub target_name: String,
}

/// Parse `<amount> <source> 到 <target>`.
pub fn parse_query(expr: &str) -> Result<CurrencyQuery, ConversionError> {
    let segments: Vec<&str> = expr.split(SEPARATOR).collect();
    let [head, target] = segments.as_slice() else {
        return Err(ConversionError::Format);
    };

    let tokens: Vec<&str> = head.split_whitespace().collect();
    let [amount, source] = tokens.as_slice() else {
        return Err(ConversionError::Format);
    };

    let amount: f64 = amount.parse().map_err(|_| ConversionError::Format)?;
    if !amount.is_finite() {
        return Err(ConversionError::Format);
    }

    Ok(CurrencyQuery {
        amount,
        source_name: source.to_string(),
        target_name: target.trim().to_string(),
    })
}

/// Resolve both sides of the query to currency codes.
pub fn resolve_codes(
    query: &CurrencyQuery,
) -> Result<(&'static str, &'static str), ConversionError> {
    let source = table::resolve(&query.source_name)
        .ok_or_else(|| ConversionError::UnsupportedCurrency(query.source_name.clone()))?;
    let target = table::resolve(&query.target_name)
        .ok_or_else(|| ConversionError::UnsupportedCurrency(query.target_name.clone()))?;
    Ok((source, target))
}

pub fn apply_rate(
    amount: f64,
    rates: &HashMap<String, f64>,
    target_code: &str,
) -> Result<f64, ConversionError> {
    rates
        .get(target_code)
        .map(|rate| amount * rate)
        .ok_or_else(|| ConversionError::UnsupportedCurrency(target_code.to_string()))
}

pub async fn convert(
    client: &ExchangeRateClient,
    query: &CurrencyQuery,
) -> Result<f64, ConversionError> {
    let (source, target) = resolve_codes(query)?;
    let rates = client.latest_rates(source).await?;
    apply_rate(query.amount, &rates, target)
}

/// Whole amounts keep one decimal place (`1000.0`). Magnitudes below 1e-4 or
/// from 1e16 up use exponent form (`1e-05`, `1.5e+16`). Everything else prints
/// in its shortest form.
pub fn format_amount(amount: f64) -> String {
    let scientific = format!("{:e}", amount);
    let (mantissa, exponent) = scientific
        .split_once('e')
        .and_then(|(m, e)| e.parse::<i32>().ok().map(|e| (m, e)))
        .unwrap_or((scientific.as_str(), 0));

    if amount != 0.0 && !(-4..16).contains(&exponent) {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exponent.abs())
    } else if amount.fract() == 0.0 {
        format!("{:.1}", amount)
    } else {
        format!("{}", amount)
    }
}

pub fn format_conversion(query: &CurrencyQuery, result: f64) -> String {
    format!(
        "{} {} 等于 {:.2} {}",
        format_amount(query.amount),
        query.source_name,
        result,
        query.target_name
    )
}

fn failure_reply(err: &ConversionError) -> String {
    format!("汇率查询失败：{}", err)
}

/// Full exchange command: parse, convert, and render every outcome as text.
pub async fn reply_for(client: &ExchangeRateClient, expr: &str) -> String {
    let query = match parse_query(expr) {
        Ok(query) => query,
        Err(e) => {
            warn!("Rejected exchange expression '{}': {}", expr, e);
            return failure_reply(&e);
        }
    };

    match convert(client, &query).await {
        Ok(result) => format_conversion(&query, result),
        Err(ConversionError::UnsupportedCurrency(symbol)) => {
            warn!("Unsupported currency symbol: {}", symbol);
            format!(
                "未能转换 {} 到 {}，请检查输入的货币符号。",
                query.source_name, query.target_name
            )
        }
        Err(e) => {
            error!("Failed to fetch exchange rate: {}", e);
            failure_reply(&e)
        }
    }
}
