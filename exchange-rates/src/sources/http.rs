//! Shared request and parsing helpers for the HTTP sources.

use std::str::FromStr;
use std::time::Duration;

use reqwest::Client;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::error::SourceError;

/// Builds a client whose every request is bounded by `timeout`.
pub(crate) fn build_client(timeout: Duration) -> Result<Client, SourceError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| SourceError::network(format!("Failed to create HTTP client: {}", e)))
}

/// Issues one GET and returns the body of a successful response.
pub(crate) async fn get_body(client: &Client, url: &str) -> Result<String, SourceError> {
    let resp = client.get(url).send().await?;

    let status = resp.status();
    if !status.is_success() {
        return Err(SourceError::network(format!(
            "{} answered with HTTP {}",
            url,
            status.as_u16()
        )));
    }

    resp.text().await.map_err(Into::into)
}

/// Reads a positive decimal out of a JSON string or number.
///
/// Numbers go through their textual form so no binary float rounding creeps in.
pub(crate) fn positive_decimal(value: &Value, field: &str) -> Result<Decimal, SourceError> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        other => {
            return Err(SourceError::parse(format!(
                "field `{}` is not numeric: {}",
                field, other
            )));
        }
    };

    let parsed = Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| SourceError::parse(format!("field `{}` is not a decimal: {:?}", field, text)))?;

    if parsed <= Decimal::ZERO {
        return Err(SourceError::parse(format!(
            "field `{}` must be positive, got {}",
            field, parsed
        )));
    }
    Ok(parsed)
}

pub(crate) fn trim_base_url(base_url: impl Into<String>) -> String {
    base_url.into().trim_end_matches('/').to_string()
}
