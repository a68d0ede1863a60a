//! Fallback provider: Frankfurter-style latest rates endpoint.
//!
//! `GET {base}/latest?from=USD&to=BRL` answers with an object whose `rates`
//! member maps currency codes to rates:
//!
//! ```json
//! { "amount": 1.0, "base": "USD", "rates": { "BRL": 5.5 } }
//! ```

use std::time::Duration;

use reqwest::Client;
use rust_decimal::Decimal;
use serde_json::Value;

use super::http::{build_client, get_body, positive_decimal, trim_base_url};
use crate::currency::{CurrencyCode, CurrencyPair};
use crate::error::SourceError;
use crate::rate::ExchangeRate;
use crate::source::RateSource;

/// Fallback rate source reading `rates.<LOCAL>`.
#[derive(Debug, Clone)]
pub struct FrankfurterSource {
    base_url: String,
    pair: CurrencyPair,
    http: Client,
}

impl FrankfurterSource {
    /// Creates a source whose requests time out after `timeout`.
    pub fn new(
        base_url: impl Into<String>,
        pair: CurrencyPair,
        timeout: Duration,
    ) -> Result<Self, SourceError> {
        Ok(Self::with_client(base_url, pair, build_client(timeout)?))
    }

    /// Creates a source that reuses an existing client.
    pub fn with_client(base_url: impl Into<String>, pair: CurrencyPair, http: Client) -> Self {
        Self {
            base_url: trim_base_url(base_url),
            pair,
            http,
        }
    }

    fn url(&self) -> String {
        format!(
            "{}/latest?from={}&to={}",
            self.base_url, self.pair.stored, self.pair.local
        )
    }
}

#[async_trait::async_trait]
impl RateSource for FrankfurterSource {
    fn name(&self) -> &str {
        "frankfurter"
    }

    async fn fetch(&self) -> Result<ExchangeRate, SourceError> {
        let body = get_body(&self.http, &self.url()).await?;
        let value = parse_rates(&body, self.pair.local)?;
        Ok(ExchangeRate::new(value, self.pair, self.name()))
    }
}

fn parse_rates(body: &str, local: CurrencyCode) -> Result<Decimal, SourceError> {
    let doc: Value = serde_json::from_str(body)
        .map_err(|e| SourceError::parse(format!("malformed rates document: {}", e)))?;

    let rates = doc
        .get("rates")
        .and_then(Value::as_object)
        .ok_or_else(|| SourceError::parse("missing `rates` mapping"))?;

    let rate = rates
        .get(local.code())
        .ok_or_else(|| SourceError::parse(format!("no rate for {}", local)))?;

    positive_decimal(rate, local.code())
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_parse_rates_text_value() {
        let value = parse_rates(r#"{"rates": {"BRL": "5.50"}}"#, CurrencyCode::BRL).unwrap();
        assert_eq!(value, Decimal::from_str("5.50").unwrap());
    }

    #[test]
    fn test_parse_rates_number_value() {
        let body = r#"{"amount": 1.0, "base": "USD", "date": "2024-05-02", "rates": {"BRL": 5.1234}}"#;
        let value = parse_rates(body, CurrencyCode::BRL).unwrap();
        assert_eq!(value, Decimal::from_str("5.1234").unwrap());
    }

    #[test]
    fn test_parse_rates_missing_currency() {
        let result = parse_rates(r#"{"rates": {"EUR": 0.92}}"#, CurrencyCode::BRL);
        assert!(matches!(result, Err(SourceError::Parse(_))));
    }

    #[test]
    fn test_parse_rates_array_body() {
        let result = parse_rates(r#"[{"bid": "5.25"}]"#, CurrencyCode::BRL);
        assert!(matches!(result, Err(SourceError::Parse(_))));
    }

    #[test]
    fn test_url_carries_pair() {
        let source =
            FrankfurterSource::with_client("http://fx.test", CurrencyPair::USD_BRL, Client::new());
        assert_eq!(source.url(), "http://fx.test/latest?from=USD&to=BRL");
    }
}
