//! Primary provider: AwesomeAPI-style quote endpoint.
//!
//! `GET {base}/json/last/USD-BRL` answers with an array of quote records,
//! each carrying the bid as a numeric string:
//!
//! ```json
//! [{ "code": "USD", "codein": "BRL", "bid": "5.25", "ask": "5.26" }]
//! ```

use std::time::Duration;

use reqwest::Client;
use serde_json::{Map, Value};

use super::http::{build_client, get_body, positive_decimal, trim_base_url};
use crate::currency::CurrencyPair;
use crate::error::SourceError;
use crate::rate::ExchangeRate;
use crate::source::RateSource;

const QUOTE_FIELD: &str = "bid";

/// Primary rate source reading the `bid` of the first quote record.
#[derive(Debug, Clone)]
pub struct AwesomeApiSource {
    base_url: String,
    pair: CurrencyPair,
    http: Client,
}

impl AwesomeApiSource {
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
        format!("{}/json/last/{}", self.base_url, self.pair.dashed())
    }
}

#[async_trait::async_trait]
impl RateSource for AwesomeApiSource {
    fn name(&self) -> &str {
        "awesomeapi"
    }

    async fn fetch(&self) -> Result<ExchangeRate, SourceError> {
        let body = get_body(&self.http, &self.url()).await?;
        let value = parse_quotes(&body)?;
        Ok(ExchangeRate::new(value, self.pair, self.name()))
    }
}

fn parse_quotes(body: &str) -> Result<rust_decimal::Decimal, SourceError> {
    let records: Vec<Map<String, Value>> = serde_json::from_str(body)
        .map_err(|e| SourceError::parse(format!("expected an array of quotes: {}", e)))?;

    let first = records
        .first()
        .ok_or_else(|| SourceError::parse("quote array is empty"))?;

    let bid = first
        .get(QUOTE_FIELD)
        .ok_or_else(|| SourceError::parse(format!("missing field `{}`", QUOTE_FIELD)))?;

    positive_decimal(bid, QUOTE_FIELD)
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_parse_quotes() {
        let value = parse_quotes(r#"[{"bid": "5.25"}]"#).unwrap();
        assert_eq!(value, Decimal::from_str("5.25").unwrap());
    }

    #[test]
    fn test_parse_quotes_uses_first_record() {
        let value = parse_quotes(r#"[{"bid": "5.10"}, {"bid": "9.99"}]"#).unwrap();
        assert_eq!(value, Decimal::from_str("5.10").unwrap());
    }

    #[test]
    fn test_parse_quotes_empty_array() {
        assert!(matches!(parse_quotes("[]"), Err(SourceError::Parse(_))));
    }

    #[test]
    fn test_parse_quotes_missing_bid() {
        let result = parse_quotes(r#"[{"ask": "5.26"}]"#);
        assert!(matches!(result, Err(SourceError::Parse(_))));
    }

    #[test]
    fn test_parse_quotes_object_instead_of_array() {
        let result = parse_quotes(r#"{"USDBRL": {"bid": "5.25"}}"#);
        assert!(matches!(result, Err(SourceError::Parse(_))));
    }

    #[test]
    fn test_url_uses_dashed_pair() {
        let source =
            AwesomeApiSource::with_client("http://quotes.test/", CurrencyPair::USD_BRL, Client::new());
        assert_eq!(source.url(), "http://quotes.test/json/last/USD-BRL");
    }
}
