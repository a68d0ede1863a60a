//! The exchange rate value object.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::currency::CurrencyPair;

/// A rate observed at a point in time.
///
/// `value` is the number of local-currency units per one stored-currency
/// unit (BRL per USD for the default pair). Rates are never mutated; a refresh
/// produces a new value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRate {
    value: Decimal,
    pair: CurrencyPair,
    source: String,
    fetched_at: DateTime<Utc>,
}

impl ExchangeRate {
    /// Creates a rate stamped with the current time.
    pub fn new(value: Decimal, pair: CurrencyPair, source: impl Into<String>) -> Self {
        Self::observed_at(value, pair, source, Utc::now())
    }

    /// Creates a rate with an explicit acquisition time.
    pub fn observed_at(
        value: Decimal,
        pair: CurrencyPair,
        source: impl Into<String>,
        fetched_at: DateTime<Utc>,
    ) -> Self {
        Self {
            value,
            pair,
            source: source.into(),
            fetched_at,
        }
    }

    pub fn value(&self) -> Decimal {
        self.value
    }

    pub fn pair(&self) -> CurrencyPair {
        self.pair
    }

    /// Name of the source that produced this rate.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }
}

impl std::fmt::Display for ExchangeRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} ({})", self.pair, self.value, self.source)
    }
}
