//! Error types for rate acquisition and conversion.

use rust_decimal::Decimal;

/// Failure of a single rate source attempt.
///
/// Both variants are recoverable: the cache reacts to either by trying the
/// fallback source or serving a stale value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    /// Transport failure, timeout, or non-success status.
    #[error("Network error: {0}")]
    Network(String),

    /// The provider answered, but not with something we can read a rate from.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl SourceError {
    pub fn network(msg: impl Into<String>) -> Self {
        SourceError::Network(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        SourceError::Parse(msg.into())
    }
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SourceError::Parse(err.to_string())
        } else {
            SourceError::Network(err.to_string())
        }
    }
}

/// Failure to resolve a usable rate at all.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RateError {
    #[error("Exchange rate unavailable (primary: {primary}; fallback: {fallback})")]
    Unavailable {
        primary: SourceError,
        fallback: SourceError,
    },
}

/// Precondition violations in currency conversion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    #[error("Amount cannot be negative: {0}")]
    InvalidAmount(Decimal),

    #[error("Exchange rate must be positive: {0}")]
    InvalidRate(Decimal),
}
