//! Port traits for rate acquisition.
//!
//! `RateSource` is one upstream provider; `RateProvider` is what the rest of
//! the service asks for a rate. The cache implements `RateProvider` on top of
//! two `RateSource`s, and tests substitute either side with fakes.

use std::sync::Arc;

use crate::error::{RateError, SourceError};
use crate::rate::ExchangeRate;

/// A single upstream quote provider.
///
/// Implementations perform exactly one outbound attempt per call and hold no
/// shared mutable state.
#[async_trait::async_trait]
pub trait RateSource: Send + Sync {
    /// Short name used in logs and stamped on produced rates.
    fn name(&self) -> &str;

    /// Fetches the current rate.
    async fn fetch(&self) -> Result<ExchangeRate, SourceError>;
}

/// Resolves the rate the service should use right now.
#[async_trait::async_trait]
pub trait RateProvider: Send + Sync + 'static {
    async fn get_rate(&self) -> Result<ExchangeRate, RateError>;
}

#[async_trait::async_trait]
impl<S: RateSource + ?Sized> RateSource for Arc<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn fetch(&self) -> Result<ExchangeRate, SourceError> {
        (**self).fetch().await
    }
}

#[async_trait::async_trait]
impl<P: RateProvider + ?Sized> RateProvider for Arc<P> {
    async fn get_rate(&self) -> Result<ExchangeRate, RateError> {
        (**self).get_rate().await
    }
}
