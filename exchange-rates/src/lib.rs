//! # Exchange Rates
//!
//! Live exchange-rate acquisition for the vehicle catalog.
//!
//! Catalog prices are stored in one currency while search bounds arrive in
//! another, so every price-filtered search needs a current rate. This crate
//! provides:
//!
//! - `currency` - currency codes and the stored/local pair
//! - `rate` - the immutable [`ExchangeRate`] value
//! - `source` - the [`RateSource`] and [`RateProvider`] ports
//! - `sources` - HTTP adapters for the primary and fallback providers
//! - `cache` - [`RateCache`], TTL caching with fallback and stale handling
//! - `converter` - local/stored amount conversion with fixed rounding
//!
//! # Example
//! ```no_run
//! use std::time::Duration;
//! use exchange_rates::{
//!     AwesomeApiSource, CacheConfig, CurrencyPair, FrankfurterSource, RateCache, StalePolicy,
//! };
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let timeout = Duration::from_secs(3);
//! let primary = AwesomeApiSource::new("https://economia.awesomeapi.com.br", CurrencyPair::USD_BRL, timeout)?;
//! let fallback = FrankfurterSource::new("https://api.frankfurter.app", CurrencyPair::USD_BRL, timeout)?;
//! let cache = RateCache::new(primary, fallback, CacheConfig::new(StalePolicy::ServeStale));
//!
//! let rate = cache.get_rate().await?;
//! let usd = exchange_rates::to_stored("100000".parse()?, &rate)?;
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod converter;
pub mod currency;
pub mod error;
pub mod rate;
pub mod source;
pub mod sources;

pub use cache::{CacheConfig, RateCache, StalePolicy};
pub use converter::{round_amount, to_local, to_stored};
pub use currency::{CurrencyCode, CurrencyPair};
pub use error::{ConversionError, RateError, SourceError};
pub use rate::ExchangeRate;
pub use source::{RateProvider, RateSource};
pub use sources::{AwesomeApiSource, FrankfurterSource};
