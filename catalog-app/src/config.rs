//! Configuration loading from environment.

use std::env;
use std::num::NonZeroU64;
use std::time::Duration;

use anyhow::Context;
use exchange_rates::{CacheConfig, StalePolicy};

const DEFAULT_PRIMARY_URL: &str = "https://economia.awesomeapi.com.br";
const DEFAULT_FALLBACK_URL: &str = "https://api.frankfurter.app";

/// Application configuration.
#[derive(Debug)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub rate_primary_url: String,
    pub rate_fallback_url: String,
    pub rate_ttl: Duration,
    pub rate_fallback_ttl: Duration,
    pub rate_timeout: Duration,
    pub stale_policy: StalePolicy,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let port = get("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .context("PORT must be a valid port number")?;

        let database_url = get("DATABASE_URL")
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let stale_policy = get("RATE_STALE_POLICY")
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "RATE_STALE_POLICY environment variable is required (serve-stale or fail)"
                )
            })?
            .parse::<StalePolicy>()
            .map_err(|e| anyhow::anyhow!(e))?;

        let rate_primary_url =
            get("RATE_PRIMARY_URL").unwrap_or_else(|| DEFAULT_PRIMARY_URL.to_string());
        let rate_fallback_url =
            get("RATE_FALLBACK_URL").unwrap_or_else(|| DEFAULT_FALLBACK_URL.to_string());

        let rate_ttl = seconds(&get, "RATE_TTL_SECS", CacheConfig::DEFAULT_TTL)?;
        let rate_fallback_ttl = seconds(
            &get,
            "RATE_FALLBACK_TTL_SECS",
            CacheConfig::DEFAULT_FALLBACK_TTL,
        )?;
        let rate_timeout = match get("RATE_TIMEOUT_MS") {
            Some(ms) => Duration::from_millis(
                ms.parse::<NonZeroU64>()
                    .context("RATE_TIMEOUT_MS must be a positive whole number of milliseconds")?
                    .get(),
            ),
            None => CacheConfig::DEFAULT_ATTEMPT_TIMEOUT,
        };

        Ok(Self {
            port,
            database_url,
            rate_primary_url,
            rate_fallback_url,
            rate_ttl,
            rate_fallback_ttl,
            rate_timeout,
            stale_policy,
        })
    }

    /// Cache settings derived from this configuration.
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig::new(self.stale_policy)
            .with_ttl(self.rate_ttl)
            .with_fallback_ttl(self.rate_fallback_ttl)
            .with_attempt_timeout(self.rate_timeout)
    }
}

fn seconds(
    get: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: Duration,
) -> anyhow::Result<Duration> {
    match get(key) {
        Some(secs) => {
            let secs = secs
                .parse::<NonZeroU64>()
                .with_context(|| format!("{} must be a positive whole number of seconds", key))?;
            Ok(Duration::from_secs(secs.get()))
        }
        None => Ok(default),
    }
}
