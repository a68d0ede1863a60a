//! Time-bounded rate cache in front of a primary and a fallback source.
//!
//! Behaviour on `get_rate`:
//! 1. A fresh primary entry (or, failing that, a fresh fallback entry) is
//!    returned without any outbound call.
//! 2. Otherwise one primary attempt is made. Success replaces the primary
//!    entry with `expiry = now + ttl`.
//! 3. A failed primary attempt is followed by exactly one fallback attempt.
//!    A fallback success is kept in its own entry under `fallback_ttl` and
//!    never touches the primary entry's expiry.
//! 4. When both fail, [`StalePolicy`] decides between serving the newest
//!    expired entry and failing with [`RateError::Unavailable`].
//!
//! Refreshes are single-flight: they run behind one async mutex, and callers
//! that queued behind a refresh take its outcome instead of fetching again.

use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;

use crate::error::{RateError, SourceError};
use crate::rate::ExchangeRate;
use crate::source::{RateProvider, RateSource};

/// What to do when both sources fail but an expired value is still held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StalePolicy {
    /// Keep answering with the last good rate.
    ServeStale,
    /// Report the rate as unavailable.
    Fail,
}

impl FromStr for StalePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "serve-stale" | "serve_stale" | "stale" => Ok(StalePolicy::ServeStale),
            "fail" => Ok(StalePolicy::Fail),
            _ => Err(format!(
                "Unknown stale policy: {} (expected `serve-stale` or `fail`)",
                s
            )),
        }
    }
}

/// Cache tuning.
///
/// The stale policy has no default and must be chosen by the caller.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub ttl: Duration,
    pub fallback_ttl: Duration,
    pub attempt_timeout: Duration,
    pub stale_policy: StalePolicy,
}

impl CacheConfig {
    pub const DEFAULT_TTL: Duration = Duration::from_secs(10 * 60);
    pub const DEFAULT_FALLBACK_TTL: Duration = Duration::from_secs(60);
    pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(3);

    pub fn new(stale_policy: StalePolicy) -> Self {
        Self {
            ttl: Self::DEFAULT_TTL,
            fallback_ttl: Self::DEFAULT_FALLBACK_TTL,
            attempt_timeout: Self::DEFAULT_ATTEMPT_TIMEOUT,
            stale_policy,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Sets how long a fallback-sourced rate is reused. Clamped to `ttl`.
    pub fn with_fallback_ttl(mut self, fallback_ttl: Duration) -> Self {
        self.fallback_ttl = fallback_ttl;
        self
    }

    pub fn with_attempt_timeout(mut self, attempt_timeout: Duration) -> Self {
        self.attempt_timeout = attempt_timeout;
        self
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    rate: ExchangeRate,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_fresh(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

#[derive(Debug, Default)]
struct Entries {
    primary: Option<CacheEntry>,
    fallback: Option<CacheEntry>,
}

impl Entries {
    fn fresh(&self, now: Instant) -> Option<&CacheEntry> {
        self.primary
            .as_ref()
            .filter(|e| e.is_fresh(now))
            .or_else(|| self.fallback.as_ref().filter(|e| e.is_fresh(now)))
    }

    fn newest(&self) -> Option<&CacheEntry> {
        match (&self.primary, &self.fallback) {
            (Some(p), Some(f)) if f.rate.fetched_at() > p.rate.fetched_at() => Some(f),
            (Some(p), _) => Some(p),
            (None, f) => f.as_ref(),
        }
    }
}

/// Rate cache with fallback and single-flight refresh.
pub struct RateCache<P, F> {
    primary: P,
    fallback: F,
    config: CacheConfig,
    entries: RwLock<Entries>,
    /// Raw outcome of the most recent refresh, reused by queued callers.
    refresh: Mutex<Option<Result<ExchangeRate, RateError>>>,
    /// Bumped every time a refresh completes.
    generation: AtomicU64,
}

impl<P: RateSource, F: RateSource> RateCache<P, F> {
    pub fn new(primary: P, fallback: F, config: CacheConfig) -> Self {
        let fallback_ttl = config.fallback_ttl.min(config.ttl);
        Self {
            primary,
            fallback,
            config: CacheConfig {
                fallback_ttl,
                ..config
            },
            entries: RwLock::new(Entries::default()),
            refresh: Mutex::new(None),
            generation: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Returns the current rate, refreshing it when the cached one expired.
    pub async fn get_rate(&self) -> Result<ExchangeRate, RateError> {
        if let Some(rate) = self.fresh().await {
            tracing::debug!(rate = %rate.value(), source = rate.source(), "exchange rate cache hit");
            return Ok(rate);
        }

        let seen = self.generation.load(Ordering::Acquire);
        let mut last = self.refresh.lock().await;

        // Someone may have refreshed between our read and taking the lock.
        if let Some(rate) = self.fresh().await {
            return Ok(rate);
        }

        let shared = if self.generation.load(Ordering::Acquire) != seen {
            last.clone()
        } else {
            None
        };

        let outcome = match shared {
            Some(outcome) => {
                tracing::debug!("reusing outcome of concurrent exchange rate refresh");
                outcome
            }
            None => {
                let outcome = self.refresh_now().await;
                *last = Some(outcome.clone());
                self.generation.fetch_add(1, Ordering::Release);
                outcome
            }
        };
        drop(last);

        match outcome {
            Ok(rate) => Ok(rate),
            Err(err) => self.unavailable(err).await,
        }
    }

    async fn fresh(&self) -> Option<ExchangeRate> {
        let now = Instant::now();
        self.entries.read().await.fresh(now).map(|e| e.rate.clone())
    }

    /// One primary attempt, then at most one fallback attempt.
    async fn refresh_now(&self) -> Result<ExchangeRate, RateError> {
        let primary_err = match self.attempt(&self.primary).await {
            Ok(rate) => {
                tracing::info!(rate = %rate.value(), source = rate.source(), "exchange rate refreshed");
                self.store_primary(rate.clone()).await;
                return Ok(rate);
            }
            Err(err) => err,
        };

        tracing::warn!(
            source = self.primary.name(),
            error = %primary_err,
            "primary exchange rate source failed, trying fallback"
        );

        match self.attempt(&self.fallback).await {
            Ok(rate) => {
                tracing::info!(rate = %rate.value(), source = rate.source(), "exchange rate served by fallback");
                self.store_fallback(rate.clone()).await;
                Ok(rate)
            }
            Err(fallback_err) => Err(RateError::Unavailable {
                primary: primary_err,
                fallback: fallback_err,
            }),
        }
    }

    async fn attempt<S: RateSource>(&self, source: &S) -> Result<ExchangeRate, SourceError> {
        let budget = self.config.attempt_timeout;
        match tokio::time::timeout(budget, source.fetch()).await {
            Ok(result) => result,
            Err(_) => Err(SourceError::network(format!(
                "{} did not answer within {:?}",
                source.name(),
                budget
            ))),
        }
    }

    async fn store_primary(&self, rate: ExchangeRate) {
        let entry = CacheEntry {
            rate,
            expires_at: Instant::now() + self.config.ttl,
        };
        self.entries.write().await.primary = Some(entry);
    }

    async fn store_fallback(&self, rate: ExchangeRate) {
        let entry = CacheEntry {
            rate,
            expires_at: Instant::now() + self.config.fallback_ttl,
        };
        self.entries.write().await.fallback = Some(entry);
    }

    async fn unavailable(&self, err: RateError) -> Result<ExchangeRate, RateError> {
        if self.config.stale_policy == StalePolicy::ServeStale {
            if let Some(entry) = self.entries.read().await.newest() {
                tracing::warn!(
                    rate = %entry.rate.value(),
                    fetched_at = %entry.rate.fetched_at(),
                    error = %err,
                    "both exchange rate sources failed, serving stale rate"
                );
                return Ok(entry.rate.clone());
            }
        }

        tracing::error!(error = %err, "exchange rate unavailable");
        Err(err)
    }
}

#[async_trait::async_trait]
impl<P, F> RateProvider for RateCache<P, F>
where
    P: RateSource + 'static,
    F: RateSource + 'static,
{
    async fn get_rate(&self) -> Result<ExchangeRate, RateError> {
        RateCache::get_rate(self).await
    }
}
