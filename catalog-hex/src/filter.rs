//! Search predicate construction.
//!
//! Turns a caller's [`SearchFilter`] into a [`VehicleQuery`] in the stored
//! currency. Price bounds arrive in local currency; one rate is resolved per
//! build and reused for both bounds.

use catalog_types::{AppError, ExchangeRate, FilterClause, RateProvider, SearchFilter, VehicleQuery};
use exchange_rates::to_stored;
use rust_decimal::Decimal;

/// Builds typed queries from search filters.
pub struct FilterBuilder<P: RateProvider> {
    rates: P,
}

impl<P: RateProvider> FilterBuilder<P> {
    pub fn new(rates: P) -> Self {
        Self { rates }
    }

    /// Returns the rate provider used for price bounds.
    pub fn rates(&self) -> &P {
        &self.rates
    }

    /// Composes clauses in the order brand, year, color, min, max.
    ///
    /// With no price bound the rate provider is never consulted. With a bound,
    /// a rate failure fails the whole build; the bound is never dropped.
    pub async fn build(&self, filter: SearchFilter) -> Result<VehicleQuery, AppError> {
        let bounded = filter.has_price_bounds();
        let min = filter.min_price;
        let max = filter.max_price;
        check_bounds(min, max)?;

        let mut query = VehicleQuery::match_all();
        if let Some(brand) = present(filter.brand) {
            query = query.and(FilterClause::BrandEq(brand));
        }
        if let Some(year) = filter.year {
            query = query.and(FilterClause::YearEq(year));
        }
        if let Some(color) = present(filter.color) {
            query = query.and(FilterClause::ColorEq(color));
        }

        if !bounded {
            return Ok(query);
        }

        let rate = self.rates.get_rate().await.map_err(|e| {
            tracing::error!(error = %e, "price-filtered search without a usable rate");
            AppError::from(e)
        })?;

        if let Some(min) = min {
            query = query.and(FilterClause::MinPrice(convert(min, &rate)?));
        }
        if let Some(max) = max {
            query = query.and(FilterClause::MaxPrice(convert(max, &rate)?));
        }

        tracing::debug!(rate = %rate, clauses = ?query.clauses(), "built price-filtered query");
        Ok(query)
    }
}

/// Empty or whitespace-only text counts as absent.
fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn check_bounds(min: Option<Decimal>, max: Option<Decimal>) -> Result<(), AppError> {
    for bound in [min, max].into_iter().flatten() {
        if bound.is_sign_negative() && !bound.is_zero() {
            return Err(AppError::BadRequest(format!(
                "Price bound {} cannot be negative",
                bound
            )));
        }
    }
    if let (Some(min), Some(max)) = (min, max)
        && min > max
    {
        return Err(AppError::BadRequest(format!(
            "min_price {} is greater than max_price {}",
            min, max
        )));
    }
    Ok(())
}

fn convert(amount_local: Decimal, rate: &ExchangeRate) -> Result<Decimal, AppError> {
    to_stored(amount_local, rate).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use catalog_types::CurrencyPair;
    use exchange_rates::{RateError, SourceError};

    use super::*;

    /// Counts lookups and answers with a fixed rate, or fails when none is set.
    struct CountingRates {
        rate: Option<Decimal>,
        calls: AtomicUsize,
    }

    impl CountingRates {
        fn fixed(value: &str) -> Arc<Self> {
            Arc::new(Self {
                rate: Some(Decimal::from_str(value).unwrap()),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                rate: None,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl RateProvider for CountingRates {
        async fn get_rate(&self) -> Result<ExchangeRate, RateError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.rate {
                Some(value) => Ok(ExchangeRate::new(value, CurrencyPair::USD_BRL, "fixed")),
                None => Err(RateError::Unavailable {
                    primary: SourceError::network("primary down"),
                    fallback: SourceError::network("fallback down"),
                }),
            }
        }
    }

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    #[tokio::test]
    async fn test_full_filter_at_rate_five() {
        let rates = CountingRates::fixed("5");
        let builder = FilterBuilder::new(rates.clone());

        let query = builder
            .build(SearchFilter {
                brand: Some("Toyota".into()),
                year: Some(2022),
                min_price: Some(dec("100000")),
                max_price: Some(dec("150000")),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(
            query.clauses(),
            &[
                FilterClause::BrandEq("Toyota".into()),
                FilterClause::YearEq(2022),
                FilterClause::MinPrice(dec("20000.00")),
                FilterClause::MaxPrice(dec("30000.00")),
            ]
        );
        assert_eq!(rates.calls(), 1);
    }

    #[tokio::test]
    async fn test_empty_filter_matches_all_without_lookup() {
        let rates = CountingRates::fixed("5");
        let builder = FilterBuilder::new(rates.clone());

        let query = builder.build(SearchFilter::default()).await.unwrap();

        assert!(query.is_match_all());
        assert_eq!(rates.calls(), 0);
    }

    #[tokio::test]
    async fn test_text_only_filter_skips_rate() {
        let rates = CountingRates::failing();
        let builder = FilterBuilder::new(rates.clone());

        let query = builder
            .build(SearchFilter {
                color: Some("Blue".into()),
                year: Some(2020),
                ..Default::default()
            })
            .await
            .unwrap();

        // Fixed order puts year before color regardless of field order.
        assert_eq!(
            query.clauses(),
            &[FilterClause::YearEq(2020), FilterClause::ColorEq("Blue".into())]
        );
        assert_eq!(rates.calls(), 0);
    }

    #[tokio::test]
    async fn test_single_bound_uses_one_lookup() {
        let rates = CountingRates::fixed("5.25");
        let builder = FilterBuilder::new(rates.clone());

        let query = builder
            .build(SearchFilter {
                max_price: Some(dec("100")),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(query.clauses(), &[FilterClause::MaxPrice(dec("19.05"))]);
        assert_eq!(rates.calls(), 1);
    }

    #[tokio::test]
    async fn test_rate_failure_fails_the_build() {
        let rates = CountingRates::failing();
        let builder = FilterBuilder::new(rates.clone());

        let result = builder
            .build(SearchFilter {
                brand: Some("Toyota".into()),
                min_price: Some(dec("1000")),
                ..Default::default()
            })
            .await;

        assert!(matches!(result, Err(AppError::RateUnavailable(_))));
        assert_eq!(rates.calls(), 1);
    }

    #[tokio::test]
    async fn test_blank_text_counts_as_absent() {
        let rates = CountingRates::fixed("5");
        let builder = FilterBuilder::new(rates.clone());

        let query = builder
            .build(SearchFilter {
                brand: Some("   ".into()),
                color: Some(String::new()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(query.is_match_all());
    }

    #[tokio::test]
    async fn test_text_is_trimmed() {
        let builder = FilterBuilder::new(CountingRates::fixed("5"));
        let query = builder
            .build(SearchFilter {
                brand: Some(" Toyota ".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(query.clauses(), &[FilterClause::BrandEq("Toyota".into())]);
    }

    #[tokio::test]
    async fn test_inverted_bounds_rejected_before_lookup() {
        let rates = CountingRates::fixed("5");
        let builder = FilterBuilder::new(rates.clone());

        let result = builder
            .build(SearchFilter {
                min_price: Some(dec("200")),
                max_price: Some(dec("100")),
                ..Default::default()
            })
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
        assert_eq!(rates.calls(), 0);
    }

    #[tokio::test]
    async fn test_negative_bound_rejected() {
        let rates = CountingRates::fixed("5");
        let builder = FilterBuilder::new(rates.clone());

        let result = builder
            .build(SearchFilter {
                min_price: Some(dec("-1")),
                ..Default::default()
            })
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
        assert_eq!(rates.calls(), 0);
    }

    #[tokio::test]
    async fn test_equal_bounds_allowed() {
        let builder = FilterBuilder::new(CountingRates::fixed("2"));
        let query = builder
            .build(SearchFilter {
                min_price: Some(dec("50")),
                max_price: Some(dec("50")),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(
            query.clauses(),
            &[
                FilterClause::MinPrice(dec("25.00")),
                FilterClause::MaxPrice(dec("25.00"))
            ]
        );
    }
}
