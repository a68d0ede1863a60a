//! HTTP-level tests for the rate sources and the cache wired on top of them.
//!
//! Each test stands up wiremock servers playing the two upstream providers.

use std::str::FromStr;
use std::time::Duration;

use exchange_rates::{
    AwesomeApiSource, CacheConfig, CurrencyPair, FrankfurterSource, RateCache, RateError,
    RateSource, SourceError, StalePolicy,
};
use rust_decimal::Decimal;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TIMEOUT: Duration = Duration::from_secs(2);

fn dec(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap()
}

async fn primary_server(template: ResponseTemplate, expected_calls: u64) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json/last/USD-BRL"))
        .respond_with(template)
        .expect(expected_calls)
        .mount(&server)
        .await;
    server
}

async fn fallback_server(template: ResponseTemplate, expected_calls: u64) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/latest"))
        .and(query_param("from", "USD"))
        .and(query_param("to", "BRL"))
        .respond_with(template)
        .expect(expected_calls)
        .mount(&server)
        .await;
    server
}

fn primary(server: &MockServer) -> AwesomeApiSource {
    AwesomeApiSource::new(server.uri(), CurrencyPair::USD_BRL, TIMEOUT).unwrap()
}

fn fallback(server: &MockServer) -> FrankfurterSource {
    FrankfurterSource::new(server.uri(), CurrencyPair::USD_BRL, TIMEOUT).unwrap()
}

#[tokio::test]
async fn test_primary_parses_bid() {
    let body = serde_json::json!([{ "code": "USD", "codein": "BRL", "bid": "5.25" }]);
    let server = primary_server(ResponseTemplate::new(200).set_body_json(body), 1).await;

    let rate = primary(&server).fetch().await.unwrap();

    assert_eq!(rate.value(), dec("5.25"));
    assert_eq!(rate.source(), "awesomeapi");
    assert_eq!(rate.pair(), CurrencyPair::USD_BRL);
}

#[tokio::test]
async fn test_primary_server_error_is_network_error() {
    let server = primary_server(ResponseTemplate::new(503), 1).await;

    let result = primary(&server).fetch().await;

    assert!(matches!(result, Err(SourceError::Network(_))));
}

#[tokio::test]
async fn test_primary_garbage_body_is_parse_error() {
    let server =
        primary_server(ResponseTemplate::new(200).set_body_string("<html>oops</html>"), 1).await;

    let result = primary(&server).fetch().await;

    assert!(matches!(result, Err(SourceError::Parse(_))));
}

#[tokio::test]
async fn test_primary_non_numeric_bid_is_parse_error() {
    let body = serde_json::json!([{ "bid": "n/a" }]);
    let server = primary_server(ResponseTemplate::new(200).set_body_json(body), 1).await;

    let result = primary(&server).fetch().await;

    assert!(matches!(result, Err(SourceError::Parse(_))));
}

#[tokio::test]
async fn test_fallback_parses_rates_mapping() {
    let body = serde_json::json!({ "amount": 1.0, "base": "USD", "rates": { "BRL": "5.50" } });
    let server = fallback_server(ResponseTemplate::new(200).set_body_json(body), 1).await;

    let rate = fallback(&server).fetch().await.unwrap();

    assert_eq!(rate.value(), dec("5.50"));
    assert_eq!(rate.source(), "frankfurter");
}

#[tokio::test]
async fn test_slow_primary_is_network_error() {
    let body = serde_json::json!([{ "bid": "5.25" }]);
    let server = primary_server(
        ResponseTemplate::new(200)
            .set_body_json(body)
            .set_delay(Duration::from_secs(5)),
        1,
    )
    .await;
    let source =
        AwesomeApiSource::new(server.uri(), CurrencyPair::USD_BRL, Duration::from_millis(200))
            .unwrap();

    let result = source.fetch().await;

    assert!(matches!(result, Err(SourceError::Network(_))));
}

#[tokio::test]
async fn test_cache_falls_back_over_http() {
    let primary_srv = primary_server(ResponseTemplate::new(500), 1).await;
    let body = serde_json::json!({ "rates": { "BRL": "5.50" } });
    let fallback_srv = fallback_server(ResponseTemplate::new(200).set_body_json(body), 1).await;

    let cache = RateCache::new(
        primary(&primary_srv),
        fallback(&fallback_srv),
        CacheConfig::new(StalePolicy::Fail),
    );

    let rate = cache.get_rate().await.unwrap();
    // Served from the fallback entry, no further requests.
    let again = cache.get_rate().await.unwrap();

    assert_eq!(rate.value(), dec("5.50"));
    assert_eq!(rate, again);
}

#[tokio::test]
async fn test_cache_caches_primary_over_http() {
    let body = serde_json::json!([{ "bid": "5.25" }]);
    let primary_srv = primary_server(ResponseTemplate::new(200).set_body_json(body), 1).await;
    let fallback_srv = fallback_server(ResponseTemplate::new(500), 0).await;

    let cache = RateCache::new(
        primary(&primary_srv),
        fallback(&fallback_srv),
        CacheConfig::new(StalePolicy::Fail),
    );

    for _ in 0..5 {
        assert_eq!(cache.get_rate().await.unwrap().value(), dec("5.25"));
    }
}

#[tokio::test]
async fn test_cache_unavailable_when_both_fail() {
    let primary_srv = primary_server(ResponseTemplate::new(502), 1).await;
    let fallback_srv =
        fallback_server(ResponseTemplate::new(200).set_body_string("{}"), 1).await;

    let cache = RateCache::new(
        primary(&primary_srv),
        fallback(&fallback_srv),
        CacheConfig::new(StalePolicy::ServeStale),
    );

    let result = cache.get_rate().await;

    match result {
        Err(RateError::Unavailable { primary, fallback }) => {
            assert!(matches!(primary, SourceError::Network(_)));
            assert!(matches!(fallback, SourceError::Parse(_)));
        }
        other => panic!("expected unavailable, got {:?}", other),
    }
}
