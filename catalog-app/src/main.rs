//! # Catalog Application
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Initialize the repository adapter
//! - Build the exchange-rate cache over the primary and fallback sources
//! - Create the catalog service
//! - Start the HTTP server

mod config;

use std::sync::Arc;

use opentelemetry::global;
use opentelemetry_sdk::{propagation::TraceContextPropagator, trace as sdktrace};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use catalog_hex::{VehicleService, inbound::HttpServer};
use catalog_repo::build_repo;
use exchange_rates::{AwesomeApiSource, CurrencyPair, FrankfurterSource, RateCache};

fn init_tracer() -> anyhow::Result<(sdktrace::Tracer, sdktrace::SdkTracerProvider)> {
    global::set_text_map_propagator(TraceContextPropagator::new());

    // Use gRPC exporter with batch processing (non-blocking)
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .build()?;

    let provider = sdktrace::SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .build();

    global::set_tracer_provider(provider.clone());

    use opentelemetry::trace::TracerProvider as _;
    Ok((provider.tracer("vehicle-catalog"), provider))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize OpenTelemetry tracing
    let (otel_tracer, otel_provider) = init_tracer()?;
    let telemetry = tracing_opentelemetry::layer().with_tracer(otel_tracer);

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "info,catalog_app=debug,catalog_hex=debug,exchange_rates=debug".into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .with(telemetry)
        .init();

    // Load configuration
    let config = config::Config::from_env()?;

    tracing::info!("Starting catalog server on port {}", config.port);
    tracing::info!("Using database: {}", config.database_url);
    tracing::info!(
        primary = %config.rate_primary_url,
        fallback = %config.rate_fallback_url,
        ttl_secs = config.rate_ttl.as_secs(),
        stale_policy = ?config.stale_policy,
        "Exchange rate sources configured"
    );

    // Build repository (handles connection and migration)
    let repo = build_repo(&config.database_url).await?;

    // Exchange rates: primary, then fallback, behind one shared cache
    let pair = CurrencyPair::USD_BRL;
    let primary = AwesomeApiSource::new(&config.rate_primary_url, pair, config.rate_timeout)?;
    let fallback = FrankfurterSource::new(&config.rate_fallback_url, pair, config.rate_timeout)?;
    let rates = Arc::new(RateCache::new(primary, fallback, config.cache_config()));

    // Create the catalog service
    let service = VehicleService::new(repo, rates);

    // Create and run the HTTP server
    let server = HttpServer::new(service);
    let addr = format!("0.0.0.0:{}", config.port);

    server.run(&addr).await?;

    // Ensure traces are flushed before exit
    let _ = otel_provider.shutdown();
    Ok(())
}
