//! HTTP Server configuration and startup.

use std::sync::Arc;

use axum::{Router, middleware, routing::get};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use catalog_types::{RateProvider, VehicleRepository};

use super::handlers::{self, AppState};
use super::roles::role_middleware;
use crate::VehicleService;
use crate::openapi::{ApiDoc, OPENAPI_JSON_PATH, SWAGGER_UI_PATH};

/// HTTP Server for the Vehicle Catalog API.
pub struct HttpServer<R: VehicleRepository, P: RateProvider> {
    state: Arc<AppState<R, P>>,
}

impl<R: VehicleRepository, P: RateProvider> HttpServer<R, P> {
    /// Creates a new HTTP server with the given service.
    pub fn new(service: VehicleService<R, P>) -> Self {
        Self {
            state: Arc::new(AppState { service }),
        }
    }

    /// Builds the Axum router with all routes.
    pub fn router(&self) -> Router {
        // Build HTTP metrics layer (uses globally set MeterProvider)
        let metrics = axum_otel_metrics::HttpMetricsLayerBuilder::new().build();

        Router::new()
            .route("/health", get(handlers::health))
            .route(
                "/api/vehicles",
                get(handlers::list_vehicles::<R, P>).post(handlers::create_vehicle::<R, P>),
            )
            .route("/api/vehicles/search", get(handlers::search_vehicles::<R, P>))
            .route(
                "/api/vehicles/reports/by-brand",
                get(handlers::brand_report::<R, P>),
            )
            .route(
                "/api/vehicles/{id}",
                get(handlers::get_vehicle::<R, P>)
                    .put(handlers::update_vehicle::<R, P>)
                    .patch(handlers::patch_vehicle::<R, P>)
                    .delete(handlers::delete_vehicle::<R, P>),
            )
            .route("/api/exchange-rate", get(handlers::exchange_rate::<R, P>))
            .merge(SwaggerUi::new(SWAGGER_UI_PATH).url(OPENAPI_JSON_PATH, ApiDoc::openapi()))
            .layer(metrics)
            .layer(middleware::from_fn(role_middleware))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Runs the server on the given address with graceful shutdown.
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Server listening on {}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
