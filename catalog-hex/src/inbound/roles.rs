//! Role gate for mutating requests.
//!
//! Identity is established upstream; this service only reads the role header
//! the gateway forwards and refuses writes from anyone but an admin.

use axum::{
    body::Body,
    http::{Method, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use catalog_types::AppError;

use super::handlers::ApiError;

/// Header carrying the caller's role.
pub const ROLE_HEADER: &str = "x-catalog-role";

/// Role allowed to mutate the catalog.
pub const ADMIN_ROLE: &str = "admin";

fn is_read_only(method: &Method) -> bool {
    *method == Method::GET || *method == Method::HEAD || *method == Method::OPTIONS
}

fn is_admin(role: Option<&str>) -> bool {
    role.is_some_and(|r| r.trim().eq_ignore_ascii_case(ADMIN_ROLE))
}

/// Rejects non-admin writes with 403.
///
/// Endpoints that bypass the gate:
/// - `/health` - Health check endpoint
/// - every read-only method
pub async fn role_middleware(request: Request<Body>, next: Next) -> Response {
    if request.uri().path() == "/health" || is_read_only(request.method()) {
        return next.run(request).await;
    }

    let role = request
        .headers()
        .get(ROLE_HEADER)
        .and_then(|v| v.to_str().ok());

    if is_admin(role) {
        next.run(request).await
    } else {
        tracing::warn!(
            method = %request.method(),
            path = %request.uri().path(),
            "write refused without admin role"
        );
        ApiError(AppError::Forbidden("Admin role required".into())).into_response()
    }
}
