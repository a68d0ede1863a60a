//! HTTP request handlers.

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts, Path, Query, Request, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;

use catalog_types::{
    AppError, PageRequest, PatchVehicleRequest, RateProvider, RateResponse, SearchFilter,
    VehicleId, VehicleRepository, VehicleRequest,
};

use crate::VehicleService;

/// Application state shared across handlers.
pub struct AppState<R: VehicleRepository, P: RateProvider> {
    pub service: VehicleService<R, P>,
}

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(AppError::BadRequest(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError(AppError::BadRequest(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::RateUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
        };

        error_body(status, &message)
    }
}

/// Uniform `{"error", "code"}` body.
fn error_body(status: StatusCode, message: &str) -> Response {
    let body = serde_json::json!({
        "error": message,
        "code": status.as_u16()
    });

    (status, Json(body)).into_response()
}

// ─────────────────────────────────────────────────────────────────────────────
// Extractors
// ─────────────────────────────────────────────────────────────────────────────

/// JSON body extractor whose rejections use the API error body.
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(ApiJson(value))
    }
}

/// Query string extractor whose rejections use the API error body.
pub struct ApiQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    Query<T>: FromRequestParts<S, Rejection = QueryRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(ApiQuery(value))
    }
}

fn parse_id(id: &str) -> Result<VehicleId, AppError> {
    id.parse()
        .map_err(|_| AppError::BadRequest("Invalid vehicle ID".into()))
}

// ─────────────────────────────────────────────────────────────────────────────
// Query parameters
// ─────────────────────────────────────────────────────────────────────────────

/// Raw search parameters; every field arrives as text so blanks can be ignored.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub brand: Option<String>,
    pub year: Option<String>,
    pub color: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
}

impl SearchParams {
    pub fn into_filter(self) -> Result<SearchFilter, AppError> {
        Ok(SearchFilter {
            brand: self.brand,
            year: parse_param("year", self.year, i32::from_str)?,
            color: self.color,
            min_price: parse_param("min_price", self.min_price, Decimal::from_str)?,
            max_price: parse_param("max_price", self.max_price, Decimal::from_str)?,
        })
    }
}

fn parse_param<T, E>(
    name: &str,
    raw: Option<String>,
    parse: impl Fn(&str) -> Result<T, E>,
) -> Result<Option<T>, AppError> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse(value)
            .map(Some)
            .map_err(|_| AppError::BadRequest(format!("Invalid {}: {}", name, value))),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

#[tracing::instrument(skip(state, req), fields(plate = %req.plate))]
pub async fn create_vehicle<R: VehicleRepository, P: RateProvider>(
    State(state): State<Arc<AppState<R, P>>>,
    ApiJson(req): ApiJson<VehicleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let vehicle = state.service.create_vehicle(req).await?;
    Ok((StatusCode::CREATED, Json(vehicle)))
}

/// List vehicles one page at a time.
#[tracing::instrument(skip(state))]
pub async fn list_vehicles<R: VehicleRepository, P: RateProvider>(
    State(state): State<Arc<AppState<R, P>>>,
    ApiQuery(page): ApiQuery<PageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let page = state.service.list_vehicles(page).await?;
    Ok(Json(page))
}

/// Search vehicles; price bounds are in local currency.
#[tracing::instrument(skip(state))]
pub async fn search_vehicles<R: VehicleRepository, P: RateProvider>(
    State(state): State<Arc<AppState<R, P>>>,
    ApiQuery(params): ApiQuery<SearchParams>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = params.into_filter()?;
    let vehicles = state.service.search(filter).await?;
    tracing::debug!(matches = vehicles.len(), "search complete");
    Ok(Json(vehicles))
}

/// Get vehicle by ID.
#[tracing::instrument(skip(state), fields(vehicle_id = %id))]
pub async fn get_vehicle<R: VehicleRepository, P: RateProvider>(
    State(state): State<Arc<AppState<R, P>>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let vehicle = state.service.get_vehicle(parse_id(&id)?).await?;
    Ok(Json(vehicle))
}

#[tracing::instrument(skip(state, req), fields(vehicle_id = %id))]
pub async fn update_vehicle<R: VehicleRepository, P: RateProvider>(
    State(state): State<Arc<AppState<R, P>>>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<VehicleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let vehicle = state.service.update_vehicle(parse_id(&id)?, req).await?;
    Ok(Json(vehicle))
}

#[tracing::instrument(skip(state, patch), fields(vehicle_id = %id))]
pub async fn patch_vehicle<R: VehicleRepository, P: RateProvider>(
    State(state): State<Arc<AppState<R, P>>>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<PatchVehicleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let vehicle = state.service.patch_vehicle(parse_id(&id)?, patch).await?;
    Ok(Json(vehicle))
}

#[tracing::instrument(skip(state), fields(vehicle_id = %id))]
pub async fn delete_vehicle<R: VehicleRepository, P: RateProvider>(
    State(state): State<Arc<AppState<R, P>>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state.service.delete_vehicle(parse_id(&id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Live vehicle count per brand.
#[tracing::instrument(skip(state))]
pub async fn brand_report<R: VehicleRepository, P: RateProvider>(
    State(state): State<Arc<AppState<R, P>>>,
) -> Result<impl IntoResponse, ApiError> {
    let report = state.service.count_by_brand().await?;
    Ok(Json(report))
}

/// The exchange rate searches currently use.
#[tracing::instrument(skip(state))]
pub async fn exchange_rate<R: VehicleRepository, P: RateProvider>(
    State(state): State<Arc<AppState<R, P>>>,
) -> Result<impl IntoResponse, ApiError> {
    let rate = state.service.current_rate().await?;
    Ok(Json(RateResponse::from(&rate)))
}
