//! OpenAPI specification and documentation.

#![allow(dead_code)] // Path functions are only used by utoipa for documentation generation

use catalog_types::dto::{Page, PatchVehicleRequest, RateResponse, VehicleRequest};
use catalog_types::{Vehicle, VehicleId};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
};

/// Path of the generated document.
pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

/// Mount point of the Swagger UI.
pub const SWAGGER_UI_PATH: &str = "/swagger-ui";

// Documentation-only stand-ins for the generic handlers.

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = inline(serde_json::Value), example = json!({"status": "healthy"}))
    )
)]
async fn health() {}

/// List vehicles one page at a time
#[utoipa::path(
    get,
    path = "/api/vehicles",
    tag = "vehicles",
    params(
        ("page" = Option<u32>, Query, description = "Zero-based page index"),
        ("size" = Option<u32>, Query, description = "Page size, 1 to 100 (default 10)")
    ),
    responses(
        (status = 200, description = "One page of live vehicles", body = Page<Vehicle>),
        (status = 400, description = "Malformed paging parameters")
    )
)]
async fn list_vehicles() {}

/// Register a vehicle
#[utoipa::path(
    post,
    path = "/api/vehicles",
    tag = "vehicles",
    request_body = VehicleRequest,
    security(("catalog_role" = [])),
    responses(
        (status = 201, description = "Vehicle created", body = Vehicle),
        (status = 400, description = "Invalid vehicle data"),
        (status = 403, description = "Admin role required"),
        (status = 409, description = "Plate already registered")
    )
)]
async fn create_vehicle() {}

/// Search vehicles with price bounds in BRL
#[utoipa::path(
    get,
    path = "/api/vehicles/search",
    tag = "vehicles",
    params(
        ("brand" = Option<String>, Query, description = "Exact brand"),
        ("year" = Option<i32>, Query, description = "Exact model year"),
        ("color" = Option<String>, Query, description = "Exact color"),
        ("min_price" = Option<String>, Query, description = "Lower price bound in BRL"),
        ("max_price" = Option<String>, Query, description = "Upper price bound in BRL")
    ),
    responses(
        (status = 200, description = "Matching vehicles, oldest first", body = Vec<Vehicle>),
        (status = 400, description = "Malformed, negative or inverted bounds"),
        (status = 503, description = "No exchange rate available for a price-filtered search")
    )
)]
async fn search_vehicles() {}

/// Count live vehicles per brand
#[utoipa::path(
    get,
    path = "/api/vehicles/reports/by-brand",
    tag = "reports",
    responses(
        (status = 200, description = "Brand to vehicle count", body = inline(serde_json::Value), example = json!({"Fiat": 1, "Toyota": 2}))
    )
)]
async fn brand_report() {}

/// Get vehicle by ID
#[utoipa::path(
    get,
    path = "/api/vehicles/{id}",
    tag = "vehicles",
    params(
        ("id" = VehicleId, Path, description = "Vehicle ID (UUID)")
    ),
    responses(
        (status = 200, description = "Vehicle details", body = Vehicle),
        (status = 400, description = "Malformed vehicle ID"),
        (status = 404, description = "Vehicle not found")
    )
)]
async fn get_vehicle() {}

/// Replace every field of a vehicle
#[utoipa::path(
    put,
    path = "/api/vehicles/{id}",
    tag = "vehicles",
    request_body = VehicleRequest,
    security(("catalog_role" = [])),
    params(
        ("id" = VehicleId, Path, description = "Vehicle ID (UUID)")
    ),
    responses(
        (status = 200, description = "Vehicle updated", body = Vehicle),
        (status = 400, description = "Invalid vehicle data"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Vehicle not found"),
        (status = 409, description = "Plate already registered")
    )
)]
async fn update_vehicle() {}

/// Update only the given fields of a vehicle
#[utoipa::path(
    patch,
    path = "/api/vehicles/{id}",
    tag = "vehicles",
    request_body = PatchVehicleRequest,
    security(("catalog_role" = [])),
    params(
        ("id" = VehicleId, Path, description = "Vehicle ID (UUID)")
    ),
    responses(
        (status = 200, description = "Vehicle updated", body = Vehicle),
        (status = 400, description = "Invalid vehicle data"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Vehicle not found"),
        (status = 409, description = "Plate already registered")
    )
)]
async fn patch_vehicle() {}

/// Soft-delete a vehicle
#[utoipa::path(
    delete,
    path = "/api/vehicles/{id}",
    tag = "vehicles",
    security(("catalog_role" = [])),
    params(
        ("id" = VehicleId, Path, description = "Vehicle ID (UUID)")
    ),
    responses(
        (status = 204, description = "Vehicle deleted"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Vehicle not found")
    )
)]
async fn delete_vehicle() {}

/// Exchange rate applied to price-filtered searches
#[utoipa::path(
    get,
    path = "/api/exchange-rate",
    tag = "exchange-rate",
    responses(
        (status = 200, description = "Current USD/BRL rate", body = RateResponse),
        (status = 503, description = "No exchange rate available")
    )
)]
async fn exchange_rate() {}

/// OpenAPI documentation for the Vehicle Catalog API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Vehicle Catalog API",
        version = "1.0.0",
        description = "Vehicle listings priced in USD and searchable with BRL price bounds.\n\n## Roles\n\nReads are open. Creating, replacing, patching and deleting vehicles requires the admin role header:\n\n```\nX-Catalog-Role: admin\n```",
        license(name = "MIT"),
    ),
    paths(
        health,
        list_vehicles,
        create_vehicle,
        search_vehicles,
        brand_report,
        get_vehicle,
        update_vehicle,
        patch_vehicle,
        delete_vehicle,
        exchange_rate,
    ),
    components(
        schemas(
            Vehicle,
            VehicleId,
            VehicleRequest,
            PatchVehicleRequest,
            RateResponse,
        )
    ),
    modifiers(&RoleHeaderAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "vehicles", description = "Vehicle listing and search"),
        (name = "reports", description = "Catalog reports"),
        (name = "exchange-rate", description = "Exchange rate used for BRL price bounds"),
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for the role header.
struct RoleHeaderAddon;

impl Modify for RoleHeaderAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "catalog_role",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("X-Catalog-Role"))),
            );
        }
    }
}
