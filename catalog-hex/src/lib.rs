//! # Catalog Hex
//!
//! Application service layer and HTTP adapter for the vehicle catalog.
//!
//! ## Architecture
//!
//! - `filter` - Builds typed queries from search filters, converting price bounds
//! - `service` - Application service (orchestrates domain operations)
//! - `inbound/` - HTTP adapter (Axum server)
//! - `openapi` - OpenAPI document served with Swagger UI
//!
//! The service is generic over `R: VehicleRepository` and `P: RateProvider`,
//! allowing different adapters to be injected.

pub mod filter;
pub mod inbound;
pub mod openapi;
pub mod service;


pub use filter::FilterBuilder;
pub use service::VehicleService;
