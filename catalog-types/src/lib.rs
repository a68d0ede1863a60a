//! # Catalog Types
//!
//! Domain types and port traits for the vehicle catalog service.
//! This crate has no IO of its own - only data structures, validation
//! rules, and trait definitions.
//!
//! ## Architecture
//!
//! This crate is the innermost core of the hexagonal architecture:
//! - `domain/` - Vehicle, price helpers and the typed search query
//! - `ports/` - Trait definitions that adapters must implement
//! - `dto/` - Data Transfer Objects for API boundaries
//! - `error/` - Domain, repository and application error types

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{FilterClause, Vehicle, VehicleId, VehicleQuery};
pub use dto::*;
pub use error::{AppError, DomainError, RepoError};
pub use exchange_rates::{CurrencyCode, CurrencyPair, ExchangeRate};
pub use ports::{RateProvider, VehicleRepository};
