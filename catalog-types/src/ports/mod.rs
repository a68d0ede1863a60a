//! Port traits (interfaces for adapters).
//!
//! The application layer depends on these traits, not on concrete
//! implementations.

mod repository;

pub use exchange_rates::{RateProvider, RateSource};
pub use repository::VehicleRepository;
