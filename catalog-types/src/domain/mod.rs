//! Domain models for the vehicle catalog.

pub mod price;
pub mod query;
pub mod vehicle;

pub use query::{FilterClause, VehicleQuery};
pub use vehicle::{Vehicle, VehicleId};
