//! Database row types and their conversion into domain values.

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use catalog_types::domain::price::from_cents;
use catalog_types::{RepoError, Vehicle, VehicleId};

/// Columns selected for every vehicle read, in `DbVehicle` order.
pub const VEHICLE_COLUMNS: &str =
    "id, name, brand, model, year, color, plate, price_cents, sold, created_at, updated_at";

// ─────────────────────────────────────────────────────────────────────────────
// Database row structs (derive FromRow for automatic mapping)
// ─────────────────────────────────────────────────────────────────────────────

/// Vehicle row from database.
#[derive(FromRow)]
pub struct DbVehicle {
    pub id: String,
    pub name: String,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub color: String,
    pub plate: String,
    pub price_cents: i64,
    pub sold: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Brand report row.
#[derive(FromRow)]
pub struct DbBrandCount {
    pub brand: String,
    pub total: i64,
}

// ─────────────────────────────────────────────────────────────────────────────
// Parsing helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Fixed-width RFC 3339 so text ordering matches time ordering.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, RepoError> {
    Ok(DateTime::parse_from_rfc3339(s)
        .map_err(|e| RepoError::Database(e.to_string()))?
        .with_timezone(&Utc))
}

impl DbVehicle {
    /// Convert database row to domain Vehicle.
    pub fn into_domain(self) -> Result<Vehicle, RepoError> {
        let id = Uuid::parse_str(&self.id).map_err(|e| RepoError::Database(e.to_string()))?;

        Ok(Vehicle {
            id: VehicleId::from_uuid(id),
            name: self.name,
            brand: self.brand,
            model: self.model,
            year: self.year,
            color: self.color,
            plate: self.plate,
            price_usd: from_cents(self.price_cents),
            sold: self.sold,
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
        })
    }
}

impl DbBrandCount {
    pub fn into_pair(self) -> (String, u64) {
        (self.brand, u64::try_from(self.total).unwrap_or_default())
    }
}
