//! Vehicle domain model.

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::DomainError;

/// First model year a listing may carry.
pub const MIN_MODEL_YEAR: i32 = 1886;

/// Unique identifier for a Vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct VehicleId(Uuid);

impl VehicleId {
    /// Creates a new random VehicleId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a VehicleId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

}

impl Default for VehicleId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for VehicleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for VehicleId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A vehicle listing in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Vehicle {
    pub id: VehicleId,
    /// Descriptive listing name
    pub name: String,
    pub brand: String,
    pub model: String,
    /// Model year
    pub year: i32,
    pub color: String,
    /// License plate, unique among live listings
    pub plate: String,
    /// Price in the stored currency (USD), two decimal places
    #[schema(value_type = String, example = "27500.00")]
    pub price_usd: Decimal,
    pub sold: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Canonical plate form: trimmed, uppercase, no inner spaces or dashes.
pub fn normalize_plate(plate: &str) -> String {
    plate
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .flat_map(char::to_uppercase)
        .collect()
}

/// Model years run from the first automobile to next year's lineup.
pub fn validate_year(year: i32) -> Result<(), DomainError> {
    let latest = Utc::now().year() + 1;
    if !(MIN_MODEL_YEAR..=latest).contains(&year) {
        return Err(DomainError::ValidationError(format!(
            "Year {} is outside {}..={}",
            year, MIN_MODEL_YEAR, latest
        )));
    }
    Ok(())
}

/// Rejects blank mandatory text fields.
pub fn require_text(field: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::ValidationError(format!(
            "{} cannot be empty",
            field
        )));
    }
    Ok(())
}
