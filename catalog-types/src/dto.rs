//! Data Transfer Objects (DTOs) for requests and responses.

use chrono::{DateTime, Utc};
use exchange_rates::ExchangeRate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::price::validate_price;
use crate::domain::vehicle::{normalize_plate, require_text, validate_year};
use crate::domain::Vehicle;
use crate::error::DomainError;

// ─────────────────────────────────────────────────────────────────────────────
// Vehicle DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Full set of mutable vehicle fields, used to create and to replace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct VehicleRequest {
    /// Descriptive listing name
    pub name: String,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub color: String,
    pub plate: String,
    /// Price in USD, at most two decimal places
    #[schema(value_type = String, example = "27500.00")]
    pub price_usd: Decimal,
    #[serde(default)]
    pub sold: bool,
}

impl VehicleRequest {
    /// Trims text fields, canonicalises the plate and validates everything.
    pub fn normalized(self) -> Result<Self, DomainError> {
        require_text("brand", &self.brand)?;
        require_text("plate", &self.plate)?;
        validate_year(self.year)?;
        validate_price(self.price_usd)?;

        let plate = normalize_plate(&self.plate);
        if plate.is_empty() {
            return Err(DomainError::ValidationError("plate cannot be empty".into()));
        }

        Ok(Self {
            name: self.name.trim().to_string(),
            brand: self.brand.trim().to_string(),
            model: self.model.trim().to_string(),
            color: self.color.trim().to_string(),
            plate,
            ..self
        })
    }
}

/// Partial vehicle update; absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PatchVehicleRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub price_usd: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sold: Option<bool>,
}

impl PatchVehicleRequest {
    /// Merges the patch over `current`, producing a full replacement.
    pub fn apply_to(self, current: &Vehicle) -> VehicleRequest {
        VehicleRequest {
            name: self.name.unwrap_or_else(|| current.name.clone()),
            brand: self.brand.unwrap_or_else(|| current.brand.clone()),
            model: self.model.unwrap_or_else(|| current.model.clone()),
            year: self.year.unwrap_or(current.year),
            color: self.color.unwrap_or_else(|| current.color.clone()),
            plate: self.plate.unwrap_or_else(|| current.plate.clone()),
            price_usd: self.price_usd.unwrap_or(current.price_usd),
            sold: self.sold.unwrap_or(current.sold),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Search & listing DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Search criteria as supplied by callers.
///
/// Price bounds are in the local currency (BRL) and are converted before
/// they reach the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Lower price bound in local currency
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_price: Option<Decimal>,
    /// Upper price bound in local currency
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price: Option<Decimal>,
}

impl SearchFilter {
    pub fn has_price_bounds(&self) -> bool {
        self.min_price.is_some() || self.max_price.is_some()
    }
}

/// Pagination parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

impl PageRequest {
    pub const DEFAULT_SIZE: u32 = 10;
    pub const MAX_SIZE: u32 = 100;

    /// Zero-based page index and a page size clamped to `1..=MAX_SIZE`.
    pub fn resolve(&self) -> (u32, u32) {
        let page = self.page.unwrap_or(0);
        let size = self
            .size
            .unwrap_or(Self::DEFAULT_SIZE)
            .clamp(1, Self::MAX_SIZE);
        (page, size)
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_items: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, page: u32, size: u32, total_items: u64) -> Self {
        let total_pages = total_items.div_ceil(u64::from(size.max(1)));
        Self {
            items,
            page,
            size,
            total_items,
            total_pages,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Exchange rate DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// The rate currently applied to price-filtered searches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RateResponse {
    /// Pair as `STORED/LOCAL`, e.g. `USD/BRL`
    pub pair: String,
    /// Local units per one stored unit
    #[schema(value_type = String, example = "5.25")]
    pub rate: Decimal,
    pub source: String,
    pub fetched_at: DateTime<Utc>,
}

impl From<&ExchangeRate> for RateResponse {
    fn from(rate: &ExchangeRate) -> Self {
        Self {
            pair: rate.pair().to_string(),
            rate: rate.value(),
            source: rate.source().to_string(),
            fetched_at: rate.fetched_at(),
        }
    }
}
