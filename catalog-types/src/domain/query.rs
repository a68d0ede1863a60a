//! Typed search predicate over catalog records.
//!
//! A [`VehicleQuery`] is an ordered conjunction of [`FilterClause`]s. Price
//! clauses are always expressed in the stored currency; conversion from the
//! caller's currency happens before a clause is built. Stores translate the
//! clauses into their own query language, and [`VehicleQuery::matches`]
//! gives the reference semantics for in-memory evaluation.

use rust_decimal::Decimal;

use super::vehicle::Vehicle;

/// One condition a vehicle must satisfy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterClause {
    BrandEq(String),
    YearEq(i32),
    ColorEq(String),
    /// `price_usd >= bound`
    MinPrice(Decimal),
    /// `price_usd <= bound`
    MaxPrice(Decimal),
}

impl FilterClause {
    pub fn matches(&self, vehicle: &Vehicle) -> bool {
        match self {
            FilterClause::BrandEq(brand) => vehicle.brand == *brand,
            FilterClause::YearEq(year) => vehicle.year == *year,
            FilterClause::ColorEq(color) => vehicle.color == *color,
            FilterClause::MinPrice(min) => vehicle.price_usd >= *min,
            FilterClause::MaxPrice(max) => vehicle.price_usd <= *max,
        }
    }
}

/// Conjunction of clauses; the empty query matches every live vehicle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VehicleQuery {
    clauses: Vec<FilterClause>,
}

impl VehicleQuery {
    pub fn match_all() -> Self {
        Self::default()
    }

    pub fn and(mut self, clause: FilterClause) -> Self {
        self.clauses.push(clause);
        self
    }

    pub fn clauses(&self) -> &[FilterClause] {
        &self.clauses
    }

    pub fn is_match_all(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn matches(&self, vehicle: &Vehicle) -> bool {
        self.clauses.iter().all(|c| c.matches(vehicle))
    }
}
