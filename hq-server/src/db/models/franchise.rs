//! Franchise Model
//!
//! Read-mostly franchise master data: display name and the configured
//! logistics rate table that prices delivery orders by distance band.

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

use super::serde_helpers;

pub type FranchiseId = RecordId;

/// One distance band of the logistics rate table
///
/// `max_km: None` means the band is open-ended (">7 km").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateBand {
    /// Display name, e.g. "0-4 km"
    pub name: String,
    pub min_km: f64,
    pub max_km: Option<f64>,
    /// Price per order in this band (EUR)
    pub price: f64,
}

impl RateBand {
    /// Whether a delivery distance falls inside this band
    ///
    /// Bands use `(min, max]` semantics so a 4.0 km order prices in
    /// "0-4 km", matching how the tariff table has always been read.
    pub fn contains(&self, distance_km: f64) -> bool {
        if distance_km < 0.0 {
            return false;
        }
        let above_min = distance_km > self.min_km || (self.min_km == 0.0 && distance_km >= 0.0);
        match self.max_km {
            Some(max) => above_min && distance_km <= max,
            None => above_min,
        }
    }
}

/// The standard rate table applied when a franchise has no custom one
pub fn default_rate_table() -> Vec<RateBand> {
    vec![
        RateBand { name: "0-4 km".into(), min_km: 0.0, max_km: Some(4.0), price: 5.50 },
        RateBand { name: "4-5 km".into(), min_km: 4.0, max_km: Some(5.0), price: 6.50 },
        RateBand { name: "5-6 km".into(), min_km: 5.0, max_km: Some(6.0), price: 7.50 },
        RateBand { name: "6-7 km".into(), min_km: 6.0, max_km: Some(7.0), price: 8.50 },
        RateBand { name: ">7 km".into(), min_km: 7.0, max_km: None, price: 8.50 },
    ]
}

/// Franchise entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Franchise {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<FranchiseId>,

    pub name: String,

    pub city: Option<String>,
    pub contact_email: Option<String>,

    /// Logistics rate table; empty means the default table applies
    #[serde(default)]
    pub rate_table: Vec<RateBand>,

    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub active: bool,

    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
}

impl Franchise {
    /// The rate table in effect for this franchise
    pub fn effective_rate_table(&self) -> Vec<RateBand> {
        if self.rate_table.is_empty() {
            default_rate_table()
        } else {
            self.rate_table.clone()
        }
    }
}

/// Create-franchise input
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FranchiseCreate {
    #[validate(length(min = 1))]
    pub name: String,
    pub city: Option<String>,
    pub contact_email: Option<String>,
    #[serde(default)]
    pub rate_table: Vec<RateBand>,
}

/// Rate table replacement input
#[derive(Debug, Clone, Deserialize)]
pub struct RateTableUpdate {
    pub rate_table: Vec<RateBand>,
}
