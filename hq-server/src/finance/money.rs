//! Money calculation utilities using rust_decimal for precision
//!
//! Monthly folds accumulate hundreds of f64 line items; doing the sums in
//! `Decimal` and converting back once keeps the cents exact. All storage
//! and serialization stays on `f64`.

use rust_decimal::prelude::*;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(value = ?value, "Non-finite f64 in monetary calculation, defaulting to zero");
        Decimal::ZERO
    })
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or(0.0)
}

/// Round an f64 amount to cents through Decimal
#[inline]
pub fn round_money(value: f64) -> f64 {
    to_f64(to_decimal(value))
}
