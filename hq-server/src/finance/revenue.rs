//! Tariff-based revenue derivation
//!
//! Monthly revenue may be entered directly, or derived from the month's
//! order counts per distance band priced through the franchise's logistics
//! rate table. An explicit stored figure always wins over the derivation.

use rust_decimal::Decimal;

use crate::db::models::RateBand;
use crate::finance::money::{to_decimal, to_f64};

/// Order counts per distance band, keyed by band name
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct OrderBuckets {
    #[serde(default)]
    pub counts: std::collections::BTreeMap<String, i64>,
}

impl OrderBuckets {
    pub fn total_orders(&self) -> i64 {
        self.counts.values().sum()
    }
}

/// Monthly revenue: stored figure when present and non-zero, else
/// Σ(bucket count × band price)
pub fn monthly_revenue(stored: Option<f64>, buckets: &OrderBuckets, table: &[RateBand]) -> f64 {
    if let Some(revenue) = stored
        && revenue > 0.0
    {
        return revenue;
    }

    let mut total = Decimal::ZERO;
    for band in table {
        let count = buckets.counts.get(&band.name).copied().unwrap_or(0);
        if count > 0 {
            total += to_decimal(band.price) * Decimal::from(count);
        }
    }
    to_f64(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::default_rate_table;

    fn buckets(entries: &[(&str, i64)]) -> OrderBuckets {
        OrderBuckets {
            counts: entries.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        }
    }

    #[test]
    fn stored_revenue_wins() {
        let b = buckets(&[("0-4 km", 100)]);
        assert_eq!(monthly_revenue(Some(1234.5), &b, &default_rate_table()), 1234.5);
    }

    #[test]
    fn zero_stored_revenue_falls_back_to_derivation() {
        let b = buckets(&[("0-4 km", 10)]);
        // 10 × 5.50
        assert_eq!(monthly_revenue(Some(0.0), &b, &default_rate_table()), 55.0);
    }

    #[test]
    fn derives_across_all_bands() {
        let b = buckets(&[("0-4 km", 100), ("4-5 km", 20), (">7 km", 5)]);
        // 100×5.50 + 20×6.50 + 5×8.50 = 550 + 130 + 42.50
        assert_eq!(monthly_revenue(None, &b, &default_rate_table()), 722.5);
    }

    #[test]
    fn unknown_band_names_contribute_nothing() {
        let b = buckets(&[("0-99 km", 42)]);
        assert_eq!(monthly_revenue(None, &b, &default_rate_table()), 0.0);
    }
}
