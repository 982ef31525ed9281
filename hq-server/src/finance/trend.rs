//! Multi-month trend series
//!
//! Folds monthly summaries into a zero-filled, chronological series for
//! dashboard charts. The fold SUMS into each bucket rather than
//! overwriting: nothing stops two summary documents from sharing a month
//! key, and a chart silently dropping one would be worse than double
//! counting it.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::db::models::MonthlySummary;
use crate::finance::money::{to_decimal, to_f64};
use crate::utils::time::{month_display, month_first_iso};

/// One month of the trend series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendPoint {
    /// Short display name ("Mar")
    pub name: String,
    /// Month key ("2024-03")
    pub month: String,
    pub income: f64,
    /// Duplicate of `income`, kept for a historical field-name
    /// inconsistency chart consumers depend on
    pub revenue: f64,
    pub expenses: f64,
    pub profit: f64,
    pub orders: i64,
    pub total_hours: f64,
    pub logistics_income: f64,
    /// Merged category breakdown
    pub breakdown: BTreeMap<String, f64>,
    /// ISO timestamp of the first instant of the month
    pub date: String,
}

impl TrendPoint {
    fn zero(month: &str) -> Self {
        Self {
            name: month_display(month),
            month: month.to_string(),
            income: 0.0,
            revenue: 0.0,
            expenses: 0.0,
            profit: 0.0,
            orders: 0,
            total_hours: 0.0,
            logistics_income: 0.0,
            breakdown: BTreeMap::new(),
            date: month_first_iso(month),
        }
    }
}

/// Internal accumulator keeping the money sums exact
#[derive(Default)]
struct Bucket {
    income: Decimal,
    expenses: Decimal,
    orders: i64,
    total_hours: f64,
    logistics_income: Decimal,
    breakdown: BTreeMap<String, Decimal>,
}

/// Fold summaries into the given month window
///
/// Produces exactly one point per window month, chronological, zero-filled
/// where no summary exists. Summaries outside the window are ignored.
pub fn fold_trend(months: &[String], summaries: &[MonthlySummary]) -> Vec<TrendPoint> {
    let mut buckets: BTreeMap<&str, Bucket> = months
        .iter()
        .map(|m| (m.as_str(), Bucket::default()))
        .collect();

    for summary in summaries {
        let Some(bucket) = buckets.get_mut(summary.month.as_str()) else {
            continue;
        };
        bucket.income += to_decimal(summary.total_income);
        bucket.expenses += to_decimal(summary.total_expenses);
        bucket.orders += summary.orders;
        bucket.total_hours += summary.total_hours;
        bucket.logistics_income += to_decimal(summary.logistics_income);
        for (key, value) in &summary.breakdown {
            *bucket.breakdown.entry(key.clone()).or_default() += to_decimal(*value);
        }
    }

    months
        .iter()
        .map(|month| {
            let bucket = buckets.remove(month.as_str()).unwrap_or_default();
            let income = to_f64(bucket.income);
            let expenses = to_f64(bucket.expenses);
            TrendPoint {
                income,
                revenue: income,
                expenses,
                profit: to_f64(bucket.income - bucket.expenses),
                orders: bucket.orders,
                total_hours: bucket.total_hours,
                logistics_income: to_f64(bucket.logistics_income),
                breakdown: bucket
                    .breakdown
                    .into_iter()
                    .map(|(k, v)| (k, to_f64(v)))
                    .collect(),
                ..TrendPoint::zero(month)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(month: &str, income: f64, expenses: f64) -> MonthlySummary {
        MonthlySummary {
            id: None,
            franchise_id: "f1".into(),
            month: month.into(),
            total_income: income,
            revenue: income,
            gross_income: income,
            total_expenses: expenses,
            expenses,
            profit: income - expenses,
            breakdown: BTreeMap::new(),
            status: None,
            is_locked: None,
            unlock_reason: None,
            rejection_reason: None,
            status_history: vec![],
            orders: 0,
            total_hours: 0.0,
            logistics_income: 0.0,
            created_at: None,
            updated_at: None,
            last_force_sync: None,
        }
    }

    fn window() -> Vec<String> {
        vec!["2024-01".into(), "2024-02".into(), "2024-03".into()]
    }

    #[test]
    fn zero_fills_empty_months() {
        let points = fold_trend(&window(), &[]);
        assert_eq!(points.len(), 3);
        for (point, month) in points.iter().zip(["2024-01", "2024-02", "2024-03"]) {
            assert_eq!(point.month, month);
            assert_eq!(point.income, 0.0);
            assert_eq!(point.expenses, 0.0);
            assert_eq!(point.profit, 0.0);
        }
        assert_eq!(points[0].name, "Jan");
        assert_eq!(points[2].date, "2024-03-01T00:00:00Z");
    }

    #[test]
    fn sums_rather_than_overwrites() {
        // Two summary documents sharing a month fold into one bucket
        let points = fold_trend(
            &window(),
            &[summary("2024-02", 100.0, 30.0), summary("2024-02", 50.0, 20.0)],
        );
        assert_eq!(points[1].income, 150.0);
        assert_eq!(points[1].expenses, 50.0);
        assert_eq!(points[1].profit, 100.0);
        // revenue mirrors income
        assert_eq!(points[1].revenue, points[1].income);
    }

    #[test]
    fn ignores_months_outside_the_window() {
        let points = fold_trend(&window(), &[summary("2023-12", 999.0, 0.0)]);
        assert!(points.iter().all(|p| p.income == 0.0));
    }

    #[test]
    fn merges_breakdowns() {
        let mut a = summary("2024-01", 10.0, 5.0);
        a.breakdown.insert("fuel".into(), 3.0);
        let mut b = summary("2024-01", 20.0, 5.0);
        b.breakdown.insert("fuel".into(), 2.0);
        b.breakdown.insert("labor".into(), 4.0);

        let points = fold_trend(&window(), &[a, b]);
        assert_eq!(points[0].breakdown["fuel"], 5.0);
        assert_eq!(points[0].breakdown["labor"], 4.0);
    }
}
