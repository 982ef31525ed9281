//! Advisory engine
//!
//! Derives human-readable risk/opportunity tips from a month's figures.
//! Everything here is pure and recomputed per request; tips are never
//! persisted.

use serde::{Deserialize, Serialize};

// Labor thresholds
const MIN_PRODUCTIVITY: f64 = 2.2; // orders per hour
const MIN_ORDERS_FOR_PRODUCTIVITY: i64 = 10;
const LABOR_COST_HOUR: f64 = 11.64; // € per contracted hour
const TARGET_ORDERS_PER_HOUR: f64 = 3.2;

// Distance-mix reference figures
const SHORT_GROSS: f64 = 7.0; // € per short-distance order
const LONG_GROSS: f64 = 11.0; // € per long-distance order
const COST_PER_KM: f64 = 0.08;
const SHORT_MINUTES: f64 = 15.0;
const LONG_MINUTES: f64 = 45.0;
const SHORT_REF_KM: f64 = 4.0; // band boundaries as reference distances
const LONG_REF_KM: f64 = 7.0;
const LONG_SHARE_DANGER: f64 = 0.20;
const LONG_SHARE_WARNING: f64 = 0.35;

// Fuel efficiency: estimated km per order for each distance band
const KM_FACTOR_0_4: f64 = 2.9;
const KM_FACTOR_4_5: f64 = 8.0;
const KM_FACTOR_5_7: f64 = 10.4;
const KM_FACTOR_GT_7: f64 = 15.9;
const FUEL_PER_KM_DANGER: f64 = 0.055; // €/km

/// Tip severity, used by the UI for sorting and filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TipStatus {
    Safe,
    Warning,
    Danger,
    Neutral,
}

/// One advisory tip
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisoryTip {
    pub title: String,
    pub content: String,
    pub status: TipStatus,
    /// Headline figure, e.g. "2.0 ped/h"
    pub metric: String,
}

/// The monthly figures the advisory categories read
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdvisoryMetrics {
    pub orders: i64,
    pub total_hours: f64,
    /// Monthly payroll expense (€)
    pub payroll: f64,
    /// Monthly rider insurance expense (€)
    pub insurance: f64,
    /// Monthly fuel expense (€)
    pub fuel_expense: f64,
    // Order counts per distance band
    pub orders_0_4: i64,
    pub orders_4_5: i64,
    pub orders_5_7: i64,
    pub orders_gt_7: i64,
}

impl AdvisoryMetrics {
    fn bucket_total(&self) -> i64 {
        self.orders_0_4 + self.orders_4_5 + self.orders_5_7 + self.orders_gt_7
    }

    /// Total order volume: the explicit counter when set, else the bucket sum
    fn volume(&self) -> i64 {
        if self.orders > 0 {
            self.orders
        } else {
            self.bucket_total()
        }
    }

    /// Estimated total km driven, from per-band distance factors
    pub fn estimated_km(&self) -> f64 {
        self.orders_0_4 as f64 * KM_FACTOR_0_4
            + self.orders_4_5 as f64 * KM_FACTOR_4_5
            + self.orders_5_7 as f64 * KM_FACTOR_5_7
            + self.orders_gt_7 as f64 * KM_FACTOR_GT_7
    }
}

/// Net yield of one order class in €/minute
fn order_yield(gross: f64, distance_km: f64, minutes: f64) -> f64 {
    (gross - distance_km * COST_PER_KM) / minutes
}

/// Compute the advisory tip for one category
///
/// Categories: "labor", "orders", "fuel". Anything else produces a neutral
/// informational tip.
pub fn compute_advisory(field: &str, metrics: &AdvisoryMetrics) -> AdvisoryTip {
    match field {
        "labor" => labor_advisory(metrics),
        "orders" => orders_advisory(metrics),
        "fuel" => fuel_advisory(metrics),
        _ => AdvisoryTip {
            title: "Sin datos".into(),
            content: format!("No hay análisis disponible para '{field}'."),
            status: TipStatus::Neutral,
            metric: String::new(),
        },
    }
}

fn labor_advisory(metrics: &AdvisoryMetrics) -> AdvisoryTip {
    let productivity = if metrics.total_hours > 0.0 {
        metrics.orders as f64 / metrics.total_hours
    } else {
        0.0
    };
    let metric = format!("{productivity:.1} ped/h");

    if productivity < MIN_PRODUCTIVITY && metrics.orders > MIN_ORDERS_FOR_PRODUCTIVITY {
        return AdvisoryTip {
            title: "Productividad baja".into(),
            content: format!(
                "Tus riders hacen {productivity:.1} pedidos por hora; por debajo de \
                 {MIN_PRODUCTIVITY} la operación pierde dinero. Revisa los turnos con poca carga."
            ),
            status: TipStatus::Danger,
            metric,
        };
    }

    let cost_per_order = if metrics.orders > 0 {
        (metrics.payroll + metrics.insurance) / metrics.orders as f64
    } else {
        0.0
    };
    let max_cost_per_order = LABOR_COST_HOUR / TARGET_ORDERS_PER_HOUR;

    if cost_per_order > max_cost_per_order {
        return AdvisoryTip {
            title: "Coste laboral por pedido alto".into(),
            content: format!(
                "Cada pedido carga {cost_per_order:.2} € de personal; el objetivo es \
                 {max_cost_per_order:.2} € ({LABOR_COST_HOUR} €/h entre {TARGET_ORDERS_PER_HOUR} \
                 pedidos/hora)."
            ),
            status: TipStatus::Warning,
            metric,
        };
    }

    AdvisoryTip {
        title: "Personal equilibrado".into(),
        content: "La productividad y el coste laboral están dentro del objetivo.".into(),
        status: TipStatus::Safe,
        metric,
    }
}

fn orders_advisory(metrics: &AdvisoryMetrics) -> AdvisoryTip {
    let volume = metrics.volume();
    let long_share = if volume > 0 {
        metrics.orders_gt_7 as f64 / volume as f64
    } else {
        0.0
    };
    let metric = format!("{:.0}% >7 km", long_share * 100.0);

    let short_yield = order_yield(SHORT_GROSS, SHORT_REF_KM, SHORT_MINUTES);
    let long_yield = order_yield(LONG_GROSS, LONG_REF_KM, LONG_MINUTES);

    if long_yield < 0.5 * short_yield && long_share > LONG_SHARE_DANGER {
        return AdvisoryTip {
            title: "Mezcla de distancias ruinosa".into(),
            content: format!(
                "Los pedidos de larga distancia rinden menos de la mitad por minuto que los \
                 cortos y ya son el {:.0}% del volumen.",
                long_share * 100.0
            ),
            status: TipStatus::Danger,
            metric,
        };
    }

    if long_share > LONG_SHARE_WARNING {
        return AdvisoryTip {
            title: "Demasiada larga distancia".into(),
            content: format!(
                "El {:.0}% de tus pedidos supera los 7 km; cada uno ocupa un rider \
                 {LONG_MINUTES:.0} minutos. Negocia la zona de reparto.",
                long_share * 100.0
            ),
            status: TipStatus::Warning,
            metric,
        };
    }

    AdvisoryTip {
        title: "Mezcla de distancias sana".into(),
        content: "La distribución de distancias mantiene un buen rendimiento por minuto.".into(),
        status: TipStatus::Safe,
        metric,
    }
}

fn fuel_advisory(metrics: &AdvisoryMetrics) -> AdvisoryTip {
    let km = metrics.estimated_km();
    let fuel_per_km = if km > 0.0 { metrics.fuel_expense / km } else { 0.0 };
    let metric = format!("{fuel_per_km:.3} €/km");

    if fuel_per_km > FUEL_PER_KM_DANGER {
        return AdvisoryTip {
            title: "Combustible disparado".into(),
            content: format!(
                "Estás pagando {fuel_per_km:.3} €/km frente al umbral de \
                 {FUEL_PER_KM_DANGER} €/km. Revisa el estado de las motos y las rutas."
            ),
            status: TipStatus::Danger,
            metric,
        };
    }

    AdvisoryTip {
        title: "Consumo de combustible normal".into(),
        content: "El gasto de combustible por kilómetro está dentro del umbral.".into(),
        status: TipStatus::Safe,
        metric,
    }
}

/// The "health check" view contract: only non-safe tips surface; when
/// everything is fine a single all-clear message takes their place.
pub fn health_check(tips: Vec<AdvisoryTip>) -> Vec<AdvisoryTip> {
    let flagged: Vec<AdvisoryTip> = tips
        .into_iter()
        .filter(|tip| matches!(tip.status, TipStatus::Danger | TipStatus::Warning))
        .collect();

    if flagged.is_empty() {
        vec![AdvisoryTip {
            title: "Todo en orden".into(),
            content: "Ningún indicador operativo requiere atención este mes.".into(),
            status: TipStatus::Safe,
            metric: String::new(),
        }]
    } else {
        flagged
    }
}

/// Break-even analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakEven {
    pub contribution_margin: f64,
    pub break_even_revenue: f64,
    pub is_profitable: bool,
}

/// Contribution-margin break-even
///
/// `break_even_revenue` is the revenue level at which the contribution
/// margin covers fixed costs exactly; 0 when there is no revenue (or no
/// positive margin) to extrapolate from.
pub fn break_even(revenue: f64, fixed_costs: f64, variable_costs: f64) -> BreakEven {
    let contribution_margin = revenue - variable_costs;

    let break_even_revenue = if revenue > 0.0 && contribution_margin != 0.0 {
        fixed_costs / (contribution_margin / revenue)
    } else {
        0.0
    };

    BreakEven {
        contribution_margin,
        break_even_revenue,
        is_profitable: revenue > break_even_revenue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn low_productivity_is_danger() {
        // orders=20, hours=10 → 2.0 ped/h
        let metrics = AdvisoryMetrics {
            orders: 20,
            total_hours: 10.0,
            ..Default::default()
        };
        let tip = compute_advisory("labor", &metrics);
        assert_eq!(tip.status, TipStatus::Danger);
        assert_eq!(tip.metric, "2.0 ped/h");
    }

    #[test]
    fn low_volume_never_triggers_productivity_danger() {
        // 10 orders is not enough signal, however slow the month was
        let metrics = AdvisoryMetrics {
            orders: 10,
            total_hours: 100.0,
            ..Default::default()
        };
        let tip = compute_advisory("labor", &metrics);
        assert_ne!(tip.status, TipStatus::Danger);
    }

    #[test]
    fn high_cost_per_order_is_warning() {
        // orders=20, hours=7 → ~2.86 ped/h (above 2.2), but payroll pushes
        // cost per order past 11.64/3.2 ≈ 3.64 €
        let metrics = AdvisoryMetrics {
            orders: 20,
            total_hours: 7.0,
            payroll: 70.0,
            insurance: 10.0,
            ..Default::default()
        };
        // (70+10)/20 = 4.0 €/order > 3.64
        let tip = compute_advisory("labor", &metrics);
        assert_eq!(tip.status, TipStatus::Warning);
    }

    #[test]
    fn efficient_labor_is_safe() {
        let metrics = AdvisoryMetrics {
            orders: 20,
            total_hours: 7.0,
            payroll: 50.0,
            insurance: 10.0,
            ..Default::default()
        };
        // (50+10)/20 = 3.0 €/order < 3.64
        let tip = compute_advisory("labor", &metrics);
        assert_eq!(tip.status, TipStatus::Safe);
    }

    #[test]
    fn heavy_long_distance_mix_is_flagged() {
        let metrics = AdvisoryMetrics {
            orders_0_4: 50,
            orders_gt_7: 50,
            ..Default::default()
        };
        // 50% long share exceeds the 35% warning threshold; the yield
        // clause compares the fixed reference figures (long yield sits
        // just above half the short yield, so this is not a danger)
        let tip = compute_advisory("orders", &metrics);
        assert_eq!(tip.status, TipStatus::Warning);
        assert_eq!(tip.metric, "50% >7 km");
    }

    #[test]
    fn balanced_distance_mix_is_safe() {
        let metrics = AdvisoryMetrics {
            orders_0_4: 90,
            orders_gt_7: 10,
            ..Default::default()
        };
        let tip = compute_advisory("orders", &metrics);
        assert_eq!(tip.status, TipStatus::Safe);
    }

    #[test]
    fn reference_yields_have_the_expected_relation() {
        let short = order_yield(SHORT_GROSS, SHORT_REF_KM, SHORT_MINUTES);
        let long = order_yield(LONG_GROSS, LONG_REF_KM, LONG_MINUTES);
        // (7 - 0.32)/15 ≈ 0.445, (11 - 0.56)/45 = 0.232
        assert!((short - 0.4453).abs() < 1e-3);
        assert!((long - 0.232).abs() < 1e-3);
        assert!(long > 0.5 * short);
    }

    #[test]
    fn expensive_fuel_is_danger() {
        let metrics = AdvisoryMetrics {
            fuel_expense: 100.0,
            orders_0_4: 100, // 290 estimated km
            orders_4_5: 0,
            orders_5_7: 0,
            orders_gt_7: 50, // +795 km → 1085 km total
            ..Default::default()
        };
        // 100 / 1085 ≈ 0.092 €/km > 0.055
        let tip = compute_advisory("fuel", &metrics);
        assert_eq!(tip.status, TipStatus::Danger);
    }

    #[test]
    fn no_km_means_safe_fuel() {
        let metrics = AdvisoryMetrics {
            fuel_expense: 100.0,
            ..Default::default()
        };
        let tip = compute_advisory("fuel", &metrics);
        assert_eq!(tip.status, TipStatus::Safe);
    }

    #[test]
    fn unknown_field_is_neutral() {
        let tip = compute_advisory("weather", &AdvisoryMetrics::default());
        assert_eq!(tip.status, TipStatus::Neutral);
    }

    #[test]
    fn health_check_hides_safe_tips() {
        let metrics = AdvisoryMetrics {
            orders: 20,
            total_hours: 10.0,
            ..Default::default()
        };
        let tips = vec![
            compute_advisory("labor", &metrics), // danger
            compute_advisory("fuel", &metrics),  // safe
        ];
        let shown = health_check(tips);
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].status, TipStatus::Danger);
    }

    #[test]
    fn health_check_all_clear() {
        let shown = health_check(vec![compute_advisory("fuel", &AdvisoryMetrics::default())]);
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].status, TipStatus::Safe);
        assert_eq!(shown[0].title, "Todo en orden");
    }

    #[test]
    fn break_even_basics() {
        // margin ratio = (1000-400)/1000 = 0.6 → BE = 300/0.6 = 500
        let be = break_even(1000.0, 300.0, 400.0);
        assert_eq!(be.contribution_margin, 600.0);
        assert_eq!(be.break_even_revenue, 500.0);
        assert!(be.is_profitable);
    }

    #[test]
    fn break_even_with_no_revenue_is_zero() {
        let be = break_even(0.0, 300.0, 0.0);
        assert_eq!(be.break_even_revenue, 0.0);
        assert!(!be.is_profitable);
    }

    #[test]
    fn losing_money_is_not_profitable() {
        // margin ratio = 0.2 → BE = 500/0.2 = 2500 > 1000
        let be = break_even(1000.0, 500.0, 800.0);
        assert_eq!(be.break_even_revenue, 2500.0);
        assert!(!be.is_profitable);
    }
}
