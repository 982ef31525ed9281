//! Monthly expense report
//!
//! Builds the full P&L view of one month: fixed/variable cost split,
//! Spanish tax estimation (IVA/IRPF), operational metrics and the ordered
//! expense breakdown the dashboards chart.

use serde::{Deserialize, Serialize};

use crate::finance::advisory::break_even;
use crate::finance::money::round_money;

/// Standard monthly renting cost per moto (€)
const RENTING_PER_MOTO: f64 = 154.0;
/// Platform fee per order when no explicit figure is entered (€)
const PLATFORM_FEE_PER_ORDER: f64 = 0.35;
/// Spanish VAT rate applied to invoiced services
const IVA_RATE: f64 = 0.21;
/// Default personal income tax estimate (%)
const DEFAULT_IRPF_PERCENT: f64 = 20.0;
/// Average km per litre of the fleet's reference moto
const KM_PER_LITRE: f64 = 35.0;

/// Raw monthly inputs, as entered on the closing screen
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportInputs {
    pub salaries: f64,
    pub insurance: f64,
    /// Self-employment quota (no VAT)
    pub quota: f64,
    pub moto_count: f64,
    /// Explicit renting total; overrides the per-moto standard rate
    pub renting_cost: Option<f64>,
    pub agency_fee: f64,
    pub prl_fee: f64,
    pub accounting_fee: f64,
    pub gasoline: f64,
    /// €/litre actually paid; enables the km estimation
    pub gasoline_price: f64,
    pub repairs: f64,
    pub marketing: f64,
    pub incidents: f64,
    pub other_expenses: f64,
    /// Explicit platform fee; overrides the per-order standard rate
    pub platform_fee: Option<f64>,
    pub royalty_percent: f64,
    pub irpf_percent: Option<f64>,
    pub total_hours: f64,
    pub total_km: f64,
    /// Manual total-expenses entry; wins when larger than the computed sum
    pub total_expenses: Option<f64>,
}

/// Fixed cost block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixedCosts {
    pub salaries: f64,
    pub renting: f64,
    pub insurance: f64,
    pub services: f64,
    pub quota: f64,
    pub other: f64,
    pub total: f64,
}

/// Variable cost block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableCosts {
    pub gasoline: f64,
    pub repairs: f64,
    pub platform_fee: f64,
    pub royalty: f64,
    pub total: f64,
}

/// Tax estimation block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxEstimate {
    pub iva_repercutido: f64,
    pub iva_soportado: f64,
    pub iva_a_pagar: f64,
    pub irpf_percent: f64,
    pub irpf_pago: f64,
    pub net_profit_post_tax: f64,
    /// Cash the franchise should set aside this month
    pub total_reserve: f64,
}

/// Operational metrics block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetrics {
    pub avg_ticket: f64,
    pub cost_per_order: f64,
    /// `None` renders as "N/A": no positive contribution margin
    pub break_even_orders: Option<i64>,
    pub profit_margin: f64,
    pub productivity: f64,
    pub revenue_per_hour: f64,
    pub cost_per_hour: f64,
    pub total_km: f64,
    pub revenue_per_km: f64,
    pub cost_per_km: f64,
    /// Orders per 100 km
    pub drop_density: f64,
    pub safety_margin: f64,
    pub labor_ratio: f64,
}

/// One expense line of the chartable breakdown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakdownItem {
    pub name: String,
    pub value: f64,
    /// "fixed" | "variable"
    pub kind: String,
}

/// The complete monthly report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseReport {
    pub fixed: FixedCosts,
    pub variable: VariableCosts,
    pub total_expenses: f64,
    pub net_profit: f64,
    pub taxes: TaxEstimate,
    pub metrics: ReportMetrics,
    pub breakdown: Vec<BreakdownItem>,
    pub revenue: f64,
    pub orders: i64,
}

/// Build the complete financial report for one month
pub fn calculate_expenses(revenue: f64, orders: i64, inputs: &ReportInputs) -> ExpenseReport {
    // Costs without VAT
    let salaries = inputs.salaries;
    let insurance = inputs.insurance;
    let quota = inputs.quota;

    // Costs with VAT (base amounts)
    let renting = inputs
        .renting_cost
        .filter(|c| *c > 0.0)
        .unwrap_or(inputs.moto_count * RENTING_PER_MOTO);
    let services = inputs.agency_fee + inputs.prl_fee + inputs.accounting_fee;
    let other = inputs.other_expenses + inputs.marketing + inputs.incidents;

    // Variable costs
    let platform_fee = inputs
        .platform_fee
        .unwrap_or(orders as f64 * PLATFORM_FEE_PER_ORDER);
    let royalty = revenue * (inputs.royalty_percent / 100.0);

    let fixed_total = salaries + renting + insurance + services + quota + other;
    let variable_total = platform_fee + royalty + inputs.gasoline + inputs.repairs;
    let computed_total = fixed_total + variable_total;

    // A manual total-expenses entry without a breakdown wins when larger
    let total_expenses = inputs
        .total_expenses
        .unwrap_or(0.0)
        .max(computed_total);

    let net_profit = revenue - total_expenses;

    // --- Tax estimation ---
    let taxable_base =
        renting + services + inputs.gasoline + inputs.repairs + platform_fee + royalty + other;
    let iva_soportado = taxable_base * IVA_RATE;
    let iva_repercutido = revenue * IVA_RATE;
    let iva_a_pagar = iva_repercutido - iva_soportado;

    let irpf_percent = inputs.irpf_percent.unwrap_or(DEFAULT_IRPF_PERCENT);
    let irpf_pago = if net_profit > 0.0 {
        net_profit * (irpf_percent / 100.0)
    } else {
        0.0
    };
    let net_profit_post_tax = net_profit - irpf_pago;

    // --- Metrics ---
    let total_hours = inputs.total_hours;
    let total_km = if inputs.gasoline_price > 0.0 {
        let litres = inputs.gasoline / inputs.gasoline_price;
        (litres * KM_PER_LITRE).max(0.0).round()
    } else {
        inputs.total_km.max(0.0)
    };

    let avg_ticket = if orders > 0 { revenue / orders as f64 } else { 0.0 };
    let variable_per_order = if orders > 0 {
        variable_total / orders as f64
    } else {
        0.0
    };
    let contribution_per_order = avg_ticket - variable_per_order;

    let break_even_orders = if contribution_per_order > 0.0 {
        Some((fixed_total / contribution_per_order).ceil() as i64)
    } else {
        None
    };
    let safety_margin = match break_even_orders {
        Some(be) if orders > 0 => ((orders - be) as f64 / orders as f64) * 100.0,
        _ => 0.0,
    };

    let metrics = ReportMetrics {
        avg_ticket,
        cost_per_order: if orders > 0 { total_expenses / orders as f64 } else { 0.0 },
        break_even_orders,
        profit_margin: if revenue > 0.0 { (net_profit / revenue) * 100.0 } else { 0.0 },
        productivity: if total_hours > 0.0 { orders as f64 / total_hours } else { 0.0 },
        revenue_per_hour: if total_hours > 0.0 { revenue / total_hours } else { 0.0 },
        cost_per_hour: if total_hours > 0.0 { total_expenses / total_hours } else { 0.0 },
        total_km,
        revenue_per_km: if total_km > 0.0 { revenue / total_km } else { 0.0 },
        cost_per_km: if total_km > 0.0 { total_expenses / total_km } else { 0.0 },
        drop_density: if total_km > 0.0 { (orders as f64 / total_km) * 100.0 } else { 0.0 },
        safety_margin,
        labor_ratio: if revenue > 0.0 { (salaries / revenue) * 100.0 } else { 0.0 },
    };

    let breakdown = vec![
        BreakdownItem { name: "Salarios".into(), value: salaries, kind: "fixed".into() },
        BreakdownItem { name: "Renting Motos".into(), value: renting, kind: "fixed".into() },
        BreakdownItem { name: "Seguros".into(), value: insurance, kind: "fixed".into() },
        BreakdownItem { name: "Gestoría".into(), value: inputs.agency_fee, kind: "fixed".into() },
        BreakdownItem { name: "PRL".into(), value: inputs.prl_fee, kind: "fixed".into() },
        BreakdownItem {
            name: "Contabilidad".into(),
            value: inputs.accounting_fee,
            kind: "fixed".into(),
        },
        BreakdownItem { name: "Cuota Autónomo".into(), value: quota, kind: "fixed".into() },
        BreakdownItem { name: "Marketing".into(), value: inputs.marketing, kind: "fixed".into() },
        BreakdownItem { name: "Mermas".into(), value: inputs.incidents, kind: "fixed".into() },
        BreakdownItem {
            name: "Otros Costes".into(),
            value: inputs.other_expenses,
            kind: "fixed".into(),
        },
        BreakdownItem { name: "Gasolina".into(), value: inputs.gasoline, kind: "variable".into() },
        BreakdownItem { name: "Reparaciones".into(), value: inputs.repairs, kind: "variable".into() },
        BreakdownItem { name: "Tarifa Plataforma".into(), value: platform_fee, kind: "variable".into() },
        BreakdownItem { name: "Royalty".into(), value: royalty, kind: "variable".into() },
    ];

    ExpenseReport {
        fixed: FixedCosts {
            salaries,
            renting,
            insurance,
            services,
            quota,
            other,
            total: round_money(fixed_total),
        },
        variable: VariableCosts {
            gasoline: inputs.gasoline,
            repairs: inputs.repairs,
            platform_fee,
            royalty: round_money(royalty),
            total: round_money(variable_total),
        },
        total_expenses: round_money(total_expenses),
        net_profit: round_money(net_profit),
        taxes: TaxEstimate {
            iva_repercutido: round_money(iva_repercutido),
            iva_soportado: round_money(iva_soportado),
            iva_a_pagar: round_money(iva_a_pagar),
            irpf_percent,
            irpf_pago: round_money(irpf_pago),
            net_profit_post_tax: round_money(net_profit_post_tax),
            total_reserve: round_money(iva_a_pagar + irpf_pago),
        },
        metrics,
        breakdown,
        revenue,
        orders,
    }
}

/// Convenience bridge into the break-even module using this report's split
pub fn report_break_even(report: &ExpenseReport) -> crate::finance::advisory::BreakEven {
    break_even(report.revenue, report.fixed.total, report.variable.total)
}
