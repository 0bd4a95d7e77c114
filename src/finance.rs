//! Investment metrics over yearly cash flows.
//!
//! Cash flows are indexed by period (years), with the construction cost at
//! period 0 and operating years from 1. Discounting is `amount / (1 + r)^period`.

use std::fmt;

use tracing::info;

use crate::error::ParameterError;
use crate::plant::PlantParameters;
use crate::sim::SimulationSummary;

/// Hours in a non-leap year, used to annualize a simulated window.
pub const HOURS_PER_YEAR: f64 = 8760.0;

/// IRR search range (decimal rates).
const IRR_MIN_RATE: f64 = -0.99;
const IRR_MAX_RATE: f64 = 10.0;
/// Scan points used to bracket a sign change of NPV.
const IRR_SCAN_STEPS: usize = 2000;
const IRR_TOLERANCE: f64 = 1e-12;
const IRR_MAX_BISECTIONS: usize = 200;

/// One cash-flow entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CashFlow {
    pub period: u32,
    pub amount: f64,
}

impl CashFlow {
    pub fn new(period: u32, amount: f64) -> Self {
        Self { period, amount }
    }
}

fn require_lifetime(params: &PlantParameters) -> Result<u32, ParameterError> {
    match params.plant_lifetime_years {
        Some(0) => Err(ParameterError::new("plant_lifetime_years", "must be > 0")),
        Some(years) => Ok(years),
        None => Err(ParameterError::new(
            "plant_lifetime_years",
            "required to build lifetime cash flows",
        )),
    }
}

/// Scales a simulated window to a yearly figure.
fn annualize(amount: f64, hours: usize) -> f64 {
    if hours == 0 {
        0.0
    } else {
        amount * HOURS_PER_YEAR / hours as f64
    }
}

/// Fixed O&M cost of operating `year` (1-based), escalated from year 2.
fn fixed_om_in_year(params: &PlantParameters, year: u32) -> f64 {
    params.fixed_om_per_year * (1.0 + params.fixed_om_escalation_per_year).powi(year as i32 - 1)
}

/// Lifetime cash flows of the plant.
///
/// The simulated window is taken as representative: its profit is scaled to
/// a year (`total_profit * 8760 / hours`) and repeated for every year of
/// `plant_lifetime_years`, reduced by `degradation_per_year` compounding
/// from year 2. Each year also pays `fixed_om_per_year`, which grows by
/// `fixed_om_escalation_per_year` from year 2, and the final year pays the
/// decommissioning cost. Period 0 holds the negative construction cost
/// (zero when unset).
///
/// # Arguments
///
/// * `summary` - Simulated window standing in for one operating year
/// * `params` - Plant parameters carrying the lifetime economics
///
/// # Errors
///
/// Returns a `ParameterError` if `plant_lifetime_years` is missing or zero.
pub fn build_cash_flows(
    summary: &SimulationSummary,
    params: &PlantParameters,
) -> Result<Vec<CashFlow>, ParameterError> {
    let lifetime = require_lifetime(params)?;
    let annual_profit = annualize(summary.total_profit, summary.hours());
    let construction = params.construction_cost.unwrap_or(0.0);

    let mut flows = Vec::with_capacity(lifetime as usize + 1);
    flows.push(CashFlow::new(0, -construction));
    for year in 1..=lifetime {
        let retained = (1.0 - params.degradation_per_year).powi(year as i32 - 1);
        let mut amount = annual_profit * retained - fixed_om_in_year(params, year);
        if year == lifetime {
            amount -= params.decommissioning_cost;
        }
        flows.push(CashFlow::new(year, amount));
    }
    Ok(flows)
}

/// Net present value. At a zero rate this is the plain sum of amounts.
///
/// # Arguments
///
/// * `cash_flows` - Amounts keyed by period, discounted by `(1 + r)^period`
/// * `discount_rate` - Rate per period
pub fn npv(cash_flows: &[CashFlow], discount_rate: f64) -> f64 {
    cash_flows
        .iter()
        .map(|cf| cf.amount / (1.0 + discount_rate).powi(cf.period as i32))
        .sum()
}

/// Internal rate of return, or `None` if NPV has no sign change over
/// `[-0.99, 10.0]`.
///
/// NPV is scanned on a grid to bracket the lowest-rate root, which is then
/// refined by bisection.
///
/// Flows without both a positive and a negative amount (including an empty
/// or all-zero list) have no rate that balances them and yield `None`.
pub fn irr(cash_flows: &[CashFlow]) -> Option<f64> {
    let has_inflow = cash_flows.iter().any(|cf| cf.amount > 0.0);
    let has_outflow = cash_flows.iter().any(|cf| cf.amount < 0.0);
    if !(has_inflow && has_outflow) {
        return None;
    }

    let step = (IRR_MAX_RATE - IRR_MIN_RATE) / IRR_SCAN_STEPS as f64;
    let mut lo = IRR_MIN_RATE;
    let mut f_lo = npv(cash_flows, lo);
    if f_lo == 0.0 {
        return Some(lo);
    }

    for i in 1..=IRR_SCAN_STEPS {
        let hi = IRR_MIN_RATE + step * i as f64;
        let f_hi = npv(cash_flows, hi);
        if f_hi == 0.0 {
            return Some(hi);
        }
        if f_lo.is_finite() && f_hi.is_finite() && f_lo.signum() != f_hi.signum() {
            return Some(bisect(cash_flows, lo, hi, f_lo));
        }
        lo = hi;
        f_lo = f_hi;
    }
    None
}

fn bisect(cash_flows: &[CashFlow], mut lo: f64, mut hi: f64, mut f_lo: f64) -> f64 {
    for _ in 0..IRR_MAX_BISECTIONS {
        let mid = 0.5 * (lo + hi);
        let f_mid = npv(cash_flows, mid);
        if f_mid == 0.0 || (hi - lo) < IRR_TOLERANCE {
            return mid;
        }
        if f_mid.signum() == f_lo.signum() {
            lo = mid;
            f_lo = f_mid;
        } else {
            hi = mid;
        }
    }
    0.5 * (lo + hi)
}

/// First period whose cumulative undiscounted cash flow is non-negative.
pub fn payback_period(cash_flows: &[CashFlow]) -> Option<u32> {
    first_recovery(cash_flows.iter().map(|cf| (cf.period, cf.amount)))
}

/// First period whose cumulative discounted cash flow is non-negative.
pub fn discounted_payback_period(cash_flows: &[CashFlow], discount_rate: f64) -> Option<u32> {
    first_recovery(cash_flows.iter().map(|cf| {
        (
            cf.period,
            cf.amount / (1.0 + discount_rate).powi(cf.period as i32),
        )
    }))
}

fn first_recovery(flows: impl Iterator<Item = (u32, f64)>) -> Option<u32> {
    let mut cumulative = 0.0;
    for (period, amount) in flows {
        cumulative += amount;
        if cumulative >= 0.0 {
            return Some(period);
        }
    }
    None
}

/// Levelized cost of energy (currency/MWh).
///
/// Discounted lifetime cost (construction at period 0, then yearly fuel and
/// escalating fixed O&M, with decommissioning in the final year) divided by
/// discounted lifetime energy. The discounted residual value at the end of
/// the lifetime is credited against costs. Yearly fuel and energy are
/// annualized from the simulated window and degrade like profit. `None`
/// when the plant produces no energy.
///
/// # Arguments
///
/// * `summary` - Simulated window standing in for one operating year
/// * `params` - Plant parameters carrying the lifetime economics
/// * `discount_rate` - Rate applied to both costs and energy
///
/// # Errors
///
/// Returns a `ParameterError` if `plant_lifetime_years` is missing or zero.
pub fn lcoe(
    summary: &SimulationSummary,
    params: &PlantParameters,
    discount_rate: f64,
) -> Result<Option<f64>, ParameterError> {
    let lifetime = require_lifetime(params)?;
    let annual_energy = annualize(summary.total_energy_mwh(), summary.hours());
    let annual_fuel = annualize(summary.total_fuel_cost(), summary.hours());

    let mut costs = params.construction_cost.unwrap_or(0.0);
    let mut energy = 0.0;
    for year in 1..=lifetime {
        let discount = (1.0 + discount_rate).powi(year as i32);
        let retained = (1.0 - params.degradation_per_year).powi(year as i32 - 1);
        let mut year_cost = annual_fuel * retained + fixed_om_in_year(params, year);
        if year == lifetime {
            year_cost += params.decommissioning_cost;
        }
        costs += year_cost / discount;
        energy += annual_energy * retained / discount;
    }
    costs -= params.residual_value / (1.0 + discount_rate).powi(lifetime as i32);

    if energy <= 0.0 {
        return Ok(None);
    }
    Ok(Some(costs / energy))
}

/// Headline investment metrics of one plant.
#[derive(Debug, Clone, PartialEq)]
pub struct FinancialSummary {
    pub npv: f64,
    /// `None` when NPV never changes sign.
    pub irr: Option<f64>,
    /// Years until cumulative cash flow is non-negative; `None` if never.
    pub payback_period: Option<u32>,
    pub discounted_payback_period: Option<u32>,
    /// Levelized cost of energy; `None` when no energy is produced.
    pub lcoe: Option<f64>,
    pub cash_flows: Vec<CashFlow>,
}

impl FinancialSummary {
    /// Builds the cash flows of `summary` and evaluates every metric.
    ///
    /// # Arguments
    ///
    /// * `summary` - Simulated window standing in for one operating year
    /// * `params` - Plant parameters; `discount_rate` and
    ///   `plant_lifetime_years` must be set
    ///
    /// # Errors
    ///
    /// Returns a `ParameterError` if `discount_rate` or
    /// `plant_lifetime_years` is missing.
    pub fn evaluate(
        summary: &SimulationSummary,
        params: &PlantParameters,
    ) -> Result<Self, ParameterError> {
        let rate = params.discount_rate.ok_or_else(|| {
            ParameterError::new("discount_rate", "required for financial metrics")
        })?;
        if !rate.is_finite() || rate <= -1.0 {
            return Err(ParameterError::new(
                "discount_rate",
                format!("must be greater than -1, got {rate}"),
            ));
        }
        let cash_flows = build_cash_flows(summary, params)?;
        let result = Self {
            npv: npv(&cash_flows, rate),
            irr: irr(&cash_flows),
            payback_period: payback_period(&cash_flows),
            discounted_payback_period: discounted_payback_period(&cash_flows, rate),
            lcoe: lcoe(summary, params, rate)?,
            cash_flows,
        };
        info!(
            npv = result.npv,
            irr = ?result.irr,
            payback = ?result.payback_period,
            "financial metrics evaluated"
        );
        Ok(result)
    }
}

fn fmt_years(period: Option<u32>) -> String {
    period.map_or_else(|| "not reached".to_string(), |p| format!("{p} years"))
}

impl fmt::Display for FinancialSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Financial Summary ---")?;
        writeln!(f, "Net present value:     {:.2}", self.npv)?;
        match self.irr {
            Some(rate) => writeln!(f, "Internal rate of return: {:.2}%", rate * 100.0)?,
            None => writeln!(f, "Internal rate of return: undefined")?,
        }
        writeln!(f, "Payback period:        {}", fmt_years(self.payback_period))?;
        writeln!(
            f,
            "Discounted payback:    {}",
            fmt_years(self.discounted_payback_period)
        )?;
        match self.lcoe {
            Some(cost) => write!(f, "LCOE:                  {cost:.2} /MWh"),
            None => write!(f, "LCOE:                  undefined (no energy produced)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plant::FuelCostSpec;
    use crate::series::PriceSeries;
    use crate::sim::{HourlyResult, simulate};
    use chrono::{Duration, TimeZone, Utc};

    fn flows(amounts: &[f64]) -> Vec<CashFlow> {
        amounts
            .iter()
            .enumerate()
            .map(|(i, &a)| CashFlow::new(i as u32, a))
            .collect()
    }

    fn summary(hours: usize, profit_per_hour: f64, mwh_per_hour: f64) -> SimulationSummary {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let hourly_results: Vec<HourlyResult> = (0..hours)
            .map(|h| HourlyResult {
                timestamp: start + Duration::hours(h as i64),
                price: 0.0,
                dispatched_mwh: mwh_per_hour,
                revenue: profit_per_hour + 5.0 * mwh_per_hour,
                fuel_cost: 5.0 * mwh_per_hour,
                profit: profit_per_hour,
                in_maintenance: false,
            })
            .collect();
        SimulationSummary {
            total_profit: profit_per_hour * hours as f64,
            effective_fuel_cost_per_mwh: 5.0,
            hourly_results,
        }
    }

    fn params(lifetime: u32, construction: f64, rate: f64) -> PlantParameters {
        let mut p = PlantParameters::new(100.0, 1.0, FuelCostSpec::PerMwh(5.0));
        p.plant_lifetime_years = Some(lifetime);
        p.construction_cost = Some(construction);
        p.discount_rate = Some(rate);
        p
    }

    #[test]
    fn npv_at_zero_rate_is_plain_sum() {
        let cfs = flows(&[-100.0, 60.0, 60.0, 12.5]);
        assert_eq!(npv(&cfs, 0.0), 32.5);
    }

    #[test]
    fn npv_discounts_by_period() {
        let cfs = flows(&[-100.0, 60.0, 60.0]);
        let expected = -100.0 + 60.0 / 1.1 + 60.0 / 1.1_f64.powi(2);
        assert!((npv(&cfs, 0.1) - expected).abs() < 1e-9);
    }

    #[test]
    fn irr_two_period() {
        let rate = irr(&flows(&[-1000.0, 1100.0])).unwrap();
        assert!((rate - 0.10).abs() < 1e-6, "irr={rate}");
    }

    #[test]
    fn irr_zeroes_npv() {
        let cfs = flows(&[-500.0, 120.0, 150.0, 180.0, 200.0]);
        let rate = irr(&cfs).unwrap();
        assert!(npv(&cfs, rate).abs() < 1e-6);
    }

    #[test]
    fn irr_undefined_without_sign_change() {
        assert_eq!(irr(&flows(&[100.0, 50.0])), None);
        assert_eq!(irr(&flows(&[-100.0, -50.0])), None);
    }

    #[test]
    fn irr_undefined_for_empty_flows() {
        assert_eq!(irr(&[]), None);
    }

    #[test]
    fn irr_undefined_for_all_zero_flows() {
        assert_eq!(irr(&flows(&[0.0, 0.0, 0.0])), None);
        assert_eq!(irr(&flows(&[0.0, 50.0, 0.0])), None);
    }

    #[test]
    fn payback_first_non_negative_period() {
        assert_eq!(payback_period(&flows(&[-100.0, 40.0, 40.0, 40.0])), Some(3));
        assert_eq!(payback_period(&flows(&[-100.0, 50.0, 50.0])), Some(2));
        assert_eq!(payback_period(&flows(&[-100.0, 10.0])), None);
    }

    #[test]
    fn discounted_payback_is_later() {
        let cfs = flows(&[-100.0, 40.0, 40.0, 40.0]);
        assert_eq!(discounted_payback_period(&cfs, 0.05), Some(3));
        assert_eq!(discounted_payback_period(&cfs, 0.10), None);
    }

    #[test]
    fn cash_flows_annualize_window() {
        // 24 hours at 10/hour -> 240/day -> 87_600/year.
        let cfs = build_cash_flows(&summary(24, 10.0, 1.0), &params(3, 1000.0, 0.0)).unwrap();
        assert_eq!(cfs.len(), 4);
        assert_eq!(cfs[0], CashFlow::new(0, -1000.0));
        assert!(cfs[1..].iter().all(|cf| (cf.amount - 87_600.0).abs() < 1e-6));
        assert_eq!(cfs[3].period, 3);
    }

    #[test]
    fn cash_flows_apply_degradation_and_om() {
        let mut p = params(2, 0.0, 0.0);
        p.degradation_per_year = 0.5;
        p.fixed_om_per_year = 100.0;
        let cfs = build_cash_flows(&summary(8760, 1.0, 1.0), &p).unwrap();
        assert_eq!(cfs[1].amount, 8660.0);
        assert_eq!(cfs[2].amount, 4280.0);
    }

    #[test]
    fn cash_flows_escalate_fixed_om() {
        let mut p = params(3, 0.0, 0.0);
        p.fixed_om_per_year = 100.0;
        p.fixed_om_escalation_per_year = 0.1;
        let cfs = build_cash_flows(&summary(8760, 1.0, 1.0), &p).unwrap();
        assert!((cfs[1].amount - 8660.0).abs() < 1e-9);
        assert!((cfs[2].amount - 8650.0).abs() < 1e-9);
        assert!((cfs[3].amount - 8639.0).abs() < 1e-9);
    }

    #[test]
    fn cash_flows_charge_decommissioning_in_final_year() {
        let mut p = params(2, 0.0, 0.0);
        p.decommissioning_cost = 500.0;
        let cfs = build_cash_flows(&summary(8760, 1.0, 1.0), &p).unwrap();
        assert_eq!(cfs[1].amount, 8760.0);
        assert_eq!(cfs[2].amount, 8260.0);
    }

    #[test]
    fn cash_flows_require_lifetime() {
        let mut p = params(1, 0.0, 0.0);
        p.plant_lifetime_years = None;
        assert!(build_cash_flows(&summary(24, 1.0, 1.0), &p).is_err());
    }

    #[test]
    fn lcoe_flat_costs() {
        // No construction: LCOE equals the fuel cost per MWh.
        let value = lcoe(&summary(24, 10.0, 2.0), &params(5, 0.0, 0.07), 0.07).unwrap();
        assert!((value.unwrap() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn lcoe_credits_residual_value() {
        // 5 years of 87_600 fuel over 17_520 MWh; residual refunds one year.
        let mut p = params(5, 0.0, 0.0);
        p.residual_value = 87_600.0;
        let value = lcoe(&summary(24, 10.0, 2.0), &p, 0.0).unwrap();
        assert!((value.unwrap() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn lcoe_discounts_residual_value_from_final_year() {
        let mut p = params(2, 0.0, 0.1);
        p.residual_value = 121.0;
        let base = lcoe(&summary(8760, 0.0, 1.0), &params(2, 0.0, 0.1), 0.1)
            .unwrap()
            .unwrap();
        let with_residual = lcoe(&summary(8760, 0.0, 1.0), &p, 0.1).unwrap().unwrap();
        let energy = 8760.0 / 1.1 + 8760.0 / 1.21;
        assert!((base - with_residual - 100.0 / energy).abs() < 1e-9);
    }

    #[test]
    fn lcoe_includes_escalation_and_decommissioning() {
        let mut p = params(2, 0.0, 0.0);
        p.fixed_om_per_year = 8760.0;
        p.fixed_om_escalation_per_year = 1.0;
        p.decommissioning_cost = 8760.0;
        // Fuel 5/MWh plus O&M 1 then 2 per MWh plus 1 per MWh in the final year.
        let value = lcoe(&summary(8760, 0.0, 1.0), &p, 0.0).unwrap();
        assert!((value.unwrap() - 7.0).abs() < 1e-9);
    }

    #[test]
    fn lcoe_undefined_without_energy() {
        let value = lcoe(&summary(24, 0.0, 0.0), &params(5, 1e6, 0.07), 0.07).unwrap();
        assert_eq!(value, None);
    }

    #[test]
    fn evaluate_requires_discount_rate() {
        let mut p = params(5, 1000.0, 0.05);
        p.discount_rate = None;
        let err = FinancialSummary::evaluate(&summary(24, 1.0, 1.0), &p);
        assert_eq!(err.map_err(|e| e.field), Err("discount_rate"));
    }

    #[test]
    fn evaluate_fills_all_metrics() {
        let fs = FinancialSummary::evaluate(&summary(8760, 1.0, 1.0), &params(3, 10_000.0, 0.0))
            .unwrap();
        assert_eq!(fs.npv, -10_000.0 + 3.0 * 8760.0);
        assert_eq!(fs.payback_period, Some(2));
        assert!(fs.irr.is_some());
        assert!(fs.lcoe.is_some());
        let text = fs.to_string();
        assert!(text.contains("Net present value"));
    }

    #[test]
    fn evaluate_idle_plant_has_no_irr() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let prices = PriceSeries::hourly(start, &[50.0; 48]);
        let mut p = PlantParameters::new(100.0, 0.0, FuelCostSpec::PerMwh(5.0));
        p.plant_lifetime_years = Some(10);
        p.discount_rate = Some(0.05);

        let fs = FinancialSummary::evaluate(&simulate(&prices, &p).unwrap(), &p).unwrap();
        assert!(fs.cash_flows.iter().all(|cf| cf.amount == 0.0));
        assert_eq!(fs.npv, 0.0);
        assert_eq!(fs.irr, None);
        assert_eq!(fs.lcoe, None);
    }
}
