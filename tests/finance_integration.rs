//! Simulation results flowing into investment metrics.

mod common;

use plant_sim::config::PlantConfig;
use plant_sim::finance::{CashFlow, FinancialSummary, build_cash_flows, irr, npv};
use plant_sim::sim::simulate;

use common::{financed_plant, flat_prices, reference_plant};

#[test]
fn npv_at_zero_rate_is_plain_sum() {
    let flows = vec![
        CashFlow::new(0, -5_000.0),
        CashFlow::new(1, 1_250.5),
        CashFlow::new(2, 2_000.0),
        CashFlow::new(3, 3_100.25),
    ];
    let sum: f64 = flows.iter().map(|cf| cf.amount).sum();
    assert_eq!(npv(&flows, 0.0), sum);
}

#[test]
fn irr_of_ten_percent_project() {
    let flows = vec![CashFlow::new(0, -1000.0), CashFlow::new(1, 1100.0)];
    let rate = irr(&flows).unwrap();
    assert!((rate - 0.10).abs() < 1e-6, "irr={rate}");
}

#[test]
fn flat_year_builds_level_cash_flows() {
    // One simulated week stands in for a year: 40 * 1000 per hour, 8760 hours.
    let params = financed_plant(1.0e9, 0.05, 20);
    let summary = simulate(&flat_prices(24 * 7, 50.0), &params).unwrap();
    let flows = build_cash_flows(&summary, &params).unwrap();

    assert_eq!(flows.len(), 21);
    assert_eq!(flows[0].amount, -1.0e9);
    let annual = 40_000.0 * 8760.0;
    assert!(flows[1..].iter().all(|cf| (cf.amount - annual).abs() < 1e-3));
}

#[test]
fn evaluate_is_consistent_with_its_parts() {
    let params = financed_plant(1.0e9, 0.05, 20);
    let summary = simulate(&flat_prices(24 * 7, 50.0), &params).unwrap();
    let fin = FinancialSummary::evaluate(&summary, &params).unwrap();

    assert!((fin.npv - npv(&fin.cash_flows, 0.05)).abs() < 1e-6);
    let rate = fin.irr.unwrap();
    assert!(rate > 0.05, "profitable plant should beat its discount rate");
    assert!(npv(&fin.cash_flows, rate).abs() < 1.0);

    // 1e9 / 350.4e6 per year: recovered in year 3.
    assert_eq!(fin.payback_period, Some(3));
    assert!(fin.discounted_payback_period.unwrap() >= 3);
    assert!((fin.lcoe.unwrap() - lcoe_reference(1.0e9, 0.05, 20)).abs() < 1e-6);
}

fn lcoe_reference(construction: f64, rate: f64, years: u32) -> f64 {
    let annual_energy = 1000.0 * 8760.0;
    let annual_fuel = 10.0 * annual_energy;
    let mut costs = construction;
    let mut energy = 0.0;
    for year in 1..=years {
        let d = (1.0_f64 + rate).powi(year as i32);
        costs += annual_fuel / d;
        energy += annual_energy / d;
    }
    costs / energy
}

#[test]
fn unprofitable_plant_never_pays_back() {
    let params = financed_plant(1.0e9, 0.05, 10);
    let summary = simulate(&flat_prices(48, 5.0), &params).unwrap();
    let fin = FinancialSummary::evaluate(&summary, &params).unwrap();

    assert!(fin.npv < 0.0);
    assert_eq!(fin.irr, None);
    assert_eq!(fin.payback_period, None);
    assert_eq!(fin.discounted_payback_period, None);
}

#[test]
fn missing_lifetime_is_a_parameter_error() {
    let params = reference_plant();
    let summary = simulate(&flat_prices(24, 50.0), &params).unwrap();
    assert!(FinancialSummary::evaluate(&summary, &params).is_err());
}

#[test]
fn example_plant_evaluates_over_synthetic_year() {
    let cfg = PlantConfig::example();
    let params = cfg.to_parameters().unwrap();
    let m = &cfg.market;
    let prices = m.generator().generate(m.start, m.hours, m.seed);

    let summary = simulate(&prices, &params).unwrap();
    assert_eq!(summary.hours(), 8760);
    assert_eq!(summary.maintenance_hours(), 720);

    let fin = FinancialSummary::evaluate(&summary, &params).unwrap();
    assert_eq!(fin.cash_flows.len(), 61);
    assert!(fin.lcoe.is_some());
    assert!(fin.to_string().contains("Net present value:"));
}
