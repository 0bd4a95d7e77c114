//! Simulation output records.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Complete record of one simulated hour.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyResult {
    pub timestamp: DateTime<Utc>,
    /// Market price for the hour (currency/MWh).
    pub price: f64,
    /// Energy sold to the market (MWh).
    pub dispatched_mwh: f64,
    /// `price * dispatched_mwh`.
    pub revenue: f64,
    /// `dispatched_mwh * effective fuel cost`.
    pub fuel_cost: f64,
    /// `revenue - fuel_cost`.
    pub profit: f64,
    /// Whether the plant was offline for maintenance.
    pub in_maintenance: bool,
}

impl HourlyResult {
    /// An hour spent offline: nothing dispatched, earned, or burned.
    pub fn offline(timestamp: DateTime<Utc>, price: f64) -> Self {
        Self {
            timestamp,
            price,
            dispatched_mwh: 0.0,
            revenue: 0.0,
            fuel_cost: 0.0,
            profit: 0.0,
            in_maintenance: true,
        }
    }
}

impl fmt::Display for HourlyResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | price={:>8.2}  mwh={:>9.2}  revenue={:>12.2}  fuel={:>12.2}  profit={:>12.2}{}",
            self.timestamp.format("%Y-%m-%d %H:%M"),
            self.price,
            self.dispatched_mwh,
            self.revenue,
            self.fuel_cost,
            self.profit,
            if self.in_maintenance { "  [maint]" } else { "" },
        )
    }
}

/// Result of one simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationSummary {
    /// Sum of all hourly profits.
    pub total_profit: f64,
    /// Fuel cost per MWh after resolving the fuel-cost form.
    pub effective_fuel_cost_per_mwh: f64,
    /// One record per input price point, in input order.
    pub hourly_results: Vec<HourlyResult>,
}

impl SimulationSummary {
    /// Number of simulated hours.
    pub fn hours(&self) -> usize {
        self.hourly_results.len()
    }

    pub fn total_energy_mwh(&self) -> f64 {
        self.hourly_results.iter().map(|r| r.dispatched_mwh).sum()
    }

    pub fn total_revenue(&self) -> f64 {
        self.hourly_results.iter().map(|r| r.revenue).sum()
    }

    pub fn total_fuel_cost(&self) -> f64 {
        self.hourly_results.iter().map(|r| r.fuel_cost).sum()
    }

    pub fn maintenance_hours(&self) -> usize {
        self.hourly_results
            .iter()
            .filter(|r| r.in_maintenance)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn hour(profit: f64, in_maintenance: bool) -> HourlyResult {
        HourlyResult {
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            price: 50.0,
            dispatched_mwh: if in_maintenance { 0.0 } else { 10.0 },
            revenue: if in_maintenance { 0.0 } else { 500.0 },
            fuel_cost: if in_maintenance { 0.0 } else { 500.0 - profit },
            profit,
            in_maintenance,
        }
    }

    #[test]
    fn summary_aggregates() {
        let summary = SimulationSummary {
            total_profit: 700.0,
            effective_fuel_cost_per_mwh: 10.0,
            hourly_results: vec![hour(400.0, false), hour(0.0, true), hour(300.0, false)],
        };
        assert_eq!(summary.hours(), 3);
        assert_eq!(summary.total_energy_mwh(), 20.0);
        assert_eq!(summary.total_revenue(), 1000.0);
        assert_eq!(summary.total_fuel_cost(), 300.0);
        assert_eq!(summary.maintenance_hours(), 1);
    }

    #[test]
    fn offline_hour_is_all_zero() {
        let r = HourlyResult::offline(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(), 80.0);
        assert_eq!(r.dispatched_mwh, 0.0);
        assert_eq!(r.revenue, 0.0);
        assert_eq!(r.fuel_cost, 0.0);
        assert_eq!(r.profit, 0.0);
        assert!(r.in_maintenance);
    }

    #[test]
    fn display_marks_maintenance() {
        let s = format!("{}", hour(0.0, true));
        assert!(s.contains("[maint]"));
        let s = format!("{}", hour(10.0, false));
        assert!(!s.contains("[maint]"));
    }
}
