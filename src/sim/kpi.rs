//! Post-hoc operating indicators computed from simulation results.

use std::fmt;

use super::types::HourlyResult;

/// Aggregate operating indicators derived from a complete simulation run.
///
/// Computed post-hoc from the hourly records so that reported figures always
/// agree with the per-hour data.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationReport {
    /// Simulated hours.
    pub hours: usize,
    /// Hours offline for maintenance.
    pub maintenance_hours: usize,
    /// Total energy sold (MWh).
    pub energy_mwh: f64,
    pub revenue: f64,
    pub fuel_cost: f64,
    pub profit: f64,
    /// Revenue divided by energy sold (currency/MWh).
    pub realized_price: f64,
    /// Availability: share of hours not spent in maintenance.
    pub availability: f64,
    /// Hours where the market price did not cover the fuel cost.
    pub loss_hours: usize,
}

impl OperationReport {
    /// Computes all indicators from the hourly records.
    pub fn from_results(results: &[HourlyResult]) -> Self {
        if results.is_empty() {
            return Self {
                hours: 0,
                maintenance_hours: 0,
                energy_mwh: 0.0,
                revenue: 0.0,
                fuel_cost: 0.0,
                profit: 0.0,
                realized_price: 0.0,
                availability: 0.0,
                loss_hours: 0,
            };
        }

        let mut maintenance_hours = 0_usize;
        let mut loss_hours = 0_usize;
        let mut energy = 0.0_f64;
        let mut revenue = 0.0_f64;
        let mut fuel_cost = 0.0_f64;
        let mut profit = 0.0_f64;

        for r in results {
            if r.in_maintenance {
                maintenance_hours += 1;
            } else if r.profit < 0.0 {
                loss_hours += 1;
            }
            energy += r.dispatched_mwh;
            revenue += r.revenue;
            fuel_cost += r.fuel_cost;
            profit += r.profit;
        }

        let hours = results.len();
        let realized_price = if energy > 0.0 { revenue / energy } else { 0.0 };

        Self {
            hours,
            maintenance_hours,
            energy_mwh: energy,
            revenue,
            fuel_cost,
            profit,
            realized_price,
            availability: (hours - maintenance_hours) as f64 / hours as f64,
            loss_hours,
        }
    }
}

impl fmt::Display for OperationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Operation Report ---")?;
        writeln!(
            f,
            "Simulated hours:       {} ({} in maintenance, {:.1}% available)",
            self.hours,
            self.maintenance_hours,
            self.availability * 100.0
        )?;
        writeln!(f, "Energy sold:           {:.2} MWh", self.energy_mwh)?;
        writeln!(f, "Realized price:        {:.2} /MWh", self.realized_price)?;
        writeln!(f, "Revenue:               {:.2}", self.revenue)?;
        writeln!(f, "Fuel cost:             {:.2}", self.fuel_cost)?;
        writeln!(f, "Loss-making hours:     {}", self.loss_hours)?;
        write!(f, "Total profit:          {:.2}", self.profit)
    }
}
