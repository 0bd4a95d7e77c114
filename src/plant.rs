//! Plant economic parameters.

use serde::Deserialize;

use crate::error::ParameterError;

/// Hours per maintenance day.
pub const HOURS_PER_DAY: f64 = 24.0;

/// How the fuel cost of the plant is expressed.
///
/// Resolved once into a per-MWh figure by
/// [`PlantParameters::effective_fuel_cost_per_mwh`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FuelCostSpec {
    /// Fuel cost per MWh of electricity produced.
    PerMwh(f64),
    /// Total fuel cost of one refueling cycle.
    PerRefuelingCycle(f64),
}

impl FuelCostSpec {
    /// Builds the variant from the two mutually exclusive raw fields.
    ///
    /// # Errors
    ///
    /// Returns a `ParameterError` if both or neither are set.
    pub fn from_optional(
        per_mwh: Option<f64>,
        per_refueling: Option<f64>,
    ) -> Result<Self, ParameterError> {
        match (per_mwh, per_refueling) {
            (Some(cost), None) => Ok(Self::PerMwh(cost)),
            (None, Some(cost)) => Ok(Self::PerRefuelingCycle(cost)),
            (Some(_), Some(_)) => Err(ParameterError::new(
                "fuel_cost",
                "set exactly one of fuel_cost_per_mwh and fuel_cost_per_refueling, not both",
            )),
            (None, None) => Err(ParameterError::new(
                "fuel_cost",
                "one of fuel_cost_per_mwh or fuel_cost_per_refueling is required",
            )),
        }
    }
}

/// Placement of maintenance outages within the simulated window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaintenancePolicy {
    /// One contiguous outage at the start of the series.
    #[default]
    SingleBlock,
    /// An outage at the start of every refuel cycle, counted in hours from
    /// the first point of the series.
    EveryRefuelCycle,
}

/// Economic and operating parameters of one plant.
#[derive(Debug, Clone, PartialEq)]
pub struct PlantParameters {
    /// Nameplate capacity (MW, > 0).
    pub capacity_mw: f64,
    /// Fraction of nameplate dispatched outside maintenance (0.0–1.0).
    pub capacity_factor: f64,
    pub fuel_cost: FuelCostSpec,
    /// Length of a fuel cycle in hours.
    pub refuel_cycle_hours: Option<u32>,
    /// Length of one maintenance outage in days.
    pub maintenance_days: f64,
    pub maintenance_policy: MaintenancePolicy,
    /// Overnight construction cost, booked at period 0.
    pub construction_cost: Option<f64>,
    /// Discount rate as a decimal (0.05 = 5%).
    pub discount_rate: Option<f64>,
    pub plant_lifetime_years: Option<u32>,
    /// Fixed operation and maintenance cost per year.
    pub fixed_om_per_year: f64,
    /// Yearly fractional decline of operating profit (0.001 = 0.1%/yr).
    pub degradation_per_year: f64,
    /// Yearly growth of the fixed O&M cost from year 2 (0.02 = 2%/yr).
    pub fixed_om_escalation_per_year: f64,
    /// One-off cost paid in the final year of the lifetime.
    pub decommissioning_cost: f64,
    /// Value of the plant at the end of its lifetime, credited in LCOE.
    pub residual_value: f64,
}

impl PlantParameters {
    /// Creates parameters with no maintenance and no financial data.
    pub fn new(capacity_mw: f64, capacity_factor: f64, fuel_cost: FuelCostSpec) -> Self {
        Self {
            capacity_mw,
            capacity_factor,
            fuel_cost,
            refuel_cycle_hours: None,
            maintenance_days: 0.0,
            maintenance_policy: MaintenancePolicy::SingleBlock,
            construction_cost: None,
            discount_rate: None,
            plant_lifetime_years: None,
            fixed_om_per_year: 0.0,
            degradation_per_year: 0.0,
            fixed_om_escalation_per_year: 0.0,
            decommissioning_cost: 0.0,
            residual_value: 0.0,
        }
    }

    /// Energy delivered in one active hour (MWh).
    pub fn hourly_output_mwh(&self) -> f64 {
        self.capacity_mw * self.capacity_factor
    }

    /// Length of one maintenance outage in whole hours.
    pub fn maintenance_hours(&self) -> usize {
        (self.maintenance_days * HOURS_PER_DAY).round() as usize
    }

    /// Checks the operating parameters.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ParameterError> {
        if !self.capacity_mw.is_finite() || self.capacity_mw <= 0.0 {
            return Err(ParameterError::new(
                "capacity_mw",
                format!("must be a positive number, got {}", self.capacity_mw),
            ));
        }
        if !(0.0..=1.0).contains(&self.capacity_factor) {
            return Err(ParameterError::new(
                "capacity_factor",
                format!("must be within [0, 1], got {}", self.capacity_factor),
            ));
        }
        if !self.maintenance_days.is_finite() || self.maintenance_days < 0.0 {
            return Err(ParameterError::new(
                "maintenance_days",
                format!("must be non-negative, got {}", self.maintenance_days),
            ));
        }
        if self.refuel_cycle_hours == Some(0) {
            return Err(ParameterError::new("refuel_cycle_hours", "must be > 0"));
        }
        let needs_cycle = matches!(self.fuel_cost, FuelCostSpec::PerRefuelingCycle(_))
            || self.maintenance_policy == MaintenancePolicy::EveryRefuelCycle;
        if needs_cycle && self.refuel_cycle_hours.is_none() {
            return Err(ParameterError::new(
                "refuel_cycle_hours",
                "required when fuel cost is given per refueling or maintenance follows the refuel cycle",
            ));
        }
        Ok(())
    }

    /// Resolves the fuel cost into currency per MWh.
    ///
    /// A refueling-cycle cost is spread over the energy produced in one cycle:
    /// `cost / (capacity_mw * capacity_factor * refuel_cycle_hours)`.
    ///
    /// # Errors
    ///
    /// Returns a `ParameterError` if the cycle length is missing or the cycle
    /// produces no energy.
    pub fn effective_fuel_cost_per_mwh(&self) -> Result<f64, ParameterError> {
        match self.fuel_cost {
            FuelCostSpec::PerMwh(cost) => Ok(cost),
            FuelCostSpec::PerRefuelingCycle(cost) => {
                let hours = self.refuel_cycle_hours.ok_or_else(|| {
                    ParameterError::new(
                        "refuel_cycle_hours",
                        "required when fuel cost is given per refueling",
                    )
                })?;
                let energy_per_cycle = self.hourly_output_mwh() * f64::from(hours);
                if energy_per_cycle <= 0.0 {
                    return Err(ParameterError::new(
                        "fuel_cost_per_refueling",
                        "cannot be converted to a per-MWh cost when a cycle produces no energy",
                    ));
                }
                Ok(cost / energy_per_cycle)
            }
        }
    }
}
