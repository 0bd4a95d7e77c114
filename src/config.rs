//! TOML-based plant configuration and the bundled example plant.

use std::fs;
use std::path::Path;

use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use thiserror::Error;

use crate::error::ParameterError;
use crate::plant::{FuelCostSpec, MaintenancePolicy, PlantParameters};
use crate::synthetic::SyntheticPrices;

/// Top-level plant configuration parsed from TOML.
///
/// All sections have defaults matching the bundled example plant
/// (`params/example_plant.toml`). Load from TOML with
/// [`PlantConfig::from_toml_file`] or use [`PlantConfig::example`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlantConfig {
    /// Capacity and dispatch.
    #[serde(default)]
    pub plant: PlantSection,
    /// Fuel cost and refuel cycle.
    #[serde(default)]
    pub fuel: FuelSection,
    /// Maintenance outages.
    #[serde(default)]
    pub maintenance: MaintenanceSection,
    /// Construction cost and discounting.
    #[serde(default)]
    pub finance: FinanceSection,
    /// Synthetic market used when no price file is given.
    #[serde(default)]
    pub market: MarketSection,
}

/// Capacity and dispatch.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlantSection {
    /// Nameplate capacity (MW).
    pub capacity_mw: f64,
    /// Fraction of nameplate dispatched outside maintenance (0.0–1.0).
    pub capacity_factor: f64,
}

impl Default for PlantSection {
    fn default() -> Self {
        Self {
            capacity_mw: 1000.0,
            capacity_factor: 0.9,
        }
    }
}

/// Fuel cost, given either per MWh or per refueling cycle.
///
/// Fields left out of a `[fuel]` table are unset rather than taken from the
/// example, so exactly one cost field can be written.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FuelSection {
    pub cost_per_mwh: Option<f64>,
    pub cost_per_refueling: Option<f64>,
    /// Length of one fuel cycle (hours).
    pub refuel_cycle_hours: Option<u32>,
}

impl Default for FuelSection {
    fn default() -> Self {
        Self {
            cost_per_mwh: Some(10.0),
            cost_per_refueling: None,
            refuel_cycle_hours: Some(12_960),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MaintenanceSection {
    /// Length of one outage (days).
    pub days: f64,
    /// `"single_block"` or `"every_refuel_cycle"`.
    pub policy: MaintenancePolicy,
}

impl Default for MaintenanceSection {
    fn default() -> Self {
        Self {
            days: 30.0,
            policy: MaintenancePolicy::SingleBlock,
        }
    }
}

/// Construction cost and discounting.
///
/// Like [`FuelSection`], optional fields left out of a written table are unset.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FinanceSection {
    pub construction_cost: Option<f64>,
    /// Decimal discount rate (0.05 = 5%).
    pub discount_rate: Option<f64>,
    pub plant_lifetime_years: Option<u32>,
    #[serde(default)]
    pub fixed_om_per_year: f64,
    #[serde(default)]
    pub degradation_per_year: f64,
    /// Yearly growth of `fixed_om_per_year` (0.02 = 2%/yr).
    #[serde(default)]
    pub fixed_om_escalation_per_year: f64,
    /// Paid in the final year of the lifetime.
    #[serde(default)]
    pub decommissioning_cost: f64,
    #[serde(default)]
    pub residual_value: f64,
}

impl Default for FinanceSection {
    fn default() -> Self {
        Self {
            construction_cost: Some(6_000_000_000.0),
            discount_rate: Some(0.07),
            plant_lifetime_years: Some(60),
            fixed_om_per_year: 150_000_000.0,
            degradation_per_year: 0.0,
            fixed_om_escalation_per_year: 0.02,
            decommissioning_cost: 1_000_000_000.0,
            residual_value: 0.0,
        }
    }
}

/// Synthetic hourly market.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarketSection {
    /// First hour, RFC 3339 (e.g. `"2024-01-01T00:00:00Z"`).
    pub start: DateTime<Utc>,
    /// Number of hours to generate.
    pub hours: usize,
    /// Mean price (currency/MWh).
    pub base_price: f64,
    /// Amplitude of the daily price swing.
    pub daily_amplitude: f64,
    /// Phase of the daily swing (radians).
    pub phase_rad: f64,
    /// Noise standard deviation.
    pub noise_std: f64,
    /// AR(1) persistence of the noise.
    pub alpha: f64,
    pub seed: u64,
}

impl Default for MarketSection {
    fn default() -> Self {
        Self {
            start: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().unwrap_or_default(),
            hours: 8760,
            base_price: 65.0,
            daily_amplitude: 15.0,
            phase_rad: -1.5,
            noise_std: 5.0,
            alpha: 0.8,
            seed: 42,
        }
    }
}

impl MarketSection {
    /// The generator described by this section.
    pub fn generator(&self) -> SyntheticPrices {
        SyntheticPrices {
            base: self.base_price,
            daily_amplitude: self.daily_amplitude,
            phase_rad: self.phase_rad,
            noise_std: self.noise_std,
            alpha: self.alpha,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"plant.capacity_factor"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl PlantConfig {
    /// Returns the bundled example plant.
    pub fn example() -> Self {
        Self {
            plant: PlantSection::default(),
            fuel: FuelSection::default(),
            maintenance: MaintenanceSection::default(),
            finance: FinanceSection::default(),
            market: MarketSection::default(),
        }
    }

    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("params", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let p = &self.plant;
        if !p.capacity_mw.is_finite() || p.capacity_mw <= 0.0 {
            errors.push(ConfigError::new("plant.capacity_mw", "must be > 0"));
        }
        if !(0.0..=1.0).contains(&p.capacity_factor) {
            errors.push(ConfigError::new(
                "plant.capacity_factor",
                "must be in [0.0, 1.0]",
            ));
        }

        let fuel = &self.fuel;
        match (fuel.cost_per_mwh, fuel.cost_per_refueling) {
            (Some(_), Some(_)) => errors.push(ConfigError::new(
                "fuel.cost_per_mwh",
                "set exactly one of fuel.cost_per_mwh and fuel.cost_per_refueling",
            )),
            (None, None) => errors.push(ConfigError::new(
                "fuel.cost_per_mwh",
                "one of fuel.cost_per_mwh or fuel.cost_per_refueling is required",
            )),
            _ => {}
        }
        if fuel.refuel_cycle_hours == Some(0) {
            errors.push(ConfigError::new("fuel.refuel_cycle_hours", "must be > 0"));
        }
        if fuel.cost_per_refueling.is_some() && fuel.refuel_cycle_hours.is_none() {
            errors.push(ConfigError::new(
                "fuel.refuel_cycle_hours",
                "required when fuel.cost_per_refueling is set",
            ));
        }

        let m = &self.maintenance;
        if !m.days.is_finite() || m.days < 0.0 {
            errors.push(ConfigError::new("maintenance.days", "must be >= 0"));
        }
        if m.policy == MaintenancePolicy::EveryRefuelCycle && fuel.refuel_cycle_hours.is_none() {
            errors.push(ConfigError::new(
                "maintenance.policy",
                "\"every_refuel_cycle\" requires fuel.refuel_cycle_hours",
            ));
        }

        let fin = &self.finance;
        if fin.discount_rate.is_some_and(|r| r <= -1.0) {
            errors.push(ConfigError::new("finance.discount_rate", "must be > -1.0"));
        }
        if fin.plant_lifetime_years == Some(0) {
            errors.push(ConfigError::new(
                "finance.plant_lifetime_years",
                "must be > 0",
            ));
        }
        if fin.construction_cost.is_some_and(|c| c < 0.0) {
            errors.push(ConfigError::new("finance.construction_cost", "must be >= 0"));
        }
        if !(0.0..1.0).contains(&fin.degradation_per_year) {
            errors.push(ConfigError::new(
                "finance.degradation_per_year",
                "must be in [0.0, 1.0)",
            ));
        }
        let escalation = fin.fixed_om_escalation_per_year;
        if !escalation.is_finite() || escalation <= -1.0 {
            errors.push(ConfigError::new(
                "finance.fixed_om_escalation_per_year",
                "must be > -1.0",
            ));
        }
        if !fin.decommissioning_cost.is_finite() || fin.decommissioning_cost < 0.0 {
            errors.push(ConfigError::new("finance.decommissioning_cost", "must be >= 0"));
        }
        if !fin.residual_value.is_finite() || fin.residual_value < 0.0 {
            errors.push(ConfigError::new("finance.residual_value", "must be >= 0"));
        }

        let mk = &self.market;
        if mk.hours == 0 {
            errors.push(ConfigError::new("market.hours", "must be > 0"));
        }
        if mk.noise_std < 0.0 {
            errors.push(ConfigError::new("market.noise_std", "must be >= 0"));
        }
        if !(0.0..1.0).contains(&mk.alpha) {
            errors.push(ConfigError::new("market.alpha", "must be in [0.0, 1.0)"));
        }

        errors
    }

    /// Resolves the configuration into simulator parameters.
    ///
    /// # Errors
    ///
    /// Returns a `ParameterError` if the fuel cost is not given exactly once
    /// or the resulting parameters are invalid.
    pub fn to_parameters(&self) -> Result<PlantParameters, ParameterError> {
        let fuel_cost =
            FuelCostSpec::from_optional(self.fuel.cost_per_mwh, self.fuel.cost_per_refueling)?;
        let params = PlantParameters {
            refuel_cycle_hours: self.fuel.refuel_cycle_hours,
            maintenance_days: self.maintenance.days,
            maintenance_policy: self.maintenance.policy,
            construction_cost: self.finance.construction_cost,
            discount_rate: self.finance.discount_rate,
            plant_lifetime_years: self.finance.plant_lifetime_years,
            fixed_om_per_year: self.finance.fixed_om_per_year,
            degradation_per_year: self.finance.degradation_per_year,
            fixed_om_escalation_per_year: self.finance.fixed_om_escalation_per_year,
            decommissioning_cost: self.finance.decommissioning_cost,
            residual_value: self.finance.residual_value,
            ..PlantParameters::new(self.plant.capacity_mw, self.plant.capacity_factor, fuel_cost)
        };
        params.validate()?;
        Ok(params)
    }
}
