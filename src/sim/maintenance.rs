//! Maintenance outage placement.

use crate::error::ParameterError;
use crate::plant::{MaintenancePolicy, PlantParameters};

/// Per-hour maintenance flags for a series of `len` hours.
///
/// Outage length is `round(maintenance_days * 24)` hours; placement follows
/// [`MaintenancePolicy`]:
///
/// * `SingleBlock` marks hours `[0, outage)`.
/// * `EveryRefuelCycle` marks `[k * cycle, k * cycle + outage)` for every
///   cycle start `k * cycle < len`, truncated at `len`.
///
/// # Errors
///
/// Returns a `ParameterError` if one outage is longer than the series, or
/// longer than the refuel cycle under `EveryRefuelCycle`.
pub fn maintenance_mask(params: &PlantParameters, len: usize) -> Result<Vec<bool>, ParameterError> {
    let outage = params.maintenance_hours();
    if outage > len {
        return Err(ParameterError::new(
            "maintenance_days",
            format!("{outage} maintenance hours exceed the {len}-hour price series"),
        ));
    }

    let mut mask = vec![false; len];
    match params.maintenance_policy {
        MaintenancePolicy::SingleBlock => {
            mask[..outage].fill(true);
        }
        MaintenancePolicy::EveryRefuelCycle => {
            let cycle = params.refuel_cycle_hours.ok_or_else(|| {
                ParameterError::new(
                    "refuel_cycle_hours",
                    "required by the every_refuel_cycle maintenance policy",
                )
            })? as usize;
            if cycle == 0 {
                return Err(ParameterError::new("refuel_cycle_hours", "must be > 0"));
            }
            if outage > cycle {
                return Err(ParameterError::new(
                    "maintenance_days",
                    format!("{outage} maintenance hours exceed the {cycle}-hour refuel cycle"),
                ));
            }
            for start in (0..len).step_by(cycle) {
                let end = (start + outage).min(len);
                mask[start..end].fill(true);
            }
        }
    }
    Ok(mask)
}
