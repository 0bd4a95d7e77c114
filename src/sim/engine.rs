//! Hour-by-hour plant operation against a market price series.

use tracing::{debug, info};

use crate::error::Result;
use crate::plant::PlantParameters;
use crate::series::PriceSeries;

use super::maintenance::maintenance_mask;
use super::types::{HourlyResult, SimulationSummary};

/// Simulates operating the plant over every hour of `series`.
///
/// Each point of the series is one hour. Outside maintenance the plant sells
/// `capacity_mw * capacity_factor` MWh at the hour's price and burns fuel at
/// the effective per-MWh cost; maintenance hours produce nothing.
///
/// # Arguments
///
/// * `series` - Hourly prices to dispatch against, in order
/// * `params` - Physical and fuel parameters of the plant
///
/// # Errors
///
/// Returns `SeriesError::Empty` for an empty series and a `ParameterError`
/// for invalid parameters. All checks run before the first hour is computed.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use plant_sim::plant::{FuelCostSpec, PlantParameters};
/// use plant_sim::series::PriceSeries;
/// use plant_sim::sim::simulate;
///
/// let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let prices = PriceSeries::hourly(start, &[50.0; 48]);
/// let mut params = PlantParameters::new(1000.0, 1.0, FuelCostSpec::PerMwh(10.0));
/// params.maintenance_days = 1.0;
///
/// let summary = simulate(&prices, &params).unwrap();
/// assert_eq!(summary.total_profit, 960_000.0);
/// ```
pub fn simulate(series: &PriceSeries, params: &PlantParameters) -> Result<SimulationSummary> {
    series.ensure_non_empty()?;
    params.validate()?;
    let fuel_cost_per_mwh = params.effective_fuel_cost_per_mwh()?;
    let maintenance = maintenance_mask(params, series.len())?;

    let output_mwh = params.hourly_output_mwh();
    debug!(
        hours = series.len(),
        output_mwh, fuel_cost_per_mwh, "starting plant simulation"
    );

    let mut hourly_results = Vec::with_capacity(series.len());
    let mut total_profit = 0.0;
    for (point, &offline) in series.points().iter().zip(&maintenance) {
        let result = if offline {
            HourlyResult::offline(point.timestamp, point.price)
        } else {
            let revenue = point.price * output_mwh;
            let fuel_cost = output_mwh * fuel_cost_per_mwh;
            HourlyResult {
                timestamp: point.timestamp,
                price: point.price,
                dispatched_mwh: output_mwh,
                revenue,
                fuel_cost,
                profit: revenue - fuel_cost,
                in_maintenance: false,
            }
        };
        total_profit += result.profit;
        hourly_results.push(result);
    }

    let summary = SimulationSummary {
        total_profit,
        effective_fuel_cost_per_mwh: fuel_cost_per_mwh,
        hourly_results,
    };
    info!(
        hours = summary.hours(),
        maintenance_hours = summary.maintenance_hours(),
        total_profit = summary.total_profit,
        "plant simulation complete"
    );
    Ok(summary)
}
