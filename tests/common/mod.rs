//! Shared test fixtures for integration tests.
#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use plant_sim::plant::{FuelCostSpec, PlantParameters};
use plant_sim::series::PriceSeries;
use plant_sim::synthetic::SyntheticPrices;

/// First hour of every fixture series.
pub fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

/// `hours` hourly points at a constant `price`.
pub fn flat_prices(hours: usize, price: f64) -> PriceSeries {
    PriceSeries::hourly(start(), &vec![price; hours])
}

/// Seeded prices with a daily swing around 60 and AR(1) noise.
pub fn noisy_prices(hours: usize, seed: u64) -> PriceSeries {
    let market = SyntheticPrices {
        base: 60.0,
        daily_amplitude: 20.0,
        phase_rad: 0.0,
        noise_std: 8.0,
        alpha: 0.7,
    };
    market.generate(start(), hours, seed)
}

/// 1000 MW at full dispatch with fuel at 10 per MWh and no maintenance.
pub fn reference_plant() -> PlantParameters {
    PlantParameters::new(1000.0, 1.0, FuelCostSpec::PerMwh(10.0))
}

/// Reference plant with lifetime economics attached.
pub fn financed_plant(construction_cost: f64, discount_rate: f64, years: u32) -> PlantParameters {
    PlantParameters {
        construction_cost: Some(construction_cost),
        discount_rate: Some(discount_rate),
        plant_lifetime_years: Some(years),
        ..reference_plant()
    }
}
