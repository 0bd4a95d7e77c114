//! Merchant power plant simulator: hourly operation against market prices,
//! investment metrics, and price forecasting.
//!
//! A run takes a validated [`series::PriceSeries`] and a set of
//! [`plant::PlantParameters`], produces a [`sim::SimulationSummary`] with one
//! record per hour, and turns that into a [`finance::FinancialSummary`].

pub mod config;
pub mod error;
pub mod finance;
/// Naive, ARIMA, and seasonal price forecasts plus backcasting.
pub mod forecast;
pub mod io;
pub mod plant;
pub mod series;
/// Hourly plant operation and operating reports.
pub mod sim;
pub mod synthetic;
pub mod telemetry;
