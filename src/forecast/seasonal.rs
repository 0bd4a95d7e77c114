//! Next-day forecast from seasonally aligned history.

use chrono::{DateTime, Datelike, Duration, Utc};
use tracing::debug;

use crate::error::SeriesError;
use crate::series::PriceSeries;

use super::trailing_mean;

/// Days averaged when the history is too short for a seasonal forecast.
pub const SEASONAL_FALLBACK_WINDOW: usize = 7;

/// Which historical days count as the same seasonal position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Seasonality {
    /// Same calendar month and day in earlier years.
    #[default]
    Yearly,
    /// Same weekday in earlier weeks.
    Weekly,
}

impl Seasonality {
    /// Days of history that make up one full cycle.
    pub fn cycle_days(self) -> i64 {
        match self {
            Self::Yearly => 365,
            Self::Weekly => 7,
        }
    }

    fn aligned(self, candidate: DateTime<Utc>, target: DateTime<Utc>) -> bool {
        match self {
            Self::Yearly => candidate.month() == target.month() && candidate.day() == target.day(),
            Self::Weekly => candidate.weekday() == target.weekday(),
        }
    }
}

/// Forecasts the day after the last point with yearly alignment.
///
/// # Errors
///
/// Returns [`SeriesError::Empty`] if the series has no points.
pub fn forecast_next_day_seasonal(daily_series: &PriceSeries) -> Result<f64, SeriesError> {
    forecast_next_day_seasonal_with(daily_series, Seasonality::Yearly)
}

/// Forecasts the day after the last point as the mean of all earlier days at
/// the same seasonal position.
///
/// The history must span at least one full cycle (first to last point);
/// otherwise, or if no earlier day is aligned with the target, the result is
/// the mean of the last [`SEASONAL_FALLBACK_WINDOW`] points.
///
/// # Errors
///
/// Returns [`SeriesError::Empty`] if the series has no points.
pub fn forecast_next_day_seasonal_with(
    daily_series: &PriceSeries,
    seasonality: Seasonality,
) -> Result<f64, SeriesError> {
    let (first, last) = match (daily_series.first(), daily_series.last()) {
        (Some(first), Some(last)) => (first.timestamp, last.timestamp),
        _ => return Err(SeriesError::Empty),
    };
    let fallback = || trailing_mean(daily_series.points(), SEASONAL_FALLBACK_WINDOW);

    let covered_days = (last - first).num_days() + 1;
    if covered_days < seasonality.cycle_days() {
        debug!(
            covered_days,
            cycle_days = seasonality.cycle_days(),
            "history shorter than one season, using trailing mean"
        );
        return Ok(fallback());
    }

    let target = last + Duration::days(1);
    let (sum, count) = daily_series
        .points()
        .iter()
        .filter(|p| seasonality.aligned(p.timestamp, target))
        .fold((0.0, 0_usize), |(sum, count), p| (sum + p.price, count + 1));

    if count == 0 {
        debug!(%target, "no aligned history, using trailing mean");
        return Ok(fallback());
    }
    Ok(sum / count as f64)
}
