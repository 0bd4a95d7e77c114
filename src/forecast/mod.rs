//! Price forecasting utilities for extending and testing simulator inputs.
//!
//! Three strategies produce a single next value from a [`PriceSeries`]:
//!
//! * [`forecast_next_hour`]: trailing average of recent prices.
//! * [`forecast_arima`]: ARIMA with a bounded order search.
//! * [`forecast_next_day_seasonal`]: mean of seasonally aligned history.
//!
//! [`backcast`] replays any of them over history to measure accuracy, and
//! [`extend_hourly`] appends projected hours to a series.

pub mod arima;
pub mod seasonal;

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::error::SeriesError;
use crate::series::{PricePoint, PriceSeries};

pub use arima::{ArimaOrder, CssFitter, FitError, FittedModel, ModelFitter, OrderGrid};
pub use arima::{forecast_arima, forecast_arima_with, select_order};
pub use seasonal::{Seasonality, forecast_next_day_seasonal, forecast_next_day_seasonal_with};

/// Number of trailing hours averaged by [`forecast_next_hour`].
pub const DEFAULT_WINDOW: usize = 24;

/// Forecasts the next hour as the mean of the last [`DEFAULT_WINDOW`] prices.
///
/// # Errors
///
/// Returns [`SeriesError::Empty`] if the series has no points.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use plant_sim::forecast::forecast_next_hour;
/// use plant_sim::series::PriceSeries;
///
/// let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let series = PriceSeries::hourly(start, &[50.0; 24]);
/// assert_eq!(forecast_next_hour(&series), Ok(50.0));
/// ```
pub fn forecast_next_hour(series: &PriceSeries) -> Result<f64, SeriesError> {
    forecast_next_hour_with_window(series, DEFAULT_WINDOW)
}

/// Forecasts the next hour as the mean of the last `window` prices.
///
/// A window of one returns the most recent price; a window longer than the
/// series averages everything available. A zero window is treated as one.
///
/// # Errors
///
/// Returns [`SeriesError::Empty`] if the series has no points.
pub fn forecast_next_hour_with_window(
    series: &PriceSeries,
    window: usize,
) -> Result<f64, SeriesError> {
    series.ensure_non_empty()?;
    Ok(trailing_mean(series.points(), window.max(1)))
}

/// Mean price of the last `window` points. `points` must be non-empty.
pub(crate) fn trailing_mean(points: &[PricePoint], window: usize) -> f64 {
    let start = points.len().saturating_sub(window);
    let tail = &points[start..];
    tail.iter().map(|p| p.price).sum::<f64>() / tail.len() as f64
}

/// One row of a rolling one-step-ahead evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct BackcastRow {
    pub timestamp: DateTime<Utc>,
    pub actual: f64,
    pub predicted: f64,
    /// `actual - predicted`.
    pub error: f64,
}

/// Replays `forecaster` over history.
///
/// For every index `i >= window` the forecaster sees points `[i - window, i)`
/// and its prediction is compared with point `i`. A series of `n` points
/// yields `n - window` rows (none if `n <= window`).
///
/// # Errors
///
/// Returns [`SeriesError::Empty`] for an empty series, and propagates the
/// first forecaster error.
pub fn backcast<F>(
    series: &PriceSeries,
    window: usize,
    forecaster: F,
) -> Result<Vec<BackcastRow>, SeriesError>
where
    F: Fn(&PriceSeries) -> Result<f64, SeriesError>,
{
    series.ensure_non_empty()?;
    let window = window.max(1);
    let points = series.points();
    let mut rows = Vec::with_capacity(points.len().saturating_sub(window));
    for i in window..points.len() {
        let history = series.slice(i - window, i);
        let predicted = forecaster(&history)?;
        let actual = points[i].price;
        rows.push(BackcastRow {
            timestamp: points[i].timestamp,
            actual,
            predicted,
            error: actual - predicted,
        });
    }
    debug!(rows = rows.len(), window, "backcast complete");
    Ok(rows)
}

/// Accuracy summary of a backcast.
#[derive(Debug, Clone, PartialEq)]
pub struct BackcastReport {
    pub samples: usize,
    /// Mean absolute error.
    pub mae: f64,
    /// Root-mean-square error.
    pub rmse: f64,
    /// Mean signed error (positive = forecasts too low).
    pub bias: f64,
}

impl BackcastReport {
    pub fn from_rows(rows: &[BackcastRow]) -> Self {
        if rows.is_empty() {
            return Self {
                samples: 0,
                mae: 0.0,
                rmse: 0.0,
                bias: 0.0,
            };
        }
        let n = rows.len() as f64;
        let mut abs_sum = 0.0;
        let mut sq_sum = 0.0;
        let mut sum = 0.0;
        for r in rows {
            abs_sum += r.error.abs();
            sq_sum += r.error * r.error;
            sum += r.error;
        }
        Self {
            samples: rows.len(),
            mae: abs_sum / n,
            rmse: (sq_sum / n).sqrt(),
            bias: sum / n,
        }
    }
}

impl fmt::Display for BackcastReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "samples={} MAE={:.3} RMSE={:.3} bias={:.3}",
            self.samples, self.mae, self.rmse, self.bias
        )
    }
}

/// Appends `hours` hourly points, each forecast from the series so far.
///
/// # Errors
///
/// Returns [`SeriesError::Empty`] for an empty series, and propagates the
/// first forecaster error.
pub fn extend_hourly<F>(
    series: &PriceSeries,
    hours: usize,
    forecaster: F,
) -> Result<PriceSeries, SeriesError>
where
    F: Fn(&PriceSeries) -> Result<f64, SeriesError>,
{
    series.ensure_non_empty()?;
    let mut extended = series.clone();
    for _ in 0..hours {
        let next_price = forecaster(&extended)?;
        let last = extended.last().ok_or(SeriesError::Empty)?.timestamp;
        extended.push(PricePoint::new(last + Duration::hours(1), next_price))?;
    }
    Ok(extended)
}
