//! Time-ordered market price series.

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SeriesError;

/// One market price observation (currency per MWh).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

impl PricePoint {
    pub fn new(timestamp: DateTime<Utc>, price: f64) -> Self {
        Self { timestamp, price }
    }
}

/// Ordered price observations with strictly increasing timestamps.
///
/// The ordering invariant is checked once in [`PriceSeries::new`]; every
/// consumer can rely on it afterwards. An empty series is representable, but
/// operations that need data reject it with [`SeriesError::Empty`].
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use plant_sim::series::{PricePoint, PriceSeries};
///
/// let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let series = PriceSeries::hourly(t0, &[40.0, 42.5, 41.0]);
/// assert_eq!(series.len(), 3);
/// assert_eq!(series.last().map(|p| p.price), Some(41.0));
///
/// let reversed = vec![series.points()[1], series.points()[0]];
/// assert!(PriceSeries::new(reversed).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Builds a series, rejecting duplicate or decreasing timestamps.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::DuplicateTimestamp`] or
    /// [`SeriesError::NonMonotonic`] naming the first offending index. The
    /// input is never reordered.
    pub fn new(points: Vec<PricePoint>) -> Result<Self, SeriesError> {
        for (index, pair) in points.windows(2).enumerate() {
            let (prev, next) = (pair[0].timestamp, pair[1].timestamp);
            if next == prev {
                return Err(SeriesError::DuplicateTimestamp {
                    index: index + 1,
                    timestamp: next,
                });
            }
            if next < prev {
                return Err(SeriesError::NonMonotonic {
                    index: index + 1,
                    timestamp: next,
                });
            }
        }
        Ok(Self { points })
    }

    /// Builds an hourly series starting at `start`.
    pub fn hourly(start: DateTime<Utc>, prices: &[f64]) -> Self {
        Self::with_step(start, chrono::Duration::hours(1), prices)
    }

    /// Builds a daily series starting at `start`.
    pub fn daily(start: DateTime<Utc>, prices: &[f64]) -> Self {
        Self::with_step(start, chrono::Duration::days(1), prices)
    }

    fn with_step(start: DateTime<Utc>, step: chrono::Duration, prices: &[f64]) -> Self {
        let points = prices
            .iter()
            .enumerate()
            .map(|(i, &price)| PricePoint::new(start + step * i as i32, price))
            .collect();
        Self { points }
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// Price values in series order.
    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.price).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// Returns `Err(SeriesError::Empty)` for an empty series.
    pub fn ensure_non_empty(&self) -> Result<(), SeriesError> {
        if self.points.is_empty() {
            Err(SeriesError::Empty)
        } else {
            Ok(())
        }
    }

    /// Returns the sub-series `[start, end)`; bounds are clamped to the length.
    pub fn slice(&self, start: usize, end: usize) -> Self {
        let end = end.min(self.points.len());
        let start = start.min(end);
        Self {
            points: self.points[start..end].to_vec(),
        }
    }

    /// Appends a point after the current last one.
    ///
    /// # Errors
    ///
    /// Returns a [`SeriesError`] if `point` does not come strictly after the
    /// last timestamp.
    pub fn push(&mut self, point: PricePoint) -> Result<(), SeriesError> {
        if let Some(last) = self.points.last() {
            let index = self.points.len();
            if point.timestamp == last.timestamp {
                return Err(SeriesError::DuplicateTimestamp {
                    index,
                    timestamp: point.timestamp,
                });
            }
            if point.timestamp < last.timestamp {
                return Err(SeriesError::NonMonotonic {
                    index,
                    timestamp: point.timestamp,
                });
            }
        }
        self.points.push(point);
        Ok(())
    }

    /// Averages the points of each UTC calendar day.
    ///
    /// Each output point is stamped at midnight of its day. Days without
    /// points are skipped, not filled.
    pub fn daily_means(&self) -> Self {
        let mut points: Vec<PricePoint> = Vec::new();
        let mut count = 0_usize;
        for p in &self.points {
            let day = p.timestamp.date_naive().and_time(NaiveTime::MIN).and_utc();
            match points.last_mut() {
                Some(last) if last.timestamp == day => {
                    last.price += p.price;
                    count += 1;
                }
                _ => {
                    if let Some(last) = points.last_mut() {
                        last.price /= count as f64;
                    }
                    points.push(PricePoint::new(day, p.price));
                    count = 1;
                }
            }
        }
        if let Some(last) = points.last_mut() {
            last.price /= count as f64;
        }
        Self { points }
    }
}
