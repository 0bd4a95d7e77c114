//! ARIMA(p, d, q) one-step forecasting with an explicit order search.
//!
//! [`forecast_arima`] evaluates every order of a bounded [`OrderGrid`] with a
//! [`ModelFitter`], keeps the fit with the lowest AIC, and returns its
//! one-step forecast. Series that are too short, or grids where every fit
//! fails, fall back to [`forecast_next_hour`](super::forecast_next_hour).
//!
//! The default [`CssFitter`] estimates ARMA(p, q) on the `d`-times
//! differenced series with the Hannan–Rissanen procedure:
//!
//! 1. a long AR regression supplies residual estimates,
//! 2. the series is regressed on its own `p` lags and `q` lagged residuals,
//! 3. conditional-sum-of-squares residuals give `sigma^2` and the AIC.
//!
//! A constant is estimated only when `d = 0`.

use std::f64::consts::PI;
use std::fmt;

use nalgebra::{DMatrix, DVector};
use thiserror::Error;
use tracing::{debug, warn};

use crate::error::SeriesError;
use crate::series::PriceSeries;

use super::forecast_next_hour;

/// Fewest points for which an order search is attempted; the `(0, 0, 0)`
/// mean model needs two.
pub const MIN_ARIMA_POINTS: usize = 2;

/// Lower bound on the residual variance, so exact fits keep a finite AIC.
const SIGMA2_FLOOR: f64 = 1e-12;

/// Singular values below this fraction of the largest are treated as zero.
const SVD_RELATIVE_EPS: f64 = 1e-10;

/// Extra lags of the long autoregression beyond `max(p, q)`.
const LONG_AR_EXTRA_LAGS: usize = 2;

/// Autoregressive, differencing, and moving-average orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArimaOrder {
    pub p: usize,
    pub d: usize,
    pub q: usize,
}

impl ArimaOrder {
    pub const fn new(p: usize, d: usize, q: usize) -> Self {
        Self { p, d, q }
    }

    /// Fewest observations this order could possibly be fitted to.
    pub fn min_points(&self) -> usize {
        self.p + self.d + self.q + 2
    }
}

impl fmt::Display for ArimaOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.p, self.d, self.q)
    }
}

/// Inclusive upper bounds of the order search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderGrid {
    pub max_p: usize,
    pub max_d: usize,
    pub max_q: usize,
}

impl Default for OrderGrid {
    fn default() -> Self {
        Self {
            max_p: 2,
            max_d: 1,
            max_q: 2,
        }
    }
}

impl OrderGrid {
    /// All candidate orders, simplest differencing first.
    pub fn candidates(&self) -> Vec<ArimaOrder> {
        let mut orders = Vec::with_capacity((self.max_p + 1) * (self.max_d + 1) * (self.max_q + 1));
        for d in 0..=self.max_d {
            for p in 0..=self.max_p {
                for q in 0..=self.max_q {
                    orders.push(ArimaOrder::new(p, d, q));
                }
            }
        }
        orders
    }
}

/// Why a single candidate could not be fitted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitError {
    #[error("order {order} needs more than {available} observations")]
    InsufficientData { order: ArimaOrder, available: usize },

    #[error("order {order} did not converge: {reason}")]
    Diverged { order: ArimaOrder, reason: String },
}

/// A fitted candidate and its one-step forecast.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedModel {
    pub order: ArimaOrder,
    /// Constant term of the differenced model (zero when `d > 0`).
    pub intercept: f64,
    pub ar: Vec<f64>,
    pub ma: Vec<f64>,
    /// Residual variance (floored).
    pub sigma2: f64,
    /// Akaike information criterion; lower is better.
    pub aic: f64,
    /// Forecast of the next value on the original scale.
    pub forecast: f64,
}

/// Fits one candidate order to a series of values.
///
/// Implementations decide how parameters are estimated and how the fit is
/// scored; [`select_order`] only compares `aic`.
pub trait ModelFitter {
    fn fit(&self, values: &[f64], order: ArimaOrder) -> Result<FittedModel, FitError>;
}

/// Conditional-sum-of-squares fitter using Hannan–Rissanen regressions.
#[derive(Debug, Default, Clone, Copy)]
pub struct CssFitter;

impl ModelFitter for CssFitter {
    fn fit(&self, values: &[f64], order: ArimaOrder) -> Result<FittedModel, FitError> {
        let insufficient = || FitError::InsufficientData {
            order,
            available: values.len(),
        };
        if values.len() < order.min_points() {
            return Err(insufficient());
        }

        let levels = difference_levels(values, order.d);
        let w = &levels[order.d];
        let with_intercept = order.d == 0;
        let n = w.len();
        let ArimaOrder { p, q, .. } = order;

        let (intercept, ar, ma) = if p == 0 && q == 0 {
            let c = if with_intercept { mean(w) } else { 0.0 };
            (c, Vec::new(), Vec::new())
        } else if q == 0 {
            let beta = regress(w, p, None, 0, p, with_intercept, order)?;
            split_coefficients(&beta, with_intercept, p, 0)
        } else {
            let m = p.max(q) + LONG_AR_EXTRA_LAGS;
            if n <= 2 * m + usize::from(with_intercept) {
                return Err(insufficient());
            }
            let long_ar = regress(w, m, None, 0, m, with_intercept, order)?;
            let (c_long, phi_long, _) = split_coefficients(&long_ar, with_intercept, m, 0);
            let mut innovations = vec![0.0; n];
            for t in m..n {
                let fitted = c_long + (1..=m).map(|i| phi_long[i - 1] * w[t - i]).sum::<f64>();
                innovations[t] = w[t] - fitted;
            }
            let beta = regress(w, p, Some(&innovations), q, m + q, with_intercept, order)?;
            split_coefficients(&beta, with_intercept, p, q)
        };

        let residuals = css_residuals(w, intercept, &ar, &ma);
        let used = &residuals[p..];
        if used.is_empty() {
            return Err(insufficient());
        }
        let sse: f64 = used.iter().map(|e| e * e).sum();
        let n_eff = used.len() as f64;
        let sigma2 = (sse / n_eff).max(SIGMA2_FLOOR);
        let k = p + q + usize::from(with_intercept) + 1;
        let aic = n_eff * ((2.0 * PI * sigma2).ln() + 1.0) + 2.0 * k as f64;

        let next_w = intercept
            + (1..=p).map(|i| ar[i - 1] * w[n - i]).sum::<f64>()
            + (1..=q)
                .filter(|&j| n >= j)
                .map(|j| ma[j - 1] * residuals[n - j])
                .sum::<f64>();
        let forecast = integrate(next_w, &levels);

        if !aic.is_finite() || !forecast.is_finite() {
            return Err(FitError::Diverged {
                order,
                reason: format!("non-finite fit (aic={aic}, forecast={forecast})"),
            });
        }

        Ok(FittedModel {
            order,
            intercept,
            ar,
            ma,
            sigma2,
            aic,
            forecast,
        })
    }
}

/// `levels[0]` is the input; `levels[k]` is its k-th difference.
fn difference_levels(values: &[f64], d: usize) -> Vec<Vec<f64>> {
    let mut levels = Vec::with_capacity(d + 1);
    levels.push(values.to_vec());
    for k in 0..d {
        let diffed = levels[k].windows(2).map(|pair| pair[1] - pair[0]).collect();
        levels.push(diffed);
    }
    levels
}

/// Undoes differencing for one forecast step.
fn integrate(next_diff: f64, levels: &[Vec<f64>]) -> f64 {
    let d = levels.len() - 1;
    let mut next = next_diff;
    for level in levels[..d].iter().rev() {
        next += level.last().copied().unwrap_or(0.0);
    }
    next
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Least-squares regression of `w[t]` for `t` in `start..n` on an optional
/// constant, `p` own lags and `q` lags of `innovations`.
fn regress(
    w: &[f64],
    p: usize,
    innovations: Option<&[f64]>,
    q: usize,
    start: usize,
    with_intercept: bool,
    order: ArimaOrder,
) -> Result<Vec<f64>, FitError> {
    let n = w.len();
    let cols = usize::from(with_intercept) + p + q;
    let rows = n.saturating_sub(start);
    if rows <= cols {
        return Err(FitError::InsufficientData {
            order,
            available: n,
        });
    }

    let mut design = Vec::with_capacity(rows * cols);
    let mut target = Vec::with_capacity(rows);
    for t in start..n {
        if with_intercept {
            design.push(1.0);
        }
        design.extend((1..=p).map(|i| w[t - i]));
        if let Some(e) = innovations {
            design.extend((1..=q).map(|j| e[t - j]));
        }
        target.push(w[t]);
    }

    let x = DMatrix::from_row_slice(rows, cols, &design);
    let y = DVector::from_vec(target);
    let svd = x.svd(true, true);
    let eps = (svd.singular_values.max() * SVD_RELATIVE_EPS).max(f64::EPSILON);
    let beta = svd.solve(&y, eps).map_err(|reason| FitError::Diverged {
        order,
        reason: reason.to_string(),
    })?;
    if beta.iter().any(|b| !b.is_finite()) {
        return Err(FitError::Diverged {
            order,
            reason: "non-finite coefficients".to_string(),
        });
    }
    Ok(beta.iter().copied().collect())
}

fn split_coefficients(
    beta: &[f64],
    with_intercept: bool,
    p: usize,
    q: usize,
) -> (f64, Vec<f64>, Vec<f64>) {
    let offset = usize::from(with_intercept);
    let intercept = if with_intercept { beta[0] } else { 0.0 };
    let ar = beta[offset..offset + p].to_vec();
    let ma = beta[offset + p..offset + p + q].to_vec();
    (intercept, ar, ma)
}

/// Residuals of the ARMA recursion with zero pre-sample innovations.
/// Entries before index `p` are zero.
fn css_residuals(w: &[f64], intercept: f64, ar: &[f64], ma: &[f64]) -> Vec<f64> {
    let n = w.len();
    let p = ar.len();
    let mut e = vec![0.0; n];
    for t in p..n {
        let ar_part: f64 = ar.iter().enumerate().map(|(i, phi)| phi * w[t - i - 1]).sum();
        let ma_part: f64 = ma
            .iter()
            .enumerate()
            .filter(|(j, _)| t > *j)
            .map(|(j, theta)| theta * e[t - j - 1])
            .sum();
        e[t] = w[t] - intercept - ar_part - ma_part;
    }
    e
}

/// Fits every candidate of `grid` and returns the lowest-AIC model.
///
/// Failed candidates are logged and skipped; `None` means none succeeded.
/// Ties keep the earlier candidate in grid order.
pub fn select_order<F: ModelFitter + ?Sized>(
    values: &[f64],
    grid: &OrderGrid,
    fitter: &F,
) -> Option<FittedModel> {
    let mut best: Option<FittedModel> = None;
    for order in grid.candidates() {
        match fitter.fit(values, order) {
            Ok(model) => {
                debug!(%order, aic = model.aic, forecast = model.forecast, "candidate fitted");
                if best.as_ref().is_none_or(|b| model.aic < b.aic) {
                    best = Some(model);
                }
            }
            Err(e) => debug!(%order, error = %e, "candidate rejected"),
        }
    }
    best
}

/// One-step ARIMA forecast with the default grid and [`CssFitter`].
///
/// # Errors
///
/// Returns [`SeriesError::Empty`] for an empty series. Short series and
/// failed fits are not errors: they fall back to the naive forecast.
pub fn forecast_arima(series: &PriceSeries) -> Result<f64, SeriesError> {
    forecast_arima_with(series, &OrderGrid::default(), &CssFitter)
}

/// One-step ARIMA forecast with an explicit search space and fitter.
///
/// # Errors
///
/// Returns [`SeriesError::Empty`] for an empty series.
pub fn forecast_arima_with<F: ModelFitter + ?Sized>(
    series: &PriceSeries,
    grid: &OrderGrid,
    fitter: &F,
) -> Result<f64, SeriesError> {
    series.ensure_non_empty()?;
    if series.len() < MIN_ARIMA_POINTS {
        debug!(points = series.len(), "series too short for ARIMA, using naive forecast");
        return forecast_next_hour(series);
    }

    match select_order(&series.prices(), grid, fitter) {
        Some(model) => {
            debug!(order = %model.order, aic = model.aic, "selected ARIMA order");
            Ok(model.forecast)
        }
        None => {
            warn!(
                points = series.len(),
                "no ARIMA candidate could be fitted, using naive forecast"
            );
            forecast_next_hour(series)
        }
    }
}
