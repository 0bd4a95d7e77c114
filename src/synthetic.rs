//! Synthetic hourly market prices for runs without market data.

use chrono::{DateTime, Utc};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::series::PriceSeries;

/// Generator of hourly prices with a daily shape and correlated noise.
///
/// The price at hour `t` is
///
/// ```text
/// price(t) = base + amplitude * sin(2π * (t mod 24) / 24 + phase) + x(t)
/// x(t)     = alpha * x(t-1) + epsilon(t)
/// ```
///
/// where `epsilon` is Gaussian noise with standard deviation `noise_std`.
/// With zero amplitude and noise the series is flat at `base`.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use plant_sim::synthetic::SyntheticPrices;
///
/// let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let series = SyntheticPrices::flat(65.0).generate(start, 48, 42);
/// assert_eq!(series.len(), 48);
/// assert!(series.prices().iter().all(|&p| p == 65.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticPrices {
    /// Mean price (currency/MWh).
    pub base: f64,
    /// Amplitude of the daily sinusoid.
    pub daily_amplitude: f64,
    /// Phase offset of the daily sinusoid in radians.
    pub phase_rad: f64,
    /// Standard deviation of the noise innovations.
    pub noise_std: f64,
    /// AR(1) persistence of the noise (0.0 = independent).
    pub alpha: f64,
}

impl SyntheticPrices {
    /// A constant price.
    pub fn flat(base: f64) -> Self {
        Self {
            base,
            daily_amplitude: 0.0,
            phase_rad: 0.0,
            noise_std: 0.0,
            alpha: 0.0,
        }
    }

    /// Generates `hours` hourly prices from `start`, reproducible per `seed`.
    pub fn generate(&self, start: DateTime<Utc>, hours: usize, seed: u64) -> PriceSeries {
        let mut rng = StdRng::seed_from_u64(seed);
        let alpha = self.alpha.clamp(0.0, 0.999);
        let mut deviation = 0.0;
        let prices: Vec<f64> = (0..hours)
            .map(|t| {
                let day_pos = (t % 24) as f64 / 24.0;
                let angle = 2.0 * std::f64::consts::PI * day_pos + self.phase_rad;
                deviation = alpha * deviation + gaussian_noise(&mut rng, self.noise_std);
                self.base + self.daily_amplitude * angle.sin() + deviation
            })
            .collect();
        PriceSeries::hourly(start, &prices)
    }
}

/// Gaussian noise with mean 0 via the Box–Muller transform.
pub fn gaussian_noise(rng: &mut StdRng, std_dev: f64) -> f64 {
    if std_dev <= 0.0 {
        return 0.0;
    }

    let u1: f64 = rng.random::<f64>().clamp(1e-12, 1.0);
    let u2: f64 = rng.random::<f64>();
    let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    z0 * std_dev
}
