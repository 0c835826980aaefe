//! Observation density used by the conditional likelihood.
//!
//! The model evaluates every observed value through an `ObservationDensity`,
//! so a deterministic stub can stand in for the truncated normal in tests.

use super::truncnorm::truncated_normal_log_pdf;

/// Log density of one observation given a fitted mean, noise scale and
/// censoring support.
pub trait ObservationDensity: Send + Sync {
    fn log_density(&self, value: f64, mu: f64, sigma: f64, lower: f64, upper: f64) -> f64;
}

/// Normal noise truncated to the outcome's support.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TruncatedNormal;

impl ObservationDensity for TruncatedNormal {
    fn log_density(&self, value: f64, mu: f64, sigma: f64, lower: f64, upper: f64) -> f64 {
        truncated_normal_log_pdf(value, mu, sigma, lower, upper)
    }
}

impl<T: ObservationDensity + ?Sized> ObservationDensity for &T {
    fn log_density(&self, value: f64, mu: f64, sigma: f64, lower: f64, upper: f64) -> f64 {
        (**self).log_density(value, mu, sigma, lower, upper)
    }
}
