//! Conditional log-likelihood of one outcome's observed trajectory.

use lcgm_math::{polyval, ObservationDensity};

use crate::error::ModelError;
use crate::logging::Stage;
use crate::model::Model;
use crate::observation::Observation;

impl<D: ObservationDensity> Model<D> {
    /// Sum of log densities of the present observations under `group`'s
    /// fitted curve for `outcome`.
    ///
    /// Missing periods contribute nothing; an all-missing sequence scores
    /// exactly zero. Values outside the outcome's censoring support score
    /// negative infinity.
    pub fn conditional_log_likelihood(
        &self,
        vals: &[Observation],
        group: usize,
        outcome: usize,
    ) -> Result<f64, ModelError> {
        let coeffs = self.coefficients(group, outcome)?;
        let times = &self.params.times;
        if vals.len() != times.len() {
            return Err(ModelError::Dimension {
                what: "observation periods",
                expected: times.len(),
                actual: vals.len(),
            });
        }

        let sigma = self.params.sigma[outcome];
        let (lower, upper) = self.params.limits[outcome].bounds();

        let mut log_lik = 0.0;
        let mut present = 0usize;
        for (obs, &t) in vals.iter().zip(times) {
            match *obs {
                Observation::Present(value) => {
                    let mu = polyval(coeffs, t);
                    log_lik += self.density.log_density(value, mu, sigma, lower, upper);
                    present += 1;
                }
                Observation::Missing => {}
            }
        }

        tracing::trace!(
            stage = %Stage::Likelihood,
            group,
            outcome,
            present,
            log_lik,
            "conditional log-likelihood"
        );
        Ok(log_lik)
    }
}
