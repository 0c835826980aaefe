//! Multinomial-logit membership risk.
//!
//! Each group's score is the dot product of the covariates (with a leading
//! intercept of 1) and that group's theta row; risk is the softmax of the
//! scores, computed with max-subtraction.

use lcgm_math::{dot, normalize_log_probs, raw_exp_sum_unstable, softmax, ObservationDensity};

use crate::error::ModelError;
use crate::logging::{event_names, Stage};
use crate::model::Model;

/// Prior membership risk in both scales.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RiskScores {
    pub probs: Vec<f64>,
    pub log_probs: Vec<f64>,
    pub overflow_guarded: bool,
}

impl<D: ObservationDensity> Model<D> {
    /// Linear score of an intercept-augmented covariate vector for `group`.
    pub fn linear_predictor(&self, x: &[f64], group: usize) -> Result<f64, ModelError> {
        self.check_group(group)?;
        let coeffs = &self.params.theta[group];
        dot(x, coeffs).ok_or(ModelError::Dimension {
            what: "augmented covariates",
            expected: coeffs.len(),
            actual: x.len(),
        })
    }

    /// Prior group-membership probabilities from raw covariates.
    ///
    /// `x` is not modified; the intercept is prepended to a private copy.
    pub fn softmax(&self, x: &[f64]) -> Result<Vec<f64>, ModelError> {
        Ok(self.risk(x)?.probs)
    }

    pub(crate) fn risk(&self, x: &[f64]) -> Result<RiskScores, ModelError> {
        let expected = self.covariate_len();
        if x.len() != expected {
            return Err(ModelError::Dimension {
                what: "covariates",
                expected,
                actual: x.len(),
            });
        }

        let augmented = with_intercept(x);
        let scores = (0..self.n_groups)
            .map(|group| self.linear_predictor(&augmented, group))
            .collect::<Result<Vec<_>, _>>()?;

        let overflow_guarded = raw_exp_sum_unstable(&scores);
        if overflow_guarded {
            tracing::warn!(
                event = event_names::NUMERIC_OVERFLOW_GUARDED,
                stage = %Stage::Risk,
                max_score = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
                "risk scores outside exp range; normalized with max-shift"
            );
        }

        let probs = softmax(&scores);
        if probs.iter().any(|v| v.is_nan()) {
            return Err(ModelError::DegenerateLikelihood {
                message: format!("risk scores are not finite: {scores:?}"),
            });
        }
        let log_probs = normalize_log_probs(&scores);

        tracing::trace!(stage = %Stage::Risk, ?scores, "linear risk scores");
        Ok(RiskScores {
            probs,
            log_probs,
            overflow_guarded,
        })
    }
}

/// Copy of `x` with a leading intercept term.
fn with_intercept(x: &[f64]) -> Vec<f64> {
    let mut augmented = Vec::with_capacity(x.len() + 1);
    augmented.push(1.0);
    augmented.extend_from_slice(x);
    augmented
}
