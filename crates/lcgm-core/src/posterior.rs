//! Posterior group membership P(group | y, x).
//!
//! Combines the softmax membership risk with each outcome's conditional
//! log-likelihood in log-domain, then normalizes with max-subtraction.

use lcgm_math::{normalize_log_probs, raw_exp_sum_unstable, ObservationDensity};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::logging::{event_names, Stage};
use crate::model::Model;
use crate::observation::{Observation, SubjectRecord};

/// Log-likelihood contribution of one outcome, per group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EvidenceTerm {
    pub outcome: usize,
    pub name: String,
    pub log_likelihood: Vec<f64>,
}

/// Posterior computation result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PosteriorResult {
    /// Posterior membership probabilities, one per group.
    pub posterior: Vec<f64>,
    /// Normalized log posterior (`-inf` serializes as `null`).
    pub log_posterior: Vec<f64>,
    /// Softmax membership risk before seeing the trajectories.
    pub prior: Vec<f64>,
    pub evidence_terms: Vec<EvidenceTerm>,
    /// Most probable group; ties go to the lowest index.
    pub modal_group: usize,
    /// True when raw exponentiation of the scores would have left f64 range.
    pub overflow_guarded: bool,
}

/// Posterior for one subject record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SubjectPosterior {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub result: PosteriorResult,
}

impl<D: ObservationDensity> Model<D> {
    /// Posterior membership probabilities for observations `y` (outcome by
    /// period) and raw covariates `x`.
    pub fn posterior_probabilities(
        &self,
        y: &[Vec<Observation>],
        x: &[f64],
    ) -> Result<Vec<f64>, ModelError> {
        Ok(self.posterior(y, x)?.posterior)
    }

    /// Full posterior computation with per-outcome evidence.
    pub fn posterior(&self, y: &[Vec<Observation>], x: &[f64]) -> Result<PosteriorResult, ModelError> {
        if y.len() != self.n_outcomes {
            return Err(ModelError::Dimension {
                what: "outcomes",
                expected: self.n_outcomes,
                actual: y.len(),
            });
        }

        let risk = self.risk(x)?;
        let mut log_unnormalized = risk.log_probs.clone();
        let mut evidence_terms = Vec::with_capacity(self.n_outcomes);

        for (outcome, vals) in y.iter().enumerate() {
            let term = (0..self.n_groups)
                .map(|group| self.conditional_log_likelihood(vals, group, outcome))
                .collect::<Result<Vec<_>, _>>()?;
            for (acc, ll) in log_unnormalized.iter_mut().zip(&term) {
                *acc += ll;
            }
            evidence_terms.push(EvidenceTerm {
                outcome,
                name: self.params.outcome_name(outcome),
                log_likelihood: term,
            });
        }

        let guarded_here = raw_exp_sum_unstable(&log_unnormalized);
        if guarded_here {
            tracing::warn!(
                event = event_names::NUMERIC_OVERFLOW_GUARDED,
                stage = %Stage::Posterior,
                ?log_unnormalized,
                "posterior scores outside exp range; normalized with max-shift"
            );
        }

        let log_posterior = normalize_log_probs(&log_unnormalized);
        if log_posterior.iter().any(|v| v.is_nan()) {
            return Err(ModelError::DegenerateLikelihood {
                message: degenerate_reason(&log_unnormalized),
            });
        }
        let posterior: Vec<f64> = log_posterior.iter().map(|v| v.exp()).collect();
        let modal_group = argmax(&posterior);

        tracing::debug!(
            stage = %Stage::Posterior,
            modal_group,
            ?posterior,
            "posterior computed"
        );

        Ok(PosteriorResult {
            posterior,
            log_posterior,
            prior: risk.probs,
            evidence_terms,
            modal_group,
            overflow_guarded: risk.overflow_guarded || guarded_here,
        })
    }

    /// Evaluate one subject record.
    pub fn evaluate_subject(&self, record: &SubjectRecord) -> Result<SubjectPosterior, ModelError> {
        let result = self.posterior(&record.outcomes, &record.covariates)?;
        Ok(SubjectPosterior {
            id: record.id.clone(),
            result,
        })
    }

    /// Evaluate records in order. A failing record yields its error without
    /// stopping the rest.
    pub fn evaluate_batch(
        &self,
        records: &[SubjectRecord],
    ) -> Vec<Result<SubjectPosterior, ModelError>> {
        records
            .iter()
            .map(|record| self.evaluate_subject(record))
            .collect()
    }
}

fn degenerate_reason(scores: &[f64]) -> String {
    if scores.iter().any(|v| v.is_nan()) {
        "posterior score is NaN".to_string()
    } else if scores.iter().all(|v| *v == f64::NEG_INFINITY) {
        "observations have zero density under every group".to_string()
    } else {
        format!("posterior scores cannot be normalized: {scores:?}")
    }
}

/// Index of the largest value; the first one wins ties.
fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (idx, &value) in values.iter().enumerate().skip(1) {
        if value > values[best] {
            best = idx;
        }
    }
    best
}
