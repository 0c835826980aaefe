//! The fitted growth-mixture model.
//!
//! A `Model` owns a private copy of the fitted parameters taken at
//! construction. Nothing mutates it afterwards, so one instance can serve any
//! number of evaluations, including from several threads at once.
//!
//! Operations are spread across modules by concern:
//! - [`crate::trajectory`]: fitted and collapsed trajectories
//! - [`crate::risk`]: linear predictor and softmax risk
//! - [`crate::likelihood`]: censored-normal conditional log-likelihood
//! - [`crate::posterior`]: posterior membership probabilities

use lcgm_config::{validate_document, validate_params, ModelParams, ParamsDocument};
use lcgm_math::{ObservationDensity, TruncatedNormal};

use crate::error::{IndexKind, ModelError};

/// Fitted latent-class growth-mixture model.
#[derive(Debug, Clone)]
pub struct Model<D = TruncatedNormal> {
    pub(crate) n_outcomes: usize,
    pub(crate) n_groups: usize,
    pub(crate) params: ModelParams,
    pub(crate) density: D,
}

impl Model<TruncatedNormal> {
    /// Build a model with truncated-normal observation noise.
    pub fn new(
        n_outcomes: usize,
        n_groups: usize,
        params: &ModelParams,
    ) -> Result<Self, ModelError> {
        Self::with_density(n_outcomes, n_groups, params, TruncatedNormal)
    }

    /// Build a model from a parsed params.json document.
    pub fn from_document(doc: &ParamsDocument) -> Result<Self, ModelError> {
        validate_document(doc)?;
        Self::new(doc.n_outcomes, doc.n_groups, &doc.params)
    }
}

impl<D: ObservationDensity> Model<D> {
    /// Build a model that scores observations with `density`.
    ///
    /// The parameters are validated and cloned; later changes to the caller's
    /// copy do not reach the model.
    pub fn with_density(
        n_outcomes: usize,
        n_groups: usize,
        params: &ModelParams,
        density: D,
    ) -> Result<Self, ModelError> {
        validate_params(n_outcomes, n_groups, params)?;
        tracing::debug!(
            n_outcomes,
            n_groups,
            n_periods = params.times.len(),
            max_degree = params.max_degree(),
            "model constructed"
        );
        Ok(Model {
            n_outcomes,
            n_groups,
            params: params.clone(),
            density,
        })
    }

    pub fn n_outcomes(&self) -> usize {
        self.n_outcomes
    }

    pub fn n_groups(&self) -> usize {
        self.n_groups
    }

    /// Shared time grid.
    pub fn times(&self) -> &[f64] {
        &self.params.times
    }

    /// Read-only view of the fitted parameters.
    pub fn params(&self) -> &ModelParams {
        &self.params
    }

    /// Number of raw covariates a subject must supply.
    pub fn covariate_len(&self) -> usize {
        self.params.theta[0].len() - 1
    }

    pub(crate) fn check_group(&self, group: usize) -> Result<(), ModelError> {
        if group >= self.n_groups {
            return Err(ModelError::Index {
                kind: IndexKind::Group,
                index: group,
                bound: self.n_groups,
            });
        }
        Ok(())
    }

    pub(crate) fn check_outcome(&self, outcome: usize) -> Result<(), ModelError> {
        if outcome >= self.n_outcomes {
            return Err(ModelError::Index {
                kind: IndexKind::Outcome,
                index: outcome,
                bound: self.n_outcomes,
            });
        }
        Ok(())
    }

    /// Polynomial coefficients for one group/outcome curve.
    pub(crate) fn coefficients(&self, group: usize, outcome: usize) -> Result<&[f64], ModelError> {
        self.check_group(group)?;
        self.check_outcome(outcome)?;
        Ok(&self.params.beta[group][outcome])
    }
}
