//! Fitted parameter types.
//!
//! These types describe a params.json document: the outcome/group counts plus
//! the fitted coefficient bundle consumed by the model.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Censoring support `[lower, upper]` for one outcome.
///
/// A missing bound (`null` in JSON) is unbounded on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Limits {
    /// Lower support bound; None means -infinity.
    #[serde(default)]
    pub lower: Option<f64>,
    /// Upper support bound; None means +infinity.
    #[serde(default)]
    pub upper: Option<f64>,
}

impl Limits {
    /// Build limits from raw bounds. Infinite bounds are stored as unbounded.
    pub fn new(lower: f64, upper: f64) -> Self {
        Self {
            lower: (lower != f64::NEG_INFINITY).then_some(lower),
            upper: (upper != f64::INFINITY).then_some(upper),
        }
    }

    /// Support over the whole real line.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Bounds as a pair of f64 with infinities for open sides.
    pub fn bounds(&self) -> (f64, f64) {
        (
            self.lower.unwrap_or(f64::NEG_INFINITY),
            self.upper.unwrap_or(f64::INFINITY),
        )
    }
}

/// Fitted coefficient bundle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ModelParams {
    /// Risk coefficients per group; entry 0 of each row is the intercept.
    pub theta: Vec<Vec<f64>>,
    /// Polynomial coefficients `[b0, b1, ...]` indexed by group then outcome.
    pub beta: Vec<Vec<Vec<f64>>>,
    /// Noise standard deviation per outcome.
    pub sigma: Vec<f64>,
    /// Shared time grid.
    pub times: Vec<f64>,
    /// Censoring support per outcome.
    pub limits: Vec<Limits>,
    /// Optional display names for outcomes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome_names: Option<Vec<String>>,
    /// Optional display labels for groups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_labels: Option<Vec<String>>,
}

impl ModelParams {
    /// Number of covariates expected per subject (theta rows minus the intercept).
    pub fn covariate_len(&self) -> Option<usize> {
        self.theta.first().map(|row| row.len().saturating_sub(1))
    }

    /// Highest polynomial degree across all groups and outcomes.
    pub fn max_degree(&self) -> usize {
        self.beta
            .iter()
            .flatten()
            .map(|coeffs| coeffs.len().saturating_sub(1))
            .max()
            .unwrap_or(0)
    }

    /// Display name for an outcome, falling back to its index.
    pub fn outcome_name(&self, outcome: usize) -> String {
        self.outcome_names
            .as_ref()
            .and_then(|names| names.get(outcome).cloned())
            .unwrap_or_else(|| format!("outcome_{outcome}"))
    }

    /// Display label for a group, falling back to its index.
    pub fn group_label(&self, group: usize) -> String {
        self.group_labels
            .as_ref()
            .and_then(|labels| labels.get(group).cloned())
            .unwrap_or_else(|| format!("group_{group}"))
    }
}

fn default_schema_version() -> String {
    crate::CONFIG_SCHEMA_VERSION.to_string()
}

/// A complete params.json document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ParamsDocument {
    /// Schema version of the document.
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
    /// Number of outcome variables tracked per subject.
    pub n_outcomes: usize,
    /// Number of latent groups.
    pub n_groups: usize,
    /// Fitted coefficients.
    #[serde(flatten)]
    pub params: ModelParams,
}

impl ParamsDocument {
    /// Wrap a bundle with the current schema version.
    pub fn new(n_outcomes: usize, n_groups: usize, params: ModelParams) -> Self {
        Self {
            schema_version: default_schema_version(),
            n_outcomes,
            n_groups,
            params,
        }
    }
}
