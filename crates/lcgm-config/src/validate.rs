//! Parameter validation errors and shape/semantic validation.

use thiserror::Error;

use crate::params::{ModelParams, ParamsDocument};

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Parameter validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{field} must be at least 1")]
    ZeroCount { field: &'static str },

    #[error("{field} has {actual} entries, expected {expected}")]
    LengthMismatch {
        field: String,
        expected: usize,
        actual: usize,
    },

    #[error("theta[{group}] has {actual} coefficients, expected {expected} (same as theta[0])")]
    RaggedTheta {
        group: usize,
        expected: usize,
        actual: usize,
    },

    #[error("theta rows must contain at least the intercept coefficient")]
    EmptyTheta,

    #[error("beta[{group}][{outcome}] has no coefficients")]
    EmptyCoefficients { group: usize, outcome: usize },

    #[error("times must contain at least one time point")]
    EmptyTimes,

    #[error("{field} contains a non-finite value")]
    NonFinite { field: String },

    #[error("sigma[{outcome}] must be positive and finite (got {value})")]
    NonPositiveSigma { outcome: usize, value: f64 },

    #[error("limits[{outcome}]: lower ({lower}) must be < upper ({upper})")]
    InvertedLimits {
        outcome: usize,
        lower: f64,
        upper: f64,
    },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::ZeroCount { .. } => 60,
            ValidationError::LengthMismatch { .. } => 61,
            ValidationError::RaggedTheta { .. } => 62,
            ValidationError::EmptyTheta => 63,
            ValidationError::EmptyCoefficients { .. } => 64,
            ValidationError::EmptyTimes => 65,
            ValidationError::NonFinite { .. } => 66,
            ValidationError::NonPositiveSigma { .. } => 67,
            ValidationError::InvertedLimits { .. } => 68,
            ValidationError::VersionMismatch { .. } => 69,
        }
    }
}

/// Validate a full document, including its schema version.
pub fn validate_document(doc: &ParamsDocument) -> ValidationResult<()> {
    if doc.schema_version != crate::CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: doc.schema_version.clone(),
        });
    }
    validate_params(doc.n_outcomes, doc.n_groups, &doc.params)
}

/// Validate a coefficient bundle against the declared outcome/group counts.
pub fn validate_params(
    n_outcomes: usize,
    n_groups: usize,
    params: &ModelParams,
) -> ValidationResult<()> {
    if n_outcomes == 0 {
        return Err(ValidationError::ZeroCount { field: "n_outcomes" });
    }
    if n_groups == 0 {
        return Err(ValidationError::ZeroCount { field: "n_groups" });
    }

    check_len("theta", n_groups, params.theta.len())?;
    let theta_len = params.theta[0].len();
    if theta_len == 0 {
        return Err(ValidationError::EmptyTheta);
    }
    for (group, row) in params.theta.iter().enumerate() {
        if row.len() != theta_len {
            return Err(ValidationError::RaggedTheta {
                group,
                expected: theta_len,
                actual: row.len(),
            });
        }
        check_finite(row, || format!("theta[{group}]"))?;
    }

    check_len("beta", n_groups, params.beta.len())?;
    for (group, outcomes) in params.beta.iter().enumerate() {
        check_len(&format!("beta[{group}]"), n_outcomes, outcomes.len())?;
        for (outcome, coeffs) in outcomes.iter().enumerate() {
            if coeffs.is_empty() {
                return Err(ValidationError::EmptyCoefficients { group, outcome });
            }
            check_finite(coeffs, || format!("beta[{group}][{outcome}]"))?;
        }
    }

    check_len("sigma", n_outcomes, params.sigma.len())?;
    for (outcome, &value) in params.sigma.iter().enumerate() {
        if value.is_nan() || value <= 0.0 || !value.is_finite() {
            return Err(ValidationError::NonPositiveSigma { outcome, value });
        }
    }

    if params.times.is_empty() {
        return Err(ValidationError::EmptyTimes);
    }
    check_finite(&params.times, || "times".to_string())?;

    check_len("limits", n_outcomes, params.limits.len())?;
    for (outcome, limits) in params.limits.iter().enumerate() {
        let (lower, upper) = limits.bounds();
        if lower.is_nan() || upper.is_nan() {
            return Err(ValidationError::NonFinite {
                field: format!("limits[{outcome}]"),
            });
        }
        if lower >= upper {
            return Err(ValidationError::InvertedLimits {
                outcome,
                lower,
                upper,
            });
        }
    }

    if let Some(names) = &params.outcome_names {
        check_len("outcome_names", n_outcomes, names.len())?;
    }
    if let Some(labels) = &params.group_labels {
        check_len("group_labels", n_groups, labels.len())?;
    }

    Ok(())
}

fn check_len(field: &str, expected: usize, actual: usize) -> ValidationResult<()> {
    if expected != actual {
        return Err(ValidationError::LengthMismatch {
            field: field.to_string(),
            expected,
            actual,
        });
    }
    Ok(())
}

fn check_finite(values: &[f64], field: impl FnOnce() -> String) -> ValidationResult<()> {
    if values.iter().all(|v| v.is_finite()) {
        return Ok(());
    }
    Err(ValidationError::NonFinite { field: field() })
}
