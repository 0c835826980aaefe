//! Errors raised by model evaluation.

use lcgm_config::ValidationError;
use thiserror::Error;

/// Which index space an out-of-range index belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    Group,
    Outcome,
}

impl std::fmt::Display for IndexKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndexKind::Group => write!(f, "group"),
            IndexKind::Outcome => write!(f, "outcome"),
        }
    }
}

/// Errors raised during model construction or evaluation.
///
/// An error aborts only the call that raised it; the model stays usable.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("dimension mismatch for {what}: expected {expected}, got {actual}")]
    Dimension {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{kind} index {index} out of range [0, {bound})")]
    Index {
        kind: IndexKind,
        index: usize,
        bound: usize,
    },

    #[error("shape error in grouping {grouping}: {message}")]
    Shape { grouping: usize, message: String },

    #[error("invalid model parameters: {0}")]
    InvalidParams(#[from] ValidationError),

    #[error("degenerate likelihood: {message}")]
    DegenerateLikelihood { message: String },
}

impl ModelError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ModelError::Dimension { .. } => 80,
            ModelError::Index { .. } => 81,
            ModelError::Shape { .. } => 82,
            ModelError::InvalidParams(_) => 83,
            ModelError::DegenerateLikelihood { .. } => 84,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        let err = ModelError::Index {
            kind: IndexKind::Outcome,
            index: 4,
            bound: 2,
        };
        assert_eq!(err.to_string(), "outcome index 4 out of range [0, 2)");

        let err = ModelError::Dimension {
            what: "covariates",
            expected: 3,
            actual: 2,
        };
        assert_eq!(
            err.to_string(),
            "dimension mismatch for covariates: expected 3, got 2"
        );
    }

    #[test]
    fn validation_errors_convert() {
        let err: ModelError = ValidationError::EmptyTimes.into();
        assert!(matches!(err, ModelError::InvalidParams(_)));
        assert_eq!(err.code(), 83);
    }
}
