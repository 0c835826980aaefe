//! Structured event vocabulary for logging.
//!
//! Every evaluation event carries a run id, the subject being scored (when
//! there is one) and the stage that produced it.

use serde::{Deserialize, Serialize};

/// Processing stages of a model evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Startup and argument handling.
    Init,
    /// Parameter resolution and loading.
    Load,
    /// Softmax membership risk.
    Risk,
    /// Conditional trajectory likelihood.
    Likelihood,
    /// Posterior combination.
    Posterior,
    /// Trajectory reporting.
    Report,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Init => "init",
            Stage::Load => "load",
            Stage::Risk => "risk",
            Stage::Likelihood => "likelihood",
            Stage::Posterior => "posterior",
            Stage::Report => "report",
        };
        write!(f, "{}", s)
    }
}

/// Standard event names used in logging.
pub mod event_names {
    pub const RUN_STARTED: &str = "run.started";
    pub const RUN_FINISHED: &str = "run.finished";

    pub const PARAMS_LOADED: &str = "params.loaded";
    pub const PARAMS_INVALID: &str = "params.invalid";

    pub const SUBJECT_SCORED: &str = "subject.scored";
    pub const SUBJECT_FAILED: &str = "subject.failed";

    /// Raw exponentiation would have left f64 range; the max-shifted path was used.
    pub const NUMERIC_OVERFLOW_GUARDED: &str = "model.numeric_overflow_guarded";
}

/// Correlation context attached to log events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogContext {
    pub run_id: String,
    pub subject_id: Option<String>,
}

impl LogContext {
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            subject_id: None,
        }
    }

    pub fn with_subject_id(&self, subject_id: impl Into<String>) -> Self {
        Self {
            run_id: self.run_id.clone(),
            subject_id: Some(subject_id.into()),
        }
    }
}
