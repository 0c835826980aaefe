//! Per-subject evaluation inputs.

use schemars::{JsonSchema, Schema, SchemaGenerator};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// One observed value of an outcome at one time period.
///
/// Serialized as a JSON number, or `null` when the period was not observed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "Option<f64>", into = "Option<f64>")]
pub enum Observation {
    Present(f64),
    Missing,
}

impl Observation {
    pub fn value(self) -> Option<f64> {
        match self {
            Observation::Present(v) => Some(v),
            Observation::Missing => None,
        }
    }

    pub fn is_missing(self) -> bool {
        matches!(self, Observation::Missing)
    }
}

impl JsonSchema for Observation {
    fn schema_name() -> Cow<'static, str> {
        "Observation".into()
    }

    fn inline_schema() -> bool {
        true
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        <Option<f64>>::json_schema(generator)
    }
}

impl From<Option<f64>> for Observation {
    fn from(value: Option<f64>) -> Self {
        match value {
            Some(v) => Observation::Present(v),
            None => Observation::Missing,
        }
    }
}

impl From<Observation> for Option<f64> {
    fn from(obs: Observation) -> Self {
        obs.value()
    }
}

impl From<f64> for Observation {
    fn from(value: f64) -> Self {
        Observation::Present(value)
    }
}

/// Build an observation sequence from optional values.
pub fn observations<I, T>(values: I) -> Vec<Observation>
where
    I: IntoIterator<Item = T>,
    T: Into<Observation>,
{
    values.into_iter().map(Into::into).collect()
}

/// A subject to classify: baseline covariates plus observed trajectories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SubjectRecord {
    /// Caller-supplied identifier, echoed in results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Raw covariates (no intercept).
    pub covariates: Vec<f64>,
    /// Observations indexed by outcome then time period.
    pub outcomes: Vec<Vec<Observation>>,
}
