//! JSON Schema generation for parameter files, subject input and results.
//!
//! ```bash
//! lcgm-core schema --list
//! lcgm-core schema PosteriorResult
//! ```

use schemars::schema_for;
use serde_json::Value;
use std::collections::BTreeMap;

pub use crate::observation::SubjectRecord;
pub use crate::posterior::{EvidenceTerm, PosteriorResult, SubjectPosterior};
pub use lcgm_config::{Limits, ModelParams, ParamsDocument, ParamsSnapshot};

/// Available schema types with their descriptions.
pub fn available_schemas() -> Vec<(&'static str, &'static str)> {
    vec![
        // Inputs
        ("ParamsDocument", "params.json file: counts, version and coefficients"),
        ("ModelParams", "Fitted coefficient bundle"),
        ("Limits", "Censoring bounds for one outcome (null = unbounded)"),
        ("SubjectRecord", "Covariates and observed trajectories of one subject"),
        // Outputs
        ("PosteriorResult", "Posterior membership with prior and evidence"),
        ("EvidenceTerm", "Per-group log-likelihood of one outcome"),
        ("SubjectPosterior", "Posterior result tagged with the subject id"),
        ("ParamsSnapshot", "Provenance of the loaded parameter file"),
    ]
}

/// Generate JSON Schema for a type by name.
///
/// Returns None if the type is unknown.
pub fn generate_schema(type_name: &str) -> Option<Value> {
    let schema = match type_name {
        "ParamsDocument" => schema_for!(ParamsDocument),
        "ModelParams" => schema_for!(ModelParams),
        "Limits" => schema_for!(Limits),
        "SubjectRecord" => schema_for!(SubjectRecord),
        "PosteriorResult" => schema_for!(PosteriorResult),
        "EvidenceTerm" => schema_for!(EvidenceTerm),
        "SubjectPosterior" => schema_for!(SubjectPosterior),
        "ParamsSnapshot" => schema_for!(ParamsSnapshot),
        _ => return None,
    };

    serde_json::to_value(schema).ok()
}

/// Generate all schemas as a map from type name to schema.
pub fn generate_all_schemas() -> BTreeMap<String, Value> {
    available_schemas()
        .into_iter()
        .filter_map(|(name, _)| generate_schema(name).map(|schema| (name.to_string(), schema)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_schemas_generate() {
        for (name, _desc) in available_schemas() {
            assert!(
                generate_schema(name).is_some(),
                "Schema for '{}' should generate",
                name
            );
        }
    }

    #[test]
    fn test_unknown_schema_returns_none() {
        assert!(generate_schema("UnknownType").is_none());
        assert!(generate_schema("").is_none());
    }

    #[test]
    fn test_subject_record_schema_lists_fields() {
        let schema = generate_schema("SubjectRecord").unwrap();
        let props = schema.get("properties").expect("object schema");
        assert!(props.get("covariates").is_some());
        assert!(props.get("outcomes").is_some());
    }

    #[test]
    fn test_generate_all_schemas() {
        let all = generate_all_schemas();
        assert_eq!(all.len(), available_schemas().len());
        assert!(all.contains_key("ParamsDocument"));
        assert!(all.contains_key("PosteriorResult"));
    }
}
