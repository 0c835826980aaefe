//! Parameter snapshots for provenance.
//!
//! A snapshot records which fitted parameters produced an evaluation so
//! results can be traced back to the exact file content.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::params::ParamsDocument;
use crate::resolve::ParamsSource;

/// A frozen snapshot of the loaded parameters.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ParamsSnapshot {
    /// When this snapshot was taken.
    pub timestamp: DateTime<Utc>,

    /// Schema version of the parameter document.
    pub schema_version: String,

    /// Path the parameters were loaded from.
    #[serde(default)]
    pub params_path: Option<String>,

    /// Where the parameters came from.
    pub params_source: String,

    /// SHA-256 hash of the parameter JSON content.
    pub params_hash: String,

    /// Shape of the model.
    pub summary: ParamsSummary,
}

/// Shape summary of a parameter bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ParamsSummary {
    pub n_groups: usize,
    pub n_outcomes: usize,
    pub n_periods: usize,
    pub n_covariates: usize,
    pub max_degree: usize,
}

impl ParamsSummary {
    pub fn from_document(doc: &ParamsDocument) -> Self {
        ParamsSummary {
            n_groups: doc.n_groups,
            n_outcomes: doc.n_outcomes,
            n_periods: doc.params.times.len(),
            n_covariates: doc.params.covariate_len().unwrap_or(0),
            max_degree: doc.params.max_degree(),
        }
    }
}

impl ParamsSnapshot {
    /// Create a snapshot from a loaded document and its raw JSON content.
    pub fn new(
        doc: &ParamsDocument,
        path: Option<&std::path::Path>,
        source: ParamsSource,
        content: &str,
    ) -> Self {
        ParamsSnapshot {
            timestamp: Utc::now(),
            schema_version: doc.schema_version.clone(),
            params_path: path.map(|p| p.display().to_string()),
            params_source: source.to_string(),
            params_hash: hash_content(content),
            summary: ParamsSummary::from_document(doc),
        }
    }

    /// Serialize snapshot to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Check if this snapshot describes the same parameter content as another.
    pub fn matches(&self, other: &ParamsSnapshot) -> bool {
        self.params_hash == other.params_hash
    }

    /// Get a short identifier for this snapshot (first 12 chars of hash).
    pub fn short_id(&self) -> &str {
        &self.params_hash[..12.min(self.params_hash.len())]
    }
}

/// Hash content with SHA-256 and return hex string.
pub(crate) fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{Limits, ModelParams};

    fn doc() -> ParamsDocument {
        ParamsDocument::new(
            1,
            2,
            ModelParams {
                theta: vec![vec![0.0, 0.0, 0.0], vec![1.0, -1.0, 0.5]],
                beta: vec![vec![vec![5.0, 1.0]], vec![vec![10.0]]],
                sigma: vec![1.0],
                times: vec![0.0, 1.0, 2.0, 3.0],
                limits: vec![Limits::unbounded()],
                outcome_names: None,
                group_labels: None,
            },
        )
    }

    #[test]
    fn test_summary_shape() {
        let summary = ParamsSummary::from_document(&doc());
        assert_eq!(
            summary,
            ParamsSummary {
                n_groups: 2,
                n_outcomes: 1,
                n_periods: 4,
                n_covariates: 2,
                max_degree: 1,
            }
        );
    }

    #[test]
    fn test_snapshot_short_id() {
        let snapshot = ParamsSnapshot::new(&doc(), None, ParamsSource::InMemory, "{}");
        assert_eq!(snapshot.short_id().len(), 12);
        assert_eq!(snapshot.params_source, "in memory");
    }

    #[test]
    fn test_snapshot_matches_on_content() {
        let a = ParamsSnapshot::new(&doc(), None, ParamsSource::InMemory, "same");
        let b = ParamsSnapshot::new(&doc(), None, ParamsSource::CliArgument, "same");
        let c = ParamsSnapshot::new(&doc(), None, ParamsSource::InMemory, "other");
        assert!(a.matches(&b));
        assert!(!a.matches(&c));
    }

    #[test]
    fn test_hash_content() {
        let hash1 = hash_content("test");
        let hash2 = hash_content("test");
        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64); // SHA-256 produces 64 hex chars
    }

    #[test]
    fn test_snapshot_serializes() {
        let snapshot = ParamsSnapshot::new(&doc(), None, ParamsSource::InMemory, "{}");
        let json = snapshot.to_json().unwrap();
        assert!(json.contains("\"params_hash\""));
    }
}
