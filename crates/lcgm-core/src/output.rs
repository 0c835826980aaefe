//! Command payloads and their renderings.
//!
//! Every command builds a serializable report; `--format json` prints it
//! as pretty JSON, `--format summary` as a few human-readable lines.

use clap::ValueEnum;
use lcgm_config::ParamsSnapshot;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::posterior::{PosteriorResult, SubjectPosterior};

/// Supported output formats for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Structured JSON (default)
    #[default]
    Json,

    /// Short human-readable summary
    Summary,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Summary => write!(f, "summary"),
        }
    }
}

/// Error details attached to a failed subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub code: u32,
    pub message: String,
}

impl From<&ModelError> for ErrorReport {
    fn from(err: &ModelError) -> Self {
        ErrorReport {
            code: err.code(),
            message: err.to_string(),
        }
    }
}

/// Outcome of scoring one subject in a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubjectEntry {
    Scored {
        index: usize,
        #[serde(flatten)]
        scored: SubjectPosterior,
    },
    Failed {
        index: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        error: ErrorReport,
    },
}

impl SubjectEntry {
    pub fn from_result(
        index: usize,
        id: Option<&str>,
        result: Result<SubjectPosterior, ModelError>,
    ) -> Self {
        match result {
            Ok(scored) => SubjectEntry::Scored { index, scored },
            Err(err) => SubjectEntry::Failed {
                index,
                id: id.map(str::to_string),
                error: ErrorReport::from(&err),
            },
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, SubjectEntry::Failed { .. })
    }
}

/// Payload of the `posterior` command.
#[derive(Debug, Clone, Serialize)]
pub struct PosteriorReport {
    pub run_id: String,
    pub params: ParamsSnapshot,
    pub group_labels: Vec<String>,
    pub scored: usize,
    pub failed: usize,
    pub subjects: Vec<SubjectEntry>,
}

impl PosteriorReport {
    pub fn new(
        run_id: String,
        params: ParamsSnapshot,
        group_labels: Vec<String>,
        subjects: Vec<SubjectEntry>,
    ) -> Self {
        let failed = subjects.iter().filter(|s| s.is_failed()).count();
        PosteriorReport {
            run_id,
            params,
            group_labels,
            scored: subjects.len() - failed,
            failed,
            subjects,
        }
    }

    pub fn render_summary(&self) -> String {
        let mut lines = Vec::with_capacity(self.subjects.len() + 1);
        for entry in &self.subjects {
            lines.push(match entry {
                SubjectEntry::Scored { index, scored } => format!(
                    "{}: {}",
                    subject_name(*index, scored.id.as_deref()),
                    describe_posterior(&scored.result, &self.group_labels)
                ),
                SubjectEntry::Failed { index, id, error } => format!(
                    "{}: error {}: {}",
                    subject_name(*index, id.as_deref()),
                    error.code,
                    error.message
                ),
            });
        }
        lines.push(format!(
            "{} subjects: {} scored, {} failed (params {})",
            self.subjects.len(),
            self.scored,
            self.failed,
            self.params.short_id()
        ));
        lines.join("\n")
    }
}

fn subject_name(index: usize, id: Option<&str>) -> String {
    match id {
        Some(id) => id.to_string(),
        None => format!("#{index}"),
    }
}

fn describe_posterior(result: &PosteriorResult, labels: &[String]) -> String {
    let label = labels
        .get(result.modal_group)
        .map(String::as_str)
        .unwrap_or("?");
    let probability = result
        .posterior
        .get(result.modal_group)
        .copied()
        .unwrap_or(f64::NAN);
    let mut text = format!("{label} (p={probability:.4})");
    if result.overflow_guarded {
        text.push_str(" [overflow guarded]");
    }
    text
}

/// Payload of the `trajectory` command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryReport {
    pub group: usize,
    pub group_label: String,
    pub outcome: usize,
    pub outcome_name: String,
    pub times: Vec<f64>,
    pub values: Vec<f64>,
}

impl TrajectoryReport {
    pub fn render_summary(&self) -> String {
        format!(
            "{} / {}: {}",
            self.group_label,
            self.outcome_name,
            format_points(&self.times, &self.values)
        )
    }
}

/// One collapsed line of the `collapse` command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollapsedLine {
    pub grouping: usize,
    pub members: Vec<usize>,
    pub values: Vec<f64>,
}

/// Payload of the `collapse` command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollapseReport {
    pub outcome: usize,
    pub outcome_name: String,
    pub times: Vec<f64>,
    pub lines: Vec<CollapsedLine>,
}

impl CollapseReport {
    pub fn render_summary(&self) -> String {
        self.lines
            .iter()
            .map(|line| {
                let members: Vec<String> = line.members.iter().map(usize::to_string).collect();
                format!(
                    "{} [{}]: {}",
                    self.outcome_name,
                    members.join(","),
                    format_points(&self.times, &line.values)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Summary rendering of a parameter snapshot (the `check` command).
pub fn render_snapshot_summary(snapshot: &ParamsSnapshot) -> String {
    let s = &snapshot.summary;
    format!(
        "params ok: {} groups, {} outcomes, {} periods, {} covariates, degree <= {} ({} {}, sha256 {})",
        s.n_groups,
        s.n_outcomes,
        s.n_periods,
        s.n_covariates,
        s.max_degree,
        snapshot.params_source,
        snapshot.params_path.as_deref().unwrap_or("-"),
        snapshot.short_id()
    )
}

fn format_points(times: &[f64], values: &[f64]) -> String {
    times
        .iter()
        .zip(values)
        .map(|(t, v)| format!("t={t}: {v:.4}"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IndexKind;

    fn result(posterior: Vec<f64>, modal_group: usize) -> PosteriorResult {
        PosteriorResult {
            log_posterior: posterior.iter().map(|p| p.ln()).collect(),
            prior: posterior.clone(),
            posterior,
            evidence_terms: Vec::new(),
            modal_group,
            overflow_guarded: false,
        }
    }

    #[test]
    fn failed_entries_carry_error_codes() {
        let err = ModelError::Index {
            kind: IndexKind::Group,
            index: 9,
            bound: 2,
        };
        let entry = SubjectEntry::from_result(3, Some("s-3"), Err(err));
        assert!(entry.is_failed());
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["error"]["code"], 81);
        assert_eq!(json["id"], "s-3");
    }

    #[test]
    fn scored_entries_are_flat() {
        let scored = SubjectPosterior {
            id: Some("a".to_string()),
            result: result(vec![0.2, 0.8], 1),
        };
        let entry = SubjectEntry::from_result(0, Some("a"), Ok(scored));
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["status"], "scored");
        assert_eq!(json["index"], 0);
        assert_eq!(json["modal_group"], 1);
    }

    #[test]
    fn describe_uses_labels() {
        let labels = vec!["low".to_string(), "high".to_string()];
        assert_eq!(
            describe_posterior(&result(vec![0.25, 0.75], 1), &labels),
            "high (p=0.7500)"
        );
    }

    #[test]
    fn trajectory_summary_lists_points() {
        let report = TrajectoryReport {
            group: 0,
            group_label: "group_0".to_string(),
            outcome: 0,
            outcome_name: "outcome_0".to_string(),
            times: vec![0.0, 1.0],
            values: vec![5.0, 5.5],
        };
        assert_eq!(
            report.render_summary(),
            "group_0 / outcome_0: t=0: 5.0000, t=1: 5.5000"
        );
    }

    #[test]
    fn output_format_display() {
        assert_eq!(OutputFormat::Json.to_string(), "json");
        assert_eq!(OutputFormat::Summary.to_string(), "summary");
    }
}
