//! Fitted trajectories and super-group averages for reporting.

use std::collections::BTreeMap;

use lcgm_math::{polyval_grid, ObservationDensity};
use ndarray::{Array2, Axis};

use crate::error::ModelError;
use crate::logging::Stage;
use crate::model::Model;

impl<D: ObservationDensity> Model<D> {
    /// Fitted mean of `outcome` for `group` at every time point.
    pub fn fitted_trajectory(&self, group: usize, outcome: usize) -> Result<Vec<f64>, ModelError> {
        let coeffs = self.coefficients(group, outcome)?;
        Ok(polyval_grid(coeffs, &self.params.times))
    }

    /// One trajectory per grouping: the member's own curve for singletons,
    /// the per-period mean of the members' curves otherwise.
    ///
    /// Results are keyed by the grouping's position in `groupings`.
    pub fn collapsed_trajectories(
        &self,
        outcome: usize,
        groupings: &[Vec<usize>],
    ) -> Result<BTreeMap<usize, Vec<f64>>, ModelError> {
        self.check_outcome(outcome)?;

        let mut collapsed = BTreeMap::new();
        for (position, members) in groupings.iter().enumerate() {
            let mut lines = members
                .iter()
                .map(|&group| self.fitted_trajectory(group, outcome))
                .collect::<Result<Vec<_>, _>>()?;
            let line = if lines.len() == 1 {
                lines.swap_remove(0)
            } else {
                mean_of_lines(position, &lines)?
            };
            collapsed.insert(position, line);
        }

        tracing::debug!(
            stage = %Stage::Report,
            outcome,
            groupings = groupings.len(),
            "collapsed trajectories"
        );
        Ok(collapsed)
    }
}

/// Column means of equal-length rows.
fn mean_of_lines(grouping: usize, lines: &[Vec<f64>]) -> Result<Vec<f64>, ModelError> {
    let width = lines
        .first()
        .map(Vec::len)
        .ok_or_else(|| ModelError::Shape {
            grouping,
            message: "grouping has no members".to_string(),
        })?;
    if let Some((row, line)) = lines.iter().enumerate().find(|(_, l)| l.len() != width) {
        return Err(ModelError::Shape {
            grouping,
            message: format!("member {row} has {} periods, expected {width}", line.len()),
        });
    }

    let table = Array2::from_shape_vec((lines.len(), width), lines.concat()).map_err(|e| {
        ModelError::Shape {
            grouping,
            message: e.to_string(),
        }
    })?;
    let means = table.mean_axis(Axis(0)).ok_or_else(|| ModelError::Shape {
        grouping,
        message: "no rows to average".to_string(),
    })?;
    Ok(means.to_vec())
}
