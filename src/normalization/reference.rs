//! Group reference construction (pipeline stage 2)

use ndarray::{Array1, Array2, ArrayView2};
use rayon::prelude::*;

use crate::error::{MrnError, Result};

/// Per-group mean expression profiles over library-size-scaled counts
///
/// Row order follows the sorted group order; column order is the
/// canonical gene order of the input matrix.
#[derive(Debug, Clone)]
pub struct GroupProfiles {
    /// Group identifiers (row order, sorted)
    group_ids: Vec<String>,
    /// Mean scaled profile per group (groups x genes)
    profiles: Array2<f64>,
}

impl GroupProfiles {
    /// Compute the element-wise mean of the scaled rows of each group's
    /// member samples
    ///
    /// `members` holds matrix row indices per group, aligned with
    /// `group_ids` (see `GroupAssignment::resolve_members`). A group
    /// with no member samples in the matrix cannot contribute a
    /// profile and is an error.
    pub fn from_scaled(
        scaled: ArrayView2<f64>,
        group_ids: Vec<String>,
        members: &[Vec<usize>],
    ) -> Result<Self> {
        if group_ids.len() != members.len() {
            return Err(MrnError::DimensionMismatch {
                expected: format!("{} member lists", group_ids.len()),
                got: format!("{}", members.len()),
            });
        }

        for (group_id, rows) in group_ids.iter().zip(members.iter()) {
            if rows.is_empty() {
                return Err(MrnError::InvalidGrouping {
                    reason: format!("Group '{}' has no samples in the count matrix", group_id),
                });
            }
        }

        let n_genes = scaled.ncols();
        let rows: Vec<Array1<f64>> = members
            .par_iter()
            .map(|rows| {
                let mut mean = Array1::<f64>::zeros(n_genes);
                for &row in rows {
                    mean += &scaled.row(row);
                }
                mean /= rows.len() as f64;
                mean
            })
            .collect();

        let mut profiles = Array2::zeros((group_ids.len(), n_genes));
        for (i, row) in rows.into_iter().enumerate() {
            profiles.row_mut(i).assign(&row);
        }

        Ok(Self {
            group_ids,
            profiles,
        })
    }

    /// Group identifiers in row order
    pub fn group_ids(&self) -> &[String] {
        &self.group_ids
    }

    /// Profile matrix (groups x genes)
    pub fn profiles(&self) -> ArrayView2<'_, f64> {
        self.profiles.view()
    }

    /// Number of groups
    pub fn n_groups(&self) -> usize {
        self.group_ids.len()
    }

    /// Row index of a group ID
    pub fn group_index(&self, group_id: &str) -> Option<usize> {
        self.group_ids.iter().position(|g| g == group_id)
    }

    /// Select the reference profile for a caller-specified group
    pub fn reference_profile(&self, reference_group: &str) -> Result<Array1<f64>> {
        let idx = self
            .group_index(reference_group)
            .ok_or_else(|| MrnError::ReferenceGroupNotFound {
                group_id: reference_group.to_string(),
            })?;

        Ok(self.profiles.row(idx).to_owned())
    }
}
