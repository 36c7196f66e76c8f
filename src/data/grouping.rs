//! Sample-to-group (clone) assignment

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::data::CountMatrix;
use crate::error::{MrnError, Result};

/// How to treat matrix samples that lack a group assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnassignedPolicy {
    /// Abort with an error (strict mode)
    #[default]
    Error,
    /// Drop unassigned samples from the run and the output
    Drop,
}

/// A mapping from sample ID to group (clone) ID
///
/// Every sample maps to exactly one group. Insertion order of samples
/// is preserved; the group list is reported in sorted order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupAssignment {
    /// Sample identifiers
    sample_ids: Vec<String>,
    /// Group identifier per sample, aligned with `sample_ids`
    group_ids: Vec<String>,
}

impl GroupAssignment {
    /// Create a new group assignment from parallel sample/group vectors
    pub fn new(sample_ids: Vec<String>, group_ids: Vec<String>) -> Result<Self> {
        if sample_ids.len() != group_ids.len() {
            return Err(MrnError::DimensionMismatch {
                expected: format!("{} group IDs", sample_ids.len()),
                got: format!("{} group IDs", group_ids.len()),
            });
        }

        if sample_ids.is_empty() {
            return Err(MrnError::InvalidGrouping {
                reason: "Group assignment is empty".to_string(),
            });
        }

        let mut seen = std::collections::HashSet::new();
        for id in &sample_ids {
            if !seen.insert(id.as_str()) {
                return Err(MrnError::InvalidGrouping {
                    reason: format!("Sample '{}' is assigned more than once", id),
                });
            }
        }

        Ok(Self {
            sample_ids,
            group_ids,
        })
    }

    /// Create from (sample, group) pairs
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let (sample_ids, group_ids) = pairs.into_iter().unzip();
        Self::new(sample_ids, group_ids)
    }

    /// Get sample IDs
    pub fn sample_ids(&self) -> &[String] {
        &self.sample_ids
    }

    /// Get the group ID for a sample, if assigned
    pub fn group_of(&self, sample_id: &str) -> Option<&str> {
        self.sample_ids
            .iter()
            .position(|id| id == sample_id)
            .map(|i| self.group_ids[i].as_str())
    }

    /// Check if a group ID is present
    pub fn has_group(&self, group_id: &str) -> bool {
        self.group_ids.iter().any(|g| g == group_id)
    }

    /// Unique group IDs in sorted order
    pub fn groups(&self) -> Vec<String> {
        let mut unique: Vec<String> = self.group_ids.to_vec();
        unique.sort();
        unique.dedup();
        unique
    }

    /// Number of assigned samples
    pub fn n_samples(&self) -> usize {
        self.sample_ids.len()
    }

    /// Resolve group membership against a count matrix
    ///
    /// Returns, for the sorted group order of `groups()`, the matrix
    /// row indices of each group's member samples, plus the row indices
    /// that carry no assignment.
    ///
    /// An assignment naming a sample absent from the matrix is an
    /// `Inconsistent` error regardless of policy; an unassigned matrix
    /// sample is an error only in strict mode.
    pub fn resolve_members(
        &self,
        matrix: &CountMatrix,
        policy: UnassignedPolicy,
    ) -> Result<(Vec<Vec<usize>>, Vec<usize>)> {
        let row_of: HashMap<&str, usize> = matrix
            .sample_ids()
            .iter()
            .enumerate()
            .map(|(i, id)| (id.as_str(), i))
            .collect();

        for sample_id in &self.sample_ids {
            if !row_of.contains_key(sample_id.as_str()) {
                return Err(MrnError::Inconsistent {
                    reason: format!(
                        "Sample '{}' is in the group assignment but not in the count matrix",
                        sample_id
                    ),
                });
            }
        }

        let groups = self.groups();
        let group_index: HashMap<String, usize> = groups
            .iter()
            .enumerate()
            .map(|(i, g)| (g.clone(), i))
            .collect();

        let mut members: Vec<Vec<usize>> = vec![Vec::new(); groups.len()];
        let mut unassigned: Vec<usize> = Vec::new();

        for (row, sample_id) in matrix.sample_ids().iter().enumerate() {
            match self.group_of(sample_id) {
                Some(group_id) => members[group_index[group_id]].push(row),
                None => match policy {
                    UnassignedPolicy::Error => {
                        return Err(MrnError::Inconsistent {
                            reason: format!(
                                "Sample '{}' in the count matrix has no group assignment",
                                sample_id
                            ),
                        });
                    }
                    UnassignedPolicy::Drop => unassigned.push(row),
                },
            }
        }

        Ok((members, unassigned))
    }
}
