//! Median ratio normalization pipeline
//!
//! Five stages in strict sequence, each a pure function of the
//! previous stage's output: library-size scaling, group reference
//! construction, median-ratio (tau) estimation, effective-size
//! combination, and raw-count rescaling.

pub mod factors;
pub mod library_size;
pub mod ratio;
pub mod reference;

use ndarray::Array1;

use crate::data::{CountMatrix, GroupAssignment, UnassignedPolicy};
use crate::error::Result;

pub use reference::GroupProfiles;

/// Output of a full MRN run: the rescaled counts plus every
/// intermediate scalar, for inspection and persistence
#[derive(Debug, Clone)]
pub struct MrnResult {
    /// Rescaled pseudo-counts, same sample/gene ordering as the input
    /// (minus dropped samples under `UnassignedPolicy::Drop`)
    pub normalized: CountMatrix,
    /// Raw library size per sample
    pub library_sizes: Array1<f64>,
    /// Group identifiers in sorted order, aligned with `tau`
    pub group_ids: Vec<String>,
    /// Median fold-change scaling factor per group
    pub tau: Array1<f64>,
    /// Effective library size per sample (tau x library size)
    pub effective_sizes: Array1<f64>,
    /// Relative normalization factor per sample (geometric mean 1.0)
    pub relative_factors: Array1<f64>,
    /// The caller-specified reference group
    pub reference_group: String,
    /// Samples removed from the run for lacking a group assignment
    pub dropped_samples: Vec<String>,
}

impl MrnResult {
    /// Sample identifiers of the normalized output
    pub fn sample_ids(&self) -> &[String] {
        self.normalized.sample_ids()
    }

    /// Tau for a specific group
    pub fn tau_of(&self, group_id: &str) -> Option<f64> {
        self.group_ids
            .iter()
            .position(|g| g == group_id)
            .map(|i| self.tau[i])
    }
}

/// Run the full MRN pipeline
///
/// `reference_group` must name a group present in `assignment`; the
/// choice of reference is an experimental-design decision and is never
/// defaulted. Fails fast on any degenerate input (zero library,
/// unassigned sample in strict mode, group with no ratio support);
/// there is no partial output.
pub fn normalize(
    matrix: &CountMatrix,
    assignment: &GroupAssignment,
    reference_group: &str,
    policy: UnassignedPolicy,
) -> Result<MrnResult> {
    let (members, unassigned) = assignment.resolve_members(matrix, policy)?;

    // Under the Drop policy, unassigned samples leave the run entirely:
    // a sample with no group receives no tau and cannot be rescaled.
    let (working, dropped_samples, members) = if unassigned.is_empty() {
        (None, Vec::new(), members)
    } else {
        let dropped: Vec<String> = unassigned
            .iter()
            .map(|&i| matrix.sample_ids()[i].clone())
            .collect();
        log::warn!(
            "Dropping {} unassigned sample(s) from normalization: {:?}",
            dropped.len(),
            dropped
        );

        let kept: Vec<usize> = (0..matrix.n_samples())
            .filter(|i| !unassigned.contains(i))
            .collect();
        let subset = matrix.subset_samples(&kept)?;
        let (members, _) = assignment.resolve_members(&subset, UnassignedPolicy::Error)?;
        (Some(subset), dropped, members)
    };
    let matrix = working.as_ref().unwrap_or(matrix);

    // Stage 1: library-size prenormalization
    let library_sizes = library_size::library_sizes(matrix)?;
    let scaled = library_size::scale_by_library_size(matrix, &library_sizes)?;

    // Stage 2: per-group mean profiles and the reference row
    let profiles = GroupProfiles::from_scaled(scaled.view(), assignment.groups(), &members)?;
    let reference = profiles.reference_profile(reference_group)?;

    // Stage 3: per-group median fold change against the reference
    let tau = ratio::estimate_tau(&profiles, reference.view())?;

    // Stage 4: effective sizes and geometric-mean-centered factors
    let per_sample_tau = factors::sample_taus(&members, tau.view(), matrix.n_samples())?;
    let effective_sizes = factors::effective_sizes(
        library_sizes.view(),
        per_sample_tau.view(),
        matrix.sample_ids(),
    )?;
    let relative_factors = factors::relative_factors(effective_sizes.view())?;

    // Stage 5: rescale the RAW counts
    let normalized = factors::rescale_counts(matrix, relative_factors.view())?;

    Ok(MrnResult {
        normalized,
        library_sizes,
        group_ids: profiles.group_ids().to_vec(),
        tau,
        effective_sizes,
        relative_factors,
        reference_group: reference_group.to_string(),
        dropped_samples,
    })
}
