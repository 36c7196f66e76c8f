//! Per-group median fold-change estimation (pipeline stage 3)

use ndarray::{Array1, ArrayView1};
use rayon::prelude::*;

use crate::error::{MrnError, Result};
use crate::normalization::reference::GroupProfiles;
use crate::stats::median;

/// Estimate the per-group scaling factor tau
///
/// For each group, the fold change profile[gene] / reference[gene] is
/// collected over exactly the genes where both values are strictly
/// positive; zeros are excluded from the ratio set, never imputed.
/// Tau is the median of that sequence. The reference group's own tau
/// is 1.0 by construction.
///
/// A group with no mutually positive genes against the reference has
/// no computable ratio and aborts the run; defaulting its tau to 1.0
/// would silently corrupt every downstream factor.
pub fn estimate_tau(profiles: &GroupProfiles, reference: ArrayView1<f64>) -> Result<Array1<f64>> {
    if reference.len() != profiles.profiles().ncols() {
        return Err(MrnError::DimensionMismatch {
            expected: format!("{} reference entries", profiles.profiles().ncols()),
            got: format!("{}", reference.len()),
        });
    }

    let taus: Vec<Result<f64>> = profiles
        .group_ids()
        .par_iter()
        .enumerate()
        .map(|(g, group_id)| {
            let profile = profiles.profiles();
            let ratios: Vec<f64> = reference
                .iter()
                .enumerate()
                .filter_map(|(j, &ref_val)| {
                    let val = profile[[g, j]];
                    if val > 0.0 && ref_val > 0.0 {
                        Some(val / ref_val)
                    } else {
                        None
                    }
                })
                .collect();

            median(&ratios).ok_or_else(|| MrnError::InsufficientData {
                group_id: group_id.clone(),
                reason: "no genes with nonzero values in both the group profile \
                         and the reference profile"
                    .to_string(),
            })
        })
        .collect();

    let mut result = Array1::zeros(profiles.n_groups());
    for (g, tau) in taus.into_iter().enumerate() {
        result[g] = tau?;
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn profiles(data: ndarray::Array2<f64>, groups: &[&str]) -> GroupProfiles {
        let members: Vec<Vec<usize>> = (0..groups.len()).map(|i| vec![i]).collect();
        GroupProfiles::from_scaled(
            data.view(),
            groups.iter().map(|s| s.to_string()).collect(),
            &members,
        )
        .unwrap()
    }

    #[test]
    fn test_reference_tau_is_one() {
        let p = profiles(array![[0.2, 0.8, 0.0], [0.1, 0.4, 0.5]], &["a", "b"]);
        let reference = p.reference_profile("a").unwrap();
        let tau = estimate_tau(&p, reference.view()).unwrap();
        assert_eq!(tau[0], 1.0);
    }

    #[test]
    fn test_zero_genes_excluded() {
        // Gene 3 is zero in the reference, gene 2 zero in group b:
        // only gene 1 enters b's ratio set.
        let p = profiles(array![[0.5, 0.5, 0.0], [0.25, 0.0, 0.75]], &["a", "b"]);
        let reference = p.reference_profile("a").unwrap();
        let tau = estimate_tau(&p, reference.view()).unwrap();
        assert!((tau[1] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_even_ratio_count_uses_middle_average() {
        let p = profiles(
            array![[0.25, 0.25, 0.25, 0.25], [0.1, 0.2, 0.3, 0.4]],
            &["a", "b"],
        );
        let reference = p.reference_profile("a").unwrap();
        let tau = estimate_tau(&p, reference.view()).unwrap();
        // Ratios for b: [0.4, 0.8, 1.2, 1.6]; the two middle values
        // average to 1.0.
        assert_eq!(tau[0], 1.0);
        assert!((tau[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_disjoint_support_is_insufficient_data() {
        // Group b expresses only the gene the reference never does.
        let p = profiles(array![[0.6, 0.4, 0.0], [0.0, 0.0, 1.0]], &["a", "b"]);
        let reference = p.reference_profile("a").unwrap();
        let result = estimate_tau(&p, reference.view());
        assert!(matches!(
            result,
            Err(MrnError::InsufficientData { ref group_id, .. }) if group_id == "b"
        ));
    }
}
