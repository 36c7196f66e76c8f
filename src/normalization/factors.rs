//! Effective library sizes and final count rescaling (stages 4-5)

use ndarray::{Array1, Array2, ArrayView1, Axis};

use crate::data::CountMatrix;
use crate::error::{MrnError, Result};
use crate::stats::geometric_mean;

/// Broadcast the per-group tau onto samples via group membership
///
/// `members` holds matrix row indices per group, aligned with the tau
/// vector; every row of the matrix must appear in exactly one group.
pub fn sample_taus(
    members: &[Vec<usize>],
    tau: ArrayView1<f64>,
    n_samples: usize,
) -> Result<Array1<f64>> {
    if members.len() != tau.len() {
        return Err(MrnError::DimensionMismatch {
            expected: format!("{} tau values", members.len()),
            got: format!("{}", tau.len()),
        });
    }

    let mut per_sample = Array1::from_elem(n_samples, f64::NAN);
    for (g, rows) in members.iter().enumerate() {
        for &row in rows {
            per_sample[row] = tau[g];
        }
    }

    if per_sample.iter().any(|x| x.is_nan()) {
        return Err(MrnError::Inconsistent {
            reason: "A sample is not covered by any group's tau".to_string(),
        });
    }

    Ok(per_sample)
}

/// Effective library size: the raw library size adjusted by the
/// sample's group tau
pub fn effective_sizes(
    library_sizes: ArrayView1<f64>,
    taus: ArrayView1<f64>,
    sample_ids: &[String],
) -> Result<Array1<f64>> {
    let effective = &library_sizes * &taus;

    for (i, &size) in effective.iter().enumerate() {
        if size <= 0.0 || !size.is_finite() {
            return Err(MrnError::Domain {
                operation: "effective library size".to_string(),
                details: format!(
                    "sample '{}' has non-positive effective library size {}",
                    sample_ids[i], size
                ),
            });
        }
    }

    Ok(effective)
}

/// Relative normalization factor: effective library size divided by
/// the geometric mean of effective sizes across all samples
///
/// The factors have geometric mean 1.0 over the sample population by
/// construction.
pub fn relative_factors(effective: ArrayView1<f64>) -> Result<Array1<f64>> {
    let values: Vec<f64> = effective.to_vec();
    let geo_mean = geometric_mean(&values).ok_or_else(|| MrnError::Domain {
        operation: "geometric mean of effective library sizes".to_string(),
        details: "logarithm undefined for non-positive values".to_string(),
    })?;

    Ok(effective.mapv(|x| x / geo_mean))
}

/// Divide each sample's RAW counts by its relative normalization
/// factor (stage 5)
///
/// The input is the original count matrix, not the library-size-scaled
/// one; the output keeps its shape and sample/gene ordering.
pub fn rescale_counts(matrix: &CountMatrix, factors: ArrayView1<f64>) -> Result<CountMatrix> {
    if factors.len() != matrix.n_samples() {
        return Err(MrnError::DimensionMismatch {
            expected: format!("{} factors", matrix.n_samples()),
            got: format!("{}", factors.len()),
        });
    }

    let mut normalized: Array2<f64> = matrix.counts().to_owned();
    for (mut row, &factor) in normalized.axis_iter_mut(Axis(0)).zip(factors.iter()) {
        row.mapv_inplace(|x| x / factor);
    }

    CountMatrix::new(
        normalized,
        matrix.sample_ids().to_vec(),
        matrix.gene_ids().to_vec(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_sample_taus_broadcast() {
        let members = vec![vec![0, 2], vec![1]];
        let tau = array![2.0, 0.5];
        let per_sample = sample_taus(&members, tau.view(), 3).unwrap();
        assert_eq!(per_sample, array![2.0, 0.5, 2.0]);
    }

    #[test]
    fn test_uncovered_sample_is_error() {
        let members = vec![vec![0]];
        let tau = array![2.0];
        let result = sample_taus(&members, tau.view(), 2);
        assert!(matches!(result, Err(MrnError::Inconsistent { .. })));
    }

    #[test]
    fn test_relative_factors_geometric_mean_is_one() {
        let effective = array![30.0, 40.0, 5.0, 45.0];
        let factors = relative_factors(effective.view()).unwrap();

        let log_mean = factors.iter().map(|&x| x.ln()).sum::<f64>() / factors.len() as f64;
        assert!((log_mean.exp() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_non_positive_effective_size_is_domain_error() {
        let lib = array![10.0, 0.0];
        let tau = array![1.0, 1.0];
        let ids = vec!["s1".to_string(), "s2".to_string()];
        let result = effective_sizes(lib.view(), tau.view(), &ids);
        assert!(matches!(result, Err(MrnError::Domain { .. })));
    }

    #[test]
    fn test_rescale_divides_raw_counts() {
        let matrix = CountMatrix::new(
            array![[10.0, 20.0], [5.0, 15.0]],
            vec!["s1".to_string(), "s2".to_string()],
            vec!["g1".to_string(), "g2".to_string()],
        )
        .unwrap();
        let factors = array![2.0, 0.5];

        let normalized = rescale_counts(&matrix, factors.view()).unwrap();
        assert_eq!(normalized.counts()[[0, 0]], 5.0);
        assert_eq!(normalized.counts()[[0, 1]], 10.0);
        assert_eq!(normalized.counts()[[1, 0]], 10.0);
        assert_eq!(normalized.counts()[[1, 1]], 30.0);
    }
}
