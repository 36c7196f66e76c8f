//! Count matrix representation for RNA-seq data

use std::collections::HashSet;

use ndarray::{Array2, ArrayView1, ArrayView2, Axis};

use crate::error::{MrnError, Result};

/// A count matrix of RNA-seq read counts
///
/// Rows are samples, columns are genes. The row and column orders are
/// canonical: every derived matrix and vector in the pipeline is
/// indexed against them.
#[derive(Debug, Clone)]
pub struct CountMatrix {
    /// Raw count data (samples x genes)
    counts: Array2<f64>,
    /// Sample identifiers (row order)
    sample_ids: Vec<String>,
    /// Gene identifiers (column order)
    gene_ids: Vec<String>,
}

impl CountMatrix {
    /// Create a new count matrix from raw data
    pub fn new(
        counts: Array2<f64>,
        sample_ids: Vec<String>,
        gene_ids: Vec<String>,
    ) -> Result<Self> {
        let (n_samples, n_genes) = counts.dim();

        if sample_ids.len() != n_samples {
            return Err(MrnError::DimensionMismatch {
                expected: format!("{} sample IDs", n_samples),
                got: format!("{} sample IDs", sample_ids.len()),
            });
        }

        if gene_ids.len() != n_genes {
            return Err(MrnError::DimensionMismatch {
                expected: format!("{} gene IDs", n_genes),
                got: format!("{} gene IDs", gene_ids.len()),
            });
        }

        if counts.iter().any(|&x| x < 0.0 || x.is_nan() || x.is_infinite()) {
            return Err(MrnError::InvalidCountMatrix {
                reason: "Counts must be non-negative finite values".to_string(),
            });
        }

        if !counts.is_empty() && counts.iter().all(|&x| x == 0.0) {
            return Err(MrnError::InvalidCountMatrix {
                reason: "All samples have 0 counts for all genes".to_string(),
            });
        }

        check_unique(&sample_ids, "sample")?;
        check_unique(&gene_ids, "gene")?;

        Ok(Self {
            counts,
            sample_ids,
            gene_ids,
        })
    }

    /// Create from integer counts
    pub fn from_integers(
        counts: Array2<u32>,
        sample_ids: Vec<String>,
        gene_ids: Vec<String>,
    ) -> Result<Self> {
        let float_counts = counts.mapv(|x| x as f64);
        Self::new(float_counts, sample_ids, gene_ids)
    }

    /// Get the number of samples
    pub fn n_samples(&self) -> usize {
        self.counts.nrows()
    }

    /// Get the number of genes
    pub fn n_genes(&self) -> usize {
        self.counts.ncols()
    }

    /// Get the raw counts as a view
    pub fn counts(&self) -> ArrayView2<'_, f64> {
        self.counts.view()
    }

    /// Get sample IDs
    pub fn sample_ids(&self) -> &[String] {
        &self.sample_ids
    }

    /// Get gene IDs
    pub fn gene_ids(&self) -> &[String] {
        &self.gene_ids
    }

    /// Get counts for a specific sample
    pub fn sample_counts(&self, sample_idx: usize) -> ArrayView1<'_, f64> {
        self.counts.row(sample_idx)
    }

    /// Get counts for a specific gene
    pub fn gene_counts(&self, gene_idx: usize) -> ArrayView1<'_, f64> {
        self.counts.column(gene_idx)
    }

    /// Get sample index by ID
    pub fn sample_index(&self, sample_id: &str) -> Option<usize> {
        self.sample_ids.iter().position(|id| id == sample_id)
    }

    /// Get gene index by ID
    pub fn gene_index(&self, gene_id: &str) -> Option<usize> {
        self.gene_ids.iter().position(|id| id == gene_id)
    }

    /// Sum of counts per sample (library size)
    pub fn library_sizes(&self) -> Vec<f64> {
        self.counts
            .axis_iter(Axis(0))
            .map(|row| row.sum())
            .collect()
    }

    /// Subset to specific samples, preserving the given order
    pub fn subset_samples(&self, sample_indices: &[usize]) -> Result<Self> {
        let new_counts = self.counts.select(Axis(0), sample_indices);
        let new_sample_ids: Vec<String> = sample_indices
            .iter()
            .map(|&i| self.sample_ids[i].clone())
            .collect();

        Self::new(new_counts, new_sample_ids, self.gene_ids.clone())
    }
}

fn check_unique(ids: &[String], kind: &str) -> Result<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id.as_str()) {
            return Err(MrnError::InvalidCountMatrix {
                reason: format!("Duplicate {} ID '{}'", kind, id),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_count_matrix_creation() {
        let counts = array![[10.0, 20.0, 30.0], [5.0, 15.0, 25.0]];
        let sample_ids = vec!["s1".to_string(), "s2".to_string()];
        let gene_ids = vec!["g1".to_string(), "g2".to_string(), "g3".to_string()];

        let matrix = CountMatrix::new(counts, sample_ids, gene_ids).unwrap();
        assert_eq!(matrix.n_samples(), 2);
        assert_eq!(matrix.n_genes(), 3);
    }

    #[test]
    fn test_negative_counts_rejected() {
        let counts = array![[10.0, -5.0], [5.0, 15.0]];
        let sample_ids = vec!["s1".to_string(), "s2".to_string()];
        let gene_ids = vec!["g1".to_string(), "g2".to_string()];

        let result = CountMatrix::new(counts, sample_ids, gene_ids);
        assert!(result.is_err());
    }

    #[test]
    fn test_duplicate_sample_id_rejected() {
        let counts = array![[10.0, 20.0], [5.0, 15.0]];
        let sample_ids = vec!["s1".to_string(), "s1".to_string()];
        let gene_ids = vec!["g1".to_string(), "g2".to_string()];

        let result = CountMatrix::new(counts, sample_ids, gene_ids);
        assert!(result.is_err());
    }

    #[test]
    fn test_from_integers_and_index_lookup() {
        let counts = array![[10u32, 20u32], [5u32, 15u32]];
        let matrix = CountMatrix::from_integers(
            counts,
            vec!["s1".to_string(), "s2".to_string()],
            vec!["g1".to_string(), "g2".to_string()],
        )
        .unwrap();

        assert_eq!(matrix.counts()[[0, 1]], 20.0);
        assert_eq!(matrix.sample_index("s2"), Some(1));
        assert_eq!(matrix.gene_index("g1"), Some(0));
        assert_eq!(matrix.gene_index("missing"), None);
        assert_eq!(matrix.sample_counts(0).sum(), 30.0);
        assert_eq!(matrix.gene_counts(1).sum(), 35.0);
    }

    #[test]
    fn test_library_sizes() {
        let counts = array![[10.0, 20.0], [5.0, 15.0]];
        let sample_ids = vec!["s1".to_string(), "s2".to_string()];
        let gene_ids = vec!["g1".to_string(), "g2".to_string()];

        let matrix = CountMatrix::new(counts, sample_ids, gene_ids).unwrap();
        assert_eq!(matrix.library_sizes(), vec![30.0, 20.0]);
    }

    #[test]
    fn test_subset_samples() {
        let counts = array![[10.0, 20.0], [5.0, 15.0], [1.0, 2.0]];
        let sample_ids = vec!["s1".to_string(), "s2".to_string(), "s3".to_string()];
        let gene_ids = vec!["g1".to_string(), "g2".to_string()];

        let matrix = CountMatrix::new(counts, sample_ids, gene_ids).unwrap();
        let sub = matrix.subset_samples(&[0, 2]).unwrap();
        assert_eq!(sub.sample_ids(), &["s1".to_string(), "s3".to_string()]);
        assert_eq!(sub.counts()[[1, 1]], 2.0);
    }
}
