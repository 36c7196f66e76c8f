//! Reading and writing count matrices, group assignments, and factor
//! summaries
//!
//! On-disk count tables use the conventional genes-as-rows layout
//! (first column gene IDs, header row sample IDs); the matrix is
//! transposed into the samples x genes orientation on load.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::data::{CountMatrix, GroupAssignment};
use crate::error::{MrnError, Result};
use crate::normalization::MrnResult;

/// Strip surrounding quotes from a string
fn strip_quotes(s: &str) -> String {
    let s = s.trim();
    if (s.starts_with('"') && s.ends_with('"')) || (s.starts_with('\'') && s.ends_with('\'')) {
        s[1..s.len() - 1].to_string()
    } else {
        s.to_string()
    }
}

/// Read a count matrix from a TSV/CSV file
///
/// Expected format: first column is gene IDs, first row is sample IDs.
/// The delimiter (tab or comma) is auto-detected from the header.
pub fn read_count_matrix<P: AsRef<Path>>(path: P) -> Result<CountMatrix> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut lines = reader.lines();

    let header_line = lines.next().ok_or_else(|| MrnError::EmptyData {
        reason: "Empty count matrix file".to_string(),
    })??;

    let delimiter = if header_line.contains('\t') { '\t' } else { ',' };

    let header: Vec<&str> = header_line.split(delimiter).collect();
    if header.len() < 2 {
        return Err(MrnError::InvalidCountMatrix {
            reason: "Not enough columns in header".to_string(),
        });
    }

    let sample_ids: Vec<String> = header[1..].iter().map(|s| strip_quotes(s)).collect();
    let n_samples = sample_ids.len();

    let mut gene_ids: Vec<String> = Vec::new();
    let mut counts_data: Vec<Vec<f64>> = Vec::new();

    for line in lines {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(delimiter).collect();
        if fields.len() != n_samples + 1 {
            return Err(MrnError::InvalidCountMatrix {
                reason: format!(
                    "Row has {} columns, expected {}",
                    fields.len(),
                    n_samples + 1
                ),
            });
        }

        gene_ids.push(strip_quotes(fields[0]));

        let row_counts: Result<Vec<f64>> = fields[1..]
            .iter()
            .map(|s| {
                let val = strip_quotes(s);
                val.parse::<f64>().map_err(|_| MrnError::InvalidCountMatrix {
                    reason: format!("Invalid count value: {}", val),
                })
            })
            .collect();

        counts_data.push(row_counts?);
    }

    if gene_ids.is_empty() {
        return Err(MrnError::EmptyData {
            reason: "No genes found in count matrix".to_string(),
        });
    }

    // Transpose into the in-memory samples x genes orientation
    let n_genes = gene_ids.len();
    let mut counts = Array2::zeros((n_samples, n_genes));
    for (i, row) in counts_data.iter().enumerate() {
        for (j, &val) in row.iter().enumerate() {
            counts[[j, i]] = val;
        }
    }

    if counts.iter().any(|&x| x != x.round()) {
        log::warn!(
            "Some count values are not integers; MRN expects raw integer counts \
             and will normalize non-integer values as-is."
        );
    }

    CountMatrix::new(counts, sample_ids, gene_ids)
}

/// Read a group assignment from a TSV/CSV file
///
/// Expected format: header row, then one row per sample with the
/// sample ID in the first column and its group (clone) ID in the
/// second. Extra columns are ignored.
pub fn read_grouping<P: AsRef<Path>>(path: P) -> Result<GroupAssignment> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut lines = reader.lines();

    let header_line = lines.next().ok_or_else(|| MrnError::EmptyData {
        reason: "Empty group assignment file".to_string(),
    })??;

    let delimiter = if header_line.contains('\t') { '\t' } else { ',' };

    let mut sample_ids: Vec<String> = Vec::new();
    let mut group_ids: Vec<String> = Vec::new();

    for line in lines {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(delimiter).collect();
        if fields.len() < 2 {
            return Err(MrnError::InvalidGrouping {
                reason: format!("Row has {} columns, expected at least 2", fields.len()),
            });
        }

        sample_ids.push(strip_quotes(fields[0]));
        group_ids.push(strip_quotes(fields[1]));
    }

    GroupAssignment::new(sample_ids, group_ids)
}

/// Write a count matrix as TSV, genes as rows
///
/// Round trips with [`read_count_matrix`].
pub fn write_count_matrix<P: AsRef<Path>>(path: P, matrix: &CountMatrix) -> Result<()> {
    let mut file = File::create(path)?;

    writeln!(file, "gene_id\t{}", matrix.sample_ids().join("\t"))?;

    let counts = matrix.counts();
    for (j, gene_id) in matrix.gene_ids().iter().enumerate() {
        let row: Vec<String> = (0..matrix.n_samples())
            .map(|i| format!("{:.4}", counts[[i, j]]))
            .collect();
        writeln!(file, "{}\t{}", gene_id, row.join("\t"))?;
    }

    Ok(())
}

/// Per-group entry of a factor summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupFactor {
    pub group_id: String,
    pub tau: f64,
}

/// Per-sample entry of a factor summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleFactor {
    pub sample_id: String,
    pub group_id: String,
    pub library_size: f64,
    pub effective_size: f64,
    pub relative_factor: f64,
}

/// JSON-serializable summary of every scalar an MRN run produces
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactorSummary {
    pub reference_group: String,
    pub groups: Vec<GroupFactor>,
    pub samples: Vec<SampleFactor>,
    pub dropped_samples: Vec<String>,
}

impl FactorSummary {
    /// Assemble the summary from a pipeline result
    pub fn from_result(result: &MrnResult, assignment: &GroupAssignment) -> Self {
        let groups = result
            .group_ids
            .iter()
            .zip(result.tau.iter())
            .map(|(group_id, &tau)| GroupFactor {
                group_id: group_id.clone(),
                tau,
            })
            .collect();

        let samples = result
            .sample_ids()
            .iter()
            .enumerate()
            .map(|(i, sample_id)| SampleFactor {
                sample_id: sample_id.clone(),
                group_id: assignment
                    .group_of(sample_id)
                    .unwrap_or_default()
                    .to_string(),
                library_size: result.library_sizes[i],
                effective_size: result.effective_sizes[i],
                relative_factor: result.relative_factors[i],
            })
            .collect();

        Self {
            reference_group: result.reference_group.clone(),
            groups,
            samples,
            dropped_samples: result.dropped_samples.clone(),
        }
    }
}

/// Write the factor summary of an MRN run as pretty-printed JSON
pub fn write_factors<P: AsRef<Path>>(
    path: P,
    result: &MrnResult,
    assignment: &GroupAssignment,
) -> Result<()> {
    let summary = FactorSummary::from_result(result, assignment);
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, &summary)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::UnassignedPolicy;
    use crate::normalization::normalize;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_count_matrix() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "gene_id\ts1\ts2\ts3").unwrap();
        writeln!(file, "gene1\t100\t200\t150").unwrap();
        writeln!(file, "gene2\t50\t75\t60").unwrap();

        let matrix = read_count_matrix(file.path()).unwrap();
        assert_eq!(matrix.n_samples(), 3);
        assert_eq!(matrix.n_genes(), 2);
        // Transposed on load: rows are samples
        assert_eq!(matrix.counts()[[1, 0]], 200.0);
        assert_eq!(matrix.counts()[[2, 1]], 60.0);
    }

    #[test]
    fn test_read_count_matrix_csv() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "gene_id,s1,s2").unwrap();
        writeln!(file, "gene1,10,20").unwrap();

        let matrix = read_count_matrix(file.path()).unwrap();
        assert_eq!(matrix.sample_ids(), &["s1".to_string(), "s2".to_string()]);
        assert_eq!(matrix.counts()[[0, 0]], 10.0);
    }

    #[test]
    fn test_read_grouping() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "sample_id\tclone").unwrap();
        writeln!(file, "s1\tA").unwrap();
        writeln!(file, "s2\tB").unwrap();

        let grouping = read_grouping(file.path()).unwrap();
        assert_eq!(grouping.group_of("s1"), Some("A"));
        assert_eq!(grouping.groups(), vec!["A", "B"]);
    }

    #[test]
    fn test_matrix_round_trip() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "gene_id\ts1\ts2").unwrap();
        writeln!(file, "gene1\t100\t200").unwrap();
        writeln!(file, "gene2\t50\t75").unwrap();

        let matrix = read_count_matrix(file.path()).unwrap();
        let out = NamedTempFile::new().unwrap();
        write_count_matrix(out.path(), &matrix).unwrap();
        let back = read_count_matrix(out.path()).unwrap();

        assert_eq!(back.sample_ids(), matrix.sample_ids());
        assert_eq!(back.gene_ids(), matrix.gene_ids());
        assert_eq!(back.counts(), matrix.counts());
    }

    #[test]
    fn test_factor_summary_json() {
        let mut counts = NamedTempFile::new().unwrap();
        writeln!(counts, "gene_id\ts1\ts2\ts3\ts4").unwrap();
        writeln!(counts, "g1\t10\t30\t5\t15").unwrap();
        writeln!(counts, "g2\t20\t10\t10\t30").unwrap();
        writeln!(counts, "g3\t5\t10\t5\t5").unwrap();

        let matrix = read_count_matrix(counts.path()).unwrap();
        let assignment = GroupAssignment::new(
            vec![
                "s1".to_string(),
                "s2".to_string(),
                "s3".to_string(),
                "s4".to_string(),
            ],
            vec![
                "A".to_string(),
                "A".to_string(),
                "B".to_string(),
                "B".to_string(),
            ],
        )
        .unwrap();

        let result = normalize(&matrix, &assignment, "A", UnassignedPolicy::Error).unwrap();
        let out = NamedTempFile::new().unwrap();
        write_factors(out.path(), &result, &assignment).unwrap();

        let text = std::fs::read_to_string(out.path()).unwrap();
        let summary: FactorSummary = serde_json::from_str(&text).unwrap();
        assert_eq!(summary.reference_group, "A");
        assert_eq!(summary.groups.len(), 2);
        assert_eq!(summary.samples.len(), 4);
        assert_eq!(summary.samples[0].group_id, "A");
    }
}
