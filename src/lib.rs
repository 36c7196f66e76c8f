//! mrnorm: median ratio normalization (MRN) for RNA-seq count data
//!
//! This crate rescales a gene-by-sample count matrix so that samples
//! can be compared despite differing sequencing depth and
//! compositional bias. Each sample is prenormalized by its library
//! size, per-group (clone) mean profiles are compared against a
//! caller-chosen reference group via median fold changes, and the raw
//! counts are divided by geometric-mean-centered per-sample factors.
//!
//! # Example
//!
//! ```ignore
//! use mrnorm::prelude::*;
//!
//! // Load data
//! let matrix = read_count_matrix("counts.tsv")?;
//! let groups = read_grouping("groups.tsv")?;
//!
//! // Run the pipeline
//! let result = normalize(&matrix, &groups, "cloneA", UnassignedPolicy::Error)?;
//!
//! // Persist the normalized counts
//! write_count_matrix("normalized.tsv", &result.normalized)?;
//! ```

pub mod cli;
pub mod data;
pub mod error;
pub mod io;
pub mod normalization;
pub mod stats;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::data::{CountMatrix, GroupAssignment, UnassignedPolicy};
    pub use crate::error::{MrnError, Result};
    pub use crate::io::{
        read_count_matrix, read_grouping, write_count_matrix, write_factors, FactorSummary,
    };
    pub use crate::normalization::{normalize, GroupProfiles, MrnResult};
}
