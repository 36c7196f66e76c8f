//! Table and JSON adapters around the in-memory normalization core

mod table;

pub use table::{
    read_count_matrix, read_grouping, write_count_matrix, write_factors, FactorSummary,
    GroupFactor, SampleFactor,
};
