//! Data structures for MRN normalization

mod count_matrix;
mod grouping;

pub use count_matrix::CountMatrix;
pub use grouping::{GroupAssignment, UnassignedPolicy};
