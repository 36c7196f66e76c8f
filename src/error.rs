//! Error types for mrnorm

use thiserror::Error;

/// Main error type for MRN operations
#[derive(Error, Debug)]
pub enum MrnError {
    #[error("Invalid count matrix: {reason}")]
    InvalidCountMatrix { reason: String },

    #[error("Invalid group assignment: {reason}")]
    InvalidGrouping { reason: String },

    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: String, got: String },

    #[error("Inconsistent grouping: {reason}")]
    Inconsistent { reason: String },

    #[error("Reference group '{group_id}' not found in group assignment")]
    ReferenceGroupNotFound { group_id: String },

    #[error("Sample '{sample_id}' has a library size of zero")]
    ZeroLibrary { sample_id: String },

    #[error("Insufficient data for group '{group_id}': {reason}")]
    InsufficientData { group_id: String, reason: String },

    #[error("Domain error in {operation}: {details}")]
    Domain { operation: String, details: String },

    #[error("Empty data: {reason}")]
    EmptyData { reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for MRN operations
pub type Result<T> = std::result::Result<T, MrnError>;
