//! Library-size prenormalization (pipeline stage 1)

use ndarray::{Array1, Array2, Axis};

use crate::data::CountMatrix;
use crate::error::{MrnError, Result};

/// Compute the library size (total raw count) of every sample
///
/// A zero library size is a fatal error: an empty library cannot be
/// scaled and must be filtered out upstream.
pub fn library_sizes(matrix: &CountMatrix) -> Result<Array1<f64>> {
    let sizes = Array1::from_vec(matrix.library_sizes());

    for (i, &size) in sizes.iter().enumerate() {
        if size == 0.0 {
            return Err(MrnError::ZeroLibrary {
                sample_id: matrix.sample_ids()[i].clone(),
            });
        }
    }

    Ok(sizes)
}

/// Divide each sample row by its library size
///
/// The output rows sum to 1 within floating tolerance. `sizes` must
/// come from [`library_sizes`] on the same matrix.
pub fn scale_by_library_size(matrix: &CountMatrix, sizes: &Array1<f64>) -> Result<Array2<f64>> {
    if sizes.len() != matrix.n_samples() {
        return Err(MrnError::DimensionMismatch {
            expected: format!("{} library sizes", matrix.n_samples()),
            got: format!("{}", sizes.len()),
        });
    }

    let mut scaled = matrix.counts().to_owned();
    for (mut row, &size) in scaled.axis_iter_mut(Axis(0)).zip(sizes.iter()) {
        row.mapv_inplace(|x| x / size);
    }

    Ok(scaled)
}
