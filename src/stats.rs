//! Statistical utility functions shared across modules
//!
//! Contains the median and geometric mean used by the ratio estimator
//! and the effective-size combiner.

/// Median of a slice, averaging the two middle values for even lengths.
///
/// Sorts a copy of the input; NaN entries are not expected (callers
/// filter to strictly positive values first).
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Geometric mean via exp(mean(log(x))).
///
/// Returns None for an empty slice or any non-positive entry, where
/// the logarithm is undefined.
pub fn geometric_mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() || values.iter().any(|&x| x <= 0.0 || !x.is_finite()) {
        return None;
    }

    let log_mean = values.iter().map(|&x| x.ln()).sum::<f64>() / values.len() as f64;
    Some(log_mean.exp())
}
