//! Shared statistical primitives for the scoring engines and preprocessing.
//!
//! Everything operates on plain `&[f64]` slices so callers can feed row or
//! column slices straight out of a [`DataMatrix`] without conversion.
//!
//! Numerical posture: empty input and division by a (near-)zero mean are not
//! trapped; they yield NaN/infinity, which propagates into score matrices
//! where consumers treat it as "undefined" (see [`coefficient_of_variation`]).
//!
//! [`DataMatrix`]: crate::matrix::DataMatrix

use std::cmp::Ordering;

/// Arithmetic mean. Empty input yields NaN.
#[inline]
pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance (denominator n), computed in two passes.
///
/// The two-pass form (mean first, then mean of squared deviations) avoids the
/// catastrophic cancellation of `E[x²] - E[x]²` on large-magnitude inputs.
/// Empty input yields NaN; a single value yields 0.0.
pub fn population_variance(values: &[f64]) -> f64 {
    let m = mean(values);
    values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64
}

/// Population standard deviation (square root of [`population_variance`]).
#[inline]
pub fn population_stddev(values: &[f64]) -> f64 {
    population_variance(values).sqrt()
}

/// Sample standard deviation (denominator n-1) over the finite values only.
///
/// Non-finite entries are masked out first, so a NaN introduced by an earlier
/// ratio division does not poison the whole row's scale factor. Fewer than
/// two finite values yields NaN.
pub fn sample_stddev(values: &[f64]) -> f64 {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.len() < 2 {
        return f64::NAN;
    }
    let m = mean(&finite);
    let ss: f64 = finite.iter().map(|v| (v - m) * (v - m)).sum();
    (ss / (finite.len() - 1) as f64).sqrt()
}

/// Median: middle value, or the average of the two middle values for even
/// length. Empty input yields NaN. NaN entries sort last and are not masked.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
    });
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}

/// Coefficient of variation: population standard deviation ÷ mean.
///
/// The dispersion measure used for probe/feature selection. A zero or
/// near-zero mean is deliberately NOT guarded: the resulting infinity or NaN
/// propagates to the caller, which must treat non-finite dispersion as
/// "undefined" rather than crash.
#[inline]
pub fn coefficient_of_variation(values: &[f64]) -> f64 {
    population_stddev(values) / mean(values)
}

// =============================================================================
// Tests
// =============================================================================
