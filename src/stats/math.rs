//! Reductions shared by the statistics passes.

/// Arithmetic mean, `None` for an empty slice.
///
/// Deviations are accumulated relative to the first value, so a slice of
/// identical values yields that value exactly.
pub fn mean(values: &[f64]) -> Option<f64> {
    let pivot = *values.first()?;
    let shifted: f64 = values.iter().map(|v| v - pivot).sum();
    Some(pivot + shifted / values.len() as f64)
}

/// Population standard deviation (divisor N) around an already computed mean
pub fn population_stddev(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sum_squares: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    (sum_squares / values.len() as f64).sqrt()
}

/// Mean and population standard deviation, `None` for an empty slice
pub fn mean_and_stddev(values: &[f64]) -> Option<(f64, f64)> {
    let mean = mean(values)?;
    Some((mean, population_stddev(values, mean)))
}
