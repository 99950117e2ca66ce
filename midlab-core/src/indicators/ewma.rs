//! Exponentially weighted moving average, first-value seeded.
//!
//! Recursive: ewma[t] = alpha * x[t] + (1 - alpha) * ewma[t-1] with
//! alpha = 2 / (span + 1), seeded with ewma[0] = x[0] (not SMA-seeded).
//! This is the recurrence the MPMI oscillator is defined over, so it is
//! defined from the very first bar.

/// Compute the first-value-seeded EWMA of a series.
///
/// A NaN input taints every subsequent output (the recurrence has no way
/// to recover a defined state), matching the other indicator kernels.
pub fn ewma_first_seeded(values: &[f64], span: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if n == 0 || span == 0 {
        return result;
    }

    let alpha = 2.0 / (span as f64 + 1.0);

    if values[0].is_nan() {
        return result;
    }
    result[0] = values[0];

    let mut prev = values[0];
    for i in 1..n {
        if values[i].is_nan() {
            return result;
        }
        let ewma = alpha * values[i] + (1.0 - alpha) * prev;
        result[i] = ewma;
        prev = ewma;
    }

    result
}
