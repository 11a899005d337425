/// Natural log of a strength, or `None` where it is undefined.
pub fn checked_ln(x: f64) -> Option<f64> {
    if x > 0. { Some(x.ln()) } else { None }
}

/// A probability vector spreading mass evenly over `len` entries.
pub fn uniform(len: usize) -> Vec<f64> {
    vec![1. / len as f64; len]
}

/// Rescales `values` in place so they sum to one, returning the old sum.
/// Leaves `values` untouched and returns `None` if the sum is zero or not finite.
pub fn normalize(values: &mut [f64]) -> Option<f64> {
    let sum: f64 = values.iter().sum();
    if sum <= 0. || !sum.is_finite() {
        return None;
    }
    for value in values.iter_mut() {
        *value /= sum;
    }
    Some(sum)
}

/// Whether `values` is a probability vector, up to `tolerance` on its sum.
pub fn is_distribution(values: &[f64], tolerance: f64) -> bool {
    values.iter().all(|&p| p >= 0. && p.is_finite())
        && (values.iter().sum::<f64>() - 1.).abs() <= tolerance
}
