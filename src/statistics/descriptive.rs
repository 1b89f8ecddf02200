/// Arithmetic mean; `None` for an empty slice.
pub fn mean(xs: &[f64]) -> Option<f64> {
    if xs.is_empty() {
        return None;
    }
    Some(xs.iter().sum::<f64>() / xs.len() as f64)
}

/// Variance with divisor `n` (the `ddof = 0` convention).
pub fn population_variance(xs: &[f64]) -> Option<f64> {
    let m = mean(xs)?;
    let ss: f64 = xs.iter().map(|x| (x - m) * (x - m)).sum();
    Some(ss / xs.len() as f64)
}

#[inline]
pub fn population_std(xs: &[f64]) -> Option<f64> {
    population_variance(xs).map(f64::sqrt)
}
