//! Descriptive statistics shared by the analysis tasks.

/// Arithmetic mean, or `None` for an empty slice.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation with Bessel's correction.
///
/// A single value has no spread, so it yields `Some(0.0)`; an empty slice
/// yields `None`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    let mu = mean(values)?;
    if values.len() == 1 {
        return Some(0.0);
    }
    let sq_diff: f64 = values.iter().map(|v| (v - mu).powi(2)).sum();
    Some((sq_diff / (values.len() - 1) as f64).sqrt())
}
