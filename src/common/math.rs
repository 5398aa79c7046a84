//! Small statistics toolkit used by the feature extractor and classifiers.

/// Arithmetic mean. `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation (divides by `n`, matching a standard scaler).
pub fn population_std_dev(values: &[f64]) -> Option<f64> {
    let avg = mean(values)?;
    let variance = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}

/// Fraction of `series` strictly below `value`.
///
/// Defined as 0.0 for series shorter than two points.
pub fn percentile_rank(value: f64, series: &[f64]) -> f64 {
    if series.len() < 2 {
        return 0.0;
    }
    let below = series.iter().filter(|v| **v < value).count();
    below as f64 / series.len() as f64
}

/// Euclidean distance between two equally sized vectors.
pub fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
