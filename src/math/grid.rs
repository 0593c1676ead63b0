//! Price grid generation.
//!
//! Candidate prices come from a deterministic, evenly spaced grid over the
//! feasible range, rounded to cents.

/// Generate `steps` evenly spaced points between `min` and `max` (inclusive).
///
/// `min == max` yields `steps` copies of the same value. `steps < 2` yields just `min`.
pub fn linspace(min: f64, max: f64, steps: usize) -> Vec<f64> {
    if steps < 2 {
        return vec![min];
    }
    let intervals = (steps - 1) as f64;
    (0..steps)
        .map(|i| min + (max - min) * i as f64 / intervals)
        .collect()
}

/// Round to a fixed number of decimal places.
///
/// Rounds the exact binary value, so `1.115` (stored as `1.11499...`) becomes
/// `1.11`. Scaling first (`(x * 100).round() / 100`) would give `1.12`.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    if !value.is_finite() || decimals < 0 {
        let scale = 10f64.powi(decimals);
        return (value * scale).round() / scale;
    }
    format!("{value:.prec$}", prec = decimals as usize)
        .parse()
        .unwrap_or(value)
}

/// Round every point to `decimals`, sort ascending, and drop duplicates.
pub fn rounded_unique(points: impl IntoIterator<Item = f64>, decimals: i32) -> Vec<f64> {
    let mut out: Vec<f64> = points.into_iter().map(|p| round_to(p, decimals)).collect();
    out.sort_by(f64::total_cmp);
    out.dedup();
    out
}
