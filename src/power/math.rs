//! Robust statistics over utilization samples.
//!
//! The interquartile range discards the top/bottom quarter of the
//! distribution, so a single transient spike or dip does not move the
//! measure the way a mean or max would.

/// Number of non-zero samples at the beginning of the series.
pub fn count_non_zero_beginning(data: &[f64]) -> usize {
    data.iter().take_while(|v| **v != 0.0).count()
}

/// Percentile estimate at probability `p` (0..1) using the
/// rank `p*(n+1)` linear-interpolation method (Commons-Math default).
///
/// For [10,20,...,120]: quartile(.., 0.25) = 32.5, quartile(.., 0.75) = 97.5.
/// Empty input yields 0.0.
pub fn quartile(data: &[f64], p: f64) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let mut sorted = data.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len();
    let pos = p * (n as f64 + 1.0);
    if pos < 1.0 {
        return sorted[0];
    }
    if pos >= n as f64 {
        return sorted[n - 1];
    }
    let k = pos.floor() as usize; // 1-based rank of the lower neighbour
    let d = pos - k as f64;
    sorted[k - 1] + d * (sorted[k] - sorted[k - 1])
}

/// Interquartile range Q3 - Q1; always >= 0.
pub fn iqr(data: &[f64]) -> f64 {
    quartile(data, 0.75) - quartile(data, 0.25)
}
