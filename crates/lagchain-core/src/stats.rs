//! NaN-aware descriptive statistics shared by the engines.

use crate::constants::{MIN_CORRELATION_SAMPLES, VARIANCE_EPSILON};

/// Linear-interpolation quantile of an ascending slice. NaN when empty.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let pos = q.clamp(0.0, 1.0) * (n - 1) as f64;
            let lo = pos.floor() as usize;
            let hi = pos.ceil() as usize;
            let frac = pos - lo as f64;
            sorted[lo] + (sorted[hi] - sorted[lo]) * frac
        }
    }
}

/// Quantile over the finite entries of `values`.
pub fn nan_quantile(values: &[f64], q: f64) -> f64 {
    let mut finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    finite.sort_by(f64::total_cmp);
    quantile_sorted(&finite, q)
}

/// Mean of the finite entries; NaN when there are none.
pub fn nan_mean(values: &[f64]) -> f64 {
    let (sum, n) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        f64::NAN
    } else {
        sum / n as f64
    }
}

/// Population standard deviation of the finite entries.
pub fn nan_std(values: &[f64]) -> f64 {
    let mean = nan_mean(values);
    let sq: Vec<f64> = values
        .iter()
        .filter(|v| v.is_finite())
        .map(|v| (v - mean).powi(2))
        .collect();
    nan_mean(&sq).sqrt()
}

/// Standardise with the finite mean and population std. A zero std
/// leaves values centred but unscaled. NaN stays NaN.
pub fn zscore(values: &[f64]) -> Vec<f64> {
    let mean = nan_mean(values);
    let std = nan_std(values);
    let scale = if std > 0.0 { std } else { 1.0 };
    values.iter().map(|v| (v - mean) / scale).collect()
}

/// First differences; one shorter than the input.
pub fn diff(values: &[f64]) -> Vec<f64> {
    values.windows(2).map(|w| w[1] - w[0]).collect()
}

/// Pearson correlation over pairs where both sides are finite, with the
/// number of such pairs. NaN below the minimum sample count or when either
/// side has no variance.
pub fn pearson(x: &[f64], y: &[f64]) -> (f64, usize) {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y)
        .filter(|(a, b)| a.is_finite() && b.is_finite())
        .map(|(a, b)| (*a, *b))
        .collect();
    let n = pairs.len();
    if n < MIN_CORRELATION_SAMPLES {
        return (f64::NAN, n);
    }
    let mx = pairs.iter().map(|p| p.0).sum::<f64>() / n as f64;
    let my = pairs.iter().map(|p| p.1).sum::<f64>() / n as f64;
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (a, b) in &pairs {
        sxy += (a - mx) * (b - my);
        sxx += (a - mx).powi(2);
        syy += (b - my).powi(2);
    }
    let den = (sxx * syy).sqrt();
    if den <= VARIANCE_EPSILON {
        return (f64::NAN, n);
    }
    (sxy / den, n)
}
