use lagchain_core::models::{LagCurve, LagPoint};

/// Running sums of `mean`, `lo` and `hi` in lag order. A NaN entry stays
/// NaN in the output and does not reset or poison the running total.
pub fn to_cumulative(curve: &LagCurve) -> LagCurve {
    let (mut mean, mut lo, mut hi) = (0.0, 0.0, 0.0);
    let accumulate = |total: &mut f64, v: f64| {
        if v.is_finite() {
            *total += v;
            *total
        } else {
            f64::NAN
        }
    };
    let points = curve
        .iter()
        .map(|p| LagPoint {
            lag: p.lag,
            mean: accumulate(&mut mean, p.mean),
            lo: accumulate(&mut lo, p.lo),
            hi: accumulate(&mut hi, p.hi),
            n: p.n,
        })
        .collect();
    LagCurve::new(points)
}
