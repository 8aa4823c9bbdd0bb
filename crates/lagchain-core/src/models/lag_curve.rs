use serde::{Deserialize, Serialize};

/// One lag of an aligned response. `mean` is NaN and `n` is 0 when no
/// trigger contributed a finite value; `lo`/`hi` are NaN without bootstrap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LagPoint {
    pub lag: i64,
    pub mean: f64,
    pub lo: f64,
    pub hi: f64,
    pub n: usize,
}

impl LagPoint {
    pub fn empty(lag: i64) -> Self {
        Self {
            lag,
            mean: f64::NAN,
            lo: f64::NAN,
            hi: f64::NAN,
            n: 0,
        }
    }

    /// True when no sample contributed.
    pub fn is_degraded(&self) -> bool {
        self.n == 0
    }
}

/// Per-lag aggregate over `[lag_min, lag_max]`, ascending by lag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LagCurve {
    pub points: Vec<LagPoint>,
}

impl LagCurve {
    pub fn new(mut points: Vec<LagPoint>) -> Self {
        points.sort_by_key(|p| p.lag);
        Self { points }
    }

    pub fn get(&self, lag: i64) -> Option<&LagPoint> {
        self.points
            .binary_search_by_key(&lag, |p| p.lag)
            .ok()
            .map(|i| &self.points[i])
    }

    pub fn lags(&self) -> Vec<i64> {
        self.points.iter().map(|p| p.lag).collect()
    }

    pub fn means(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.mean).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LagPoint> {
        self.points.iter()
    }
}
