//! Record every soft-degraded result of a run: which component, what kind,
//! how many. Degraded results stay in their rows (NaN, `n = 0`, zero
//! operator rows); this is the per-run summary.

use serde::{Deserialize, Serialize};

/// Class of a soft-degraded result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegradationKind {
    /// A lag without any finite sample.
    EmptyLag,
    /// A rolling window with at least one zero operator row.
    DegradedWindow,
    /// An anchor dropped by coverage screening.
    ExcludedAnchor,
}

impl DegradationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmptyLag => "empty_lag",
            Self::DegradedWindow => "degraded_window",
            Self::ExcludedAnchor => "excluded_anchor",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegradationRecord {
    pub component: String,
    pub kind: DegradationKind,
    pub count: usize,
}

/// Collects degradation records in the order they were reported.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DegradationTracker {
    records: Vec<DegradationRecord>,
}

impl DegradationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `count` degraded results. Zero counts are dropped.
    pub fn record(&mut self, component: impl Into<String>, kind: DegradationKind, count: usize) {
        if count == 0 {
            return;
        }
        let component = component.into();
        crate::tracing_setup::events::degradation_recorded(&component, kind.as_str(), count);
        self.records.push(DegradationRecord { component, kind, count });
    }

    pub fn records(&self) -> &[DegradationRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Total count of one kind across components.
    pub fn total(&self, kind: DegradationKind) -> usize {
        self.records
            .iter()
            .filter(|r| r.kind == kind)
            .map(|r| r.count)
            .sum()
    }
}
