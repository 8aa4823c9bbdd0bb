//! Pre-screening of anchor times for window counterfactuals. Ineligible
//! anchors are dropped with a recorded reason instead of failing the batch.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use lagchain_core::errors::EventError;
use lagchain_core::models::{OnsetSet, ResultTable};
use lagchain_core::series::{Panel, UnitId, UnitSeries};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    /// No complete, finite state at `anchor - 1`.
    NoPreviousState,
    /// The window `[anchor - lag_pre, anchor + lag_post]` is not fully
    /// covered by the unit's time index.
    InsufficientWindow,
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoPreviousState => f.write_str("no_previous_state"),
            Self::InsufficientWindow => f.write_str("insufficient_window"),
        }
    }
}

/// One row of the exclusion side report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorExclusion {
    pub unit: UnitId,
    pub anchor: i64,
    pub reason: ExclusionReason,
}

/// Kept anchors per unit plus the exclusion report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnchorEligibility {
    pub kept: BTreeMap<UnitId, Vec<i64>>,
    pub excluded: Vec<AnchorExclusion>,
}

impl AnchorEligibility {
    /// Screen the anchors of one unit. An anchor can collect both reasons.
    pub fn screen(series: &UnitSeries, anchors: &[i64], nodes: &[String], lag_pre: i64, lag_post: i64) -> Self {
        let mut out = Self::default();
        let (Some(t_min), Some(t_max)) = (series.t_min(), series.t_max()) else {
            out.excluded.extend(anchors.iter().flat_map(|&a| {
                [ExclusionReason::NoPreviousState, ExclusionReason::InsufficientWindow]
                    .into_iter()
                    .map(move |reason| AnchorExclusion {
                        unit: series.unit().clone(),
                        anchor: a,
                        reason,
                    })
            }));
            return out;
        };

        let mut kept = Vec::new();
        for &anchor in anchors {
            let mut reasons = Vec::new();
            if series.state_at(anchor - 1, nodes).is_none() {
                reasons.push(ExclusionReason::NoPreviousState);
            }
            let in_range = anchor >= t_min + lag_pre && anchor <= t_max - lag_post;
            if !in_range || !((anchor - lag_pre)..=(anchor + lag_post)).all(|t| series.contains_time(t)) {
                reasons.push(ExclusionReason::InsufficientWindow);
            }
            if reasons.is_empty() {
                kept.push(anchor);
            }
            out.excluded.extend(reasons.into_iter().map(|reason| AnchorExclusion {
                unit: series.unit().clone(),
                anchor,
                reason,
            }));
        }
        out.kept.insert(series.unit().clone(), kept);
        out
    }

    /// Screen every unit's onsets. Units absent from the panel have all
    /// their anchors excluded.
    pub fn screen_panel(panel: &Panel, anchors: &OnsetSet, nodes: &[String], lag_pre: i64, lag_post: i64) -> Self {
        let mut out = Self::default();
        for (unit, times) in &anchors.by_unit {
            match panel.unit(unit) {
                Some(series) => out.merge(Self::screen(series, times, nodes, lag_pre, lag_post)),
                None => out.excluded.extend(times.iter().map(|&anchor| AnchorExclusion {
                    unit: unit.clone(),
                    anchor,
                    reason: ExclusionReason::NoPreviousState,
                })),
            }
        }
        tracing::info!(
            kept = out.n_kept(),
            excluded = out.excluded.len(),
            lag_pre,
            lag_post,
            "anchors screened"
        );
        out
    }

    pub fn merge(&mut self, other: Self) {
        for (unit, anchors) in other.kept {
            self.kept.entry(unit).or_default().extend(anchors);
        }
        self.excluded.extend(other.excluded);
    }

    pub fn n_kept(&self) -> usize {
        self.kept.values().map(Vec::len).sum()
    }

    /// Fail when no anchor survived screening.
    pub fn require_any(&self) -> Result<(), EventError> {
        if self.n_kept() == 0 {
            return Err(EventError::NoEligibleAnchors {
                excluded: self.excluded.len(),
            });
        }
        Ok(())
    }

    pub fn exclusion_table(&self) -> ResultTable<AnchorExclusion> {
        ResultTable::new("anchor_exclusions", self.excluded.clone())
    }
}
