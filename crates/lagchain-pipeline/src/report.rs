use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use lagchain_align::{AlignMode, CounterfactualMetrics, PairedRow};
use lagchain_core::config::EdgePair;
use lagchain_core::models::{LagCurve, LagPoint, Onset, OperatorSnapshot, ResultTable, SimulatedRow};
use lagchain_null::NullCurveRow;
use lagchain_observability::DegradationTracker;
use lagchain_simulate::{AnchorExclusion, WindowMeanRow};
use lagchain_stability::StructuralOperator;

/// One lag of an aligned curve, tagged by trigger flag, source and column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveRow {
    pub flag: String,
    /// `observed` or a scenario tag.
    pub run_tag: String,
    pub column: String,
    pub mode: AlignMode,
    #[serde(flatten)]
    pub point: LagPoint,
}

impl CurveRow {
    pub fn from_curve(pair: &EdgePair, run_tag: &str, mode: AlignMode, curve: &LagCurve) -> Vec<Self> {
        curve
            .iter()
            .map(|point| Self {
                flag: pair.flag.clone(),
                run_tag: run_tag.to_string(),
                column: pair.response.clone(),
                mode,
                point: *point,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairedCurveRow {
    pub flag: String,
    pub run_tag: String,
    pub column: String,
    #[serde(flatten)]
    pub row: PairedRow,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioMetrics {
    pub flag: String,
    pub column: String,
    #[serde(flatten)]
    pub metrics: CounterfactualMetrics,
}

/// Every table of one analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    /// One onset table per trigger flag, in flag order.
    pub onsets: Vec<ResultTable<Onset>>,
    /// One table per scenario, in catalogue order.
    pub simulated: Vec<ResultTable<SimulatedRow>>,
    pub curves: ResultTable<CurveRow>,
    pub paired: ResultTable<PairedCurveRow>,
    pub metrics: ResultTable<ScenarioMetrics>,
    /// Anchor-window means per scenario; empty when windows are disabled.
    pub windows: Vec<ResultTable<WindowMeanRow>>,
    pub exclusions: ResultTable<AnchorExclusion>,
    /// One ordered-vs-shuffled table per edge pair, in pair order.
    pub null_curves: Vec<ResultTable<NullCurveRow>>,
    /// Rolling operator snapshots per unit.
    pub stability: Vec<ResultTable<OperatorSnapshot>>,
    pub operators: ResultTable<StructuralOperator>,
    pub degradation: DegradationTracker,
}

impl AnalysisReport {
    pub fn simulated(&self, run_tag: &str) -> Option<&ResultTable<SimulatedRow>> {
        self.simulated.iter().find(|t| t.rows.first().is_some_and(|r| r.run_tag == run_tag))
    }

    pub fn metrics_for(&self, pair: &EdgePair, run_tag: &str) -> Option<&CounterfactualMetrics> {
        self.metrics
            .iter()
            .find(|m| m.flag == pair.flag && m.column == pair.response && m.metrics.run_tag == run_tag)
            .map(|m| &m.metrics)
    }

    pub fn curve(&self, pair: &EdgePair, run_tag: &str, mode: AlignMode) -> Vec<&LagPoint> {
        self.curves
            .iter()
            .filter(|r| r.flag == pair.flag && r.column == pair.response && r.run_tag == run_tag && r.mode == mode)
            .map(|r| &r.point)
            .collect()
    }

    pub fn null_curve(&self, pair: &EdgePair) -> Option<&ResultTable<NullCurveRow>> {
        let name = format!("null_{}_{}", pair.flag, pair.response);
        self.null_curves.iter().find(|t| t.name == name)
    }

    /// Table name to blake3 fingerprint.
    pub fn fingerprints(&self) -> Result<BTreeMap<String, String>, serde_json::Error> {
        let mut out = BTreeMap::new();
        let mut add = |name: &str, fp: String| {
            out.insert(name.to_string(), fp);
        };
        for t in &self.onsets {
            add(&t.name, t.fingerprint()?);
        }
        for t in &self.simulated {
            add(&t.name, t.fingerprint()?);
        }
        add(&self.curves.name, self.curves.fingerprint()?);
        add(&self.paired.name, self.paired.fingerprint()?);
        add(&self.metrics.name, self.metrics.fingerprint()?);
        for t in &self.windows {
            add(&t.name, t.fingerprint()?);
        }
        add(&self.exclusions.name, self.exclusions.fingerprint()?);
        for t in &self.null_curves {
            add(&t.name, t.fingerprint()?);
        }
        for t in &self.stability {
            add(&t.name, t.fingerprint()?);
        }
        add(&self.operators.name, self.operators.fingerprint()?);
        Ok(out)
    }

    /// Digest over every table fingerprint, in table-name order.
    pub fn fingerprint(&self) -> Result<String, serde_json::Error> {
        let mut hasher = blake3::Hasher::new();
        for (name, fp) in self.fingerprints()? {
            hasher.update(name.as_bytes());
            hasher.update(b"=");
            hasher.update(fp.as_bytes());
            hasher.update(b"\n");
        }
        Ok(hasher.finalize().to_hex().to_string())
    }
}
