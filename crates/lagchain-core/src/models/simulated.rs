use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::table::ResultTable;
use crate::errors::SchemaError;
use crate::series::{ObservationRecord, Panel, UnitId};

/// One simulated step of one unit under one scenario, keyed by
/// `(unit, t, run_tag)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatedRow {
    pub unit: UnitId,
    pub t: i64,
    pub run_tag: String,
    #[serde(flatten)]
    pub values: BTreeMap<String, f64>,
}

impl SimulatedRow {
    pub fn value(&self, node: &str) -> Option<f64> {
        self.values.get(node).copied()
    }
}

impl ResultTable<SimulatedRow> {
    /// Regroup a scenario table into a panel so it can be aligned like
    /// observed data.
    pub fn to_panel(&self) -> Result<Panel, SchemaError> {
        let records: Vec<ObservationRecord> = self
            .rows
            .iter()
            .map(|row| ObservationRecord {
                unit: row.unit.clone(),
                t: row.t,
                values: row.values.clone(),
            })
            .collect();
        Panel::from_records(&records, &[])
    }
}
