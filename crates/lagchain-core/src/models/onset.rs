use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::series::UnitId;

/// One row of the onset/event table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Onset {
    pub unit: UnitId,
    pub t: i64,
}

/// Rising-edge times of one flag column, per unit. Derived and recomputed
/// on demand; units without onsets are kept with an empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnsetSet {
    pub flag: String,
    pub by_unit: BTreeMap<UnitId, Vec<i64>>,
}

impl OnsetSet {
    pub fn new(flag: impl Into<String>) -> Self {
        Self {
            flag: flag.into(),
            by_unit: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, unit: UnitId, onsets: Vec<i64>) {
        self.by_unit.insert(unit, onsets);
    }

    pub fn for_unit(&self, unit: &UnitId) -> &[i64] {
        self.by_unit.get(unit).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total onsets across units.
    pub fn total(&self) -> usize {
        self.by_unit.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn n_units(&self) -> usize {
        self.by_unit.len()
    }

    /// Flattened `(unit, t)` rows ordered by unit then time.
    pub fn iter(&self) -> impl Iterator<Item = Onset> + '_ {
        self.by_unit.iter().flat_map(|(unit, ts)| {
            ts.iter().map(move |&t| Onset {
                unit: unit.clone(),
                t,
            })
        })
    }
}
