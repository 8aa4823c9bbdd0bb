use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::unit_series::{UnitId, UnitSeries};
use crate::errors::SchemaError;

/// One long-format input row: a unit, a time and its named values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationRecord {
    pub unit: UnitId,
    pub t: i64,
    #[serde(flatten)]
    pub values: BTreeMap<String, f64>,
}

impl ObservationRecord {
    pub fn new<I, S>(unit: impl Into<UnitId>, t: i64, values: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self {
            unit: unit.into(),
            t,
            values: values.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// All units of an input table, grouped once into per-unit columnar series.
/// Read-only during every computation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Panel {
    units: BTreeMap<UnitId, UnitSeries>,
}

impl Panel {
    /// Group long-format records by unit. Every column in `required` must
    /// appear in the table; all missing columns are reported together.
    /// A record lacking a column other records carry gets NaN there.
    pub fn from_records(records: &[ObservationRecord], required: &[&str]) -> Result<Self, SchemaError> {
        let columns: BTreeSet<&str> = records
            .iter()
            .flat_map(|r| r.values.keys().map(String::as_str))
            .collect();
        SchemaError::check_columns("panel", required, |c| columns.contains(c))?;

        let mut grouped: BTreeMap<&UnitId, Vec<&ObservationRecord>> = BTreeMap::new();
        for record in records {
            grouped.entry(&record.unit).or_default().push(record);
        }

        let mut units = BTreeMap::new();
        for (unit, mut rows) in grouped {
            rows.sort_by_key(|r| r.t);
            let times: Vec<i64> = rows.iter().map(|r| r.t).collect();
            let series_columns = columns
                .iter()
                .map(|&c| {
                    let values = rows
                        .iter()
                        .map(|r| r.values.get(c).copied().unwrap_or(f64::NAN))
                        .collect();
                    (c.to_string(), values)
                })
                .collect();
            let series = UnitSeries::new(unit.clone(), times, series_columns)?;
            units.insert(unit.clone(), series);
        }
        Ok(Self { units })
    }

    /// Assemble from already-built series. A later series with the same id
    /// replaces an earlier one.
    pub fn from_units(series: impl IntoIterator<Item = UnitSeries>) -> Self {
        Self {
            units: series.into_iter().map(|s| (s.unit().clone(), s)).collect(),
        }
    }

    /// Every unit must carry every column in `required`.
    pub fn require_columns(&self, required: &[&str]) -> Result<(), SchemaError> {
        SchemaError::check_columns("panel", required, |c| {
            self.units.values().all(|s| s.has_column(c))
        })
    }

    pub fn units(&self) -> impl Iterator<Item = &UnitSeries> {
        self.units.values()
    }

    pub fn unit(&self, id: &UnitId) -> Option<&UnitSeries> {
        self.units.get(id)
    }

    pub fn unit_ids(&self) -> impl Iterator<Item = &UnitId> {
        self.units.keys()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Total number of (unit, time) rows.
    pub fn n_rows(&self) -> usize {
        self.units.values().map(UnitSeries::len).sum()
    }

    /// Union of column names across units.
    pub fn column_names(&self) -> BTreeSet<&str> {
        self.units.values().flat_map(|s| s.column_names()).collect()
    }

    /// Apply a fallible per-unit transformation, keeping unit order.
    pub fn try_map_units<E>(
        &self,
        mut f: impl FnMut(&UnitSeries) -> Result<UnitSeries, E>,
    ) -> Result<Self, E> {
        let mut units = BTreeMap::new();
        for (id, series) in &self.units {
            units.insert(id.clone(), f(series)?);
        }
        Ok(Self { units })
    }
}
