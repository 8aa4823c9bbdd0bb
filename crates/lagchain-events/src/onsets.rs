use lagchain_core::errors::{EventError, SchemaError};
use lagchain_core::models::{Onset, OnsetSet, ResultTable};
use lagchain_core::series::{Panel, UnitSeries};

/// A flag counts as set when it is finite and non-zero.
pub fn is_set(flag: f64) -> bool {
    flag.is_finite() && flag != 0.0
}

/// Positions `i > 0` where the flag goes from unset to set. Position 0 is
/// never an onset.
pub fn rising_edges(flags: &[f64]) -> Vec<usize> {
    flags
        .windows(2)
        .enumerate()
        .filter(|(_, w)| !is_set(w[0]) && is_set(w[1]))
        .map(|(i, _)| i + 1)
        .collect()
}

/// Extracts onset times of one flag column.
#[derive(Debug, Clone)]
pub struct EventExtractor {
    flag: String,
}

impl EventExtractor {
    pub fn new(flag: impl Into<String>) -> Self {
        Self { flag: flag.into() }
    }

    pub fn flag(&self) -> &str {
        &self.flag
    }

    /// Onset times of one unit, ascending. Empty is a legitimate result.
    pub fn unit_onsets(&self, series: &UnitSeries) -> Result<Vec<i64>, SchemaError> {
        let flags = series
            .column(&self.flag)
            .ok_or_else(|| SchemaError::MissingColumns {
                table: format!("unit {}", series.unit()),
                columns: vec![self.flag.clone()],
            })?;
        let times = series.times();
        Ok(rising_edges(flags).into_iter().map(|i| times[i]).collect())
    }

    /// Onsets of every unit of the panel.
    pub fn extract(&self, panel: &Panel) -> Result<OnsetSet, SchemaError> {
        panel.require_columns(&[self.flag.as_str()])?;
        let mut set = OnsetSet::new(self.flag.clone());
        for series in panel.units() {
            set.insert(series.unit().clone(), self.unit_onsets(series)?);
        }
        tracing::debug!(
            flag = %self.flag,
            units = set.n_units(),
            onsets = set.total(),
            "onsets extracted"
        );
        Ok(set)
    }
}

/// Fail when the onset set is empty across all units.
pub fn require_events(set: &OnsetSet) -> Result<(), EventError> {
    if set.is_empty() {
        return Err(EventError::NoEvents {
            flag: set.flag.clone(),
            units: set.n_units(),
        });
    }
    Ok(())
}

/// The `(unit, t)` event table.
pub fn onset_table(set: &OnsetSet) -> ResultTable<Onset> {
    ResultTable::new(format!("onsets_{}", set.flag), set.iter().collect())
}
