use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::SchemaError;

/// Identifier of one independent time series (a stay, a macro series).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(pub String);

impl UnitId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UnitId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for UnitId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<i64> for UnitId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

/// Columnar storage of one unit: a strictly increasing time index and
/// equally long named value columns (nodes and 0/1 flags).
///
/// Times need not be contiguous; lookups go through `position`.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitSeries {
    unit: UnitId,
    times: Vec<i64>,
    columns: BTreeMap<String, Vec<f64>>,
}

impl UnitSeries {
    /// Build a series, checking time ordering and column lengths.
    pub fn new(
        unit: impl Into<UnitId>,
        times: Vec<i64>,
        columns: BTreeMap<String, Vec<f64>>,
    ) -> Result<Self, SchemaError> {
        let unit = unit.into();
        for pair in times.windows(2) {
            if pair[1] == pair[0] {
                return Err(SchemaError::DuplicateTime {
                    unit: unit.to_string(),
                    t: pair[0],
                });
            }
            if pair[1] < pair[0] {
                return Err(SchemaError::UnsortedTime {
                    unit: unit.to_string(),
                });
            }
        }
        for (name, values) in &columns {
            if values.len() != times.len() {
                return Err(SchemaError::LengthMismatch {
                    unit: unit.to_string(),
                    column: name.clone(),
                    expected: times.len(),
                    actual: values.len(),
                });
            }
        }
        Ok(Self {
            unit,
            times,
            columns,
        })
    }

    /// Series over `t0, t0+1, ...` with the given columns.
    pub fn contiguous<I, S>(unit: impl Into<UnitId>, t0: i64, columns: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = (S, Vec<f64>)>,
        S: Into<String>,
    {
        let columns: BTreeMap<String, Vec<f64>> =
            columns.into_iter().map(|(k, v)| (k.into(), v)).collect();
        let len = columns.values().map(Vec::len).max().unwrap_or(0);
        let times = (0..len as i64).map(|i| t0 + i).collect();
        Self::new(unit, times, columns)
    }

    /// Return a copy with an extra (or replaced) column.
    pub fn with_column(&self, name: impl Into<String>, values: Vec<f64>) -> Result<Self, SchemaError> {
        let mut columns = self.columns.clone();
        columns.insert(name.into(), values);
        Self::new(self.unit.clone(), self.times.clone(), columns)
    }

    pub fn unit(&self) -> &UnitId {
        &self.unit
    }

    pub fn times(&self) -> &[i64] {
        &self.times
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn t_min(&self) -> Option<i64> {
        self.times.first().copied()
    }

    pub fn t_max(&self) -> Option<i64> {
        self.times.last().copied()
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Row index of time `t`.
    pub fn position(&self, t: i64) -> Option<usize> {
        self.times.binary_search(&t).ok()
    }

    pub fn contains_time(&self, t: i64) -> bool {
        self.position(t).is_some()
    }

    /// Raw value of `column` at `t`; may be NaN.
    pub fn value(&self, column: &str, t: i64) -> Option<f64> {
        let pos = self.position(t)?;
        self.columns.get(column).map(|values| values[pos])
    }

    /// Value of `column` at `t` if present and finite.
    pub fn finite_value(&self, column: &str, t: i64) -> Option<f64> {
        self.value(column, t).filter(|v| v.is_finite())
    }

    /// Raw values of `nodes` at `t`, NaN included. `None` if the time or a
    /// column is absent.
    pub fn row_at(&self, t: i64, nodes: &[String]) -> Option<Vec<f64>> {
        let pos = self.position(t)?;
        nodes
            .iter()
            .map(|n| self.columns.get(n).map(|values| values[pos]))
            .collect()
    }

    /// The node vector at `t`, in the order of `nodes`. `None` unless every
    /// entry exists and is finite.
    pub fn state_at(&self, t: i64, nodes: &[String]) -> Option<Vec<f64>> {
        nodes.iter().map(|n| self.finite_value(n, t)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series() -> UnitSeries {
        let mut cols = BTreeMap::new();
        cols.insert("A".to_string(), vec![1.0, f64::NAN, 3.0]);
        cols.insert("B".to_string(), vec![4.0, 5.0, 6.0]);
        UnitSeries::new("u1", vec![2, 5, 9], cols).unwrap()
    }

    #[test]
    fn lookup_by_time_not_position() {
        let s = series();
        assert_eq!(s.value("B", 5), Some(5.0));
        assert_eq!(s.value("B", 3), None);
        assert!(s.value("A", 5).unwrap().is_nan());
        assert_eq!(s.finite_value("A", 5), None);
        assert_eq!((s.t_min(), s.t_max()), (Some(2), Some(9)));
    }

    #[test]
    fn state_requires_every_node_finite() {
        let s = series();
        let nodes = vec!["A".to_string(), "B".to_string()];
        assert_eq!(s.state_at(9, &nodes), Some(vec![3.0, 6.0]));
        assert_eq!(s.state_at(5, &nodes), None);
        assert_eq!(s.row_at(5, &nodes).map(|r| r.len()), Some(2));
        assert_eq!(s.row_at(4, &nodes), None);
    }

    #[test]
    fn rejects_duplicate_and_unsorted_times() {
        let err = UnitSeries::new("u", vec![1, 1], BTreeMap::new()).unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateTime { t: 1, .. }));
        let err = UnitSeries::new("u", vec![2, 1], BTreeMap::new()).unwrap_err();
        assert!(matches!(err, SchemaError::UnsortedTime { .. }));
    }

    #[test]
    fn rejects_short_column() {
        let mut cols = BTreeMap::new();
        cols.insert("A".to_string(), vec![1.0]);
        let err = UnitSeries::new("u", vec![1, 2], cols).unwrap_err();
        assert!(matches!(err, SchemaError::LengthMismatch { expected: 2, actual: 1, .. }));
    }
}
