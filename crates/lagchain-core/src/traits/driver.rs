//! Where the exogenous node's values come from during a simulation.

use std::collections::BTreeMap;

use crate::series::UnitSeries;

/// Supplies the exogenous driver value of a unit at time `t`.
///
/// `None` means the driver does not cover `t`; the simulator turns that
/// into a missing-state error. A covered but NaN value propagates as NaN.
pub trait DriverSource: Send + Sync {
    fn driver_at(&self, unit: &UnitSeries, t: i64) -> Option<f64>;

    /// Panel column the driver reads, if it reads one.
    fn column(&self) -> Option<&str> {
        None
    }
}

/// The unit's own observed column.
#[derive(Debug, Clone)]
pub struct ObservedDriver {
    pub column: String,
}

impl ObservedDriver {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
        }
    }
}

impl DriverSource for ObservedDriver {
    fn driver_at(&self, unit: &UnitSeries, t: i64) -> Option<f64> {
        unit.value(&self.column, t)
    }

    fn column(&self) -> Option<&str> {
        Some(&self.column)
    }
}

/// `do(X = value)`: the driver is held fixed at every step.
#[derive(Debug, Clone, Copy)]
pub struct ConstantDriver(pub f64);

impl DriverSource for ConstantDriver {
    fn driver_at(&self, _unit: &UnitSeries, _t: i64) -> Option<f64> {
        Some(self.0)
    }
}

/// An explicit `t -> value` map shared by every unit.
impl DriverSource for BTreeMap<i64, f64> {
    fn driver_at(&self, _unit: &UnitSeries, t: i64) -> Option<f64> {
        self.get(&t).copied()
    }
}
