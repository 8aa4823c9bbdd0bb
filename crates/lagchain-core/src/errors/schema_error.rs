use super::error_code::{self, LagchainErrorCode};

/// Input-table shape errors. Always raised before any computation begins.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("missing columns {columns:?} in {table}")]
    MissingColumns { table: String, columns: Vec<String> },

    #[error("duplicate time index {t} for unit {unit}")]
    DuplicateTime { unit: String, t: i64 },

    #[error("column {column} of unit {unit} has {actual} values, expected {expected}")]
    LengthMismatch {
        unit: String,
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("time index of unit {unit} is not sorted")]
    UnsortedTime { unit: String },
}

impl SchemaError {
    /// Check every required column at once, naming all missing ones.
    pub fn check_columns(
        table: &str,
        required: &[&str],
        has_column: impl Fn(&str) -> bool,
    ) -> Result<(), Self> {
        let missing: Vec<String> = required
            .iter()
            .filter(|col| !has_column(col))
            .map(|col| col.to_string())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(Self::MissingColumns {
                table: table.to_string(),
                columns: missing,
            })
        }
    }
}

impl LagchainErrorCode for SchemaError {
    fn error_code(&self) -> &'static str {
        error_code::SCHEMA_ERROR
    }
}
