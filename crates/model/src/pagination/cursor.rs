use crate::{core::value::Value, records::row::RowData};
use serde::{Deserialize, Serialize};

/// The ordered tuple of ordering-key values taken from the last row of a
/// page. One cursor is created per page and replaced, never mutated, on the
/// next step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cursor {
    values: Vec<Value>,
}

impl Cursor {
    pub fn new(values: Vec<Value>) -> Self {
        Cursor { values }
    }

    /// Reads the stored key values straight out of a materialized row.
    pub fn from_row(row: &RowData, keys: &[String]) -> Self {
        let values = keys.iter().map(|key| row.get_value(key)).collect();
        Cursor { values }
    }

    /// Reads the key values out of a projected row through a precomputed
    /// key-position map. Positions must index into `row`.
    pub fn from_projected(row: &[Value], key_indexes: &[usize]) -> Self {
        let values = key_indexes
            .iter()
            .map(|&idx| row.get(idx).cloned().unwrap_or(Value::Null))
            .collect();
        Cursor { values }
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }
}
