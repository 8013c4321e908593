use crate::core::{data_type::DataType, value::Value};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldValue {
    pub name: String,
    pub value: Option<Value>,
    pub data_type: DataType,
}

impl FieldValue {
    /// Builds a field whose declared type is taken from the value itself.
    pub fn new(name: &str, value: Value) -> Self {
        FieldValue {
            name: name.to_string(),
            data_type: value.data_type(),
            value: Some(value),
        }
    }

    pub fn null(name: &str, data_type: DataType) -> Self {
        FieldValue {
            name: name.to_string(),
            value: None,
            data_type,
        }
    }
}

/// A single materialized row, with its stored field values as the source
/// returned them (no type coercion applied).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowData {
    pub entity: String,
    pub field_values: Vec<FieldValue>,
}

impl RowData {
    pub fn new(entity: &str, field_values: Vec<FieldValue>) -> Self {
        RowData {
            entity: entity.to_string(),
            field_values,
        }
    }

    /// Field lookup is case-insensitive, matching how stores report column
    /// names back to clients.
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.field_values
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(field))
    }

    pub fn get_value(&self, field: &str) -> Value {
        self.get(field)
            .and_then(|f| f.value.clone())
            .unwrap_or(Value::Null)
    }
}
