use serde::{Deserialize, Serialize};

/// Classification of a stored scalar, kept alongside the value so a record
/// retains column typing even when the value itself is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    Int,
    IntUnsigned,
    Float,
    String,
    Boolean,
    Json,
    Uuid,
    Bytes,
    Date,
    Timestamp,
    Null,
}
