//! Semantic type tag carried by every field

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type tag of a [`Field`](crate::Field).
///
/// The numeric, string, bool and time tags are the ones the SQL bridge can
/// materialize. `Json` and `Enum` exist in the columnar model but have no
/// relational counterpart; the bridge rejects frames that carry them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Float32,
    Float64,
    String,
    Bool,
    Time,
    Json,
    Enum,
}

impl FieldType {
    /// Every tag, in declaration order
    pub const ALL: [FieldType; 15] = [
        FieldType::Int8,
        FieldType::Int16,
        FieldType::Int32,
        FieldType::Int64,
        FieldType::Uint8,
        FieldType::Uint16,
        FieldType::Uint32,
        FieldType::Uint64,
        FieldType::Float32,
        FieldType::Float64,
        FieldType::String,
        FieldType::Bool,
        FieldType::Time,
        FieldType::Json,
        FieldType::Enum,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Int8 => "int8",
            FieldType::Int16 => "int16",
            FieldType::Int32 => "int32",
            FieldType::Int64 => "int64",
            FieldType::Uint8 => "uint8",
            FieldType::Uint16 => "uint16",
            FieldType::Uint32 => "uint32",
            FieldType::Uint64 => "uint64",
            FieldType::Float32 => "float32",
            FieldType::Float64 => "float64",
            FieldType::String => "string",
            FieldType::Bool => "bool",
            FieldType::Time => "time",
            FieldType::Json => "json",
            FieldType::Enum => "enum",
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            FieldType::Int8
                | FieldType::Int16
                | FieldType::Int32
                | FieldType::Int64
                | FieldType::Uint8
                | FieldType::Uint16
                | FieldType::Uint32
                | FieldType::Uint64
        )
    }

    pub fn is_float(&self) -> bool {
        matches!(self, FieldType::Float32 | FieldType::Float64)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
