//! Fields and their typed, nullable value storage

use crate::errors::{FrameError, Result};
use crate::models::FieldType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// A single cell read out of a field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Null,
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Uint8(u8),
    Uint16(u16),
    Uint32(u32),
    Uint64(u64),
    Float32(f32),
    Float64(f64),
    String(String),
    Bool(bool),
    Time(DateTime<Utc>),
    Json(JsonValue),
    Enum(u16),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
}

macro_rules! field_values {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        /// Typed value storage of a [`Field`], one vector variant per type tag.
        ///
        /// `None` entries are absent (null) values.
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(tag = "type", content = "values", rename_all = "lowercase")]
        pub enum FieldValues {
            $($variant(Vec<Option<$ty>>),)*
        }

        impl FieldValues {
            /// Empty storage for the given type tag
            pub fn with_capacity(field_type: FieldType, capacity: usize) -> Self {
                match field_type {
                    $(FieldType::$variant => FieldValues::$variant(Vec::with_capacity(capacity)),)*
                }
            }

            pub fn field_type(&self) -> FieldType {
                match self {
                    $(FieldValues::$variant(_) => FieldType::$variant,)*
                }
            }

            pub fn len(&self) -> usize {
                match self {
                    $(FieldValues::$variant(values) => values.len(),)*
                }
            }

            pub fn null_count(&self) -> usize {
                match self {
                    $(FieldValues::$variant(values) => values.iter().filter(|v| v.is_none()).count(),)*
                }
            }

            /// Value at `index`, `None` when out of bounds
            pub fn at(&self, index: usize) -> Option<FieldValue> {
                match self {
                    $(FieldValues::$variant(values) => values.get(index).map(|v| match v {
                        Some(v) => FieldValue::$variant(v.clone()),
                        None => FieldValue::Null,
                    }),)*
                }
            }

            pub fn push_null(&mut self) {
                match self {
                    $(FieldValues::$variant(values) => values.push(None),)*
                }
            }

            /// Append a value; `FieldValue::Null` appends an absent value.
            pub fn push(&mut self, value: FieldValue) -> Result<()> {
                match (self, value) {
                    $((FieldValues::$variant(values), FieldValue::$variant(v)) => values.push(Some(v)),)*
                    (values, FieldValue::Null) => values.push_null(),
                    (values, other) => {
                        return Err(FrameError::TypeMismatch {
                            expected: values.field_type(),
                            value: format!("{:?}", other),
                        })
                    },
                }
                Ok(())
            }
        }
    };
}

field_values! {
    Int8 => i8,
    Int16 => i16,
    Int32 => i32,
    Int64 => i64,
    Uint8 => u8,
    Uint16 => u16,
    Uint32 => u32,
    Uint64 => u64,
    Float32 => f32,
    Float64 => f64,
    String => String,
    Bool => bool,
    Time => DateTime<Utc>,
    Json => JsonValue,
    Enum => u16,
}

impl FieldValues {
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// Enum shares u16 with Uint16, so it is built explicitly via FieldValues::Enum.
macro_rules! from_vec {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<Vec<$ty>> for FieldValues {
                fn from(values: Vec<$ty>) -> Self {
                    FieldValues::$variant(values.into_iter().map(Some).collect())
                }
            }

            impl From<Vec<Option<$ty>>> for FieldValues {
                fn from(values: Vec<Option<$ty>>) -> Self {
                    FieldValues::$variant(values)
                }
            }
        )*
    };
}

from_vec! {
    Int8 => i8,
    Int16 => i16,
    Int32 => i32,
    Int64 => i64,
    Uint8 => u8,
    Uint16 => u16,
    Uint32 => u32,
    Uint64 => u64,
    Float32 => f32,
    Float64 => f64,
    String => String,
    Bool => bool,
    Time => DateTime<Utc>,
    Json => JsonValue,
}

impl From<Vec<&str>> for FieldValues {
    fn from(values: Vec<&str>) -> Self {
        FieldValues::String(values.into_iter().map(|v| Some(v.to_string())).collect())
    }
}

impl From<Vec<Option<&str>>> for FieldValues {
    fn from(values: Vec<Option<&str>>) -> Self {
        FieldValues::String(values.into_iter().map(|v| v.map(str::to_string)).collect())
    }
}

/// One named, homogeneously-typed column of a [`Frame`](crate::Frame)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    name: String,
    values: FieldValues,
}

impl Field {
    pub fn new(name: impl Into<String>, values: impl Into<FieldValues>) -> Self {
        Self {
            name: name.into(),
            values: values.into(),
        }
    }

    /// A field of the given type with no values
    pub fn empty(name: impl Into<String>, field_type: FieldType) -> Self {
        Self::new(name, FieldValues::with_capacity(field_type, 0))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> FieldType {
        self.values.field_type()
    }

    pub fn values(&self) -> &FieldValues {
        &self.values
    }

    pub fn into_values(self) -> FieldValues {
        self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn at(&self, index: usize) -> Option<FieldValue> {
        self.values.at(index)
    }

    pub fn null_count(&self) -> usize {
        self.values.null_count()
    }
}
