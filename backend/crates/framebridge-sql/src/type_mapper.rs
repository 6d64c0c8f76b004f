//! Type mapping between frame fields and DataFusion
//!
//! Two directions are covered:
//!
//! - **Schema level**: [`ToRelationalType`] turns a [`FieldType`] into the Arrow
//!   column type of the ephemeral table, [`FromRelationalType`] picks the output
//!   field type for a result column.
//! - **Value level**: every result cell is read into a [`RelationalValue`], a
//!   closed set of the runtime kinds the bridge understands, and then turned
//!   into a [`FieldValue`] by [`RelationalValue::into_field_value`].
//!
//! | FieldType                | Arrow column                  | Output FieldType |
//! |--------------------------|-------------------------------|------------------|
//! | Int8..Int64, Uint8..Uint32 | Int64                       | Int64            |
//! | Uint64                   | UInt64                        | Uint64           |
//! | Float32, Float64         | Float64                       | Float64          |
//! | String                   | Utf8                          | String           |
//! | Bool                     | Boolean                       | Bool             |
//! | Time                     | Timestamp(Nanosecond, "UTC")  | Time             |
//! | Json, Enum               | unsupported                   | -                |
//!
//! A result column of type `Null` (e.g. `SELECT NULL AS note`) becomes a
//! `String` field whose values are all absent.

use crate::error::TypeMappingError;
use chrono::{DateTime, Utc};
use datafusion::arrow::array::ArrayRef;
use datafusion::arrow::datatypes::{DataType, TimeUnit};
use datafusion::scalar::ScalarValue;
use framebridge_commons::{FieldType, FieldValue};

/// Timezone attached to every timestamp column the bridge creates
pub const TIMESTAMP_TZ: &str = "UTC";

/// Convert a field type to the column type of its ephemeral table
pub trait ToRelationalType {
    fn to_relational_type(&self) -> Result<DataType, TypeMappingError>;
}

/// Choose the field type that holds values of a result column
pub trait FromRelationalType {
    fn from_relational_type(data_type: &DataType) -> Result<Self, TypeMappingError>
    where
        Self: Sized;
}

impl ToRelationalType for FieldType {
    fn to_relational_type(&self) -> Result<DataType, TypeMappingError> {
        let data_type = match self {
            FieldType::Int8
            | FieldType::Int16
            | FieldType::Int32
            | FieldType::Int64
            | FieldType::Uint8
            | FieldType::Uint16
            | FieldType::Uint32 => DataType::Int64,
            FieldType::Uint64 => DataType::UInt64,
            FieldType::Float32 | FieldType::Float64 => DataType::Float64,
            FieldType::String => DataType::Utf8,
            FieldType::Bool => DataType::Boolean,
            FieldType::Time => DataType::Timestamp(TimeUnit::Nanosecond, Some(TIMESTAMP_TZ.into())),
            FieldType::Json | FieldType::Enum => {
                return Err(TypeMappingError::UnsupportedType(format!(
                    "field type '{}' has no relational column type",
                    self
                )))
            },
        };

        Ok(data_type)
    }
}

impl FromRelationalType for FieldType {
    fn from_relational_type(data_type: &DataType) -> Result<Self, TypeMappingError> {
        let field_type = match data_type {
            DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32 => FieldType::Int64,
            DataType::UInt64 => FieldType::Uint64,
            DataType::Float16 | DataType::Float32 | DataType::Float64 => FieldType::Float64,
            DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => FieldType::String,
            DataType::Boolean => FieldType::Bool,
            DataType::Timestamp(_, _) => FieldType::Time,
            DataType::Null => FieldType::String,
            other => {
                return Err(TypeMappingError::UnsupportedType(format!(
                    "column type {} has no field type",
                    other
                )))
            },
        };

        Ok(field_type)
    }
}

/// Runtime kind of a single result cell.
///
/// Integers of every width arrive as `Int64` except `UInt64`, which keeps its
/// full range as `Uint64`. Floats arrive as `Float64`, strings of every
/// encoding as `String`, timestamps of every unit as `Timestamp`.
/// Anything else is `Unsupported`, carrying a description of what was seen.
#[derive(Debug, Clone, PartialEq)]
pub enum RelationalValue {
    Int64(i64),
    Uint64(u64),
    Float64(f64),
    String(String),
    Bool(bool),
    Timestamp(DateTime<Utc>),
    Null,
    Unsupported(String),
}

impl RelationalValue {
    /// Read the cell at `row` of `array`
    pub fn from_array(array: &ArrayRef, row: usize) -> Self {
        match ScalarValue::try_from_array(array, row) {
            Ok(scalar) => Self::from(scalar),
            Err(e) => RelationalValue::Unsupported(format!("unreadable {} value: {}", array.data_type(), e)),
        }
    }

    /// Convert into a frame value; `Null` becomes an absent value
    pub fn into_field_value(self) -> Result<FieldValue, TypeMappingError> {
        match self {
            RelationalValue::Int64(v) => Ok(FieldValue::Int64(v)),
            RelationalValue::Uint64(v) => Ok(FieldValue::Uint64(v)),
            RelationalValue::Float64(v) => Ok(FieldValue::Float64(v)),
            RelationalValue::String(v) => Ok(FieldValue::String(v)),
            RelationalValue::Bool(v) => Ok(FieldValue::Bool(v)),
            RelationalValue::Timestamp(v) => Ok(FieldValue::Time(v)),
            RelationalValue::Null => Ok(FieldValue::Null),
            RelationalValue::Unsupported(kind) => Err(TypeMappingError::UnsupportedValue(kind)),
        }
    }
}

fn timestamp(
    value: Option<i64>,
    unit: &str,
    convert: impl FnOnce(i64) -> Option<DateTime<Utc>>,
) -> RelationalValue {
    match value {
        None => RelationalValue::Null,
        Some(v) => match convert(v) {
            Some(ts) => RelationalValue::Timestamp(ts),
            None => RelationalValue::Unsupported(format!(
                "timestamp {} {} outside the representable range",
                v, unit
            )),
        },
    }
}

impl From<ScalarValue> for RelationalValue {
    fn from(scalar: ScalarValue) -> Self {
        match scalar {
            ScalarValue::Null => RelationalValue::Null,
            ScalarValue::Boolean(v) => v.map_or(RelationalValue::Null, RelationalValue::Bool),
            ScalarValue::Int8(v) => v.map_or(RelationalValue::Null, |v| RelationalValue::Int64(v.into())),
            ScalarValue::Int16(v) => v.map_or(RelationalValue::Null, |v| RelationalValue::Int64(v.into())),
            ScalarValue::Int32(v) => v.map_or(RelationalValue::Null, |v| RelationalValue::Int64(v.into())),
            ScalarValue::Int64(v) => v.map_or(RelationalValue::Null, RelationalValue::Int64),
            ScalarValue::UInt8(v) => v.map_or(RelationalValue::Null, |v| RelationalValue::Int64(v.into())),
            ScalarValue::UInt16(v) => v.map_or(RelationalValue::Null, |v| RelationalValue::Int64(v.into())),
            ScalarValue::UInt32(v) => v.map_or(RelationalValue::Null, |v| RelationalValue::Int64(v.into())),
            ScalarValue::UInt64(v) => v.map_or(RelationalValue::Null, RelationalValue::Uint64),
            ScalarValue::Float16(v) => v.map_or(RelationalValue::Null, |v| RelationalValue::Float64(v.to_f64())),
            ScalarValue::Float32(v) => v.map_or(RelationalValue::Null, |v| RelationalValue::Float64(v.into())),
            ScalarValue::Float64(v) => v.map_or(RelationalValue::Null, RelationalValue::Float64),
            ScalarValue::Utf8(v) | ScalarValue::LargeUtf8(v) | ScalarValue::Utf8View(v) => {
                v.map_or(RelationalValue::Null, RelationalValue::String)
            },
            ScalarValue::TimestampSecond(v, _) => timestamp(v, "s", |s| DateTime::from_timestamp(s, 0)),
            ScalarValue::TimestampMillisecond(v, _) => timestamp(v, "ms", DateTime::from_timestamp_millis),
            ScalarValue::TimestampMicrosecond(v, _) => timestamp(v, "us", DateTime::from_timestamp_micros),
            ScalarValue::TimestampNanosecond(v, _) => {
                timestamp(v, "ns", |ns| Some(DateTime::from_timestamp_nanos(ns)))
            },
            other if other.is_null() => RelationalValue::Null,
            other => RelationalValue::Unsupported(other.data_type().to_string()),
        }
    }
}
