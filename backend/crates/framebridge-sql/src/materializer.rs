//! Table materializer
//!
//! Turns one input [`Frame`] into one in-memory DataFusion table. The column
//! schema is derived from the field types first; a single unsupported field
//! type aborts before any data is copied, so no half-built table ever becomes
//! queryable. Rows keep their original order inside a single partition.

use crate::error::{BridgeError, Result};
use crate::session::EphemeralStore;
use crate::type_mapper::{ToRelationalType, TIMESTAMP_TZ};
use datafusion::arrow::array::{
    ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray, TimestampNanosecondArray,
    UInt64Array,
};
use datafusion::arrow::datatypes::{Field as ArrowField, Schema, SchemaRef};
use datafusion::arrow::record_batch::{RecordBatch, RecordBatchOptions};
use datafusion::datasource::MemTable;
use framebridge_commons::{Field, FieldValues, Frame};
use std::collections::HashSet;
use std::sync::Arc;

/// Loads input frames into an [`EphemeralStore`]
pub struct TableMaterializer<'a> {
    store: &'a EphemeralStore,
}

impl<'a> TableMaterializer<'a> {
    pub fn new(store: &'a EphemeralStore) -> Self {
        Self { store }
    }

    /// Materialize `frame` as table `table_name`.
    ///
    /// A table already registered under that name is replaced (last write wins).
    pub fn materialize(&self, table_name: &str, frame: &Frame) -> Result<()> {
        let schema = frame_schema(table_name, frame)?;
        let batch = frame_to_batch(table_name, frame, schema.clone())?;
        let rows = batch.num_rows();

        let table = MemTable::try_new(schema, vec![vec![batch]]).map_err(|e| {
            BridgeError::Materialization(format!("Failed to create table '{}': {}", table_name, e))
        })?;

        if self.store.put_table(table_name, Arc::new(table))? {
            log::warn!(
                "Input frame name '{}' used more than once; the later frame replaces the earlier table",
                table_name
            );
        }

        log::debug!(
            "Materialized table '{}' ({} rows, {} columns)",
            table_name,
            rows,
            frame.column_count()
        );

        Ok(())
    }
}

/// Column schema of the table built from `frame`; every column is nullable
pub fn frame_schema(table_name: &str, frame: &Frame) -> Result<SchemaRef> {
    let mut seen = HashSet::with_capacity(frame.column_count());
    let mut columns = Vec::with_capacity(frame.column_count());

    for field in frame.fields() {
        if !seen.insert(field.name()) {
            return Err(BridgeError::Materialization(format!(
                "Table '{}' has more than one column named '{}'",
                table_name,
                field.name()
            )));
        }

        let data_type = field.field_type().to_relational_type().map_err(|e| {
            BridgeError::Materialization(format!(
                "Table '{}' column '{}' ({}): {}",
                table_name,
                field.name(),
                field.field_type(),
                e
            ))
        })?;

        columns.push(ArrowField::new(field.name(), data_type, true));
    }

    Ok(Arc::new(Schema::new(columns)))
}

/// Copy every field of `frame` into one record batch matching `schema`
pub fn frame_to_batch(table_name: &str, frame: &Frame, schema: SchemaRef) -> Result<RecordBatch> {
    let rows = frame.validate_shape().map_err(|e| {
        BridgeError::Materialization(format!("Table '{}': {}", table_name, e))
    })?;

    let arrays = frame
        .fields()
        .iter()
        .map(|field| field_to_array(table_name, field))
        .collect::<Result<Vec<_>>>()?;

    let options = RecordBatchOptions::new().with_row_count(Some(rows));
    RecordBatch::try_new_with_options(schema, arrays, &options).map_err(|e| {
        BridgeError::Materialization(format!("Failed to insert rows into '{}': {}", table_name, e))
    })
}

fn widen<T: Copy + Into<i64>>(values: &[Option<T>]) -> ArrayRef {
    Arc::new(values.iter().map(|v| v.map(Into::into)).collect::<Int64Array>())
}

fn field_to_array(table_name: &str, field: &Field) -> Result<ArrayRef> {
    let array: ArrayRef = match field.values() {
        FieldValues::Int8(values) => widen(values),
        FieldValues::Int16(values) => widen(values),
        FieldValues::Int32(values) => widen(values),
        FieldValues::Int64(values) => widen(values),
        FieldValues::Uint8(values) => widen(values),
        FieldValues::Uint16(values) => widen(values),
        FieldValues::Uint32(values) => widen(values),
        FieldValues::Uint64(values) => Arc::new(UInt64Array::from(values.clone())),
        FieldValues::Float32(values) => Arc::new(
            values
                .iter()
                .map(|v| v.map(f64::from))
                .collect::<Float64Array>(),
        ),
        FieldValues::Float64(values) => Arc::new(Float64Array::from(values.clone())),
        FieldValues::String(values) => {
            Arc::new(values.iter().map(|v| v.as_deref()).collect::<StringArray>())
        },
        FieldValues::Bool(values) => Arc::new(BooleanArray::from(values.clone())),
        FieldValues::Time(values) => {
            let mut nanos = Vec::with_capacity(values.len());
            for (row, value) in values.iter().enumerate() {
                let converted = match value {
                    Some(ts) => Some(ts.timestamp_nanos_opt().ok_or_else(|| {
                        BridgeError::Materialization(format!(
                            "Table '{}' column '{}' row {}: time {} outside the nanosecond range",
                            table_name,
                            field.name(),
                            row,
                            ts
                        ))
                    })?),
                    None => None,
                };
                nanos.push(converted);
            }
            Arc::new(TimestampNanosecondArray::from(nanos).with_timezone(TIMESTAMP_TZ))
        },
        FieldValues::Json(_) | FieldValues::Enum(_) => {
            // frame_schema rejects these before any data is copied
            return Err(BridgeError::Materialization(format!(
                "Table '{}' column '{}': unsupported field type {}",
                table_name,
                field.name(),
                field.field_type()
            )));
        },
    };

    Ok(array)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use datafusion::arrow::array::Array;
    use datafusion::arrow::datatypes::DataType;
    use framebridge_configs::EngineSettings;

    fn store() -> EphemeralStore {
        EphemeralStore::new(&EngineSettings::default()).unwrap()
    }

    #[test]
    fn test_schema_mirrors_field_order_and_nullability() {
        let frame = Frame::new(
            "A",
            vec![
                Field::new("small", vec![1_i8]),
                Field::new("ratio", vec![0.5_f32]),
                Field::new("label", vec!["x"]),
            ],
        );

        let schema = frame_schema("A", &frame).unwrap();
        let names: Vec<_> = schema.fields().iter().map(|f| f.name().as_str()).collect();
        assert_eq!(names, vec!["small", "ratio", "label"]);
        assert_eq!(schema.field(0).data_type(), &DataType::Int64);
        assert_eq!(schema.field(1).data_type(), &DataType::Float64);
        assert_eq!(schema.field(2).data_type(), &DataType::Utf8);
        assert!(schema.fields().iter().all(|f| f.is_nullable()));
    }

    #[test]
    fn test_batch_preserves_rows_and_nulls() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let frame = Frame::new(
            "A",
            vec![
                Field::new("n", vec![Some(3_u16), None, Some(9)]),
                Field::new("t", vec![Some(ts), Some(ts), None]),
            ],
        );

        let schema = frame_schema("A", &frame).unwrap();
        let batch = frame_to_batch("A", &frame, schema).unwrap();
        assert_eq!(batch.num_rows(), 3);

        let n = batch.column(0).as_any().downcast_ref::<Int64Array>().unwrap();
        assert_eq!(n.value(0), 3);
        assert!(n.is_null(1));
        assert_eq!(n.value(2), 9);

        let t = batch.column(1).as_any().downcast_ref::<TimestampNanosecondArray>().unwrap();
        assert_eq!(t.value(0), ts.timestamp_nanos_opt().unwrap());
        assert!(t.is_null(2));
    }

    #[test]
    fn test_unsupported_field_type_aborts_before_registration() {
        let store = store();
        let frame = Frame::new(
            "A",
            vec![
                Field::new("ok", vec![1_i64]),
                Field::new("doc", vec![serde_json::json!({"a": 1})]),
            ],
        );

        let err = TableMaterializer::new(&store).materialize("A", &frame).unwrap_err();
        assert!(matches!(err, BridgeError::Materialization(_)));
        assert!(err.to_string().contains("doc"));
        assert!(!store.has_table("A"));
    }

    #[test]
    fn test_enum_field_is_rejected() {
        let frame = Frame::new("A", vec![Field::new("state", FieldValues::Enum(vec![Some(1)]))]);
        assert!(matches!(
            frame_schema("A", &frame),
            Err(BridgeError::Materialization(_))
        ));
    }

    #[test]
    fn test_uint64_column_keeps_full_range() {
        let frame = Frame::new("A", vec![Field::new("big", vec![Some(1_u64), None, Some(u64::MAX)])]);
        let schema = frame_schema("A", &frame).unwrap();
        assert_eq!(schema.field(0).data_type(), &DataType::UInt64);

        let batch = frame_to_batch("A", &frame, schema).unwrap();
        let big = batch.column(0).as_any().downcast_ref::<UInt64Array>().unwrap();
        assert_eq!(big.value(0), 1);
        assert!(big.is_null(1));
        assert_eq!(big.value(2), u64::MAX);
    }

    #[test]
    fn test_ragged_frame_rejected() {
        let frame = Frame::new(
            "A",
            vec![Field::new("a", vec![1_i64, 2]), Field::new("b", vec![1_i64])],
        );
        let schema = frame_schema("A", &frame).unwrap();

        let err = frame_to_batch("A", &frame, schema).unwrap_err();
        assert!(matches!(err, BridgeError::Materialization(_)));
    }

    #[test]
    fn test_duplicate_column_names_rejected() {
        let frame = Frame::new(
            "A",
            vec![Field::new("v", vec![1_i64]), Field::new("v", vec![2_i64])],
        );
        let err = frame_schema("A", &frame).unwrap_err();
        assert!(err.to_string().contains("more than one column named 'v'"));
    }

    #[test]
    fn test_frame_without_fields_materializes() {
        let store = store();
        let frame = Frame::new("empty", vec![]);

        TableMaterializer::new(&store).materialize("empty", &frame).unwrap();
        assert!(store.has_table("empty"));
    }
}
