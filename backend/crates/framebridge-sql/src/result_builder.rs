//! Result frame builder
//!
//! Drains a [`QueryResult`] into a new [`Frame`]. The output fields come from
//! the result schema alone, then each cell is decoded through
//! [`RelationalValue`]. The first value that cannot be decoded aborts the
//! build: the partial frame is dropped and the stream is closed.

use crate::error::{BridgeError, Result};
use crate::executor::QueryResult;
use crate::type_mapper::{FromRelationalType, RelationalValue};
use datafusion::arrow::record_batch::RecordBatch;
use framebridge_commons::{Field, FieldType, FieldValues, Frame};

struct ColumnBuilder {
    name: String,
    values: FieldValues,
}

/// Builds one output frame from one query result
pub struct ResultFrameBuilder {
    columns: Vec<ColumnBuilder>,
    rows: usize,
}

impl ResultFrameBuilder {
    /// Derive the output fields from the result schema
    pub fn for_result(result: &QueryResult) -> Result<Self> {
        let schema = result.schema();
        let columns = schema
            .fields()
            .iter()
            .map(|column| {
                let field_type = FieldType::from_relational_type(column.data_type()).map_err(|e| {
                    BridgeError::Decode(format!("Result column '{}': {}", column.name(), e))
                })?;
                Ok(ColumnBuilder {
                    name: column.name().clone(),
                    values: FieldValues::with_capacity(field_type, 0),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { columns, rows: 0 })
    }

    /// Consume `result` to completion and return the frame named `frame_name`
    pub async fn build(mut self, frame_name: &str, mut result: QueryResult) -> Result<Frame> {
        while let Some(batch) = result.next_batch().await {
            let appended = batch.and_then(|batch| self.append_batch(&batch));
            if let Err(e) = appended {
                result.close();
                return Err(e);
            }
        }

        log::debug!(
            "Decoded result frame '{}' ({} rows, {} columns)",
            frame_name,
            self.rows(),
            self.columns.len()
        );

        Ok(self.finish(frame_name))
    }

    /// Append every row of `batch`, in order
    pub fn append_batch(&mut self, batch: &RecordBatch) -> Result<()> {
        if batch.num_columns() != self.columns.len() {
            return Err(BridgeError::Decode(format!(
                "Result batch has {} columns, schema declares {}",
                batch.num_columns(),
                self.columns.len()
            )));
        }

        for row in 0..batch.num_rows() {
            let row_index = self.rows + row;
            for (column, array) in self.columns.iter_mut().zip(batch.columns()) {
                let value = RelationalValue::from_array(array, row)
                    .into_field_value()
                    .map_err(|e| {
                        BridgeError::Decode(format!(
                            "Result column '{}' row {}: {}",
                            column.name, row_index, e
                        ))
                    })?;

                column.values.push(value).map_err(|e| {
                    BridgeError::Decode(format!(
                        "Result column '{}' row {}: {}",
                        column.name, row_index, e
                    ))
                })?;
            }
        }

        self.rows += batch.num_rows();
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn finish(self, frame_name: &str) -> Frame {
        let fields = self
            .columns
            .into_iter()
            .map(|column| Field::new(column.name, column.values))
            .collect();
        Frame::new(frame_name, fields)
    }
}
