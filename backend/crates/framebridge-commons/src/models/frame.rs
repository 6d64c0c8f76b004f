//! Named, ordered collections of equal-length fields

use crate::errors::{FrameError, Result};
use crate::models::Field;
use serde::{Deserialize, Serialize};

/// An immutable, named, ordered sequence of [`Field`]s.
///
/// All fields of a well-formed frame have the same length. Construction does
/// not enforce this because frames arrive from upstream producers; call
/// [`Frame::validate_shape`] before relying on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    name: String,
    fields: Vec<Field>,
}

impl Frame {
    pub fn new(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn into_fields(self) -> Vec<Field> {
        self.fields
    }

    /// First field with the given name
    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name() == name)
    }

    pub fn column_count(&self) -> usize {
        self.fields.len()
    }

    /// Number of rows, taken from the first field (0 for a frame without fields)
    pub fn row_count(&self) -> usize {
        self.fields.first().map(Field::len).unwrap_or(0)
    }

    /// Check that every field holds the same number of values.
    ///
    /// Returns the row count on success.
    pub fn validate_shape(&self) -> Result<usize> {
        let expected = self.row_count();
        for field in &self.fields {
            if field.len() != expected {
                return Err(FrameError::RaggedFrame {
                    frame: self.name.clone(),
                    field: field.name().to_string(),
                    expected,
                    actual: field.len(),
                });
            }
        }
        Ok(expected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FieldValue;

    #[test]
    fn test_frame_accessors() {
        let frame = Frame::new(
            "inputFrameRefId",
            vec![
                Field::new("name", vec!["sam", "alex"]),
                Field::new("age", vec![Some(40_i64), None]),
            ],
        );

        assert_eq!(frame.name(), "inputFrameRefId");
        assert_eq!(frame.column_count(), 2);
        assert_eq!(frame.row_count(), 2);
        assert_eq!(frame.validate_shape().unwrap(), 2);
        assert_eq!(
            frame.field_by_name("age").and_then(|f| f.at(1)),
            Some(FieldValue::Null)
        );
        assert!(frame.field_by_name("missing").is_none());
    }

    #[test]
    fn test_frame_without_fields_has_no_rows() {
        let frame = Frame::new("empty", vec![]);
        assert_eq!(frame.row_count(), 0);
        assert_eq!(frame.validate_shape().unwrap(), 0);
    }

    #[test]
    fn test_ragged_frame_is_reported() {
        let frame = Frame::new(
            "A",
            vec![
                Field::new("a", vec![1_i64, 2, 3]),
                Field::new("b", vec![1_i64, 2]),
            ],
        );

        let err = frame.validate_shape().unwrap_err();
        assert_eq!(
            err,
            FrameError::RaggedFrame {
                frame: "A".to_string(),
                field: "b".to_string(),
                expected: 3,
                actual: 2,
            }
        );
    }
}
