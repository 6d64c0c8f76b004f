//! Error types for the frame model.

use crate::models::FieldType;
use thiserror::Error;

/// Errors raised while building or inspecting frames
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FrameError {
    /// A field's length differs from the first field of the same frame
    #[error("Ragged frame '{frame}': field '{field}' has {actual} values, expected {expected}")]
    RaggedFrame {
        frame: String,
        field: String,
        expected: usize,
        actual: usize,
    },

    /// A value of one type was appended to a field of another type
    #[error("Type mismatch: cannot append {value} to field of type {expected}")]
    TypeMismatch { expected: FieldType, value: String },
}

/// Result type for frame operations
pub type Result<T> = std::result::Result<T, FrameError>;
