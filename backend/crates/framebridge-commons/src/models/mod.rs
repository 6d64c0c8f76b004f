//! Frame, field and value types.

pub mod field;
pub mod field_type;
pub mod frame;

pub use field::{Field, FieldValue, FieldValues};
pub use field_type::FieldType;
pub use frame::Frame;
