//! # framebridge-commons
//!
//! Columnar frame model shared by the FrameBridge crates.
//!
//! A [`Frame`] is an immutable, named, ordered list of [`Field`]s. Every field
//! holds homogeneously-typed, nullable values tagged with a [`FieldType`].
//! Frames are produced by upstream data sources, handed to `framebridge-sql`,
//! and the SQL result comes back as a new frame.
//!
//! ## Example Usage
//!
//! ```rust
//! use framebridge_commons::{Field, FieldType, Frame};
//!
//! let frame = Frame::new(
//!     "A",
//!     vec![
//!         Field::new("host", vec!["web-1", "web-2"]),
//!         Field::new("cpu", vec![Some(0.5_f64), None]),
//!     ],
//! );
//!
//! assert_eq!(frame.row_count(), 2);
//! assert_eq!(frame.fields()[1].field_type(), FieldType::Float64);
//! ```

pub mod errors;
pub mod models;

pub use errors::{FrameError, Result};
pub use models::{Field, FieldType, FieldValue, FieldValues, Frame};
