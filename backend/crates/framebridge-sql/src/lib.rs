//! # framebridge-sql
//!
//! Runs one SQL statement over a set of in-memory frames and returns the
//! result as a new frame.
//!
//! Every call to [`SqlBridge::evaluate`] walks the same pipeline:
//!
//! 1. [`session::EphemeralStore`] - a private DataFusion session for this call
//! 2. [`materializer::TableMaterializer`] - each input frame becomes a table
//! 3. [`executor::QueryExecutor`] - the query runs verbatim against the store
//! 4. [`result_builder::ResultFrameBuilder`] - the result stream becomes a frame
//!
//! Column and value conversions in both directions live in [`type_mapper`].
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use framebridge_commons::{Field, Frame};
//! use framebridge_sql::SqlBridge;
//!
//! # async fn run() -> framebridge_sql::Result<()> {
//! let cpu = Frame::new(
//!     "A",
//!     vec![
//!         Field::new("host", vec!["web-1", "web-2"]),
//!         Field::new("value", vec![0.25_f64, 0.75]),
//!     ],
//! );
//!
//! let bridge = SqlBridge::default();
//! let out = bridge
//!     .evaluate("busy", "SELECT host FROM A WHERE value > 0.5", &[cpu])
//!     .await?;
//! assert_eq!(out.row_count(), 1);
//! # Ok(())
//! # }
//! ```

pub mod bridge;
pub mod error;
pub mod executor;
pub mod logging;
pub mod materializer;
pub mod result_builder;
pub mod session;
pub mod type_mapper;

pub use bridge::SqlBridge;
pub use error::{BridgeError, EvaluationPhase, Result, TypeMappingError};
pub use executor::{QueryExecutor, QueryResult};
pub use logging::init_logging;
pub use materializer::TableMaterializer;
pub use result_builder::ResultFrameBuilder;
pub use session::EphemeralStore;
pub use type_mapper::{FromRelationalType, RelationalValue, ToRelationalType};
