//! Error types for framebridge-sql

use thiserror::Error;

/// Phases of a single `evaluate` call.
///
/// `Created → Materializing → Executing → Decoding → {Succeeded, Failed}`.
/// Nothing survives a terminal phase; the next call starts over at `Created`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluationPhase {
    Created,
    Materializing,
    Executing,
    Decoding,
    Succeeded,
    Failed,
}

impl EvaluationPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            EvaluationPhase::Created => "created",
            EvaluationPhase::Materializing => "materializing",
            EvaluationPhase::Executing => "executing",
            EvaluationPhase::Decoding => "decoding",
            EvaluationPhase::Succeeded => "succeeded",
            EvaluationPhase::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, EvaluationPhase::Succeeded | EvaluationPhase::Failed)
    }
}

/// Failures of the type mapper, wrapped by the component that hit them
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TypeMappingError {
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    #[error("Unsupported value: {0}")]
    UnsupportedValue(String),
}

/// Terminal outcome of a failed bridge call
#[derive(Error, Debug)]
pub enum BridgeError {
    /// Input frame has an unsupported field type or a row does not fit its table
    #[error("Materialization error: {0}")]
    Materialization(String),

    /// Syntax error, unknown table/column, timeout or engine failure
    #[error("Execution error: {0}")]
    Execution(String),

    /// A result value or column cannot be represented in a frame
    #[error("Decode error: {0}")]
    Decode(String),

    /// Engine settings rejected while building the session
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl BridgeError {
    /// Phase in which the call failed
    pub fn phase(&self) -> EvaluationPhase {
        match self {
            BridgeError::Configuration(_) => EvaluationPhase::Created,
            BridgeError::Materialization(_) => EvaluationPhase::Materializing,
            BridgeError::Execution(_) => EvaluationPhase::Executing,
            BridgeError::Decode(_) => EvaluationPhase::Decoding,
        }
    }
}

/// Result type for bridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;
