//! Error types for field arithmetic, polynomial and codec operations

use thiserror::Error;

/// Errors that can occur while building fields and codes or operating on them
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GaloisError {
    /// Code or field parameters are inconsistent
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// Array dimensions are incompatible with the operation
    #[error("Shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    /// Reciprocal of zero or division by the zero polynomial
    #[error("Division by zero")]
    DivideByZero,

    /// Operands belong to different fields
    #[error("Operands belong to different fields: {left} and {right}")]
    TypeMismatch { left: String, right: String },

    /// Argument is well-formed but not valid in this context
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Integer is not an element of the field
    #[error("Value {value} is not an element of GF({order})")]
    InvalidElement { value: u64, order: u64 },

    /// Received word carries more errors than the code can correct
    #[error("Uncorrectable codeword: more than {capacity} symbol errors")]
    Uncorrectable { capacity: usize },
}

impl GaloisError {
    pub(crate) fn shape(expected: impl ToString, actual: impl ToString) -> Self {
        GaloisError::ShapeMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}

/// Type alias for Result with GaloisError
pub type Result<T> = std::result::Result<T, GaloisError>;
