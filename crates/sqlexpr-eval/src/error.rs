//! Evaluation errors for the expression engine

use sqlexpr_diagnostics::{
    ErrorBuilder, ErrorCode, ExprError, EXPR0201, EXPR0202, EXPR0203, EXPR0204, EXPR0205,
    EXPR0206, EXPR0400,
};
use sqlexpr_types::ConversionWarning;
use thiserror::Error;

/// Result type for evaluation operations
pub type EvalResult<T> = Result<T, EvalError>;

/// Errors that fail the statement being evaluated
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvalError {
    /// Division or modulo by zero
    #[error("Division by zero in {operator}")]
    DivisionByZero { operator: String },

    /// Result does not fit the resolved kind
    #[error("Numeric overflow in {operation}")]
    Overflow { operation: String },

    /// Row has no field at the index
    #[error("Field {index} out of range for row of {len} fields")]
    FieldOutOfRange { index: usize, len: usize },

    /// No value bound for the parameter
    #[error("Parameter {index} is not bound")]
    UnboundParameter { index: usize },

    /// Value representation does not match the node's resolved kind
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// A conversion warning promoted by strict mode
    #[error("Conversion failed: {0}")]
    Conversion(#[from] ConversionWarning),

    /// Internal error (should not happen)
    #[error("Internal evaluation error: {message}")]
    Internal { message: String },
}

impl EvalError {
    /// Create a division by zero error
    pub fn division_by_zero(operator: impl Into<String>) -> Self {
        Self::DivisionByZero {
            operator: operator.into(),
        }
    }

    /// Create an overflow error
    pub fn overflow(operation: impl Into<String>) -> Self {
        Self::Overflow {
            operation: operation.into(),
        }
    }

    /// Create a type mismatch error
    pub fn type_mismatch(expected: impl ToString, found: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.to_string(),
            found: found.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Structured error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::DivisionByZero { .. } => EXPR0201,
            Self::Overflow { .. } => EXPR0202,
            Self::FieldOutOfRange { .. } => EXPR0203,
            Self::UnboundParameter { .. } => EXPR0204,
            Self::TypeMismatch { .. } => EXPR0205,
            Self::Conversion(_) => EXPR0206,
            Self::Internal { .. } => EXPR0400,
        }
    }
}

impl From<EvalError> for ExprError {
    fn from(err: EvalError) -> Self {
        match &err {
            EvalError::Internal { .. } => ExprError::system(err.code(), err.to_string()),
            EvalError::DivisionByZero { operator } => ErrorBuilder::new(err.code(), err.to_string())
                .operator(operator.as_str())
                .evaluation(),
            _ => ExprError::evaluation(err.code(), err.to_string()),
        }
    }
}

/// Failure of a single operator application
///
/// Fatal faults abort the statement; recoverable ones are turned into a null
/// result plus a warning by the evaluation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum OpFault {
    Fatal(EvalError),
    Recoverable(ConversionWarning),
}

impl From<EvalError> for OpFault {
    fn from(err: EvalError) -> Self {
        Self::Fatal(err)
    }
}

impl From<ConversionWarning> for OpFault {
    fn from(warning: ConversionWarning) -> Self {
        Self::Recoverable(warning)
    }
}

/// Result of an operator application
pub type OpResult<T> = Result<T, OpFault>;
