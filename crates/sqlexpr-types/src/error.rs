//! Compose-time type errors and recoverable conversion warnings

use sqlexpr_diagnostics::{
    Diagnostic, ErrorBuilder, ErrorCode, ExprError, EXPR0001, EXPR0002, EXPR0003, EXPR0004,
    EXPR0005, EXPR0006, EXPR0300, EXPR0301, EXPR0302, EXPR0303, EXPR0304, EXPR0305,
};
use thiserror::Error;

/// Result type for type resolution
pub type TypeResult<T> = Result<T, TypeError>;

/// Errors raised while composing an expression tree
///
/// These never reach row evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    /// No function registered under the name
    #[error("Unknown function {name} with {arity} argument(s)")]
    UnknownFunction { name: String, arity: usize },

    /// Wrong number of arguments
    #[error("{operator} expects {expected} argument(s), got {found}")]
    ArityMismatch {
        operator: String,
        expected: String,
        found: usize,
    },

    /// The lattice has no result for the operand pair
    #[error("Illegal operand types for {operator}: {left} and {right}")]
    IllegalOperands {
        operator: String,
        left: String,
        right: String,
    },

    /// Two explicit collations that cannot be merged
    #[error("Incompatible collations {left} and {right}")]
    IncompatibleCollations { left: String, right: String },

    /// Cast to a kind that the source cannot reach
    #[error("Cannot cast {from} to {to}")]
    InvalidCastTarget { from: String, to: String },

    /// Operand kind not accepted by the operator at all
    #[error("Unsupported operand kind {kind} for {operator}")]
    UnsupportedKind { operator: String, kind: String },
}

impl TypeError {
    pub fn unknown_function(name: impl Into<String>, arity: usize) -> Self {
        Self::UnknownFunction {
            name: name.into(),
            arity,
        }
    }

    pub fn arity_mismatch(
        operator: impl Into<String>,
        expected: impl Into<String>,
        found: usize,
    ) -> Self {
        Self::ArityMismatch {
            operator: operator.into(),
            expected: expected.into(),
            found,
        }
    }

    pub fn illegal_operands(
        operator: impl Into<String>,
        left: impl ToString,
        right: impl ToString,
    ) -> Self {
        Self::IllegalOperands {
            operator: operator.into(),
            left: left.to_string(),
            right: right.to_string(),
        }
    }

    pub fn incompatible_collations(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self::IncompatibleCollations {
            left: left.into(),
            right: right.into(),
        }
    }

    pub fn invalid_cast(from: impl ToString, to: impl ToString) -> Self {
        Self::InvalidCastTarget {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    pub fn unsupported_kind(operator: impl Into<String>, kind: impl ToString) -> Self {
        Self::UnsupportedKind {
            operator: operator.into(),
            kind: kind.to_string(),
        }
    }

    /// Structured error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::UnknownFunction { .. } => EXPR0001,
            Self::ArityMismatch { .. } => EXPR0002,
            Self::IllegalOperands { .. } => EXPR0003,
            Self::IncompatibleCollations { .. } => EXPR0004,
            Self::InvalidCastTarget { .. } => EXPR0005,
            Self::UnsupportedKind { .. } => EXPR0006,
        }
    }

    fn operator(&self) -> Option<&str> {
        match self {
            Self::UnknownFunction { name, .. } => Some(name),
            Self::ArityMismatch { operator, .. }
            | Self::IllegalOperands { operator, .. }
            | Self::UnsupportedKind { operator, .. } => Some(operator),
            _ => None,
        }
    }
}

impl From<TypeError> for ExprError {
    fn from(err: TypeError) -> Self {
        let mut builder = ErrorBuilder::new(err.code(), err.to_string());
        if let Some(op) = err.operator() {
            builder = builder.operator(op);
        }
        builder.compose()
    }
}

/// A recoverable conversion problem
///
/// The operator that hits one substitutes null and reports it through the
/// evaluation context's warning channel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionWarning {
    /// A string that does not parse as the target number
    #[error("Malformed {target} value '{input}'")]
    MalformedNumber { input: String, target: String },

    /// Month or day outside the calendar, or unparseable date/time text
    #[error("Invalid {component} in '{value}'")]
    InvalidDateComponent { component: String, value: String },

    /// A temporal result outside the range of its kind
    #[error("{kind} value out of range: {value}")]
    TemporalOutOfRange { kind: String, value: String },

    /// An operand combination with no meaningful result
    #[error("Unsupported temporal operation: {operation}")]
    UnsupportedTemporal { operation: String },

    /// No conversion path between the two kinds
    #[error("Cannot convert {from} to {to}")]
    InvalidConversion { from: String, to: String },

    /// A number that does not fit the target kind
    #[error("Value {value} out of range for {target}")]
    NumericOutOfRange { value: String, target: String },
}

impl ConversionWarning {
    pub fn malformed_number(input: impl Into<String>, target: impl ToString) -> Self {
        Self::MalformedNumber {
            input: input.into(),
            target: target.to_string(),
        }
    }

    pub fn invalid_component(component: impl Into<String>, value: impl ToString) -> Self {
        Self::InvalidDateComponent {
            component: component.into(),
            value: value.to_string(),
        }
    }

    pub fn out_of_range(kind: impl ToString, value: impl ToString) -> Self {
        Self::TemporalOutOfRange {
            kind: kind.to_string(),
            value: value.to_string(),
        }
    }

    pub fn unsupported(operation: impl Into<String>) -> Self {
        Self::UnsupportedTemporal {
            operation: operation.into(),
        }
    }

    pub fn invalid_conversion(from: impl ToString, to: impl ToString) -> Self {
        Self::InvalidConversion {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    pub fn numeric_out_of_range(value: impl ToString, target: impl ToString) -> Self {
        Self::NumericOutOfRange {
            value: value.to_string(),
            target: target.to_string(),
        }
    }

    /// Structured error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::MalformedNumber { .. } => EXPR0300,
            Self::InvalidDateComponent { .. } => EXPR0301,
            Self::TemporalOutOfRange { .. } => EXPR0302,
            Self::UnsupportedTemporal { .. } => EXPR0303,
            Self::InvalidConversion { .. } => EXPR0304,
            Self::NumericOutOfRange { .. } => EXPR0305,
        }
    }

    /// Warning-severity diagnostic for the context's warning channel
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::warning(self.code(), self.to_string())
    }
}
