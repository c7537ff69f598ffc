//! Error and diagnostic types shared by every sqlexpr crate

use crate::ErrorCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Error - composition or evaluation cannot proceed
    Error,
    /// Warning - the value was replaced by null, evaluation continues
    Warning,
    /// Information - informational message
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// A diagnostic message with the operator that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Severity level
    pub severity: Severity,
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Operator or function that raised the diagnostic
    pub operator: Option<String>,
    /// Additional context or help
    pub help: Option<String>,
}

impl Diagnostic {
    /// Create a new error diagnostic
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
            operator: None,
            help: None,
        }
    }

    /// Create a new warning diagnostic
    pub fn warning(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
            operator: None,
            help: None,
        }
    }

    /// Attach the operator name
    pub fn with_operator(mut self, operator: impl Into<String>) -> Self {
        self.operator = Some(operator.into());
        self
    }

    /// Set help text
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Whether this diagnostic is a warning
    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} - {}", self.severity, self.code, self.message)?;
        if let Some(op) = &self.operator {
            write!(f, " in {}", op)?;
        }
        Ok(())
    }
}

/// Umbrella error for the engine
///
/// Compose errors abort query compilation; evaluation errors abort the statement.
#[derive(Debug, Clone, Error)]
pub enum ExprError {
    /// Compose-time error (arity, type resolution, collation)
    #[error("{code}: {message}")]
    Compose {
        code: ErrorCode,
        message: String,
        operator: Option<String>,
        context: Option<String>,
    },

    /// Row-time error
    #[error("{code}: {message}")]
    Evaluation {
        code: ErrorCode,
        message: String,
        operator: Option<String>,
        context: Option<String>,
    },

    /// System error
    #[error("{code}: {message}")]
    System {
        code: ErrorCode,
        message: String,
        context: Option<String>,
    },

    /// Multiple errors collected
    #[error("Multiple errors: {}", .0.len())]
    Multiple(Vec<ExprError>),
}

impl ExprError {
    /// Create a compose error
    pub fn compose(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Compose {
            code,
            message: message.into(),
            operator: None,
            context: None,
        }
    }

    /// Create an evaluation error
    pub fn evaluation(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Evaluation {
            code,
            message: message.into(),
            operator: None,
            context: None,
        }
    }

    /// Create a system error
    pub fn system(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::System {
            code,
            message: message.into(),
            context: None,
        }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Compose { code, .. } => *code,
            Self::Evaluation { code, .. } => *code,
            Self::System { code, .. } => *code,
            Self::Multiple(errors) => errors.first().map(|e| e.code()).unwrap_or(ErrorCode::new(0)),
        }
    }

    /// Get the operator name if available
    pub fn operator(&self) -> Option<&str> {
        match self {
            Self::Compose { operator, .. } | Self::Evaluation { operator, .. } => operator.as_deref(),
            _ => None,
        }
    }

    /// Convert to a diagnostic
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Self::Compose { code, message, operator, context }
            | Self::Evaluation { code, message, operator, context } => {
                let mut diag = Diagnostic::error(*code, message.clone());
                if let Some(op) = operator {
                    diag = diag.with_operator(op.clone());
                }
                if let Some(ctx) = context {
                    diag = diag.with_help(ctx.clone());
                }
                diag
            }
            Self::System { code, message, context } => {
                let mut diag = Diagnostic::error(*code, message.clone());
                if let Some(ctx) = context {
                    diag = diag.with_help(ctx.clone());
                }
                diag
            }
            Self::Multiple(errors) => {
                if let Some(first) = errors.first() {
                    first.to_diagnostic()
                } else {
                    Diagnostic::error(ErrorCode::new(0), "Unknown error")
                }
            }
        }
    }
}

/// Builder for creating errors with fluent API
pub struct ErrorBuilder {
    code: ErrorCode,
    message: String,
    operator: Option<String>,
    context: Option<String>,
}

impl ErrorBuilder {
    /// Create a new error builder
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            operator: None,
            context: None,
        }
    }

    /// Set the operator name
    pub fn operator(mut self, operator: impl Into<String>) -> Self {
        self.operator = Some(operator.into());
        self
    }

    /// Add context information
    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Build a compose error
    pub fn compose(self) -> ExprError {
        ExprError::Compose {
            code: self.code,
            message: self.message,
            operator: self.operator,
            context: self.context,
        }
    }

    /// Build an evaluation error
    pub fn evaluation(self) -> ExprError {
        ExprError::Evaluation {
            code: self.code,
            message: self.message,
            operator: self.operator,
            context: self.context,
        }
    }
}
