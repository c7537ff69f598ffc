//! Error codes following a structured numbering system
//!
//! Error code ranges:
//! - EXPR0001-EXPR0099: Compose errors (arity, type resolution, collation)
//! - EXPR0200-EXPR0299: Evaluation errors (runtime, fatal for the statement)
//! - EXPR0300-EXPR0399: Conversion warnings (recoverable, value replaced by null)
//! - EXPR0400-EXPR0499: System errors (configuration, internal)

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error code identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorCode(u16);

impl ErrorCode {
    /// Create a new error code
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Get the numeric code
    pub const fn code(&self) -> u16 {
        self.0
    }

    /// Get error information for this code
    pub fn info(&self) -> &'static ErrorInfo {
        ERROR_INFO.get(&self.0).unwrap_or(&UNKNOWN_ERROR)
    }

    /// Check if this is a compose error (0001-0099)
    pub const fn is_compose_error(&self) -> bool {
        self.0 >= 1 && self.0 < 100
    }

    /// Check if this is an evaluation error (0200-0299)
    pub const fn is_evaluation_error(&self) -> bool {
        self.0 >= 200 && self.0 < 300
    }

    /// Check if this is a recoverable conversion warning (0300-0399)
    pub const fn is_conversion_warning(&self) -> bool {
        self.0 >= 300 && self.0 < 400
    }

    /// Check if this is a system error (0400-0499)
    pub const fn is_system_error(&self) -> bool {
        self.0 >= 400 && self.0 < 500
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EXPR{:04}", self.0)
    }
}

/// Information about an error code
#[derive(Debug, Clone)]
pub struct ErrorInfo {
    /// Short description of the error
    pub description: &'static str,
    /// Detailed help text
    pub help: Option<&'static str>,
}

impl ErrorInfo {
    const fn new(description: &'static str) -> Self {
        Self {
            description,
            help: None,
        }
    }

    const fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }
}

static UNKNOWN_ERROR: ErrorInfo = ErrorInfo::new("Unknown error");

use std::collections::HashMap;
use std::sync::LazyLock;

static ERROR_INFO: LazyLock<HashMap<u16, ErrorInfo>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    // Compose errors (0001-0099)
    map.insert(1, ErrorInfo::new("Unknown function")
        .with_help("Check the function name and the number of arguments"));
    map.insert(2, ErrorInfo::new("Invalid argument count"));
    map.insert(3, ErrorInfo::new("Illegal operand types"));
    map.insert(4, ErrorInfo::new("Incompatible collations")
        .with_help("Add an explicit COLLATE clause to one of the operands"));
    map.insert(5, ErrorInfo::new("Invalid cast target"));
    map.insert(6, ErrorInfo::new("Unsupported operand kind"));

    // Evaluation errors (0200-0299)
    map.insert(200, ErrorInfo::new("Evaluation failed"));
    map.insert(201, ErrorInfo::new("Division by zero"));
    map.insert(202, ErrorInfo::new("Numeric overflow"));
    map.insert(203, ErrorInfo::new("Field index out of range"));
    map.insert(204, ErrorInfo::new("Unbound parameter"));
    map.insert(205, ErrorInfo::new("Runtime type mismatch"));
    map.insert(206, ErrorInfo::new("Conversion failed in strict mode"));

    // Conversion warnings (0300-0399)
    map.insert(300, ErrorInfo::new("Malformed number"));
    map.insert(301, ErrorInfo::new("Invalid date/time component"));
    map.insert(302, ErrorInfo::new("Temporal value out of range"));
    map.insert(303, ErrorInfo::new("Unsupported temporal combination"));
    map.insert(304, ErrorInfo::new("Invalid conversion"));
    map.insert(305, ErrorInfo::new("Numeric value out of range"));

    // System errors (0400-0499)
    map.insert(400, ErrorInfo::new("Internal error"));
    map.insert(401, ErrorInfo::new("Configuration error"));

    map
});

// Convenient error code constants

// Compose errors
pub const EXPR0001: ErrorCode = ErrorCode::new(1);
pub const EXPR0002: ErrorCode = ErrorCode::new(2);
pub const EXPR0003: ErrorCode = ErrorCode::new(3);
pub const EXPR0004: ErrorCode = ErrorCode::new(4);
pub const EXPR0005: ErrorCode = ErrorCode::new(5);
pub const EXPR0006: ErrorCode = ErrorCode::new(6);

// Evaluation errors
pub const EXPR0200: ErrorCode = ErrorCode::new(200);
pub const EXPR0201: ErrorCode = ErrorCode::new(201);
pub const EXPR0202: ErrorCode = ErrorCode::new(202);
pub const EXPR0203: ErrorCode = ErrorCode::new(203);
pub const EXPR0204: ErrorCode = ErrorCode::new(204);
pub const EXPR0205: ErrorCode = ErrorCode::new(205);
pub const EXPR0206: ErrorCode = ErrorCode::new(206);

// Conversion warnings
pub const EXPR0300: ErrorCode = ErrorCode::new(300);
pub const EXPR0301: ErrorCode = ErrorCode::new(301);
pub const EXPR0302: ErrorCode = ErrorCode::new(302);
pub const EXPR0303: ErrorCode = ErrorCode::new(303);
pub const EXPR0304: ErrorCode = ErrorCode::new(304);
pub const EXPR0305: ErrorCode = ErrorCode::new(305);

// System errors
pub const EXPR0400: ErrorCode = ErrorCode::new(400);
pub const EXPR0401: ErrorCode = ErrorCode::new(401);
