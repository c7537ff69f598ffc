//! Engine configuration

use serde::{Deserialize, Serialize};
use sqlexpr_diagnostics::{ExprError, EXPR0401};
use sqlexpr_types::{BINARY_COLLATION, Collation};

/// Options applied while composing and evaluating expressions
///
/// Loadable from JSON; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// Minimum scale of a `/` result
    pub divide_scale_floor: u32,
    /// Longest string literal treated as a DATE next to an interval
    pub date_literal_max_len: u32,
    /// Promote conversion warnings to errors
    pub strict_conversions: bool,
    /// Collation given to string literals
    pub default_collation: String,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            divide_scale_floor: 4,
            date_literal_max_len: 10,
            strict_conversions: false,
            default_collation: BINARY_COLLATION.to_string(),
        }
    }
}

impl EngineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from a JSON document
    pub fn from_json(json: &str) -> Result<Self, ExprError> {
        serde_json::from_str(json)
            .map_err(|e| ExprError::system(EXPR0401, format!("Invalid engine options: {}", e)))
    }

    pub fn with_divide_scale_floor(mut self, floor: u32) -> Self {
        self.divide_scale_floor = floor;
        self
    }

    pub fn with_date_literal_max_len(mut self, len: u32) -> Self {
        self.date_literal_max_len = len;
        self
    }

    pub fn with_strict_conversions(mut self, strict: bool) -> Self {
        self.strict_conversions = strict;
        self
    }

    pub fn with_default_collation(mut self, name: impl Into<String>) -> Self {
        self.default_collation = name.into();
        self
    }

    /// Implicit collation for string literals
    pub fn literal_collation(&self) -> Collation {
        Collation::implicit(self.default_collation.clone())
    }
}
