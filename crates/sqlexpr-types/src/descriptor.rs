//! Type descriptors attached to every resolved expression node

use crate::collation::Collation;
use crate::kind::ScalarKind;
use crate::value::TypedValue;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Resolved type of an expression: kind, precision, scale and collation
///
/// Descriptors are immutable once a node is composed; the builder methods
/// return modified copies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeDescriptor {
    pub kind: ScalarKind,
    pub precision: u32,
    pub scale: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collation: Option<Collation>,
}

impl TypeDescriptor {
    /// Descriptor with explicit precision and scale
    pub const fn new(kind: ScalarKind, precision: u32, scale: u32) -> Self {
        Self {
            kind,
            precision,
            scale,
            collation: None,
        }
    }

    /// Descriptor using the kind's default precision
    pub const fn of(kind: ScalarKind) -> Self {
        Self::new(kind, kind.default_precision(), 0)
    }

    pub const fn null() -> Self {
        Self::new(ScalarKind::Null, 0, 0)
    }

    /// Type of a bind parameter not yet resolved
    pub const fn unresolved() -> Self {
        Self::new(ScalarKind::Unresolved, 0, 0)
    }

    pub const fn boolean() -> Self {
        Self::of(ScalarKind::Boolean)
    }

    pub const fn varchar(length: u32) -> Self {
        Self::new(ScalarKind::Varchar, length, 0)
    }

    pub const fn decimal(precision: u32, scale: u32) -> Self {
        Self::new(ScalarKind::Decimal, precision, scale)
    }

    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_scale(mut self, scale: u32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_collation(mut self, collation: Option<Collation>) -> Self {
        self.collation = collation;
        self
    }

    /// Same precision and collation under a different kind
    ///
    /// Switching class (say string to numeric) resets to the new kind's defaults.
    pub fn retyped(&self, kind: ScalarKind) -> Self {
        if kind == self.kind {
            return self.clone();
        }
        if kind.is_string() && self.kind.is_string() {
            return Self { kind, ..self.clone() };
        }
        Self::of(kind)
    }

    pub fn is_null(&self) -> bool {
        self.kind.is_null()
    }

    /// Descriptor inferred from a literal value
    pub fn for_literal(value: &TypedValue) -> Self {
        match value {
            TypedValue::Null => Self::null(),
            TypedValue::Boolean(_) => Self::boolean(),
            TypedValue::Int(i) => {
                let digits = digit_count(i.unsigned_abs() as u128);
                if i32::try_from(*i).is_ok() {
                    Self::new(ScalarKind::Int, digits, 0)
                } else {
                    Self::new(ScalarKind::Long, digits, 0)
                }
            }
            TypedValue::BigInt(b) => Self::new(ScalarKind::ULong, b.to_string().len() as u32, 0),
            TypedValue::Double(_) => Self::of(ScalarKind::Double),
            TypedValue::Decimal(d) => {
                let digits = d.mantissa().unsigned_abs();
                let scale = d.scale();
                Self::decimal(digit_count(digits).max(scale), scale)
            }
            TypedValue::String(s) => Self::varchar(s.chars().count() as u32),
            TypedValue::Binary(b) => Self::new(ScalarKind::Binary, b.len() as u32, 0),
            TypedValue::Date(_) => Self::of(ScalarKind::Date),
            TypedValue::Time(_) => Self::of(ScalarKind::Time),
            TypedValue::DateTime(_) => Self::of(ScalarKind::DateTime),
            TypedValue::Timestamp(_) => Self::of(ScalarKind::Timestamp),
            TypedValue::Year(_) => Self::of(ScalarKind::Year),
            TypedValue::IntervalMonths(_) => Self::of(ScalarKind::IntervalMonth),
            TypedValue::IntervalMillis(_) => Self::of(ScalarKind::IntervalMillis),
        }
    }
}

fn digit_count(mut n: u128) -> u32 {
    let mut digits = 1;
    while n >= 10 {
        n /= 10;
        digits += 1;
    }
    digits
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if self.scale > 0 {
            write!(f, "({},{})", self.precision, self.scale)?;
        } else if self.precision > 0 {
            write!(f, "({})", self.precision)?;
        }
        if let Some(collation) = &self.collation {
            write!(f, " COLLATE {}", collation)?;
        }
        Ok(())
    }
}
