//! Runtime scalar values
//!
//! A [`TypedValue`] holds exactly one representation consistent with a
//! [`ScalarKind`], or null. Several kinds share a representation: all fixed
//! integers except BIGINT UNSIGNED use `Int(i64)`, every float kind uses
//! `Double(f64)`.

use crate::kind::ScalarKind;
use crate::temporal::{IntervalParts, SqlDate, SqlDateTime, SqlTime, timestamp_to_datetime};
use num_bigint::BigInt;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A scalar value at row time
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum TypedValue {
    /// Unknown / missing
    #[default]
    Null,
    Boolean(bool),
    /// INT, INT UNSIGNED and BIGINT
    Int(i64),
    /// BIGINT UNSIGNED
    BigInt(BigInt),
    /// Every float kind
    Double(f64),
    Decimal(Decimal),
    String(String),
    Binary(Vec<u8>),

    // === Temporal ===
    Date(SqlDate),
    Time(SqlTime),
    DateTime(SqlDateTime),
    /// Seconds since the Unix epoch
    Timestamp(i64),
    Year(i32),

    // === Intervals ===
    IntervalMonths(i64),
    IntervalMillis(i64),
}

impl TypedValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn is_true(&self) -> bool {
        matches!(self, Self::Boolean(true))
    }

    pub fn is_false(&self) -> bool {
        matches!(self, Self::Boolean(false))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Double(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Name of the representation, used in mismatch messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean(_) => "boolean",
            Self::Int(_) => "integer",
            Self::BigInt(_) => "big integer",
            Self::Double(_) => "double",
            Self::Decimal(_) => "decimal",
            Self::String(_) => "string",
            Self::Binary(_) => "binary",
            Self::Date(_) => "date",
            Self::Time(_) => "time",
            Self::DateTime(_) => "datetime",
            Self::Timestamp(_) => "timestamp",
            Self::Year(_) => "year",
            Self::IntervalMonths(_) => "month interval",
            Self::IntervalMillis(_) => "millisecond interval",
        }
    }

    /// Whether this representation can carry a value of `kind`
    pub fn fits(&self, kind: ScalarKind) -> bool {
        use ScalarKind as K;
        match self {
            Self::Null => true,
            Self::Boolean(_) => kind == K::Boolean,
            Self::Int(_) => matches!(kind, K::Int | K::UInt | K::Long),
            Self::BigInt(_) => kind == K::ULong,
            Self::Double(_) => kind.is_float(),
            Self::Decimal(_) => kind == K::Decimal,
            Self::String(_) => kind.is_string(),
            Self::Binary(_) => kind == K::Binary,
            Self::Date(_) => kind == K::Date,
            Self::Time(_) => kind == K::Time,
            Self::DateTime(_) => kind == K::DateTime,
            Self::Timestamp(_) => kind == K::Timestamp,
            Self::Year(_) => kind == K::Year,
            Self::IntervalMonths(_) => kind == K::IntervalMonth,
            Self::IntervalMillis(_) => kind == K::IntervalMillis,
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Boolean(b) => write!(f, "{}", b),
            Self::Int(i) => write!(f, "{}", i),
            Self::BigInt(b) => write!(f, "{}", b),
            Self::Double(d) => write!(f, "{}", d),
            Self::Decimal(d) => write!(f, "{}", d),
            Self::String(s) => f.write_str(s),
            Self::Binary(bytes) => {
                f.write_str("0x")?;
                for b in bytes {
                    write!(f, "{:02X}", b)?;
                }
                Ok(())
            }
            Self::Date(d) => write!(f, "{}", d),
            Self::Time(t) => write!(f, "{}", t),
            Self::DateTime(dt) => write!(f, "{}", dt),
            Self::Timestamp(secs) => match timestamp_to_datetime(*secs) {
                Ok(dt) => write!(f, "{}", dt),
                Err(_) => write!(f, "@{}", secs),
            },
            Self::Year(y) => write!(f, "{:04}", y),
            Self::IntervalMonths(m) => write!(f, "{} MONTH", m),
            Self::IntervalMillis(ms) => write!(f, "{}", IntervalParts::from_millis(*ms)),
        }
    }
}

impl From<bool> for TypedValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<i32> for TypedValue {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<i64> for TypedValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for TypedValue {
    fn from(d: f64) -> Self {
        Self::Double(d)
    }
}

impl From<Decimal> for TypedValue {
    fn from(d: Decimal) -> Self {
        Self::Decimal(d)
    }
}

impl From<&str> for TypedValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for TypedValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<SqlDate> for TypedValue {
    fn from(d: SqlDate) -> Self {
        Self::Date(d)
    }
}

impl From<SqlDateTime> for TypedValue {
    fn from(dt: SqlDateTime) -> Self {
        Self::DateTime(dt)
    }
}

impl<T: Into<TypedValue>> From<Option<T>> for TypedValue {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Self::Null)
    }
}
