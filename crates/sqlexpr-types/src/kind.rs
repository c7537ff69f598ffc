//! Scalar kinds and their lattice keys
//!
//! Every resolvable kind carries an integer lattice key. Numeric kinds get odd
//! keys ordered so that a lower key means a higher priority; date/time and
//! interval kinds get even keys, and `IntervalMillis` holds the maximum key.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of scalar kinds known to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarKind {
    // === Numeric ===
    /// 32-bit signed integer
    Int,
    /// 32-bit unsigned integer
    UInt,
    /// 64-bit signed integer
    Long,
    /// 64-bit unsigned integer
    ULong,
    /// 32-bit float
    Float,
    /// 32-bit unsigned float
    UFloat,
    /// 64-bit float
    Double,
    /// 64-bit unsigned float
    UDouble,
    /// Exact decimal
    Decimal,

    // === Other ===
    /// Boolean
    Boolean,
    /// Fixed-length character string
    Char,
    /// Variable-length character string
    Varchar,
    /// Byte string
    Binary,

    // === Date/time ===
    /// Calendar date
    Date,
    /// Time of day
    Time,
    /// Date and time of day without zone
    DateTime,
    /// Seconds since the Unix epoch
    Timestamp,
    /// Calendar year
    Year,

    // === Intervals ===
    /// Interval counted in months
    IntervalMonth,
    /// Interval counted in milliseconds
    IntervalMillis,

    // === Special ===
    /// The statically known null
    Null,
    /// A bind parameter whose type is not known yet
    Unresolved,
    /// A kind the lattice cannot combine
    Unsupported,
}

/// Coarse classification used by the resolution table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KindClass {
    Numeric,
    Temporal,
    Interval,
    Other,
}

/// Key of the millisecond interval; the largest key in the lattice
pub const MAX_LATTICE_KEY: u8 = 20;

impl ScalarKind {
    /// All kinds, in declaration order
    pub const ALL: [ScalarKind; 23] = [
        Self::Int,
        Self::UInt,
        Self::Long,
        Self::ULong,
        Self::Float,
        Self::UFloat,
        Self::Double,
        Self::UDouble,
        Self::Decimal,
        Self::Boolean,
        Self::Char,
        Self::Varchar,
        Self::Binary,
        Self::Date,
        Self::Time,
        Self::DateTime,
        Self::Timestamp,
        Self::Year,
        Self::IntervalMonth,
        Self::IntervalMillis,
        Self::Null,
        Self::Unresolved,
        Self::Unsupported,
    ];

    /// Numeric kinds, highest priority first
    pub const NUMERIC_BY_PRIORITY: [ScalarKind; 9] = [
        Self::Decimal,
        Self::Double,
        Self::UDouble,
        Self::UFloat,
        Self::Float,
        Self::ULong,
        Self::Long,
        Self::Int,
        Self::UInt,
    ];

    /// Lattice key, if this kind takes part in arithmetic resolution
    pub const fn lattice_key(&self) -> Option<u8> {
        match self {
            Self::Decimal => Some(1),
            Self::Double => Some(3),
            Self::UDouble => Some(5),
            Self::UFloat => Some(7),
            Self::Float => Some(9),
            Self::ULong => Some(11),
            Self::Long => Some(13),
            Self::Int => Some(15),
            Self::UInt => Some(17),
            Self::Date => Some(2),
            Self::Time => Some(4),
            Self::DateTime => Some(6),
            Self::Timestamp => Some(8),
            Self::Year => Some(10),
            Self::IntervalMonth => Some(12),
            Self::IntervalMillis => Some(MAX_LATTICE_KEY),
            _ => None,
        }
    }

    /// Classification used by the pairwise resolution table
    pub const fn class(&self) -> KindClass {
        match self {
            Self::Int
            | Self::UInt
            | Self::Long
            | Self::ULong
            | Self::Float
            | Self::UFloat
            | Self::Double
            | Self::UDouble
            | Self::Decimal => KindClass::Numeric,
            Self::Date | Self::Time | Self::DateTime | Self::Timestamp | Self::Year => {
                KindClass::Temporal
            }
            Self::IntervalMonth | Self::IntervalMillis => KindClass::Interval,
            _ => KindClass::Other,
        }
    }

    pub const fn is_numeric(&self) -> bool {
        matches!(self.class(), KindClass::Numeric)
    }

    pub const fn is_temporal(&self) -> bool {
        matches!(self.class(), KindClass::Temporal)
    }

    pub const fn is_interval(&self) -> bool {
        matches!(self.class(), KindClass::Interval)
    }

    /// Exact integer family (signed and unsigned, 32 and 64 bit)
    pub const fn is_exact_integer(&self) -> bool {
        matches!(self, Self::Int | Self::UInt | Self::Long | Self::ULong)
    }

    /// Approximate numeric family
    pub const fn is_float(&self) -> bool {
        matches!(self, Self::Float | Self::UFloat | Self::Double | Self::UDouble)
    }

    pub const fn is_unsigned(&self) -> bool {
        matches!(self, Self::UInt | Self::ULong | Self::UFloat | Self::UDouble)
    }

    /// Character string kinds
    pub const fn is_string(&self) -> bool {
        matches!(self, Self::Char | Self::Varchar)
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Numeric priority, lower is stronger
    pub const fn priority(&self) -> Option<u8> {
        if self.is_numeric() { self.lattice_key() } else { None }
    }

    /// Whether `self` wins over `other` when both are numeric
    pub fn outranks(&self, other: &ScalarKind) -> bool {
        match (self.priority(), other.priority()) {
            (Some(a), Some(b)) => a < b,
            _ => false,
        }
    }

    /// Display precision used when a descriptor is created without one
    pub const fn default_precision(&self) -> u32 {
        match self {
            Self::Int => 11,
            Self::UInt => 10,
            Self::Long | Self::ULong => 20,
            Self::Float | Self::UFloat => 12,
            Self::Double | Self::UDouble => 22,
            Self::Decimal => 10,
            Self::Boolean => 1,
            Self::Date => 10,
            Self::Time => 8,
            Self::DateTime | Self::Timestamp => 19,
            Self::Year => 4,
            Self::IntervalMonth => 11,
            Self::IntervalMillis => 20,
            _ => 0,
        }
    }

    /// SQL name of the kind
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Int => "INT",
            Self::UInt => "INT UNSIGNED",
            Self::Long => "BIGINT",
            Self::ULong => "BIGINT UNSIGNED",
            Self::Float => "FLOAT",
            Self::UFloat => "FLOAT UNSIGNED",
            Self::Double => "DOUBLE",
            Self::UDouble => "DOUBLE UNSIGNED",
            Self::Decimal => "DECIMAL",
            Self::Boolean => "BOOLEAN",
            Self::Char => "CHAR",
            Self::Varchar => "VARCHAR",
            Self::Binary => "VARBINARY",
            Self::Date => "DATE",
            Self::Time => "TIME",
            Self::DateTime => "DATETIME",
            Self::Timestamp => "TIMESTAMP",
            Self::Year => "YEAR",
            Self::IntervalMonth => "INTERVAL MONTH",
            Self::IntervalMillis => "INTERVAL MILLISECOND",
            Self::Null => "NULL",
            Self::Unresolved => "UNRESOLVED",
            Self::Unsupported => "UNSUPPORTED",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScalarKind {
    type Err = String;

    /// Parse a SQL type name, accepting the usual synonyms
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase();
        let kind = match normalized.as_str() {
            "INT" | "INTEGER" => Self::Int,
            "INT UNSIGNED" | "INTEGER UNSIGNED" => Self::UInt,
            "BIGINT" | "LONG" => Self::Long,
            "BIGINT UNSIGNED" => Self::ULong,
            "FLOAT" | "REAL" => Self::Float,
            "FLOAT UNSIGNED" => Self::UFloat,
            "DOUBLE" | "DOUBLE PRECISION" => Self::Double,
            "DOUBLE UNSIGNED" => Self::UDouble,
            "DECIMAL" | "NUMERIC" => Self::Decimal,
            "BOOLEAN" | "BOOL" => Self::Boolean,
            "CHAR" => Self::Char,
            "VARCHAR" | "TEXT" => Self::Varchar,
            "VARBINARY" | "BINARY" | "BLOB" => Self::Binary,
            "DATE" => Self::Date,
            "TIME" => Self::Time,
            "DATETIME" => Self::DateTime,
            "TIMESTAMP" => Self::Timestamp,
            "YEAR" => Self::Year,
            "INTERVAL MONTH" => Self::IntervalMonth,
            "INTERVAL MILLISECOND" => Self::IntervalMillis,
            _ => return Err(format!("unknown type name '{}'", s)),
        };
        Ok(kind)
    }
}
