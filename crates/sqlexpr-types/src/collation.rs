//! Collations and the merge rules applied when string operands meet

use crate::error::{TypeError, TypeResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the binary collation used as the fallback
pub const BINARY_COLLATION: &str = "UCS_BINARY";

/// How a collation was attached to a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Derivation {
    /// Written with an explicit COLLATE clause
    Explicit,
    /// Inherited from a column or a default
    Implicit,
}

/// A named collation with its derivation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Collation {
    pub name: String,
    pub derivation: Derivation,
}

impl Collation {
    pub fn implicit(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            derivation: Derivation::Implicit,
        }
    }

    pub fn explicit(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            derivation: Derivation::Explicit,
        }
    }

    /// The implicit binary collation
    pub fn binary() -> Self {
        Self::implicit(BINARY_COLLATION)
    }

    pub fn is_explicit(&self) -> bool {
        self.derivation == Derivation::Explicit
    }

    /// Case-insensitive collations carry the `_ci` suffix
    pub fn is_case_insensitive(&self) -> bool {
        self.name.to_ascii_lowercase().ends_with("_ci")
    }
}

impl fmt::Display for Collation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Merges the collations of two string operands
///
/// Implementations decide the collation of a result built from two strings
/// (comparison, concatenation, unification).
pub trait CollationMerger: Send + Sync {
    fn merge(
        &self,
        left: Option<&Collation>,
        right: Option<&Collation>,
    ) -> TypeResult<Option<Collation>>;
}

/// The standard merge rules
///
/// - identical collations pass through
/// - an explicit collation wins over an implicit or absent one
/// - two different explicit collations are an error
/// - an absent side or mismatched implicit collations fall back to binary
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultCollationMerger;

impl CollationMerger for DefaultCollationMerger {
    fn merge(
        &self,
        left: Option<&Collation>,
        right: Option<&Collation>,
    ) -> TypeResult<Option<Collation>> {
        match (left, right) {
            (None, None) => Ok(None),
            (Some(l), Some(r)) if l == r => Ok(Some(l.clone())),
            (Some(l), Some(r)) if l.is_explicit() && r.is_explicit() => {
                if l.name.eq_ignore_ascii_case(&r.name) {
                    Ok(Some(l.clone()))
                } else {
                    Err(TypeError::incompatible_collations(&l.name, &r.name))
                }
            }
            (Some(c), _) | (_, Some(c)) if c.is_explicit() => Ok(Some(c.clone())),
            _ => Ok(Some(Collation::binary())),
        }
    }
}
