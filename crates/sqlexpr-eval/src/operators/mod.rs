//! Operator Implementations
//!
//! The operator set is closed: every operator is a variant of [`Operator`] and
//! dispatches to plain functions in the category modules:
//! - Arithmetic operators (plus, minus, times, divide, mod, div, negate)
//! - Interval and date/time arithmetic
//! - Logical and conditional operators (and, or, not, xor, coalesce, if, case)
//! - Comparison operators (=, <>, <, <=, >, >=, greatest, least, nullif)
//! - String operators (concat)
//! - Type operators (cast)
//! - Session values (current_date, current_user, ...)

pub mod arithmetic;
pub mod comparison;
pub mod datetime;
pub mod interval;
pub mod logical;
pub mod session;
pub mod string;
pub mod type_ops;

pub use arithmetic::{Combinators, Numeric, Repr};
pub use comparison::CompareOp;
pub use session::SessionValue;

use crate::options::EngineOptions;
use serde::{Deserialize, Serialize};
use sqlexpr_types::{ArithOp, CollationMerger, OperandType, TypeDescriptor, TypeError, TypeResult};
use std::fmt;

/// Number of arguments an operator accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    Exact(usize),
    AtLeast(usize),
    Range(usize, usize),
}

impl Arity {
    pub fn accepts(&self, n: usize) -> bool {
        match *self {
            Self::Exact(k) => n == k,
            Self::AtLeast(k) => n >= k,
            Self::Range(lo, hi) => (lo..=hi).contains(&n),
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(k) => write!(f, "{}", k),
            Self::AtLeast(k) => write!(f, "at least {}", k),
            Self::Range(lo, hi) => write!(f, "{} to {}", lo, hi),
        }
    }
}

/// How an operator treats children statically typed NULL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NullPolicy {
    /// Any NULL child makes the result NULL; unification is skipped
    Contaminates,
    /// NULL children are left out of the common type
    Ignore,
}

/// Environment available to type resolution
pub struct TypeEnv<'a> {
    pub options: &'a EngineOptions,
    pub merger: &'a dyn CollationMerger,
}

/// The closed set of operators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operator {
    // === Arithmetic ===
    Arithmetic(ArithOp),
    Negate,

    // === Logical ===
    And,
    Or,
    Not,
    Xor,
    IsNull,
    IsTrue,
    IsFalse,

    // === Conditional ===
    Coalesce,
    If,
    /// Searched CASE: condition/result pairs, optional trailing ELSE
    Case,
    NullIf,

    // === Comparison ===
    Compare(CompareOp),
    Greatest,
    Least,

    // === String ===
    Concat,

    // === Type ===
    Cast {
        target: TypeDescriptor,
        implicit: bool,
    },
}

impl Operator {
    /// Canonical name, used in explain output and messages
    pub fn name(&self) -> &'static str {
        match self {
            Self::Arithmetic(op) => op.name(),
            Self::Negate => "negate",
            Self::And => "and",
            Self::Or => "or",
            Self::Not => "not",
            Self::Xor => "xor",
            Self::IsNull => "isnull",
            Self::IsTrue => "istrue",
            Self::IsFalse => "isfalse",
            Self::Coalesce => "coalesce",
            Self::If => "if",
            Self::Case => "case",
            Self::NullIf => "nullif",
            Self::Compare(op) => op.name(),
            Self::Greatest => "greatest",
            Self::Least => "least",
            Self::Concat => "concat",
            Self::Cast { implicit: true, .. } => "implicit_cast",
            Self::Cast { implicit: false, .. } => "cast",
        }
    }

    pub fn arity(&self) -> Arity {
        match self {
            Self::Arithmetic(_) | Self::Compare(_) | Self::And | Self::Or | Self::Xor | Self::NullIf => {
                Arity::Exact(2)
            }
            Self::Negate | Self::Not | Self::IsNull | Self::IsTrue | Self::IsFalse | Self::Cast { .. } => {
                Arity::Exact(1)
            }
            Self::If => Arity::Exact(3),
            Self::Coalesce | Self::Concat => Arity::AtLeast(1),
            Self::Case | Self::Greatest | Self::Least => Arity::AtLeast(2),
        }
    }

    pub fn null_policy(&self) -> NullPolicy {
        match self {
            Self::Arithmetic(_)
            | Self::Negate
            | Self::Not
            | Self::Xor
            | Self::Compare(_)
            | Self::Greatest
            | Self::Least
            | Self::Concat
            | Self::Cast { .. } => NullPolicy::Contaminates,
            Self::And
            | Self::Or
            | Self::IsNull
            | Self::IsTrue
            | Self::IsFalse
            | Self::Coalesce
            | Self::If
            | Self::Case
            | Self::NullIf => NullPolicy::Ignore,
        }
    }

    /// Check the number of children
    pub fn check_arity(&self, n: usize) -> TypeResult<()> {
        let arity = self.arity();
        if arity.accepts(n) {
            Ok(())
        } else {
            Err(TypeError::arity_mismatch(self.name(), arity.to_string(), n))
        }
    }

    /// Resolve the result descriptor, rewriting operand descriptors in place
    pub fn resolve_type(&self, operands: &mut [OperandType], env: &TypeEnv<'_>) -> TypeResult<TypeDescriptor> {
        self.check_arity(operands.len())?;
        match self {
            Self::Arithmetic(op) => arithmetic::resolve_arithmetic(*op, operands, env),
            Self::Negate => arithmetic::resolve_negate(operands),
            Self::And | Self::Or | Self::Not | Self::Xor | Self::IsTrue | Self::IsFalse => {
                logical::resolve_boolean(self.name(), operands)
            }
            Self::IsNull => Ok(TypeDescriptor::boolean()),
            Self::Coalesce => logical::resolve_coalesce(operands, env),
            Self::If => logical::resolve_if(operands, env),
            Self::Case => logical::resolve_case(operands, env),
            Self::NullIf => comparison::resolve_nullif(operands, env),
            Self::Compare(_) => comparison::resolve_compare(self.name(), operands, env),
            Self::Greatest | Self::Least => comparison::resolve_extremum(self.name(), operands, env),
            Self::Concat => string::resolve_concat(operands, env),
            Self::Cast { target, .. } => type_ops::resolve_cast(target, operands),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
