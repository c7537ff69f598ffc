//! SQL scalar type system
//!
//! This crate defines the types shared by composition and evaluation:
//! - Scalar kinds and their lattice keys
//! - Arithmetic result-kind resolution
//! - Type descriptors, collations and the collation merge protocol
//! - Coercion of ambiguous operands and common-type unification
//! - Runtime values, calendar arithmetic and value conversion

pub mod coercion;
pub mod collation;
pub mod convert;
pub mod descriptor;
pub mod error;
pub mod kind;
pub mod lattice;
pub mod temporal;
pub mod value;

pub use coercion::{OperandType, coerce_ambiguous_pair, settle_unresolved, unify, unify_descriptors, unify_pair};
pub use collation::{BINARY_COLLATION, Collation, CollationMerger, DefaultCollationMerger, Derivation};
pub use convert::{can_cast, convert};
pub use descriptor::TypeDescriptor;
pub use error::{ConversionWarning, TypeError, TypeResult};
pub use kind::{KindClass, ScalarKind};
pub use lattice::{ArithOp, resolve, resolve_descriptor};
pub use temporal::{IntervalParts, SqlDate, SqlDateTime, SqlTime};
pub use value::TypedValue;
