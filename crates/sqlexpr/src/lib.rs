//! SQL scalar expressions for Rust
//!
//! This crate brings together:
//! - The scalar type system: kinds, the arithmetic result lattice, descriptors,
//!   collations, coercion and value conversion
//! - The composer: operator applications resolved into immutable typed trees
//! - Row-time evaluation with null contamination and three-valued logic
//! - Structured diagnostics for compose errors, evaluation errors and
//!   conversion warnings
//!
//! # Example
//!
//! ```ignore
//! use sqlexpr::{EvaluationContext, ScalarEngine, ScalarKind, TypeDescriptor, TypedValue};
//!
//! let engine = ScalarEngine::new();
//! let price = engine.field(0, TypeDescriptor::decimal(10, 2));
//! let qty = engine.field(1, TypeDescriptor::of(ScalarKind::Int));
//! let total = engine.call("*", vec![price, qty])?;
//!
//! let mut evaluation = engine.prepare(&total);
//! let mut ctx = EvaluationContext::new();
//! for row in rows {
//!     let value = evaluation.evaluate(&row, &mut ctx)?;
//! }
//! ```

// Re-export all public APIs from internal crates
pub use sqlexpr_diagnostics as diagnostics;
pub use sqlexpr_eval as eval;
pub use sqlexpr_types as types;

// Convenience re-exports
pub use sqlexpr_diagnostics::{Diagnostic, ErrorCode, ExprError, Result, Severity};
pub use sqlexpr_eval::{
    EngineOptions, EvalError, Evaluation, EvaluationContext, ExpressionNode, FunctionRegistry, Operator, Row,
    ScalarEngine,
};
pub use sqlexpr_types::{
    ArithOp, Collation, ConversionWarning, ScalarKind, TypeDescriptor, TypeError, TypedValue,
};
