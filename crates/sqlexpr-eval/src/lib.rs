//! SQL Scalar Expression Engine
//!
//! This crate composes and evaluates typed scalar expressions over rows:
//!
//! - **Composition**: operator applications over resolved children become
//!   immutable [`ExpressionNode`]s. Operand types are unified, ambiguous
//!   string literals and untyped parameters are settled, and implicit casts
//!   are inserted where a child's type was rewritten.
//! - **Evaluation**: a prepared [`Evaluation`] pulls values through the tree
//!   once per row, reusing per-node scratch slots.
//! - **Folding**: constant subtrees are replaced by literals of the same type.
//!
//! # Example
//!
//! ```ignore
//! use sqlexpr_eval::{EvaluationContext, ScalarEngine};
//! use sqlexpr_types::{ScalarKind, TypeDescriptor, TypedValue};
//!
//! let engine = ScalarEngine::new();
//! let expr = engine
//!     .call("+", vec![engine.field(0, TypeDescriptor::of(ScalarKind::Int)), engine.literal(1i64)])
//!     .unwrap();
//!
//! let mut ctx = EvaluationContext::new();
//! let mut evaluation = engine.prepare(&expr);
//! let value = evaluation.evaluate(&[TypedValue::Int(41)], &mut ctx).unwrap();
//! assert_eq!(value, &TypedValue::Int(42));
//! ```
//!
//! # Null Handling
//!
//! Most operators contaminate: a NULL operand makes the result NULL, and a
//! child statically typed NULL makes the whole node a NULL constant. Logical
//! and conditional operators follow three-valued logic instead:
//!
//! - `and`: false dominates (null and false = false)
//! - `or`: true dominates (null or true = true)
//! - `coalesce`, `if`, `case`: evaluate only the branches they need

pub mod context;
pub mod engine;
pub mod error;
pub mod evaluation;
pub mod operators;
pub mod options;
pub mod registry;
pub mod row;
pub mod tree;

// Re-export main types
pub use context::{EvaluationContext, EvaluationContextBuilder};
pub use engine::ScalarEngine;
pub use error::{EvalError, EvalResult, OpFault, OpResult};
pub use evaluation::{Evaluation, Scratch};
pub use operators::{Arity, CompareOp, NullPolicy, Operator, SessionValue, TypeEnv};
pub use options::EngineOptions;
pub use registry::{Callable, FunctionDefinition, FunctionRegistry};
pub use row::Row;
pub use tree::{Children, ExpressionNode, NodeOp};
