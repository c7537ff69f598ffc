//! Operator integration tests for scalar expression evaluation
//!
//! These tests compose expressions through the engine's public API and
//! evaluate them against rows:
//! - Result kinds and implicit casts chosen at compose time
//! - Null propagation and three-valued logic
//! - Recoverable conversion failures versus fatal errors
//! - Edge cases and boundary conditions

mod arithmetic;
mod comparison;
mod engine;
mod interval;
mod logical;
mod type_ops;

use sqlexpr_eval::{EvaluationContext, ExpressionNode, ScalarEngine};
use sqlexpr_types::{ScalarKind, TypeDescriptor, TypedValue};
use std::sync::Arc;

// ============================================================================
// Test Helpers
// ============================================================================

/// Row for expressions that read no fields
pub const NO_ROW: [TypedValue; 0] = [];

pub fn engine() -> ScalarEngine {
    ScalarEngine::new()
}

pub fn ctx() -> EvaluationContext {
    EvaluationContext::new()
}

pub fn field(engine: &ScalarEngine, index: usize, kind: ScalarKind) -> Arc<ExpressionNode> {
    engine.field(index, TypeDescriptor::of(kind))
}

/// Compose `name(children)` and evaluate it once against `row`
pub fn eval_call(name: &str, children: Vec<Arc<ExpressionNode>>, row: &[TypedValue]) -> TypedValue {
    let engine = engine();
    let node = engine.call(name, children).unwrap();
    engine.evaluate(&node, &row, &mut ctx()).unwrap()
}
