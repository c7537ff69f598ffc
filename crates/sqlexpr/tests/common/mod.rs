//! Common test utilities for end-to-end expression tests
//!
//! Helpers to compose expressions through the registry and run them over a
//! batch of rows with one prepared evaluation.

#![allow(dead_code)]

use sqlexpr::{EvaluationContext, ExpressionNode, ScalarEngine, ScalarKind, TypeDescriptor, TypedValue};
use std::sync::Arc;

pub fn engine() -> ScalarEngine {
    ScalarEngine::new()
}

pub fn field(engine: &ScalarEngine, index: usize, kind: ScalarKind) -> Arc<ExpressionNode> {
    engine.field(index, TypeDescriptor::of(kind))
}

/// Compose a call, panicking on compose errors
pub fn call(engine: &ScalarEngine, name: &str, children: Vec<Arc<ExpressionNode>>) -> Arc<ExpressionNode> {
    match engine.call(name, children) {
        Ok(node) => node,
        Err(err) => panic!("failed to compose {}: {}", name, err),
    }
}

/// Evaluate `node` over every row with one prepared evaluation
pub fn run(
    engine: &ScalarEngine,
    node: &Arc<ExpressionNode>,
    rows: &[Vec<TypedValue>],
    ctx: &mut EvaluationContext,
) -> Vec<TypedValue> {
    let mut evaluation = engine.prepare(node);
    rows.iter()
        .map(|row| match evaluation.evaluate_owned(row, ctx) {
            Ok(value) => value,
            Err(err) => panic!("failed to evaluate {} over {:?}: {}", node, row, err),
        })
        .collect()
}

/// Evaluate once over a single row
pub fn eval_row(engine: &ScalarEngine, node: &Arc<ExpressionNode>, row: Vec<TypedValue>) -> TypedValue {
    let mut ctx = EvaluationContext::new();
    run(engine, node, &[row], &mut ctx).remove(0)
}
