//! Per-execution evaluation of a resolved tree
//!
//! An [`Evaluation`] mirrors an [`ExpressionNode`] tree with mutable state:
//! each node owns a scratch slot that receives the value it produces, reused
//! from row to row. The tree itself stays shared and immutable; each
//! concurrent execution builds its own `Evaluation`.
//!
//! Evaluation is pull-based. A parent asks its children for values only when
//! it needs them, so AND/OR and the conditional operators skip unneeded
//! subtrees, and an operator that contaminates on null stops after the first
//! null operand.

use crate::context::EvaluationContext;
use crate::error::{EvalError, EvalResult, OpFault, OpResult};
use crate::operators::{Operator, arithmetic, comparison, logical, string, type_ops};
use crate::row::Row;
use crate::tree::{ExpressionNode, NodeOp};
use smallvec::SmallVec;
use sqlexpr_types::{Collation, CollationMerger, TypedValue};
use std::sync::Arc;

/// Reusable value slot owned by one evaluation node
#[derive(Debug, Default)]
pub struct Scratch {
    value: TypedValue,
}

impl Scratch {
    fn put(&mut self, value: TypedValue) -> &TypedValue {
        self.value = value;
        &self.value
    }

    pub fn get(&self) -> &TypedValue {
        &self.value
    }
}

/// Mutable counterpart of a resolved tree for one execution
#[derive(Debug)]
pub struct Evaluation {
    node: Arc<ExpressionNode>,
    children: Vec<Evaluation>,
    scratch: Scratch,
    /// Collation strings are compared under, for comparison nodes
    collation: Option<Collation>,
    /// Promote conversion warnings to errors
    strict: bool,
}

impl Evaluation {
    pub fn new(node: Arc<ExpressionNode>, strict: bool, merger: &dyn CollationMerger) -> Self {
        let children = node
            .children()
            .iter()
            .map(|child| Self::new(Arc::clone(child), strict, merger))
            .collect();
        let collation = comparison_collation(&node, merger);
        let scratch = match node.op() {
            NodeOp::Literal(value) => Scratch { value: value.clone() },
            _ => Scratch::default(),
        };
        Self {
            node,
            children,
            scratch,
            collation,
            strict,
        }
    }

    pub fn node(&self) -> &Arc<ExpressionNode> {
        &self.node
    }

    /// Value produced by the last call to [`Evaluation::evaluate`]
    pub fn last_value(&self) -> &TypedValue {
        self.scratch.get()
    }

    /// Evaluate against one row
    ///
    /// The returned borrow lives in this evaluation's scratch slot and ends
    /// before the next call.
    pub fn evaluate(&mut self, row: &dyn Row, ctx: &mut EvaluationContext) -> EvalResult<&TypedValue> {
        let Self {
            node,
            children,
            scratch,
            collation,
            strict,
        } = self;
        if let NodeOp::Literal(_) = node.op() {
            return Ok(scratch.get());
        }
        let value = compute(node, children, collation.as_ref(), *strict, row, ctx)?;
        Ok(scratch.put(value))
    }

    /// Evaluate and take ownership of the result
    pub fn evaluate_owned(&mut self, row: &dyn Row, ctx: &mut EvaluationContext) -> EvalResult<TypedValue> {
        self.evaluate(row, ctx).cloned()
    }
}

fn comparison_collation(node: &ExpressionNode, merger: &dyn CollationMerger) -> Option<Collation> {
    match node.operator()? {
        Operator::Compare(_) | Operator::Greatest | Operator::Least | Operator::NullIf => {}
        _ => return None,
    }
    let mut strings = node
        .children()
        .iter()
        .map(|c| c.descriptor())
        .filter(|d| d.kind.is_string());
    let first = strings.next()?.collation.clone();
    // the composer already rejected unmergeable collations
    strings.try_fold(first, |acc, d| merger.merge(acc.as_ref(), d.collation.as_ref())).ok()?
}

fn compute(
    node: &ExpressionNode,
    children: &mut [Evaluation],
    collation: Option<&Collation>,
    strict: bool,
    row: &dyn Row,
    ctx: &mut EvaluationContext,
) -> EvalResult<TypedValue> {
    match node.op() {
        NodeOp::Literal(value) => Ok(value.clone()),
        NodeOp::Field(index) => row.field(*index).cloned().ok_or(EvalError::FieldOutOfRange {
            index: *index,
            len: row.width(),
        }),
        NodeOp::Parameter(index) => ctx
            .binding(*index)
            .cloned()
            .ok_or(EvalError::UnboundParameter { index: *index }),
        NodeOp::Session(value) => Ok(value.eval(ctx)),
        NodeOp::Apply(_) if node.descriptor().is_null() => Ok(TypedValue::Null),
        NodeOp::Apply(operator) => apply(operator, node, children, collation, strict, row, ctx),
    }
}

fn single(children: &mut [Evaluation]) -> EvalResult<&mut Evaluation> {
    match children {
        [child] => Ok(child),
        _ => Err(EvalError::internal(format!("expected 1 operand, found {}", children.len()))),
    }
}

fn pair(children: &mut [Evaluation]) -> EvalResult<(&mut Evaluation, &mut Evaluation)> {
    match children {
        [left, right] => Ok((left, right)),
        _ => Err(EvalError::internal(format!("expected 2 operands, found {}", children.len()))),
    }
}

/// Turn a recoverable fault into null plus a warning, or an error when strict
fn recover(
    result: OpResult<TypedValue>,
    operator: &Operator,
    strict: bool,
    ctx: &mut EvaluationContext,
) -> EvalResult<TypedValue> {
    match result {
        Ok(value) => Ok(value),
        Err(OpFault::Fatal(err)) => Err(err),
        Err(OpFault::Recoverable(warning)) if strict => Err(EvalError::Conversion(warning)),
        Err(OpFault::Recoverable(warning)) => {
            ctx.warn(warning.to_diagnostic().with_operator(operator.name()));
            Ok(TypedValue::Null)
        }
    }
}

/// Evaluate every child; `None` as soon as one is null
fn all_non_null<'a>(
    children: &'a mut [Evaluation],
    row: &dyn Row,
    ctx: &mut EvaluationContext,
) -> EvalResult<Option<SmallVec<[&'a TypedValue; 4]>>> {
    let mut values = SmallVec::new();
    for child in children.iter_mut() {
        let value = child.evaluate(row, ctx)?;
        if value.is_null() {
            return Ok(None);
        }
        values.push(value);
    }
    Ok(Some(values))
}

fn apply(
    operator: &Operator,
    node: &ExpressionNode,
    children: &mut [Evaluation],
    collation: Option<&Collation>,
    strict: bool,
    row: &dyn Row,
    ctx: &mut EvaluationContext,
) -> EvalResult<TypedValue> {
    match operator {
        // === Lazy ===
        Operator::And => logical::eval_junction(false, children, row, ctx),
        Operator::Or => logical::eval_junction(true, children, row, ctx),
        Operator::Coalesce => logical::eval_coalesce(children, row, ctx),
        Operator::If => logical::eval_if(children, row, ctx),
        Operator::Case => logical::eval_case(children, row, ctx),

        // === Binary, null contaminates ===
        Operator::Arithmetic(op) => {
            let (left, right) = pair(children)?;
            let (left_kind, right_kind) = (left.node.kind(), right.node.kind());
            let l = left.evaluate(row, ctx)?;
            if l.is_null() {
                return Ok(TypedValue::Null);
            }
            let r = right.evaluate(row, ctx)?;
            if r.is_null() {
                return Ok(TypedValue::Null);
            }
            let result = arithmetic::eval_arithmetic(*op, l, r, left_kind, right_kind, node.descriptor());
            recover(result, operator, strict, ctx)
        }
        Operator::Compare(op) => {
            let (left, right) = pair(children)?;
            let l = left.evaluate(row, ctx)?;
            if l.is_null() {
                return Ok(TypedValue::Null);
            }
            let r = right.evaluate(row, ctx)?;
            comparison::eval_compare(*op, l, r, collation)
        }
        Operator::Xor => {
            let (left, right) = pair(children)?;
            let l = left.evaluate(row, ctx)?;
            if l.is_null() {
                return Ok(TypedValue::Null);
            }
            logical::eval_xor(l, right.evaluate(row, ctx)?)
        }

        // === Binary, null ignored ===
        Operator::NullIf => {
            let (left, right) = pair(children)?;
            let l = left.evaluate(row, ctx)?;
            let r = right.evaluate(row, ctx)?;
            comparison::eval_nullif(l, r, collation)
        }

        // === Unary ===
        Operator::Negate => {
            let value = single(children)?.evaluate(row, ctx)?;
            if value.is_null() {
                return Ok(TypedValue::Null);
            }
            arithmetic::eval_negate(value, node.descriptor())
        }
        Operator::Not => logical::eval_not(single(children)?.evaluate(row, ctx)?),
        Operator::IsNull => logical::eval_is(None, single(children)?.evaluate(row, ctx)?),
        Operator::IsTrue => logical::eval_is(Some(Some(true)), single(children)?.evaluate(row, ctx)?),
        Operator::IsFalse => logical::eval_is(Some(Some(false)), single(children)?.evaluate(row, ctx)?),
        Operator::Cast { target, implicit } => {
            let value = single(children)?.evaluate(row, ctx)?;
            if value.is_null() {
                return Ok(TypedValue::Null);
            }
            let result = type_ops::eval_cast(value, target, *implicit);
            recover(result, operator, strict, ctx)
        }

        // === N-ary, null contaminates ===
        Operator::Greatest | Operator::Least => match all_non_null(children, row, ctx)? {
            Some(values) => comparison::eval_extremum(
                matches!(operator, Operator::Greatest),
                values.into_iter(),
                collation,
            ),
            None => Ok(TypedValue::Null),
        },
        Operator::Concat => match all_non_null(children, row, ctx)? {
            Some(values) => string::eval_concat(values.into_iter()),
            None => Ok(TypedValue::Null),
        },
    }
}
