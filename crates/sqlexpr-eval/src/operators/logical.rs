//! Logical and Conditional Operators
//!
//! Implements: and, or, not, xor, isnull, istrue, isfalse, coalesce, if, case
//!
//! All logical operators implement three-valued logic. AND and OR are lazy:
//! the right operand is only pulled when the left one is not the trump value.

use super::TypeEnv;
use super::comparison::unify_operands;
use crate::context::EvaluationContext;
use crate::error::{EvalError, EvalResult};
use crate::evaluation::Evaluation;
use crate::row::Row;
use sqlexpr_types::{OperandType, ScalarKind, TypeDescriptor, TypeError, TypeResult, TypedValue, can_cast};

// ============================================================================
// Type resolution
// ============================================================================

fn settle_boolean(name: &str, operand: &mut OperandType) -> TypeResult<()> {
    let kind = operand.kind();
    if kind.is_null() || kind == ScalarKind::Boolean {
        operand.ambiguous = false;
        return Ok(());
    }
    if !can_cast(kind, ScalarKind::Boolean) {
        return Err(TypeError::unsupported_kind(name, kind));
    }
    operand.settle(ScalarKind::Boolean);
    Ok(())
}

/// Every operand becomes BOOLEAN, as does the result
pub fn resolve_boolean(name: &str, operands: &mut [OperandType]) -> TypeResult<TypeDescriptor> {
    for operand in operands.iter_mut() {
        settle_boolean(name, operand)?;
    }
    Ok(TypeDescriptor::boolean())
}

pub fn resolve_coalesce(operands: &mut [OperandType], env: &TypeEnv<'_>) -> TypeResult<TypeDescriptor> {
    unify_operands("coalesce", operands, env)
}

/// IF(cond, then, else)
pub fn resolve_if(operands: &mut [OperandType], env: &TypeEnv<'_>) -> TypeResult<TypeDescriptor> {
    let [condition, branches @ ..] = operands else {
        return Err(TypeError::arity_mismatch("if", "3", 0));
    };
    settle_boolean("if", condition)?;
    unify_operands("if", branches, env)
}

/// Searched CASE: `cond1, result1, cond2, result2, ..., [else]`
pub fn resolve_case(operands: &mut [OperandType], env: &TypeEnv<'_>) -> TypeResult<TypeDescriptor> {
    let else_index = (operands.len() % 2 == 1).then(|| operands.len() - 1);
    let mut arm_indices = Vec::with_capacity(operands.len() / 2 + 1);
    for (i, operand) in operands.iter_mut().enumerate() {
        if i % 2 == 0 && Some(i) != else_index {
            settle_boolean("case", operand)?;
        } else {
            arm_indices.push(i);
        }
    }

    let mut arms: Vec<OperandType> = arm_indices.iter().map(|&i| operands[i].clone()).collect();
    let descriptor = unify_operands("case", &mut arms, env)?;
    for (&i, arm) in arm_indices.iter().zip(arms) {
        operands[i] = arm;
    }
    Ok(descriptor)
}

// ============================================================================
// Three-valued logic
// ============================================================================

/// Boolean view of a value; null is unknown
pub fn truth(value: &TypedValue) -> EvalResult<Option<bool>> {
    match value {
        TypedValue::Null => Ok(None),
        TypedValue::Boolean(b) => Ok(Some(*b)),
        other => Err(EvalError::type_mismatch("boolean", other.type_name())),
    }
}

fn boolean(value: Option<bool>) -> TypedValue {
    value.map_or(TypedValue::Null, TypedValue::Boolean)
}

pub fn not(value: Option<bool>) -> Option<bool> {
    value.map(|b| !b)
}

pub fn xor(left: Option<bool>, right: Option<bool>) -> Option<bool> {
    Some(left? != right?)
}

/// Combine two truth values under a trump value (false for AND, true for OR)
///
/// Truth table for AND (trump = false):
/// | A     | B     | A and B |
/// |-------|-------|---------|
/// | true  | true  | true    |
/// | true  | false | false   |
/// | true  | null  | null    |
/// | false | any   | false   |
/// | null  | true  | null    |
/// | null  | false | false   |
/// | null  | null  | null    |
pub fn junction(trump: bool, left: Option<bool>, right: Option<bool>) -> Option<bool> {
    match (left, right) {
        (Some(l), _) if l == trump => Some(trump),
        (_, Some(r)) if r == trump => Some(trump),
        (Some(_), Some(_)) => Some(!trump),
        _ => None,
    }
}

// ============================================================================
// Evaluation
// ============================================================================

/// AND / OR, pulling the right operand only when needed
pub fn eval_junction(
    trump: bool,
    children: &mut [Evaluation],
    row: &dyn Row,
    ctx: &mut EvaluationContext,
) -> EvalResult<TypedValue> {
    let [left, right] = children else {
        return Err(EvalError::internal("junction needs two operands"));
    };
    let l = truth(left.evaluate(row, ctx)?)?;
    if l == Some(trump) {
        return Ok(TypedValue::Boolean(trump));
    }
    let r = truth(right.evaluate(row, ctx)?)?;
    Ok(boolean(junction(trump, l, r)))
}

pub fn eval_not(value: &TypedValue) -> EvalResult<TypedValue> {
    Ok(boolean(not(truth(value)?)))
}

pub fn eval_xor(left: &TypedValue, right: &TypedValue) -> EvalResult<TypedValue> {
    Ok(boolean(xor(truth(left)?, truth(right)?)))
}

/// IS NULL, IS TRUE, IS FALSE; never null
pub fn eval_is(test: Option<Option<bool>>, value: &TypedValue) -> EvalResult<TypedValue> {
    let result = match test {
        None => value.is_null(),
        Some(expected) => truth(value)? == expected,
    };
    Ok(TypedValue::Boolean(result))
}

/// First non-null operand, evaluating left to right
pub fn eval_coalesce(children: &mut [Evaluation], row: &dyn Row, ctx: &mut EvaluationContext) -> EvalResult<TypedValue> {
    for child in children.iter_mut() {
        let value = child.evaluate(row, ctx)?;
        if !value.is_null() {
            return Ok(value.clone());
        }
    }
    Ok(TypedValue::Null)
}

/// IF(cond, then, else); an unknown condition takes the else branch
pub fn eval_if(children: &mut [Evaluation], row: &dyn Row, ctx: &mut EvaluationContext) -> EvalResult<TypedValue> {
    let [condition, then, otherwise] = children else {
        return Err(EvalError::internal("if needs three operands"));
    };
    let branch = if truth(condition.evaluate(row, ctx)?)? == Some(true) {
        then
    } else {
        otherwise
    };
    Ok(branch.evaluate(row, ctx)?.clone())
}

/// Searched CASE; no matching arm and no else gives null
pub fn eval_case(children: &mut [Evaluation], row: &dyn Row, ctx: &mut EvaluationContext) -> EvalResult<TypedValue> {
    let (pairs, otherwise) = if children.len() % 2 == 1 {
        let (pairs, rest) = children.split_at_mut(children.len() - 1);
        (pairs, rest.first_mut())
    } else {
        (children, None)
    };
    for pair in pairs.chunks_exact_mut(2) {
        let [condition, result] = pair else {
            continue;
        };
        if truth(condition.evaluate(row, ctx)?)? == Some(true) {
            return Ok(result.evaluate(row, ctx)?.clone());
        }
    }
    match otherwise {
        Some(arm) => Ok(arm.evaluate(row, ctx)?.clone()),
        None => Ok(TypedValue::Null),
    }
}
