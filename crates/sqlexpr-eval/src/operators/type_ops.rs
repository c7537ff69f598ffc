//! Type Operators
//!
//! Implements: cast (explicit) and implicit_cast (inserted by the composer)

use super::arithmetic::round_to_scale;
use crate::error::OpResult;
use sqlexpr_types::{OperandType, ScalarKind, TypeDescriptor, TypeError, TypeResult, TypedValue, can_cast, convert};

/// The result is the target; the conversion must be legal for the operand kind
pub fn resolve_cast(target: &TypeDescriptor, operands: &mut [OperandType]) -> TypeResult<TypeDescriptor> {
    let [operand] = operands else {
        return Err(TypeError::arity_mismatch("cast", "1", operands.len()));
    };
    if !can_cast(operand.kind(), target.kind) {
        return Err(TypeError::invalid_cast(operand.kind(), target.kind));
    }
    operand.ambiguous = false;
    Ok(target.clone())
}

/// Convert a value to the target descriptor
///
/// Conversion failures are recoverable. An explicit DECIMAL target also rounds
/// to its scale.
pub fn eval_cast(value: &TypedValue, target: &TypeDescriptor, implicit: bool) -> OpResult<TypedValue> {
    let converted = convert(value, target)?;
    Ok(match converted {
        TypedValue::Decimal(d) if !implicit && target.kind == ScalarKind::Decimal => {
            TypedValue::Decimal(round_to_scale(d, target.scale))
        }
        other => other,
    })
}
