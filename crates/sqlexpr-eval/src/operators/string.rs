//! String Operators
//!
//! Implements: concat

use super::TypeEnv;
use crate::error::{EvalError, EvalResult};
use sqlexpr_types::{OperandType, ScalarKind, TypeDescriptor, TypeResult, TypedValue};

/// CONCAT: every operand becomes VARCHAR
///
/// The result length is the sum of the operand lengths and its collation is
/// the merge of the string operands' collations.
pub fn resolve_concat(operands: &mut [OperandType], env: &TypeEnv<'_>) -> TypeResult<TypeDescriptor> {
    let mut length: u32 = 0;
    let mut collation = None;
    let mut first = true;
    for operand in operands.iter_mut() {
        let descriptor = &operand.descriptor;
        length = length.saturating_add(descriptor.precision.max(descriptor.kind.default_precision()));
        if descriptor.kind.is_string() {
            collation = if first {
                descriptor.collation.clone()
            } else {
                env.merger.merge(collation.as_ref(), descriptor.collation.as_ref())?
            };
            first = false;
        }
        if !operand.kind().is_null() {
            operand.settle(ScalarKind::Varchar);
        }
    }
    Ok(TypeDescriptor::varchar(length).with_collation(collation))
}

/// Concatenate string values; any null gives null
pub fn eval_concat<'a, I>(values: I) -> EvalResult<TypedValue>
where
    I: IntoIterator<Item = &'a TypedValue>,
{
    let mut out = String::new();
    for value in values {
        match value {
            TypedValue::Null => return Ok(TypedValue::Null),
            TypedValue::String(s) => out.push_str(s),
            other => return Err(EvalError::type_mismatch("string", other.type_name())),
        }
    }
    Ok(TypedValue::String(out))
}
