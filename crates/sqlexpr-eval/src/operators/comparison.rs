//! Comparison Operators
//!
//! Implements: =, <>, <, <=, >, >=, greatest, least, nullif
//!
//! Operands are unified to a common kind at composition, so row-time
//! comparison only has to handle like-for-like representations plus the
//! numeric representations against each other. Strings compare under the
//! merged collation; `_ci` collations ignore case.

use super::TypeEnv;
use super::arithmetic::{Numeric, Repr};
use crate::error::{EvalError, EvalResult};
use serde::{Deserialize, Serialize};
use sqlexpr_types::coercion::settle_all;
use sqlexpr_types::{
    Collation, OperandType, ScalarKind, TypeDescriptor, TypeError, TypeResult, TypedValue, can_cast,
    coerce_ambiguous_pair, settle_unresolved, unify_descriptors,
};
use std::cmp::Ordering;
use std::fmt;

/// Binary comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    pub const ALL: [CompareOp; 6] = [Self::Eq, Self::Ne, Self::Lt, Self::Le, Self::Gt, Self::Ge];

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Eq => "equals",
            Self::Ne => "not_equals",
            Self::Lt => "less",
            Self::Le => "less_or_equal",
            Self::Gt => "greater",
            Self::Ge => "greater_or_equal",
        }
    }

    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "<>",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }

    /// Whether an ordering satisfies the operator
    pub fn test(&self, ordering: Ordering) -> bool {
        match self {
            Self::Eq => ordering == Ordering::Equal,
            Self::Ne => ordering != Ordering::Equal,
            Self::Lt => ordering == Ordering::Less,
            Self::Le => ordering != Ordering::Greater,
            Self::Gt => ordering == Ordering::Greater,
            Self::Ge => ordering != Ordering::Less,
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

// ============================================================================
// Type resolution
// ============================================================================

/// Unify both operands; the result is BOOLEAN
pub fn resolve_compare(name: &str, operands: &mut [OperandType], env: &TypeEnv<'_>) -> TypeResult<TypeDescriptor> {
    let [left, right] = operands else {
        return Err(TypeError::arity_mismatch(name, "2", operands.len()));
    };
    coerce_ambiguous_pair(left, right, env.options.date_literal_max_len);
    unify_operands(name, operands, env)?;
    Ok(TypeDescriptor::boolean())
}

/// Unify every operand; the result is the common descriptor
pub fn resolve_extremum(name: &str, operands: &mut [OperandType], env: &TypeEnv<'_>) -> TypeResult<TypeDescriptor> {
    settle_ambiguous(operands);
    unify_operands(name, operands, env)
}

/// The result is the first operand's descriptor; the second is cast to it
pub fn resolve_nullif(operands: &mut [OperandType], env: &TypeEnv<'_>) -> TypeResult<TypeDescriptor> {
    if let [left, right] = &mut *operands {
        coerce_ambiguous_pair(left, right, env.options.date_literal_max_len);
    }
    settle_unresolved(operands);
    let [left, right] = operands else {
        return Err(TypeError::arity_mismatch("nullif", "2", operands.len()));
    };
    let target = left.kind();
    let comparable = target == right.kind()
        || target.is_null()
        || right.kind().is_null()
        || (target.is_numeric() && right.kind().is_numeric());
    if !comparable {
        if !can_cast(right.kind(), target) {
            return Err(TypeError::illegal_operands("nullif", target, right.kind()));
        }
        right.settle(target);
    }
    Ok(left.descriptor.clone())
}

/// Ambiguous operands of an n-ary comparison settle against the first concrete kind
fn settle_ambiguous(operands: &mut [OperandType]) {
    let Some(concrete) = operands
        .iter()
        .find(|o| !o.ambiguous && !o.kind().is_null())
        .map(OperandType::kind)
    else {
        return;
    };
    for operand in operands.iter_mut().filter(|o| o.ambiguous) {
        let kind = if concrete.is_numeric() { ScalarKind::Double } else { concrete };
        operand.settle(kind);
    }
}

pub(crate) fn unify_operands(name: &str, operands: &mut [OperandType], env: &TypeEnv<'_>) -> TypeResult<TypeDescriptor> {
    settle_unresolved(operands);
    let unified = unify_descriptors(operands.iter().map(|o| &o.descriptor), env.merger)?;
    for operand in operands.iter().filter(|o| !o.kind().is_null()) {
        if !can_cast(operand.kind(), unified.kind) {
            return Err(TypeError::illegal_operands(name, operand.kind(), unified.kind));
        }
    }
    settle_all(operands, unified.kind);
    Ok(unified)
}

// ============================================================================
// Evaluation
// ============================================================================

/// Order two non-null values
///
/// `None` when the values are unordered (NaN).
pub fn compare_values(left: &TypedValue, right: &TypedValue, collation: Option<&Collation>) -> EvalResult<Option<Ordering>> {
    use TypedValue as V;

    let ordering = match (left, right) {
        (V::String(a), V::String(b)) => {
            if collation.is_some_and(Collation::is_case_insensitive) {
                Some(a.to_lowercase().cmp(&b.to_lowercase()))
            } else {
                Some(a.cmp(b))
            }
        }
        (V::Boolean(a), V::Boolean(b)) => Some(a.cmp(b)),
        (V::Binary(a), V::Binary(b)) => Some(a.cmp(b)),
        (V::Date(a), V::Date(b)) => Some(a.cmp(b)),
        (V::Time(a), V::Time(b)) => Some(a.cmp(b)),
        (V::DateTime(a), V::DateTime(b)) => Some(a.cmp(b)),
        (V::Timestamp(a), V::Timestamp(b)) => Some(a.cmp(b)),
        (V::Year(a), V::Year(b)) => Some(a.cmp(b)),
        (V::IntervalMonths(a), V::IntervalMonths(b)) => Some(a.cmp(b)),
        (V::IntervalMillis(a), V::IntervalMillis(b)) => Some(a.cmp(b)),
        (V::Int(_) | V::BigInt(_) | V::Double(_) | V::Decimal(_), V::Int(_) | V::BigInt(_) | V::Double(_) | V::Decimal(_)) => {
            compare_numbers(left, right)?
        }
        _ => {
            return Err(EvalError::type_mismatch(left.type_name(), right.type_name()));
        }
    };
    Ok(ordering)
}

fn compare_numbers(left: &TypedValue, right: &TypedValue) -> EvalResult<Option<Ordering>> {
    let repr = [left, right]
        .iter()
        .map(|v| match v {
            TypedValue::Double(_) => Repr::Double,
            TypedValue::Decimal(_) => Repr::Decimal,
            TypedValue::BigInt(_) => Repr::Big,
            _ => Repr::Fixed,
        })
        .max_by_key(|r| match r {
            Repr::Fixed => 0,
            Repr::Big => 1,
            Repr::Decimal => 2,
            Repr::Double => 3,
        })
        .unwrap_or(Repr::Fixed);
    let a = Numeric::from_value(left, repr, "compare")?;
    let b = Numeric::from_value(right, repr, "compare")?;
    Ok(match (a, b) {
        (Numeric::Fixed(a), Numeric::Fixed(b)) => Some(a.cmp(&b)),
        (Numeric::Double(a), Numeric::Double(b)) => a.partial_cmp(&b),
        (Numeric::Decimal(a), Numeric::Decimal(b)) => Some(a.cmp(&b)),
        (Numeric::Big(a), Numeric::Big(b)) => Some(a.cmp(&b)),
        _ => None,
    })
}

/// Three-valued comparison; either side null gives null
pub fn eval_compare(op: CompareOp, left: &TypedValue, right: &TypedValue, collation: Option<&Collation>) -> EvalResult<TypedValue> {
    if left.is_null() || right.is_null() {
        return Ok(TypedValue::Null);
    }
    Ok(match compare_values(left, right, collation)? {
        Some(ordering) => TypedValue::Boolean(op.test(ordering)),
        None => TypedValue::Null,
    })
}

/// GREATEST / LEAST; any null argument gives null
pub fn eval_extremum<'a, I>(greatest: bool, values: I, collation: Option<&Collation>) -> EvalResult<TypedValue>
where
    I: IntoIterator<Item = &'a TypedValue>,
{
    let wanted = if greatest { Ordering::Greater } else { Ordering::Less };
    let mut best: Option<&TypedValue> = None;
    for value in values {
        if value.is_null() {
            return Ok(TypedValue::Null);
        }
        best = match best {
            Some(current) if compare_values(value, current, collation)? != Some(wanted) => Some(current),
            _ => Some(value),
        };
    }
    Ok(best.cloned().unwrap_or_default())
}

/// NULLIF(a, b): null when `a = b`, otherwise `a`
pub fn eval_nullif(left: &TypedValue, right: &TypedValue, collation: Option<&Collation>) -> EvalResult<TypedValue> {
    if left.is_null() || right.is_null() {
        return Ok(left.clone());
    }
    match compare_values(left, right, collation)? {
        Some(Ordering::Equal) => Ok(TypedValue::Null),
        _ => Ok(left.clone()),
    }
}
