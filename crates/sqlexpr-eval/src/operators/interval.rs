//! Interval Operators
//!
//! Implements the non-numeric arithmetic cases:
//! - date/time plus or minus a month or millisecond interval
//! - interval plus date/time
//! - date/time minus date/time of the same kind
//! - interval plus or minus interval of the same kind
//! - interval times a number, millisecond interval divided by a number
//!
//! Out-of-range temporal results are recoverable; integer overflow of the
//! interval itself is fatal.

use super::arithmetic::{ADD, Numeric, Repr, SUBTRACT, combinators};
use super::datetime;
use crate::error::{EvalError, OpFault, OpResult};
use sqlexpr_types::{ArithOp, ConversionWarning, ScalarKind, TypeDescriptor, TypedValue};

/// Evaluate `left op right` when at least one side is temporal or an interval
pub fn eval_interval_arithmetic(
    op: ArithOp,
    left: &TypedValue,
    right: &TypedValue,
    left_kind: ScalarKind,
    right_kind: ScalarKind,
    result: &TypeDescriptor,
) -> OpResult<TypedValue> {
    use TypedValue::{IntervalMillis, IntervalMonths};

    let name = op.name();
    match (left, right) {
        (IntervalMonths(a), IntervalMonths(b)) => fixed_interval(op, *a, *b).map(IntervalMonths),
        (IntervalMillis(a), IntervalMillis(b)) => fixed_interval(op, *a, *b).map(IntervalMillis),

        (IntervalMonths(_) | IntervalMillis(_), _) if right_kind.is_numeric() => {
            scale_interval(op, left, right, right_kind)
        }
        (_, IntervalMonths(_) | IntervalMillis(_)) if left_kind.is_numeric() => {
            scale_interval(op, right, left, left_kind)
        }

        (temporal, IntervalMonths(m)) => shift_months(op, temporal, *m),
        (IntervalMonths(m), temporal) if op == ArithOp::Add => shift_months(op, temporal, *m),
        (temporal, IntervalMillis(ms)) => shift_millis(op, temporal, *ms, result.kind),
        (IntervalMillis(ms), temporal) if op == ArithOp::Add => shift_millis(op, temporal, *ms, result.kind),

        _ if op == ArithOp::Subtract && left_kind == right_kind && left_kind.is_temporal() => {
            let a = datetime::to_epoch_millis(left)?;
            let b = datetime::to_epoch_millis(right)?;
            let diff = a.checked_sub(b).ok_or_else(|| EvalError::overflow(name))?;
            Ok(IntervalMillis(diff))
        }

        _ => Err(OpFault::Fatal(EvalError::type_mismatch(
            format!("{} operands", name),
            format!("{} and {}", left.type_name(), right.type_name()),
        ))),
    }
}

fn fixed_interval(op: ArithOp, a: i64, b: i64) -> OpResult<i64> {
    (combinators(op).fixed)(a, b).ok_or_else(|| EvalError::overflow(op.name()).into())
}

fn shift_months(op: ArithOp, temporal: &TypedValue, months: i64) -> OpResult<TypedValue> {
    let months = match op {
        ArithOp::Subtract => months.checked_neg().ok_or_else(|| EvalError::overflow(op.name()))?,
        _ => months,
    };
    Ok(datetime::add_months(temporal, months)?)
}

fn shift_millis(op: ArithOp, temporal: &TypedValue, ms: i64, kind: ScalarKind) -> OpResult<TypedValue> {
    let base = datetime::to_epoch_millis(temporal)?;
    let combine = match op {
        ArithOp::Subtract => SUBTRACT.fixed,
        _ => ADD.fixed,
    };
    let shifted = combine(base, ms).ok_or_else(|| ConversionWarning::out_of_range(kind, temporal))?;
    Ok(datetime::from_epoch_millis(shifted, kind)?)
}

/// Multiply or divide an interval by a number in the number's representation
///
/// Integer divisors are promoted to DECIMAL; the result is rounded back to a
/// whole interval.
fn scale_interval(op: ArithOp, interval: &TypedValue, number: &TypedValue, number_kind: ScalarKind) -> OpResult<TypedValue> {
    let name = op.name();
    let repr = match (op, Repr::of(number_kind)) {
        (ArithOp::Divide, Repr::Fixed | Repr::Big) => Repr::Decimal,
        (_, repr) => repr,
    };
    let (raw, months) = match interval {
        TypedValue::IntervalMonths(m) => (*m, true),
        TypedValue::IntervalMillis(ms) => (*ms, false),
        other => return Err(EvalError::type_mismatch("interval", other.type_name()).into()),
    };
    let a = Numeric::from_value(&TypedValue::Int(raw), repr, name)?;
    let b = Numeric::from_value(number, repr, name)?;
    let scaled = combinators(op).apply(&a, &b)?.round_to_i64(name)?;
    Ok(if months {
        TypedValue::IntervalMonths(scaled)
    } else {
        TypedValue::IntervalMillis(scaled)
    })
}
