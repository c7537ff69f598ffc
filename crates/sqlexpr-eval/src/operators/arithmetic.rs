//! Arithmetic Operators
//!
//! Implements: plus, minus, times, divide, mod, div, negate
//!
//! Each binary operator is described once by a [`Combinators`] record holding
//! one primitive per numeric representation (checked fixed integer, double,
//! decimal, big integer). Operands are lifted into the representation of the
//! operation kind, combined, then re-encoded into the resolved kind with range
//! checks. Date/time and interval operands are routed to [`super::interval`].

use super::TypeEnv;
use super::interval;
use crate::error::{EvalError, OpResult};
use num_bigint::{BigInt, Sign};
use num_traits::{FromPrimitive, ToPrimitive, Zero};
use rust_decimal::{Decimal, RoundingStrategy};
use sqlexpr_types::convert::{bigint_to_decimal, check_fixed, check_float, check_ulong, decimal_to_bigint};
use sqlexpr_types::lattice::stronger;
use sqlexpr_types::{
    ArithOp, KindClass, OperandType, ScalarKind, TypeDescriptor, TypeError, TypeResult, TypedValue,
    coerce_ambiguous_pair, resolve_descriptor,
};

// ============================================================================
// Numeric representations
// ============================================================================

/// Representation an arithmetic operation is carried out in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repr {
    Fixed,
    Double,
    Decimal,
    Big,
}

impl Repr {
    /// Representation of a numeric kind
    pub fn of(kind: ScalarKind) -> Self {
        match kind {
            ScalarKind::ULong => Self::Big,
            ScalarKind::Decimal => Self::Decimal,
            k if k.is_float() => Self::Double,
            _ => Self::Fixed,
        }
    }
}

/// A number lifted into one representation
#[derive(Debug, Clone, PartialEq)]
pub enum Numeric {
    Fixed(i64),
    Double(f64),
    Decimal(Decimal),
    Big(BigInt),
}

impl Numeric {
    /// Lift a value into `repr`
    pub fn from_value(value: &TypedValue, repr: Repr, op: &str) -> Result<Self, EvalError> {
        let overflow = || EvalError::overflow(op);
        let n = match (value, repr) {
            (TypedValue::Int(i), Repr::Fixed) => Self::Fixed(*i),
            (TypedValue::Int(i), Repr::Double) => Self::Double(*i as f64),
            (TypedValue::Int(i), Repr::Decimal) => Self::Decimal(Decimal::from(*i)),
            (TypedValue::Int(i), Repr::Big) => Self::Big(BigInt::from(*i)),

            (TypedValue::BigInt(b), Repr::Fixed) => Self::Fixed(b.to_i64().ok_or_else(overflow)?),
            (TypedValue::BigInt(b), Repr::Double) => Self::Double(b.to_f64().ok_or_else(overflow)?),
            (TypedValue::BigInt(b), Repr::Decimal) => Self::Decimal(bigint_to_decimal(b).ok_or_else(overflow)?),
            (TypedValue::BigInt(b), Repr::Big) => Self::Big(b.clone()),

            (TypedValue::Double(d), Repr::Double) => Self::Double(*d),
            (TypedValue::Double(d), Repr::Decimal) => Self::Decimal(Decimal::from_f64(*d).ok_or_else(overflow)?),
            (TypedValue::Double(d), Repr::Fixed | Repr::Big) => Self::Double(*d).demote(repr, op)?,

            (TypedValue::Decimal(d), Repr::Decimal) => Self::Decimal(*d),
            (TypedValue::Decimal(d), Repr::Double) => Self::Double(d.to_f64().ok_or_else(overflow)?),
            (TypedValue::Decimal(d), Repr::Fixed | Repr::Big) => Self::Decimal(*d).demote(repr, op)?,

            (other, _) => return Err(EvalError::type_mismatch("number", other.type_name())),
        };
        Ok(n)
    }

    fn demote(self, repr: Repr, op: &str) -> Result<Self, EvalError> {
        match repr {
            Repr::Fixed => Ok(Self::Fixed(self.to_i64(op)?)),
            Repr::Big => Ok(Self::Big(self.to_bigint(op)?)),
            _ => Ok(self),
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Self::Fixed(i) => *i == 0,
            Self::Double(d) => *d == 0.0,
            Self::Decimal(d) => d.is_zero(),
            Self::Big(b) => b.is_zero(),
        }
    }

    /// Truncating conversion to a fixed integer
    pub fn to_i64(&self, op: &str) -> Result<i64, EvalError> {
        let v = match self {
            Self::Fixed(i) => Some(*i),
            Self::Double(d) => {
                let t = d.trunc();
                (t.is_finite() && t >= i64::MIN as f64 && t < i64::MAX as f64).then_some(t as i64)
            }
            Self::Decimal(d) => d.trunc().to_i64(),
            Self::Big(b) => b.to_i64(),
        };
        v.ok_or_else(|| EvalError::overflow(op))
    }

    /// Conversion to a fixed integer, rounding half away from zero
    pub fn round_to_i64(&self, op: &str) -> Result<i64, EvalError> {
        match self {
            Self::Double(d) => Self::Double(d.round()).to_i64(op),
            Self::Decimal(d) => Self::Decimal(round_to_scale(*d, 0)).to_i64(op),
            other => other.to_i64(op),
        }
    }

    pub fn to_bigint(&self, op: &str) -> Result<BigInt, EvalError> {
        let v = match self {
            Self::Fixed(i) => Some(BigInt::from(*i)),
            Self::Double(d) => BigInt::from_f64(d.trunc()),
            Self::Decimal(d) => decimal_to_bigint(*d),
            Self::Big(b) => Some(b.clone()),
        };
        v.ok_or_else(|| EvalError::overflow(op))
    }

    pub fn to_f64(&self, op: &str) -> Result<f64, EvalError> {
        let v = match self {
            Self::Fixed(i) => Some(*i as f64),
            Self::Double(d) => Some(*d),
            Self::Decimal(d) => d.to_f64(),
            Self::Big(b) => b.to_f64(),
        };
        v.ok_or_else(|| EvalError::overflow(op))
    }

    pub fn to_decimal(&self, op: &str) -> Result<Decimal, EvalError> {
        let v = match self {
            Self::Fixed(i) => Some(Decimal::from(*i)),
            Self::Double(d) => Decimal::from_f64(*d),
            Self::Decimal(d) => Some(*d),
            Self::Big(b) => bigint_to_decimal(b),
        };
        v.ok_or_else(|| EvalError::overflow(op))
    }
}

// ============================================================================
// Combinators
// ============================================================================

/// One binary arithmetic operator over every numeric representation
pub struct Combinators {
    pub op: ArithOp,
    /// Checked; `None` is overflow
    pub fixed: fn(i64, i64) -> Option<i64>,
    pub double: fn(f64, f64) -> f64,
    /// Checked; `None` is overflow
    pub decimal: fn(Decimal, Decimal) -> Option<Decimal>,
    pub big: fn(&BigInt, &BigInt) -> BigInt,
    /// A zero divisor fails in every representation
    pub zero_divisor_fails: bool,
}

impl Combinators {
    /// Combine two operands already lifted into the same representation
    pub fn apply(&self, left: &Numeric, right: &Numeric) -> Result<Numeric, EvalError> {
        let name = self.op.name();
        if self.zero_divisor_fails && right.is_zero() {
            return Err(EvalError::division_by_zero(name));
        }
        match (left, right) {
            (Numeric::Fixed(a), Numeric::Fixed(b)) => (self.fixed)(*a, *b)
                .map(Numeric::Fixed)
                .ok_or_else(|| EvalError::overflow(name)),
            (Numeric::Double(a), Numeric::Double(b)) => Ok(Numeric::Double((self.double)(*a, *b))),
            (Numeric::Decimal(a), Numeric::Decimal(b)) => (self.decimal)(*a, *b)
                .map(Numeric::Decimal)
                .ok_or_else(|| EvalError::overflow(name)),
            (Numeric::Big(a), Numeric::Big(b)) => Ok(Numeric::Big((self.big)(a, b))),
            _ => Err(EvalError::internal(format!("{} applied to mixed representations", name))),
        }
    }
}

fn add_fixed(a: i64, b: i64) -> Option<i64> {
    a.checked_add(b)
}
fn add_double(a: f64, b: f64) -> f64 {
    a + b
}
fn add_decimal(a: Decimal, b: Decimal) -> Option<Decimal> {
    a.checked_add(b)
}
fn add_big(a: &BigInt, b: &BigInt) -> BigInt {
    a + b
}

fn sub_fixed(a: i64, b: i64) -> Option<i64> {
    a.checked_sub(b)
}
fn sub_double(a: f64, b: f64) -> f64 {
    a - b
}
fn sub_decimal(a: Decimal, b: Decimal) -> Option<Decimal> {
    a.checked_sub(b)
}
fn sub_big(a: &BigInt, b: &BigInt) -> BigInt {
    a - b
}

fn mul_fixed(a: i64, b: i64) -> Option<i64> {
    a.checked_mul(b)
}
fn mul_double(a: f64, b: f64) -> f64 {
    a * b
}
fn mul_decimal(a: Decimal, b: Decimal) -> Option<Decimal> {
    a.checked_mul(b)
}
fn mul_big(a: &BigInt, b: &BigInt) -> BigInt {
    a * b
}

fn quot_fixed(a: i64, b: i64) -> Option<i64> {
    a.checked_div(b)
}
fn quot_double(a: f64, b: f64) -> f64 {
    a / b
}
fn quot_decimal(a: Decimal, b: Decimal) -> Option<Decimal> {
    a.checked_div(b)
}
fn quot_big(a: &BigInt, b: &BigInt) -> BigInt {
    a / b
}

fn rem_fixed(a: i64, b: i64) -> Option<i64> {
    // i64::MIN % -1 is 0 even though the quotient overflows
    if b == -1 {
        return Some(0);
    }
    a.checked_rem(b)
}
fn rem_double(a: f64, b: f64) -> f64 {
    a % b
}
fn rem_decimal(a: Decimal, b: Decimal) -> Option<Decimal> {
    a.checked_rem(b)
}
fn rem_big(a: &BigInt, b: &BigInt) -> BigInt {
    a % b
}

/// Floor division: rounds toward negative infinity
fn floor_div_fixed(a: i64, b: i64) -> Option<i64> {
    let q = a.checked_div(b)?;
    if a % b != 0 && ((a < 0) != (b < 0)) {
        q.checked_sub(1)
    } else {
        Some(q)
    }
}
fn floor_div_double(a: f64, b: f64) -> f64 {
    (a / b).floor()
}
fn floor_div_decimal(a: Decimal, b: Decimal) -> Option<Decimal> {
    a.checked_div(b).map(|q| q.floor())
}
fn floor_div_big(a: &BigInt, b: &BigInt) -> BigInt {
    let q = a / b;
    let r = a % b;
    if !r.is_zero() && (r.sign() == Sign::Minus) != (b.sign() == Sign::Minus) {
        q - 1
    } else {
        q
    }
}

pub static ADD: Combinators = Combinators {
    op: ArithOp::Add,
    fixed: add_fixed,
    double: add_double,
    decimal: add_decimal,
    big: add_big,
    zero_divisor_fails: false,
};

pub static SUBTRACT: Combinators = Combinators {
    op: ArithOp::Subtract,
    fixed: sub_fixed,
    double: sub_double,
    decimal: sub_decimal,
    big: sub_big,
    zero_divisor_fails: false,
};

pub static MULTIPLY: Combinators = Combinators {
    op: ArithOp::Multiply,
    fixed: mul_fixed,
    double: mul_double,
    decimal: mul_decimal,
    big: mul_big,
    zero_divisor_fails: false,
};

pub static DIVIDE: Combinators = Combinators {
    op: ArithOp::Divide,
    fixed: quot_fixed,
    double: quot_double,
    decimal: quot_decimal,
    big: quot_big,
    zero_divisor_fails: true,
};

pub static MODULO: Combinators = Combinators {
    op: ArithOp::Modulo,
    fixed: rem_fixed,
    double: rem_double,
    decimal: rem_decimal,
    big: rem_big,
    zero_divisor_fails: true,
};

pub static INT_DIV: Combinators = Combinators {
    op: ArithOp::IntDiv,
    fixed: floor_div_fixed,
    double: floor_div_double,
    decimal: floor_div_decimal,
    big: floor_div_big,
    zero_divisor_fails: true,
};

/// Combinators of an operator
pub fn combinators(op: ArithOp) -> &'static Combinators {
    match op {
        ArithOp::Add => &ADD,
        ArithOp::Subtract => &SUBTRACT,
        ArithOp::Multiply => &MULTIPLY,
        ArithOp::Divide => &DIVIDE,
        ArithOp::Modulo => &MODULO,
        ArithOp::IntDiv => &INT_DIV,
    }
}

// ============================================================================
// Type resolution
// ============================================================================

/// Resolve `left op right`
///
/// Ambiguous operands are settled first. A kind the lattice cannot combine,
/// paired with a numeric operand, is rewritten to that numeric kind; paired
/// with an interval it is rewritten to DOUBLE.
pub fn resolve_arithmetic(op: ArithOp, operands: &mut [OperandType], env: &TypeEnv<'_>) -> TypeResult<TypeDescriptor> {
    let [left, right] = operands else {
        return Err(TypeError::arity_mismatch(op.name(), "2", operands.len()));
    };
    coerce_ambiguous_pair(left, right, env.options.date_literal_max_len);
    let descriptor = resolve_descriptor(
        &left.descriptor,
        &right.descriptor,
        op,
        env.options.divide_scale_floor,
    )?;

    let (left_kind, right_kind) = (left.kind(), right.kind());
    for (this, other) in [(left, right_kind), (right, left_kind)] {
        if this.kind().class() != KindClass::Other {
            continue;
        }
        match other.class() {
            KindClass::Numeric => this.settle(other),
            KindClass::Interval => this.settle(ScalarKind::Double),
            _ => {}
        }
    }
    Ok(descriptor)
}

pub fn resolve_negate(operands: &mut [OperandType]) -> TypeResult<TypeDescriptor> {
    let [operand] = operands else {
        return Err(TypeError::arity_mismatch("negate", "1", operands.len()));
    };
    if operand.ambiguous {
        operand.settle(ScalarKind::Double);
    }
    let kind = operand.kind();
    if kind.is_numeric() || kind.is_interval() {
        Ok(operand.descriptor.clone().with_collation(None))
    } else {
        Err(TypeError::unsupported_kind("negate", kind))
    }
}

// ============================================================================
// Evaluation
// ============================================================================

/// Evaluate `left op right`; both values are non-null
pub fn eval_arithmetic(
    op: ArithOp,
    left: &TypedValue,
    right: &TypedValue,
    left_kind: ScalarKind,
    right_kind: ScalarKind,
    result: &TypeDescriptor,
) -> OpResult<TypedValue> {
    if left_kind.is_numeric() && right_kind.is_numeric() {
        Ok(eval_numeric(op, left, right, left_kind, right_kind, result)?)
    } else {
        interval::eval_interval_arithmetic(op, left, right, left_kind, right_kind, result)
    }
}

/// Numeric `left op right` re-encoded into the resolved kind
pub fn eval_numeric(
    op: ArithOp,
    left: &TypedValue,
    right: &TypedValue,
    left_kind: ScalarKind,
    right_kind: ScalarKind,
    result: &TypeDescriptor,
) -> Result<TypedValue, EvalError> {
    // div computes in the operands' representation, then truncates into the result
    let op_kind = match op {
        ArithOp::IntDiv => stronger(left_kind, right_kind),
        _ => result.kind,
    };
    let repr = Repr::of(op_kind);
    let a = Numeric::from_value(left, repr, op.name())?;
    let b = Numeric::from_value(right, repr, op.name())?;
    let n = combinators(op).apply(&a, &b)?;
    encode(&n, result, op.name(), op == ArithOp::Divide)
}

/// Re-encode a number into the resolved kind with range checks
///
/// Out-of-range results are overflow errors. Decimal quotients are rounded to
/// the resolved scale when `round_scale` is set.
pub fn encode(n: &Numeric, result: &TypeDescriptor, op: &str, round_scale: bool) -> Result<TypedValue, EvalError> {
    let kind = result.kind;
    let overflow = |_| EvalError::overflow(op);
    let value = match kind {
        ScalarKind::Int | ScalarKind::UInt | ScalarKind::Long => {
            TypedValue::Int(check_fixed(n.to_i64(op)?, kind).map_err(overflow)?)
        }
        ScalarKind::ULong => TypedValue::BigInt(check_ulong(n.to_bigint(op)?).map_err(overflow)?),
        k if k.is_float() => TypedValue::Double(check_float(n.to_f64(op)?, kind).map_err(overflow)?),
        ScalarKind::Decimal => {
            let d = n.to_decimal(op)?;
            TypedValue::Decimal(if round_scale { round_to_scale(d, result.scale) } else { d })
        }
        other => {
            return Err(EvalError::internal(format!("{} produced non-numeric kind {}", op, other)));
        }
    };
    Ok(value)
}

/// Round half away from zero to `scale` digits
pub fn round_to_scale(d: Decimal, scale: u32) -> Decimal {
    d.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero)
}

/// Unary minus
pub fn eval_negate(value: &TypedValue, result: &TypeDescriptor) -> Result<TypedValue, EvalError> {
    let op = "negate";
    match value {
        TypedValue::IntervalMonths(m) => m
            .checked_neg()
            .map(TypedValue::IntervalMonths)
            .ok_or_else(|| EvalError::overflow(op)),
        TypedValue::IntervalMillis(ms) => ms
            .checked_neg()
            .map(TypedValue::IntervalMillis)
            .ok_or_else(|| EvalError::overflow(op)),
        _ => {
            let n = match Numeric::from_value(value, Repr::of(result.kind), op)? {
                Numeric::Fixed(i) => Numeric::Fixed(i.checked_neg().ok_or_else(|| EvalError::overflow(op))?),
                Numeric::Double(d) => Numeric::Double(-d),
                Numeric::Decimal(d) => Numeric::Decimal(-d),
                Numeric::Big(b) => Numeric::Big(-b),
            };
            encode(&n, result, op, false)
        }
    }
}
