//! Arithmetic result-kind resolution over the type lattice
//!
//! `resolve` classifies an operand pair through an explicit table over
//! [`KindClass`] pairs; the key encoding in [`crate::kind`] only orders
//! numeric kinds by priority.

use crate::descriptor::TypeDescriptor;
use crate::error::{TypeError, TypeResult};
use crate::kind::{KindClass, ScalarKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary arithmetic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArithOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    /// Integer division with floor semantics (`div`)
    IntDiv,
}

impl ArithOp {
    pub const ALL: [ArithOp; 6] = [
        Self::Add,
        Self::Subtract,
        Self::Multiply,
        Self::Divide,
        Self::Modulo,
        Self::IntDiv,
    ];

    /// Registry name
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Add => "plus",
            Self::Subtract => "minus",
            Self::Multiply => "times",
            Self::Divide => "divide",
            Self::Modulo => "mod",
            Self::IntDiv => "div",
        }
    }

    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Modulo => "%",
            Self::IntDiv => "div",
        }
    }
}

impl fmt::Display for ArithOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Result kind of `left op right`
pub fn resolve(left: ScalarKind, right: ScalarKind, op: ArithOp) -> TypeResult<ScalarKind> {
    use KindClass::{Interval, Numeric, Other, Temporal};

    let illegal = || TypeError::illegal_operands(op.name(), left, right);

    match (left.class(), right.class()) {
        // An unsupported kind next to a single numeric degrades to that numeric
        (Other, Numeric) => resolve(right, right, op),
        (Numeric, Other) => resolve(left, left, op),
        // ...and next to an interval it is treated as the numeric operand
        (Other, Interval) => interval_with_numeric(right, false, op).ok_or_else(illegal),
        (Interval, Other) => interval_with_numeric(left, true, op).ok_or_else(illegal),
        (Other, _) | (_, Other) => Err(illegal()),

        (Interval, Temporal) => match op {
            ArithOp::Add => Ok(right),
            _ => Err(illegal()),
        },
        (Temporal, Interval) => match op {
            ArithOp::Add | ArithOp::Subtract => Ok(left),
            _ => Err(illegal()),
        },

        (Interval, Numeric) => interval_with_numeric(left, true, op).ok_or_else(illegal),
        (Numeric, Interval) => interval_with_numeric(right, false, op).ok_or_else(illegal),

        (Numeric, Numeric) => Ok(numeric_pair(left, right, op)),
        (Numeric, Temporal) | (Temporal, Numeric) => Err(illegal()),

        (Temporal, Temporal) => {
            if op == ArithOp::Subtract && left == right {
                Ok(ScalarKind::IntervalMillis)
            } else {
                Err(illegal())
            }
        }

        (Interval, Interval) => {
            if left == right && matches!(op, ArithOp::Add | ArithOp::Subtract) {
                Ok(left)
            } else {
                Err(illegal())
            }
        }
    }
}

fn interval_with_numeric(interval: ScalarKind, on_left: bool, op: ArithOp) -> Option<ScalarKind> {
    match op {
        ArithOp::Multiply => Some(interval),
        ArithOp::Divide if on_left && interval == ScalarKind::IntervalMillis => Some(interval),
        _ => None,
    }
}

fn numeric_pair(left: ScalarKind, right: ScalarKind, op: ArithOp) -> ScalarKind {
    let top = stronger(left, right);
    match op {
        ArithOp::Divide if left.is_exact_integer() && right.is_exact_integer() => ScalarKind::Double,
        ArithOp::IntDiv if top.is_float() => ScalarKind::Long,
        _ => top,
    }
}

/// Higher-priority of two numeric kinds
pub fn stronger(left: ScalarKind, right: ScalarKind) -> ScalarKind {
    if right.outranks(&left) { right } else { left }
}

/// Full result descriptor of `left op right`
///
/// Numeric precision and scale default to the sum of the operands'; division
/// widens the scale to at least `divide_scale_floor` and `div` forces scale 0.
/// Temporal and interval results take the result kind's default precision.
pub fn resolve_descriptor(
    left: &TypeDescriptor,
    right: &TypeDescriptor,
    op: ArithOp,
    divide_scale_floor: u32,
) -> TypeResult<TypeDescriptor> {
    let kind = resolve(left.kind, right.kind, op)?;
    if !kind.is_numeric() {
        return Ok(TypeDescriptor::of(kind));
    }

    let precision = left.precision.saturating_add(right.precision);
    let scale = match op {
        ArithOp::Divide => left.scale.saturating_add(right.scale).max(divide_scale_floor),
        ArithOp::IntDiv => 0,
        _ => left.scale.saturating_add(right.scale),
    };
    let scale = if kind.is_exact_integer() { 0 } else { scale };
    Ok(TypeDescriptor::new(kind, precision.max(scale), scale))
}
