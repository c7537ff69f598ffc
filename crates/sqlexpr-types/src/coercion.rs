//! Composer-time coercion rules
//!
//! This module implements the rules that turn ambiguous operands (string
//! literals and unresolved bind parameters) into concrete kinds, and the
//! common-type unification used by n-ary operators:
//! - ambiguous next to a numeric kind becomes DOUBLE
//! - ambiguous next to a date/time kind becomes that kind
//! - ambiguous next to an interval becomes DATE or DATETIME by length
//! - unification keeps the strongest numeric kind and degrades to VARCHAR

use crate::collation::CollationMerger;
use crate::descriptor::TypeDescriptor;
use crate::error::TypeResult;
use crate::kind::{KindClass, ScalarKind};

/// A child's descriptor as seen by an operator's type resolution
///
/// Resolution may rewrite `descriptor`; the composer inserts an implicit cast
/// for every child whose descriptor changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperandType {
    pub descriptor: TypeDescriptor,
    /// String literal or unresolved parameter
    pub ambiguous: bool,
}

impl OperandType {
    pub fn new(descriptor: TypeDescriptor) -> Self {
        Self {
            descriptor,
            ambiguous: false,
        }
    }

    pub fn ambiguous(descriptor: TypeDescriptor) -> Self {
        Self {
            descriptor,
            ambiguous: true,
        }
    }

    pub fn kind(&self) -> ScalarKind {
        self.descriptor.kind
    }

    /// Rewrite to `kind`; the operand is no longer ambiguous
    pub fn settle(&mut self, kind: ScalarKind) {
        if self.descriptor.kind != kind {
            self.descriptor = self.descriptor.retyped(kind);
        }
        self.ambiguous = false;
    }
}

/// Kind an ambiguous operand takes next to a concrete one, if any
pub fn ambiguous_target(
    ambiguous: &OperandType,
    concrete: ScalarKind,
    date_literal_max_len: u32,
) -> Option<ScalarKind> {
    match concrete.class() {
        KindClass::Numeric => Some(ScalarKind::Double),
        KindClass::Temporal => Some(concrete),
        KindClass::Interval => {
            let is_short_literal = ambiguous.kind().is_string()
                && ambiguous.descriptor.precision <= date_literal_max_len;
            if is_short_literal {
                Some(ScalarKind::Date)
            } else {
                Some(ScalarKind::DateTime)
            }
        }
        KindClass::Other => None,
    }
}

/// Settle the ambiguous side(s) of a binary operand pair
///
/// Two ambiguous operands both become DOUBLE. An ambiguous operand next to a
/// concrete kind the rules do not cover is left as is.
pub fn coerce_ambiguous_pair(left: &mut OperandType, right: &mut OperandType, date_literal_max_len: u32) {
    match (left.ambiguous, right.ambiguous) {
        (true, true) => {
            left.settle(ScalarKind::Double);
            right.settle(ScalarKind::Double);
        }
        (true, false) => {
            if let Some(kind) = ambiguous_target(left, right.kind(), date_literal_max_len) {
                left.settle(kind);
            }
        }
        (false, true) => {
            if let Some(kind) = ambiguous_target(right, left.kind(), date_literal_max_len) {
                right.settle(kind);
            }
        }
        (false, false) => {}
    }
}

/// Unify two kinds
///
/// Numeric kinds keep the higher priority; any other difference degrades
/// to VARCHAR. NULL is neutral.
pub fn unify_pair(left: ScalarKind, right: ScalarKind) -> ScalarKind {
    if left.is_null() {
        return right;
    }
    if right.is_null() || left == right {
        return left;
    }
    if left.is_numeric() && right.is_numeric() {
        if right.outranks(&left) { right } else { left }
    } else {
        ScalarKind::Varchar
    }
}

/// Common kind of a sequence, seeded with the first non-null kind
///
/// Returns NULL when every kind is NULL or the sequence is empty.
pub fn unify<I>(kinds: I) -> ScalarKind
where
    I: IntoIterator<Item = ScalarKind>,
{
    kinds.into_iter().fold(ScalarKind::Null, unify_pair)
}

/// Common descriptor of several descriptors
///
/// Precision and scale are the maxima over the operands; string results
/// merge collations pairwise.
pub fn unify_descriptors<'a, I>(descriptors: I, merger: &dyn CollationMerger) -> TypeResult<TypeDescriptor>
where
    I: IntoIterator<Item = &'a TypeDescriptor>,
{
    let descriptors: Vec<&TypeDescriptor> = descriptors.into_iter().filter(|d| !d.is_null()).collect();
    let kind = unify(descriptors.iter().map(|d| d.kind));
    if kind.is_null() {
        return Ok(TypeDescriptor::null());
    }

    let precision = descriptors.iter().map(|d| d.precision).max().unwrap_or(0);
    let scale = descriptors.iter().map(|d| d.scale).max().unwrap_or(0);
    let mut result = TypeDescriptor::new(kind, precision.max(kind.default_precision()), scale);
    if kind.is_exact_integer() || !kind.is_numeric() {
        result.scale = 0;
    }
    if kind.is_temporal() || kind.is_interval() {
        result.precision = kind.default_precision();
    }

    if kind.is_string() {
        let mut collation = None;
        let mut first = true;
        for d in descriptors.iter().filter(|d| d.kind.is_string()) {
            collation = if first {
                d.collation.clone()
            } else {
                merger.merge(collation.as_ref(), d.collation.as_ref())?
            };
            first = false;
        }
        result.collation = collation;
    }
    Ok(result)
}

/// Give unresolved parameters of a unifying operator a concrete kind
///
/// A parameter takes DOUBLE next to a numeric operand and the operand's own
/// kind next to anything else, seeded by the first concrete operand. With no
/// concrete operand it becomes VARCHAR, which every kind converts to.
pub fn settle_unresolved(operands: &mut [OperandType]) {
    let concrete = operands
        .iter()
        .find(|o| !o.ambiguous && !o.kind().is_null())
        .map(OperandType::kind);
    let target = match concrete {
        Some(kind) if kind.is_numeric() => ScalarKind::Double,
        Some(kind) => kind,
        None => ScalarKind::Varchar,
    };
    for operand in operands.iter_mut().filter(|o| o.kind() == ScalarKind::Unresolved) {
        operand.settle(target);
    }
}

/// Rewrite every non-null operand whose kind differs from `kind`
pub fn settle_all(operands: &mut [OperandType], kind: ScalarKind) {
    for operand in operands.iter_mut() {
        if !operand.kind().is_null() {
            operand.settle(kind);
        }
    }
}
