//! Type Operator Tests
//!
//! Tests for: cast, implicit_cast

use super::{NO_ROW, ctx, engine, field};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use sqlexpr_diagnostics::EXPR0300;
use sqlexpr_types::{ScalarKind, SqlDate, TypeDescriptor, TypeError, TypedValue};

#[test]
fn test_explicit_decimal_cast_rounds_half_away() {
    let e = engine();
    let node = e
        .cast(e.literal(Decimal::new(2345, 3)), TypeDescriptor::decimal(5, 2))
        .unwrap();
    assert_eq!(node.descriptor(), &TypeDescriptor::decimal(5, 2));
    let value = e.evaluate(&node, &NO_ROW, &mut ctx()).unwrap();
    assert_eq!(value, TypedValue::Decimal(Decimal::new(235, 2)));
}

#[test]
fn test_cast_string_to_date() {
    let e = engine();
    let node = e.cast(e.literal("2024-02-29"), TypeDescriptor::of(ScalarKind::Date)).unwrap();
    let value = e.evaluate(&node, &NO_ROW, &mut ctx()).unwrap();
    assert_eq!(value, TypedValue::Date(SqlDate::new(2024, 2, 29)));
}

#[test]
fn test_failed_cast_warns() {
    let e = engine();
    let node = e
        .cast(e.field(0, TypeDescriptor::varchar(8)), TypeDescriptor::of(ScalarKind::Int))
        .unwrap();
    let mut ctx = ctx();
    let value = e.evaluate(&node, &[TypedValue::from("12x")], &mut ctx).unwrap();
    assert_eq!(value, TypedValue::Null);
    let warnings = ctx.take_warnings();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].code, EXPR0300);
    assert_eq!(warnings[0].operator.as_deref(), Some("cast"));
    assert!(ctx.warnings().is_empty());
}

#[test]
fn test_illegal_cast_target() {
    let e = engine();
    let err = e
        .cast(field(&e, 0, ScalarKind::Date), TypeDescriptor::of(ScalarKind::IntervalMonth))
        .unwrap_err();
    assert!(matches!(err, TypeError::InvalidCastTarget { .. }));
}
