//! Comparison Operator Tests
//!
//! Tests for: =, <>, <, <=, >, >=, greatest, least, nullif

use super::{NO_ROW, ctx, engine, eval_call, field};
use pretty_assertions::assert_eq;
use rstest::rstest;
use rust_decimal::Decimal;
use sqlexpr_eval::EvaluationContext;
use sqlexpr_types::{Collation, ScalarKind, SqlDate, TypeDescriptor, TypeError, TypedValue};

#[rstest]
#[case("=", 1, 1, true)]
#[case("=", 1, 2, false)]
#[case("<>", 1, 2, true)]
#[case("!=", 2, 2, false)]
#[case("<", 1, 2, true)]
#[case("<=", 2, 2, true)]
#[case(">", 1, 2, false)]
#[case(">=", 3, 2, true)]
fn test_int_comparisons(#[case] op: &str, #[case] a: i64, #[case] b: i64, #[case] expected: bool) {
    let e = engine();
    let value = eval_call(
        op,
        vec![field(&e, 0, ScalarKind::Int), field(&e, 1, ScalarKind::Int)],
        &[TypedValue::Int(a), TypedValue::Int(b)],
    );
    assert_eq!(value, TypedValue::Boolean(expected));
}

#[test]
fn test_mixed_numeric_comparison() {
    let e = engine();
    let value = eval_call(
        "<",
        vec![field(&e, 0, ScalarKind::Int), field(&e, 1, ScalarKind::Decimal)],
        &[TypedValue::Int(2), TypedValue::Decimal(Decimal::new(25, 1))],
    );
    assert_eq!(value, TypedValue::Boolean(true));
}

#[test]
fn test_null_comparison_is_unknown() {
    let e = engine();
    let value = eval_call(
        "=",
        vec![field(&e, 0, ScalarKind::Int), field(&e, 1, ScalarKind::Int)],
        &[TypedValue::Int(1), TypedValue::Null],
    );
    assert_eq!(value, TypedValue::Null);
}

#[test]
fn test_string_literal_next_to_date_parses_as_date() {
    let e = engine();
    let node = e
        .call("=", vec![field(&e, 0, ScalarKind::Date), e.literal("2024-03-15")])
        .unwrap();
    assert_eq!(node.children()[1].kind(), ScalarKind::Date);
    let value = e
        .evaluate(&node, &[TypedValue::Date(SqlDate::new(2024, 3, 15))], &mut ctx())
        .unwrap();
    assert_eq!(value, TypedValue::Boolean(true));
}

#[test]
fn test_case_insensitive_collation() {
    let e = engine();
    let column = TypeDescriptor::varchar(20).with_collation(Some(Collation::explicit("utf8_general_ci")));
    let node = e.call("=", vec![e.field(0, column), e.literal("HELLO")]).unwrap();
    let value = e.evaluate(&node, &[TypedValue::from("hello")], &mut ctx()).unwrap();
    assert_eq!(value, TypedValue::Boolean(true));

    // binary collation keeps case
    let node = e
        .call("=", vec![e.field(0, TypeDescriptor::varchar(20)), e.literal("HELLO")])
        .unwrap();
    let value = e.evaluate(&node, &[TypedValue::from("hello")], &mut ctx()).unwrap();
    assert_eq!(value, TypedValue::Boolean(false));
}

#[test]
fn test_conflicting_explicit_collations() {
    let e = engine();
    let a = TypeDescriptor::varchar(5).with_collation(Some(Collation::explicit("latin1_swedish_ci")));
    let b = TypeDescriptor::varchar(5).with_collation(Some(Collation::explicit("utf8_bin")));
    let err = e.call("<", vec![e.field(0, a), e.field(1, b)]).unwrap_err();
    assert!(matches!(err, TypeError::IncompatibleCollations { .. }));
}

// ============================================================================
// Greatest / Least / NullIf
// ============================================================================

#[test]
fn test_greatest_and_least() {
    let e = engine();
    let args = || vec![e.literal(3i64), e.literal(Decimal::new(75, 1)), e.literal(-1i64)];
    let node = e.call("greatest", args()).unwrap();
    assert_eq!(node.kind(), ScalarKind::Decimal);
    assert_eq!(
        e.evaluate(&node, &NO_ROW, &mut ctx()).unwrap(),
        TypedValue::Decimal(Decimal::new(75, 1))
    );
    let node = e.call("least", args()).unwrap();
    assert_eq!(e.evaluate(&node, &NO_ROW, &mut ctx()).unwrap(), TypedValue::Decimal(Decimal::from(-1)));
}

#[test]
fn test_greatest_over_parameters_only() {
    let e = engine();
    let node = e.call("greatest", vec![e.parameter(0), e.parameter(1)]).unwrap();
    assert_eq!(node.kind(), ScalarKind::Varchar);
    let mut ctx = EvaluationContext::builder()
        .bindings(vec![TypedValue::from("apple"), TypedValue::from("cherry")])
        .build();
    assert_eq!(e.evaluate(&node, &NO_ROW, &mut ctx).unwrap(), TypedValue::from("cherry"));
}

#[test]
fn test_greatest_with_null_is_null() {
    let e = engine();
    let value = eval_call(
        "greatest",
        vec![field(&e, 0, ScalarKind::Int), field(&e, 1, ScalarKind::Int)],
        &[TypedValue::Int(1), TypedValue::Null],
    );
    assert_eq!(value, TypedValue::Null);
}

#[test]
fn test_nullif() {
    let e = engine();
    let args = || vec![field(&e, 0, ScalarKind::Int), e.literal(0i64)];
    assert_eq!(eval_call("nullif", args(), &[TypedValue::Int(0)]), TypedValue::Null);
    assert_eq!(eval_call("nullif", args(), &[TypedValue::Int(5)]), TypedValue::Int(5));
    assert_eq!(eval_call("nullif", args(), &[TypedValue::Null]), TypedValue::Null);
}
