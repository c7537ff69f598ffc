//! Logical and Conditional Operator Tests
//!
//! Tests for: and, or, not, xor, isnull, istrue, isfalse, coalesce, ifnull,
//! if, case

use super::{NO_ROW, ctx, engine, eval_call, field};
use pretty_assertions::assert_eq;
use rstest::rstest;
use sqlexpr_eval::EvaluationContext;
use sqlexpr_types::{ScalarKind, TypeError, TypedValue};

fn truth(b: Option<bool>) -> TypedValue {
    b.map_or(TypedValue::Null, TypedValue::Boolean)
}

// ============================================================================
// Three-valued logic
// ============================================================================

#[rstest]
#[case("and", Some(true), Some(true), Some(true))]
#[case("and", Some(true), None, None)]
#[case("and", None, Some(false), Some(false))]
#[case("and", Some(false), None, Some(false))]
#[case("or", None, Some(true), Some(true))]
#[case("or", Some(false), None, None)]
#[case("or", Some(false), Some(false), Some(false))]
#[case("xor", Some(true), Some(false), Some(true))]
#[case("xor", Some(true), None, None)]
fn test_truth_tables(#[case] op: &str, #[case] a: Option<bool>, #[case] b: Option<bool>, #[case] expected: Option<bool>) {
    let e = engine();
    let value = eval_call(
        op,
        vec![field(&e, 0, ScalarKind::Boolean), field(&e, 1, ScalarKind::Boolean)],
        &[truth(a), truth(b)],
    );
    assert_eq!(value, truth(expected));
}

#[test]
fn test_and_skips_right_operand() {
    // field 9 is past the end of the row; pulling it would fail
    let e = engine();
    let node = e
        .call("and", vec![field(&e, 0, ScalarKind::Boolean), field(&e, 9, ScalarKind::Boolean)])
        .unwrap();
    let value = e.evaluate(&node, &[TypedValue::Boolean(false)], &mut ctx()).unwrap();
    assert_eq!(value, TypedValue::Boolean(false));
    assert!(e.evaluate(&node, &[TypedValue::Boolean(true)], &mut ctx()).is_err());
}

#[test]
fn test_numeric_operand_settles_to_boolean() {
    let e = engine();
    let node = e.call("not", vec![field(&e, 0, ScalarKind::Int)]).unwrap();
    assert_eq!(node.children()[0].kind(), ScalarKind::Boolean);
    assert_eq!(e.evaluate(&node, &[TypedValue::Int(0)], &mut ctx()).unwrap(), TypedValue::Boolean(true));
    assert_eq!(e.evaluate(&node, &[TypedValue::Int(7)], &mut ctx()).unwrap(), TypedValue::Boolean(false));
}

#[test]
fn test_date_operand_is_rejected() {
    let e = engine();
    let err = e.call("not", vec![field(&e, 0, ScalarKind::Date)]).unwrap_err();
    assert!(matches!(err, TypeError::UnsupportedKind { .. }));
}

#[test]
fn test_is_predicates_never_null() {
    let e = engine();
    let row = [TypedValue::Null];
    let bool_field = || vec![field(&e, 0, ScalarKind::Boolean)];
    assert_eq!(eval_call("isnull", bool_field(), &row), TypedValue::Boolean(true));
    assert_eq!(eval_call("istrue", bool_field(), &row), TypedValue::Boolean(false));
    assert_eq!(eval_call("isfalse", bool_field(), &row), TypedValue::Boolean(false));
    assert_eq!(
        eval_call("isfalse", bool_field(), &[TypedValue::Boolean(false)]),
        TypedValue::Boolean(true)
    );
}

// ============================================================================
// Conditionals
// ============================================================================

#[test]
fn test_coalesce_first_non_null() {
    let e = engine();
    let node = e
        .call(
            "coalesce",
            vec![field(&e, 0, ScalarKind::Int), field(&e, 1, ScalarKind::Int), e.literal(-1i64)],
        )
        .unwrap();
    assert_eq!(node.kind(), ScalarKind::Int);
    let mut eval = e.prepare(&node);
    let mut ctx = ctx();
    let row = [TypedValue::Null, TypedValue::Int(2)];
    assert_eq!(eval.evaluate(&row, &mut ctx).unwrap(), &TypedValue::Int(2));
    let row = [TypedValue::Null, TypedValue::Null];
    assert_eq!(eval.evaluate(&row, &mut ctx).unwrap(), &TypedValue::Int(-1));
}

#[test]
fn test_coalesce_keeps_static_null_children() {
    let e = engine();
    let node = e
        .call("ifnull", vec![e.literal(TypedValue::Null), e.literal(5i64)])
        .unwrap();
    assert_eq!(node.kind(), ScalarKind::Int);
    assert_eq!(e.evaluate(&node, &NO_ROW, &mut ctx()).unwrap(), TypedValue::Int(5));
}

#[test]
fn test_coalesce_parameter_follows_numeric_operand() {
    let e = engine();
    let node = e.call("coalesce", vec![e.parameter(0), e.literal(1i64)]).unwrap();
    assert_eq!(node.kind(), ScalarKind::Double);
    assert_eq!(node.children()[0].kind(), ScalarKind::Double);

    let mut eval = e.prepare(&node);
    let mut ctx = EvaluationContext::builder().bind(5i64).build();
    assert_eq!(eval.evaluate(&NO_ROW, &mut ctx).unwrap(), &TypedValue::Double(5.0));
    ctx.rebind(vec![TypedValue::Null]);
    assert_eq!(eval.evaluate(&NO_ROW, &mut ctx).unwrap(), &TypedValue::Double(1.0));
}

#[test]
fn test_conditionals_over_parameters_only() {
    let e = engine();
    let coalesce = e.call("coalesce", vec![e.parameter(0), e.parameter(1)]).unwrap();
    assert_eq!(coalesce.kind(), ScalarKind::Varchar);
    let choose = e
        .call("if", vec![field(&e, 0, ScalarKind::Boolean), e.parameter(0), e.parameter(1)])
        .unwrap();
    assert_eq!(choose.kind(), ScalarKind::Varchar);

    let mut ctx = EvaluationContext::builder()
        .bindings(vec![TypedValue::Null, TypedValue::from("b")])
        .build();
    assert_eq!(e.evaluate(&coalesce, &NO_ROW, &mut ctx).unwrap(), TypedValue::from("b"));
    let value = e.evaluate(&choose, &[TypedValue::Boolean(false)], &mut ctx).unwrap();
    assert_eq!(value, TypedValue::from("b"));
}

#[test]
fn test_if_unknown_condition_takes_else() {
    let e = engine();
    let node = e
        .call(
            "if",
            vec![field(&e, 0, ScalarKind::Boolean), e.literal(1i64), e.literal(2i64)],
        )
        .unwrap();
    let mut eval = e.prepare(&node);
    let mut ctx = ctx();
    assert_eq!(eval.evaluate(&[TypedValue::Boolean(true)], &mut ctx).unwrap(), &TypedValue::Int(1));
    assert_eq!(eval.evaluate(&[TypedValue::Null], &mut ctx).unwrap(), &TypedValue::Int(2));
}

#[test]
fn test_if_branches_unify() {
    let e = engine();
    let node = e
        .call(
            "if",
            vec![field(&e, 0, ScalarKind::Boolean), e.literal(1i64), field(&e, 1, ScalarKind::Double)],
        )
        .unwrap();
    assert_eq!(node.kind(), ScalarKind::Double);
    let value = e
        .evaluate(&node, &[TypedValue::Boolean(true), TypedValue::Double(0.5)], &mut ctx())
        .unwrap();
    assert_eq!(value, TypedValue::Double(1.0));
}

#[test]
fn test_searched_case() {
    let e = engine();
    let x = || field(&e, 0, ScalarKind::Int);
    let lt = |n: i64| e.call("<", vec![x(), e.literal(n)]).unwrap();
    let node = e
        .call(
            "case",
            vec![lt(0), e.literal("negative"), lt(10), e.literal("small"), e.literal("large")],
        )
        .unwrap();
    assert_eq!(node.kind(), ScalarKind::Varchar);
    let mut eval = e.prepare(&node);
    let mut ctx = ctx();
    for (n, label) in [(-3, "negative"), (4, "small"), (40, "large")] {
        assert_eq!(eval.evaluate(&[TypedValue::Int(n)], &mut ctx).unwrap(), &TypedValue::from(label));
    }
}

#[test]
fn test_case_without_else_gives_null() {
    let e = engine();
    let node = e
        .call("case", vec![field(&e, 0, ScalarKind::Boolean), e.literal(1i64)])
        .unwrap();
    let value = e.evaluate(&node, &[TypedValue::Boolean(false)], &mut ctx()).unwrap();
    assert_eq!(value, TypedValue::Null);
}
