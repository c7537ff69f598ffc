//! Arithmetic Operator Tests
//!
//! Tests for: plus, minus, times, divide, mod, div, negate

use super::{NO_ROW, ctx, engine, eval_call, field};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use sqlexpr_diagnostics::EXPR0300;
use sqlexpr_eval::{EngineOptions, EvalError, ScalarEngine};
use sqlexpr_types::{ScalarKind, TypeDescriptor, TypedValue};

// ============================================================================
// Numeric results
// ============================================================================

#[test]
fn test_int_plus_literal() {
    let engine = engine();
    let node = engine
        .call("+", vec![field(&engine, 0, ScalarKind::Int), engine.literal(1i64)])
        .unwrap();
    assert_eq!(node.kind(), ScalarKind::Int);
    let value = engine.evaluate(&node, &[TypedValue::Int(41)], &mut ctx()).unwrap();
    assert_eq!(value, TypedValue::Int(42));
}

#[test]
fn test_int_divide_int_is_double() {
    let engine = engine();
    let node = engine.call("/", vec![engine.literal(7i64), engine.literal(2i64)]).unwrap();
    assert_eq!(node.kind(), ScalarKind::Double);
    let value = engine.evaluate(&node, &NO_ROW, &mut ctx()).unwrap();
    assert_eq!(value, TypedValue::Double(3.5));
}

#[test]
fn test_decimal_quotient_rounds_to_scale() {
    let engine = engine();
    let node = engine
        .call("/", vec![engine.literal(Decimal::new(100, 2)), engine.literal(Decimal::new(3, 0))])
        .unwrap();
    assert_eq!(node.kind(), ScalarKind::Decimal);
    assert_eq!(node.descriptor().scale, 4);
    let value = engine.evaluate(&node, &NO_ROW, &mut ctx()).unwrap();
    assert_eq!(value, TypedValue::Decimal(Decimal::new(3333, 4)));
}

#[test]
fn test_divide_scale_floor_is_configurable() {
    let engine = ScalarEngine::new().with_options(EngineOptions::default().with_divide_scale_floor(6));
    let node = engine
        .call("/", vec![engine.literal(Decimal::new(2, 0)), engine.literal(Decimal::new(3, 0))])
        .unwrap();
    assert_eq!(node.descriptor().scale, 6);
    let value = engine.evaluate(&node, &NO_ROW, &mut ctx()).unwrap();
    assert_eq!(value, TypedValue::Decimal(Decimal::new(666667, 6)));
}

#[test]
fn test_int_div_floors() {
    let engine = engine();
    let node = engine
        .call("div", vec![field(&engine, 0, ScalarKind::Int), field(&engine, 1, ScalarKind::Int)])
        .unwrap();
    let mut eval = engine.prepare(&node);
    let mut ctx = ctx();
    for (a, b, q) in [(7, 2, 3), (-7, 2, -4), (7, -2, -4), (-8, 2, -4)] {
        let row = [TypedValue::Int(a), TypedValue::Int(b)];
        assert_eq!(eval.evaluate(&row, &mut ctx).unwrap(), &TypedValue::Int(q));
    }
}

#[test]
fn test_int_div_of_doubles_is_long() {
    let engine = engine();
    let node = engine
        .call("div", vec![field(&engine, 0, ScalarKind::Double), engine.literal(2i64)])
        .unwrap();
    assert_eq!(node.kind(), ScalarKind::Long);
    let value = engine.evaluate(&node, &[TypedValue::Double(-7.5)], &mut ctx()).unwrap();
    assert_eq!(value, TypedValue::Int(-4));
}

#[test]
fn test_modulo() {
    let e = engine();
    assert_eq!(eval_call("%", vec![e.literal(7i64), e.literal(3i64)], &[]), TypedValue::Int(1));
    assert_eq!(eval_call("mod", vec![e.literal(-7i64), e.literal(3i64)], &[]), TypedValue::Int(-1));
}

#[test]
fn test_modulo_of_min_long_by_minus_one() {
    let e = engine();
    let value = eval_call(
        "%",
        vec![field(&e, 0, ScalarKind::Long), e.literal(-1i64)],
        &[TypedValue::Int(i64::MIN)],
    );
    assert_eq!(value, TypedValue::Int(0));
}

#[test]
fn test_negate() {
    let engine = engine();
    let node = engine.call("-", vec![field(&engine, 0, ScalarKind::Decimal)]).unwrap();
    let value = engine
        .evaluate(&node, &[TypedValue::Decimal(Decimal::new(125, 2))], &mut ctx())
        .unwrap();
    assert_eq!(value, TypedValue::Decimal(Decimal::new(-125, 2)));
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_division_by_zero_is_fatal() {
    let engine = engine();
    let node = engine
        .call("/", vec![field(&engine, 0, ScalarKind::Int), field(&engine, 1, ScalarKind::Int)])
        .unwrap();
    let err = engine
        .evaluate(&node, &[TypedValue::Int(1), TypedValue::Int(0)], &mut ctx())
        .unwrap_err();
    assert!(matches!(err, EvalError::DivisionByZero { .. }));
}

#[test]
fn test_int_overflow_is_fatal() {
    let engine = engine();
    let node = engine
        .call("+", vec![field(&engine, 0, ScalarKind::Int), engine.literal(1i64)])
        .unwrap();
    let err = engine
        .evaluate(&node, &[TypedValue::Int(i64::from(i32::MAX))], &mut ctx())
        .unwrap_err();
    assert!(matches!(err, EvalError::Overflow { .. }));
}

// ============================================================================
// Null handling
// ============================================================================

#[test]
fn test_null_operand_gives_null() {
    let engine = engine();
    let node = engine
        .call("*", vec![field(&engine, 0, ScalarKind::Int), field(&engine, 1, ScalarKind::Int)])
        .unwrap();
    let value = engine
        .evaluate(&node, &[TypedValue::Int(3), TypedValue::Null], &mut ctx())
        .unwrap();
    assert_eq!(value, TypedValue::Null);
}

#[test]
fn test_static_null_skips_row() {
    // the row is empty; a NULL child means no field is ever read
    let engine = engine();
    let node = engine
        .call("+", vec![field(&engine, 3, ScalarKind::Int), engine.literal(TypedValue::Null)])
        .unwrap();
    assert_eq!(node.kind(), ScalarKind::Null);
    let value = engine.evaluate(&node, &NO_ROW, &mut ctx()).unwrap();
    assert_eq!(value, TypedValue::Null);
}

// ============================================================================
// Ambiguous operands
// ============================================================================

#[test]
fn test_string_literal_next_to_number_is_double() {
    let engine = engine();
    let node = engine
        .call("+", vec![field(&engine, 0, ScalarKind::Int), engine.literal("2.5")])
        .unwrap();
    assert_eq!(node.kind(), ScalarKind::Double);
    let value = engine.evaluate(&node, &[TypedValue::Int(1)], &mut ctx()).unwrap();
    assert_eq!(value, TypedValue::Double(3.5));
}

#[test]
fn test_two_parameters_are_double() {
    let engine = engine();
    let node = engine.call("*", vec![engine.parameter(0), engine.parameter(1)]).unwrap();
    assert_eq!(node.kind(), ScalarKind::Double);
    let mut ctx = sqlexpr_eval::EvaluationContext::builder().bind("1.5").bind(4i64).build();
    let value = engine.evaluate(&node, &NO_ROW, &mut ctx).unwrap();
    assert_eq!(value, TypedValue::Double(6.0));
}

#[test]
fn test_varchar_column_settles_to_numeric_partner() {
    let engine = engine();
    let node = engine
        .call("+", vec![engine.field(0, TypeDescriptor::varchar(10)), engine.literal(1i64)])
        .unwrap();
    assert_eq!(node.kind(), ScalarKind::Int);
    let value = engine
        .evaluate(&node, &[TypedValue::from("12")], &mut ctx())
        .unwrap();
    assert_eq!(value, TypedValue::Int(13));
}

#[test]
fn test_malformed_number_warns_and_yields_null() {
    let engine = engine();
    let node = engine
        .call("+", vec![field(&engine, 0, ScalarKind::Int), engine.literal("abc")])
        .unwrap();
    let mut ctx = ctx();
    let value = engine.evaluate(&node, &[TypedValue::Int(1)], &mut ctx).unwrap();
    assert_eq!(value, TypedValue::Null);
    assert_eq!(ctx.warnings().len(), 1);
    assert_eq!(ctx.warnings()[0].code, EXPR0300);
    assert_eq!(ctx.warnings()[0].operator.as_deref(), Some("implicit_cast"));
}

#[test]
fn test_malformed_number_fails_when_strict() {
    let engine = ScalarEngine::new().with_options(EngineOptions::default().with_strict_conversions(true));
    let node = engine
        .call("+", vec![field(&engine, 0, ScalarKind::Int), engine.literal("abc")])
        .unwrap();
    let err = engine.evaluate(&node, &[TypedValue::Int(1)], &mut ctx()).unwrap_err();
    assert!(matches!(err, EvalError::Conversion(_)));
}
