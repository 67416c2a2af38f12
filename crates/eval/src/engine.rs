//! The evaluation engine for source fragments and case patterns.

use crate::env::Environment;
use crate::error::EvalError;
use dbgtrace_expr::{is_truthy, type_name, BinaryOperator, Fragment, Pattern, Value};
use serde_json::{json, Number};
use std::cmp::Ordering;

/// Evaluates a fragment and returns a concrete value.
pub fn evaluate_fragment(fragment: &Fragment, env: &Environment) -> Result<Value, EvalError> {
    match fragment {
        Fragment::Literal(value) => Ok(value.clone()),
        Fragment::Atom(name) => Ok(Value::String(name.clone())),
        Fragment::Variable(name) => env.lookup(name).cloned(),
        Fragment::Call { name, args } => {
            let evaluated_args = evaluate_args(args, env)?;
            env.functions().call(name, &evaluated_args)
        }
        Fragment::Binary { left, op, right } => {
            let left_val = evaluate_fragment(left, env)?;
            let right_val = evaluate_fragment(right, env)?;
            apply_binary(*op, &left_val, &right_val)
        }
        Fragment::Not(inner) => {
            let val = evaluate_fragment(inner, env)?;
            Ok(Value::Bool(!is_truthy(&val)))
        }
    }
}

/// Evaluates call arguments strictly left to right.
pub fn evaluate_args(args: &[Fragment], env: &Environment) -> Result<Vec<Value>, EvalError> {
    let mut evaluated = Vec::with_capacity(args.len());
    for arg in args {
        evaluated.push(evaluate_fragment(arg, env)?);
    }
    Ok(evaluated)
}

/// Tests `value` against `pattern`, collecting the bindings the match introduces.
/// Returns `None` when the pattern does not match.
pub fn match_pattern(pattern: &Pattern, value: &Value) -> Option<Vec<(String, Value)>> {
    let mut bindings = Vec::new();
    if collect_bindings(pattern, value, &mut bindings) {
        Some(bindings)
    } else {
        None
    }
}

fn collect_bindings(pattern: &Pattern, value: &Value, bindings: &mut Vec<(String, Value)>) -> bool {
    match pattern {
        Pattern::Wildcard => true,
        Pattern::Literal(expected) => values_equal(expected, value),
        Pattern::Atom(name) => value.as_str() == Some(name.as_str()),
        Pattern::Bind(name) => {
            // A name bound twice must see the same value both times.
            if let Some((_, previous)) = bindings.iter().find(|(bound, _)| bound == name) {
                return values_equal(previous, value);
            }
            bindings.push((name.clone(), value.clone()));
            true
        }
        Pattern::List(patterns) => match value {
            Value::Array(items) if items.len() == patterns.len() => patterns
                .iter()
                .zip(items)
                .all(|(p, item)| collect_bindings(p, item, bindings)),
            _ => false,
        },
    }
}

/// Structural equality where numbers compare by magnitude (`1 == 1.0`).
pub fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => match (l.as_i64(), r.as_i64()) {
            (Some(l), Some(r)) => l == r,
            _ => l.as_f64() == r.as_f64(),
        },
        (Value::Array(l), Value::Array(r)) => {
            l.len() == r.len() && l.iter().zip(r).all(|(a, b)| values_equal(a, b))
        }
        _ => left == right,
    }
}

fn apply_binary(op: BinaryOperator, left: &Value, right: &Value) -> Result<Value, EvalError> {
    match op {
        BinaryOperator::Equals => Ok(Value::Bool(values_equal(left, right))),
        BinaryOperator::NotEquals => Ok(Value::Bool(!values_equal(left, right))),
        BinaryOperator::LessThan
        | BinaryOperator::LessThanOrEqual
        | BinaryOperator::GreaterThan
        | BinaryOperator::GreaterThanOrEqual => {
            let ordering = compare(op, left, right)?;
            let result = match op {
                BinaryOperator::LessThan => ordering == Ordering::Less,
                BinaryOperator::LessThanOrEqual => ordering != Ordering::Greater,
                BinaryOperator::GreaterThan => ordering == Ordering::Greater,
                _ => ordering != Ordering::Less,
            };
            Ok(Value::Bool(result))
        }
        BinaryOperator::Plus
        | BinaryOperator::Minus
        | BinaryOperator::Multiply
        | BinaryOperator::Divide => arithmetic(op, left, right),
    }
}

fn compare(op: BinaryOperator, left: &Value, right: &Value) -> Result<Ordering, EvalError> {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => {
            let (l, r) = (l.as_f64().unwrap_or(f64::NAN), r.as_f64().unwrap_or(f64::NAN));
            l.partial_cmp(&r).ok_or_else(|| {
                EvalError::TypeError(format!("cannot compare {} and {}", l, r))
            })
        }
        (Value::String(l), Value::String(r)) => Ok(l.cmp(r)),
        _ => Err(operand_error(op, left, right)),
    }
}

fn arithmetic(op: BinaryOperator, left: &Value, right: &Value) -> Result<Value, EvalError> {
    let (Value::Number(l), Value::Number(r)) = (left, right) else {
        return Err(operand_error(op, left, right));
    };

    if let (Some(l), Some(r)) = (l.as_i64(), r.as_i64()) {
        let exact = match op {
            BinaryOperator::Plus => l.checked_add(r),
            BinaryOperator::Minus => l.checked_sub(r),
            BinaryOperator::Multiply => l.checked_mul(r),
            _ => {
                if r == 0 {
                    return Err(EvalError::DivisionByZero);
                }
                match l.checked_rem(r) {
                    Some(0) => l.checked_div(r),
                    _ => None,
                }
            }
        };
        if let Some(n) = exact {
            return Ok(json!(n));
        }
    }

    let (l, r) = (l.as_f64().unwrap_or(f64::NAN), r.as_f64().unwrap_or(f64::NAN));
    let result = match op {
        BinaryOperator::Plus => l + r,
        BinaryOperator::Minus => l - r,
        BinaryOperator::Multiply => l * r,
        _ => {
            if r == 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            l / r
        }
    };
    Number::from_f64(result)
        .map(Value::Number)
        .ok_or_else(|| EvalError::TypeError(format!("{} {} {} is not a finite number", l, op.symbol(), r)))
}

fn operand_error(op: BinaryOperator, left: &Value, right: &Value) -> EvalError {
    EvalError::TypeError(format!(
        "unsupported operands for '{}': {} and {}",
        op.symbol(),
        type_name(left),
        type_name(right)
    ))
}
