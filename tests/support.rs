// ABOUTME: Minimal host-function fixtures for end-to-end tests -- not a standard library

use expreva::{create_environment, Environment, EvalError, Value};
use std::rc::Rc;

/// Builds a fresh environment seeded with just enough arithmetic,
/// comparison, and logical host functions to run the scenarios these
/// integration tests exercise. A real embedder supplies its own; this
/// exists only so the tests don't have to hand-evaluate expressions in
/// Rust to check the crate's parsing/evaluation behavior.
pub fn test_environment() -> Rc<Environment> {
    create_environment(vec![
        ("+".to_string(), Value::Host(Rc::new(arith(0.0, |a, b| a + b)))),
        ("*".to_string(), Value::Host(Rc::new(arith(1.0, |a, b| a * b)))),
        (
            "-".to_string(),
            Value::Host(Rc::new(|args: &[Value]| match args {
                [Value::Number(a)] => Ok(Value::Number(-a)),
                [Value::Number(a), Value::Number(b)] => Ok(Value::Number(a - b)),
                _ => Err(EvalError::host_error("-", "expected one or two numbers")),
            })),
        ),
        (
            "/".to_string(),
            Value::Host(Rc::new(|args: &[Value]| match args {
                [Value::Number(a), Value::Number(b)] => Ok(Value::Number(a / b)),
                _ => Err(EvalError::host_error("/", "expected two numbers")),
            })),
        ),
        ("<".to_string(), Value::Host(Rc::new(compare(|a, b| a < b)))),
        ("<=".to_string(), Value::Host(Rc::new(compare(|a, b| a <= b)))),
        (">".to_string(), Value::Host(Rc::new(compare(|a, b| a > b)))),
        (">=".to_string(), Value::Host(Rc::new(compare(|a, b| a >= b)))),
        (
            "==".to_string(),
            Value::Host(Rc::new(|args: &[Value]| match args {
                [a, b] => Ok(Value::Bool(values_equal(a, b))),
                _ => Err(EvalError::host_error("==", "expected two values")),
            })),
        ),
        (
            "!=".to_string(),
            Value::Host(Rc::new(|args: &[Value]| match args {
                [a, b] => Ok(Value::Bool(!values_equal(a, b))),
                _ => Err(EvalError::host_error("!=", "expected two values")),
            })),
        ),
        (
            "&&".to_string(),
            Value::Host(Rc::new(|args: &[Value]| match args {
                [a, b] => Ok(Value::Bool(a.is_truthy() && b.is_truthy())),
                _ => Err(EvalError::host_error("&&", "expected two values")),
            })),
        ),
        (
            "||".to_string(),
            Value::Host(Rc::new(|args: &[Value]| match args {
                [a, b] => Ok(Value::Bool(a.is_truthy() || b.is_truthy())),
                _ => Err(EvalError::host_error("||", "expected two values")),
            })),
        ),
        (
            "!".to_string(),
            Value::Host(Rc::new(|args: &[Value]| match args {
                [a] => Ok(Value::Bool(!a.is_truthy())),
                _ => Err(EvalError::host_error("!", "expected one value")),
            })),
        ),
    ])
}

fn arith(
    init: f64,
    op: impl Fn(f64, f64) -> f64 + 'static,
) -> impl Fn(&[Value]) -> Result<Value, EvalError> {
    move |args: &[Value]| {
        let mut acc = init;
        for (i, arg) in args.iter().enumerate() {
            match arg {
                Value::Number(n) => acc = op(acc, *n),
                other => return Err(EvalError::type_error("arithmetic", "number", other, i)),
            }
        }
        Ok(Value::Number(acc))
    }
}

fn compare(
    op: impl Fn(f64, f64) -> bool + 'static,
) -> impl Fn(&[Value]) -> Result<Value, EvalError> {
    move |args: &[Value]| match args {
        [Value::Number(a), Value::Number(b)] => Ok(Value::Bool(op(*a, *b))),
        _ => Err(EvalError::host_error("compare", "expected two numbers")),
    }
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x == y,
        (Value::Str(x), Value::Str(y)) => x == y,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Nil, Value::Nil) => true,
        _ => false,
    }
}
