//! Operator and coercion semantics across the value domain. Factored out
//! of the evaluator so `ForRange` stepping can reuse the same promotion
//! rules as `Binary` expressions.

use crate::error::TupaError;
use crate::value::Value;

fn numeric(v: &Value) -> Option<f64> {
    match v {
        Value::Integer(n) => Some(*n as f64),
        Value::Real(r) => Some(*r),
        _ => None,
    }
}

fn type_error(op: &str, l: &Value, r: &Value, line: usize, column: usize) -> TupaError {
    TupaError::type_error(format!(
        "operador '{op}' não suporta '{}' e '{}'",
        l.type_name(),
        r.type_name()
    ))
    .with_position(line, column)
}

pub fn add(l: &Value, r: &Value, line: usize, column: usize) -> Result<Value, TupaError> {
    match (l, r) {
        (Value::Integer(a), Value::Integer(b)) => Ok(Value::Integer(a + b)),
        (Value::Integer(a), Value::Real(b)) => Ok(Value::Real(*a as f64 + b)),
        (Value::Real(a), Value::Integer(b)) => Ok(Value::Real(a + *b as f64)),
        (Value::Real(a), Value::Real(b)) => Ok(Value::Real(a + b)),
        (Value::Str(a), Value::Str(b)) => Ok(Value::Str(format!("{a}{b}"))),
        _ => Err(type_error("+", l, r, line, column)),
    }
}

pub fn sub(l: &Value, r: &Value, line: usize, column: usize) -> Result<Value, TupaError> {
    match (l, r) {
        (Value::Integer(a), Value::Integer(b)) => Ok(Value::Integer(a - b)),
        (Value::Integer(a), Value::Real(b)) => Ok(Value::Real(*a as f64 - b)),
        (Value::Real(a), Value::Integer(b)) => Ok(Value::Real(a - *b as f64)),
        (Value::Real(a), Value::Real(b)) => Ok(Value::Real(a - b)),
        _ => Err(type_error("-", l, r, line, column)),
    }
}

pub fn mul(l: &Value, r: &Value, line: usize, column: usize) -> Result<Value, TupaError> {
    match (l, r) {
        (Value::Integer(a), Value::Integer(b)) => Ok(Value::Integer(a * b)),
        (Value::Integer(a), Value::Real(b)) => Ok(Value::Real(*a as f64 * b)),
        (Value::Real(a), Value::Integer(b)) => Ok(Value::Real(a * *b as f64)),
        (Value::Real(a), Value::Real(b)) => Ok(Value::Real(a * b)),
        _ => Err(type_error("*", l, r, line, column)),
    }
}

/// `/` always produces a `Real`, even for two integer operands.
pub fn div(l: &Value, r: &Value, line: usize, column: usize) -> Result<Value, TupaError> {
    match (numeric(l), numeric(r)) {
        (Some(a), Some(b)) => Ok(Value::Real(a / b)),
        _ => Err(type_error("/", l, r, line, column)),
    }
}

pub fn equal(l: &Value, r: &Value) -> Value {
    Value::Bool(l.structural_eq(r))
}

pub fn not_equal(l: &Value, r: &Value) -> Value {
    Value::Bool(!l.structural_eq(r))
}

pub fn less_than(l: &Value, r: &Value, line: usize, column: usize) -> Result<Value, TupaError> {
    compare(l, r, line, column, "<", |o| o == std::cmp::Ordering::Less)
}

pub fn less_or_equal(l: &Value, r: &Value, line: usize, column: usize) -> Result<Value, TupaError> {
    compare(l, r, line, column, "<=", |o| o != std::cmp::Ordering::Greater)
}

pub fn greater_than(l: &Value, r: &Value, line: usize, column: usize) -> Result<Value, TupaError> {
    compare(l, r, line, column, ">", |o| o == std::cmp::Ordering::Greater)
}

pub fn greater_or_equal(l: &Value, r: &Value, line: usize, column: usize) -> Result<Value, TupaError> {
    compare(l, r, line, column, ">=", |o| o != std::cmp::Ordering::Less)
}

fn compare(
    l: &Value,
    r: &Value,
    line: usize,
    column: usize,
    op: &str,
    accept: impl Fn(std::cmp::Ordering) -> bool,
) -> Result<Value, TupaError> {
    let ordering = match (l, r) {
        (Value::Str(a), Value::Str(b)) => a.partial_cmp(b),
        _ => match (numeric(l), numeric(r)) {
            (Some(a), Some(b)) => a.partial_cmp(&b),
            _ => None,
        },
    };

    match ordering {
        Some(o) => Ok(Value::Bool(accept(o))),
        None => Err(type_error(op, l, r, line, column)),
    }
}
