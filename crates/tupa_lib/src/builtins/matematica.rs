//! Exports for `usar matematica`.

use crate::error::TupaError;
use crate::value::Value;
use rand::Rng;
use std::rc::Rc;

fn as_f64(value: &Value) -> Result<f64, TupaError> {
    match value {
        Value::Integer(n) => Ok(*n as f64),
        Value::Real(r) => Ok(*r),
        other => Err(TupaError::type_error(format!(
            "esperava um número, recebeu '{}'",
            other.type_name()
        ))),
    }
}

pub fn sqrt(value: &Value) -> Result<Value, TupaError> {
    let n = as_f64(value)?;
    if n < 0.0 {
        return Err(TupaError::value("não é possível calcular a raiz de um número negativo"));
    }
    Ok(Value::Real(n.sqrt()))
}

pub fn exports() -> Vec<(String, Value)> {
    vec![
        ("pi".to_string(), Value::Real(std::f64::consts::PI)),
        ("e".to_string(), Value::Real(std::f64::consts::E)),
        (
            "seno".to_string(),
            Value::Native(Rc::new(|args: &[Value]| {
                Ok(Value::Real(as_f64(expect_one(args)?)?.sin()))
            })),
        ),
        (
            "cosseno".to_string(),
            Value::Native(Rc::new(|args: &[Value]| {
                Ok(Value::Real(as_f64(expect_one(args)?)?.cos()))
            })),
        ),
        (
            "tangente".to_string(),
            Value::Native(Rc::new(|args: &[Value]| {
                Ok(Value::Real(as_f64(expect_one(args)?)?.tan()))
            })),
        ),
        (
            "raiz".to_string(),
            Value::Native(Rc::new(|args: &[Value]| sqrt(expect_one(args)?))),
        ),
        (
            "potencia".to_string(),
            Value::Native(Rc::new(|args: &[Value]| {
                let base = as_f64(args.first().ok_or_else(|| {
                    TupaError::value("esperava 2 argumentos, recebeu menos")
                })?)?;
                let expoente = as_f64(args.get(1).ok_or_else(|| {
                    TupaError::value("esperava 2 argumentos, recebeu menos")
                })?)?;
                Ok(Value::Real(base.powf(expoente)))
            })),
        ),
        (
            "absoluto".to_string(),
            Value::Native(Rc::new(|args: &[Value]| match expect_one(args)? {
                Value::Integer(n) => Ok(Value::Integer(n.abs())),
                Value::Real(r) => Ok(Value::Real(r.abs())),
                other => Err(TupaError::type_error(format!(
                    "esperava um número, recebeu '{}'",
                    other.type_name()
                ))),
            })),
        ),
        (
            "teto".to_string(),
            Value::Native(Rc::new(|args: &[Value]| {
                Ok(Value::Integer(as_f64(expect_one(args)?)?.ceil() as i64))
            })),
        ),
        (
            "piso".to_string(),
            Value::Native(Rc::new(|args: &[Value]| {
                Ok(Value::Integer(as_f64(expect_one(args)?)?.floor() as i64))
            })),
        ),
        (
            "aleatorio".to_string(),
            Value::Native(Rc::new(|_args: &[Value]| {
                Ok(Value::Real(rand::thread_rng().gen_range(0.0..1.0)))
            })),
        ),
        (
            "aleatorio_entre".to_string(),
            Value::Native(Rc::new(|args: &[Value]| {
                let lo = match args.first() {
                    Some(Value::Integer(n)) => *n,
                    _ => {
                        return Err(TupaError::type_error(
                            "'aleatorio_entre' espera limites inteiros",
                        ))
                    }
                };
                let hi = match args.get(1) {
                    Some(Value::Integer(n)) => *n,
                    _ => {
                        return Err(TupaError::type_error(
                            "'aleatorio_entre' espera limites inteiros",
                        ))
                    }
                };
                if lo > hi {
                    return Err(TupaError::value(
                        "o limite inferior de 'aleatorio_entre' deve ser <= ao superior",
                    ));
                }
                Ok(Value::Integer(rand::thread_rng().gen_range(lo..=hi)))
            })),
        ),
    ]
}

fn expect_one(args: &[Value]) -> Result<&Value, TupaError> {
    args.first()
        .ok_or_else(|| TupaError::value("esperava 1 argumento, recebeu 0"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqrt_rejects_negative_input() {
        assert!(sqrt(&Value::Integer(-4)).is_err());
    }

    #[test]
    fn exports_include_pi_and_potencia() {
        let exported = exports();
        assert!(exported.iter().any(|(name, _)| name == "pi"));
        let (_, potencia) = exported.iter().find(|(n, _)| n == "potencia").unwrap();
        let Value::Native(f) = potencia else { panic!("expected native fn") };
        let result = f(&[Value::Integer(2), Value::Integer(10)]).unwrap();
        assert!(matches!(result, Value::Real(v) if v == 1024.0));
    }
}
