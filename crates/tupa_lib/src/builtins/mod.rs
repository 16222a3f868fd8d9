//! Built-in global functions, always present, plus the `usar`-loaded
//! module registry.

mod matematica;

use crate::error::TupaError;
use crate::scope::ScopeChain;
use crate::value::Value;
use std::rc::Rc;

macro_rules! native {
    ($name:expr, $f:expr) => {
        (String::from($name), Value::Native(Rc::new($f)))
    };
}

/// Installs the functions available without any `usar` into `scopes`'
/// global frame.
pub fn install(scopes: &mut ScopeChain) {
    for (name, value) in globals() {
        scopes.set(&name, value);
    }
}

fn globals() -> Vec<(String, Value)> {
    vec![
        native!("tamanho", |args: &[Value]| {
            let one = expect_one(args)?;
            match one {
                Value::Str(s) => Ok(Value::Integer(s.chars().count() as i64)),
                Value::List(items) => Ok(Value::Integer(items.borrow().len() as i64)),
                Value::Dict(entries) => Ok(Value::Integer(entries.borrow().len() as i64)),
                other => Err(TupaError::type_error(format!(
                    "'tamanho' não suporta '{}'",
                    other.type_name()
                ))),
            }
        }),
        native!("tipo", |args: &[Value]| {
            let one = expect_one(args)?;
            Ok(Value::Str(one.type_name().to_string()))
        }),
        native!("para_texto", |args: &[Value]| {
            let one = expect_one(args)?;
            Ok(Value::Str(one.to_canonical_text()))
        }),
        native!("para_numero", |args: &[Value]| {
            let one = expect_one(args)?;
            match one {
                Value::Integer(_) | Value::Real(_) => Ok(one.clone()),
                Value::Str(s) => {
                    let trimmed = s.trim();
                    // No `.` ⇒ must parse as an integer; a `.` ⇒ a real
                    // (spec.md §4.5), rather than trying one then the other.
                    if trimmed.contains('.') {
                        trimmed
                            .parse::<f64>()
                            .map(Value::Real)
                            .map_err(|_| TupaError::value(format!("'{s}' não é um número válido")))
                    } else {
                        trimmed
                            .parse::<i64>()
                            .map(Value::Integer)
                            .map_err(|_| TupaError::value(format!("'{s}' não é um número válido")))
                    }
                }
                other => Err(TupaError::type_error(format!(
                    "não é possível converter '{}' em número",
                    other.type_name()
                ))),
            }
        }),
        native!("para_lista", |args: &[Value]| {
            let one = expect_one(args)?;
            match one {
                Value::List(_) => Ok(one.clone()),
                Value::Str(s) => Ok(Value::list(
                    s.chars().map(|c| Value::Str(c.to_string())).collect(),
                )),
                Value::Dict(entries) => Ok(Value::list(
                    entries.borrow().iter().map(|(k, _)| k.clone()).collect(),
                )),
                other => Err(TupaError::type_error(format!(
                    "não é possível converter '{}' em lista",
                    other.type_name()
                ))),
            }
        }),
        native!("raiz", |args: &[Value]| matematica::sqrt(expect_one(args)?)),
    ]
}

fn expect_one(args: &[Value]) -> Result<&Value, TupaError> {
    args.first()
        .ok_or_else(|| TupaError::value("esperava 1 argumento, recebeu 0"))
}

/// Resolves a `usar <module>` statement to the bindings it exports.
pub fn load_module(name: &str) -> Result<Vec<(String, Value)>, TupaError> {
    match name {
        "matematica" => Ok(matematica::exports()),
        other => {
            log::debug!("usar: módulo '{other}' não está no registro de módulos");
            Err(TupaError::name(format!("módulo '{other}' não encontrado")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tamanho_counts_list_elements() {
        let f = globals()
            .into_iter()
            .find(|(name, _)| name == "tamanho")
            .unwrap()
            .1;
        let Value::Native(f) = f else { panic!("expected native fn") };
        let result = f(&[Value::list(vec![Value::Integer(1), Value::Integer(2)])]).unwrap();
        assert!(matches!(result, Value::Integer(2)));
    }

    #[test]
    fn para_numero_parses_real_literal_text() {
        let f = globals()
            .into_iter()
            .find(|(name, _)| name == "para_numero")
            .unwrap()
            .1;
        let Value::Native(f) = f else { panic!("expected native fn") };
        let result = f(&[Value::Str("3.5".to_string())]).unwrap();
        assert!(matches!(result, Value::Real(v) if v == 3.5));
    }

    #[test]
    fn para_numero_rejects_dotless_text_that_is_not_an_integer() {
        let f = globals()
            .into_iter()
            .find(|(name, _)| name == "para_numero")
            .unwrap()
            .1;
        let Value::Native(f) = f else { panic!("expected native fn") };
        // No '.' means the integer parser is the only one tried, even
        // though "1e10" is a valid f64 literal.
        assert!(f(&[Value::Str("1e10".to_string())]).is_err());
    }

    #[test]
    fn para_lista_converts_dict_keys() {
        let f = globals()
            .into_iter()
            .find(|(name, _)| name == "para_lista")
            .unwrap()
            .1;
        let Value::Native(f) = f else { panic!("expected native fn") };
        let dict = Value::dict(vec![(Value::Str("a".to_string()), Value::Integer(1))]);
        let result = f(&[dict]).unwrap();
        assert!(matches!(result, Value::List(items) if items.borrow().len() == 1));
    }

    #[test]
    fn unknown_module_is_name_error() {
        assert!(load_module("inexistente").is_err());
    }
}
