//! The runtime value domain.
//!
//! `List` and `Dict` are shared, mutable, reference-counted containers
//! (`Rc<RefCell<_>>`) so that aliasing the same list/dict through two
//! variable bindings observes mutation through either handle, the way the
//! teacher's scope stack shares `Rc`-backed scope frames between a
//! function value and its call sites.

use crate::ast::Stmt;
use crate::error::TupaError;
use crate::scope::ScopeChain;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

pub type NativeFn = dyn Fn(&[Value]) -> Result<Value, TupaError>;

#[derive(Clone)]
pub struct FunctionValue {
    pub name: String,
    pub params: Vec<String>,
    pub body: Rc<Vec<Stmt>>,
    /// Scope chain snapshot captured at definition time (lexical closure).
    pub closure: ScopeChain,
}

pub struct ClassValue {
    pub name: String,
    pub attr_inits: Vec<(String, crate::ast::Expr)>,
    pub methods: Vec<(String, Rc<FunctionValue>)>,
    /// Scope chain active when `classe` was declared; attribute
    /// initializers run against it at instance-construction time.
    pub closure: ScopeChain,
}

impl ClassValue {
    pub fn find_method(&self, name: &str) -> Option<Rc<FunctionValue>> {
        self.methods
            .iter()
            .find(|(method_name, _)| method_name == name)
            .map(|(_, f)| f.clone())
    }
}

pub struct InstanceValue {
    pub class: Rc<ClassValue>,
    pub attrs: Vec<(String, Value)>,
}

impl InstanceValue {
    pub fn get_attr(&self, name: &str) -> Option<Value> {
        self.attrs
            .iter()
            .find(|(attr_name, _)| attr_name == name)
            .map(|(_, v)| v.clone())
    }

    pub fn set_attr(&mut self, name: &str, value: Value) {
        if let Some(entry) = self.attrs.iter_mut().find(|(n, _)| n == name) {
            entry.1 = value;
        } else {
            self.attrs.push((name.to_string(), value));
        }
    }
}

#[derive(Clone)]
pub enum Value {
    /// Internal absent-value sentinel: bound to a missing positional
    /// parameter and returned by a call whose `devolver` never ran. Not
    /// reachable through any literal in the grammar — see DESIGN.md for
    /// why this was added.
    Void,
    Integer(i64),
    Real(f64),
    Str(String),
    Bool(bool),
    List(Rc<RefCell<Vec<Value>>>),
    /// A linear, insertion-ordered association list rather than a hash map:
    /// keys are arbitrary `Value`s (including floats), which don't have a
    /// natural `Hash` impl compatible with the cross-type structural
    /// equality rules below.
    Dict(Rc<RefCell<Vec<(Value, Value)>>>),
    Function(Rc<FunctionValue>),
    Class(Rc<ClassValue>),
    Instance(Rc<RefCell<InstanceValue>>),
    /// A method resolved off an instance's class, with `self` already bound.
    BoundMethod {
        instance: Rc<RefCell<InstanceValue>>,
        method: Rc<FunctionValue>,
    },
    Native(Rc<NativeFn>),
}

impl Value {
    pub fn list(items: Vec<Value>) -> Value {
        Value::List(Rc::new(RefCell::new(items)))
    }

    pub fn dict(entries: Vec<(Value, Value)>) -> Value {
        Value::Dict(Rc::new(RefCell::new(entries)))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Void => "nulo",
            Value::Integer(_) => "inteiro",
            Value::Real(_) => "real",
            Value::Str(_) => "texto",
            Value::Bool(_) => "booleano",
            Value::List(_) => "lista",
            Value::Dict(_) => "dicionário",
            Value::Function(_) | Value::Native(_) | Value::BoundMethod { .. } => "função",
            Value::Class(_) => "classe",
            Value::Instance(_) => "instância",
        }
    }

    /// Falsy: `falso`, `0`, `0.0`, and empty string/list/dict. Everything
    /// else, including every callable and every instance, is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Void => false,
            Value::Bool(b) => *b,
            Value::Integer(n) => *n != 0,
            Value::Real(r) => *r != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::List(items) => !items.borrow().is_empty(),
            Value::Dict(entries) => !entries.borrow().is_empty(),
            Value::Function(_)
            | Value::Class(_)
            | Value::Instance(_)
            | Value::BoundMethod { .. }
            | Value::Native(_) => true,
        }
    }

    /// The canonical text form used by `mostrar` and `para_texto`.
    pub fn to_canonical_text(&self) -> String {
        match self {
            Value::Void => "nulo".to_string(),
            Value::Integer(n) => n.to_string(),
            Value::Real(r) => r.to_string(),
            Value::Str(s) => s.clone(),
            Value::Bool(true) => "True".to_string(),
            Value::Bool(false) => "False".to_string(),
            Value::List(items) => {
                let inner = items
                    .borrow()
                    .iter()
                    .map(|v| v.to_display_text())
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("[{inner}]")
            }
            Value::Dict(entries) => {
                let inner = entries
                    .borrow()
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k.to_display_text(), v.to_display_text()))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{{{inner}}}")
            }
            Value::Function(f) => format!("<função {}>", f.name),
            Value::Native(_) => "<função nativa>".to_string(),
            Value::BoundMethod { method, .. } => format!("<método {}>", method.name),
            Value::Class(c) => format!("<classe {}>", c.name),
            Value::Instance(inst) => format!("<instância de {}>", inst.borrow().class.name),
        }
    }

    /// Same as `to_canonical_text`, except strings are quoted — used when a
    /// string is nested inside a list/dict's own canonical text.
    fn to_display_text(&self) -> String {
        match self {
            Value::Str(s) => format!("\"{s}\""),
            other => other.to_canonical_text(),
        }
    }

    pub fn structural_eq(&self, other: &Value) -> bool {
        use Value::*;
        match (self, other) {
            (Void, Void) => true,
            (Integer(a), Integer(b)) => a == b,
            (Real(a), Real(b)) => a == b,
            (Integer(a), Real(b)) | (Real(b), Integer(a)) => (*a as f64) == *b,
            (Str(a), Str(b)) => a == b,
            (Bool(a), Bool(b)) => a == b,
            (List(a), List(b)) => {
                let a = a.borrow();
                let b = b.borrow();
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.structural_eq(y))
            }
            (Dict(a), Dict(b)) => {
                let a = a.borrow();
                let b = b.borrow();
                a.len() == b.len()
                    && a.iter().all(|(k, v)| {
                        b.iter().any(|(k2, v2)| k.structural_eq(k2) && v.structural_eq(v2))
                    })
            }
            (Instance(a), Instance(b)) => Rc::ptr_eq(a, b),
            (Class(a), Class(b)) => Rc::ptr_eq(a, b),
            (Function(a), Function(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value({})", self.to_canonical_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn canonical_text_matches_reference_booleans() {
        assert_eq!(Value::Bool(true).to_canonical_text(), "True");
        assert_eq!(Value::Bool(false).to_canonical_text(), "False");
    }

    #[test]
    fn canonical_text_of_nested_list_quotes_strings() {
        let list = Value::list(vec![Value::Integer(1), Value::Str("a".to_string())]);
        assert_eq!(list.to_canonical_text(), "[1, \"a\"]");
    }

    #[test]
    fn structural_eq_crosses_integer_and_real() {
        assert!(Value::Integer(2).structural_eq(&Value::Real(2.0)));
        assert!(!Value::Integer(2).structural_eq(&Value::Real(2.1)));
    }

    #[test]
    fn division_by_integers_is_always_real_via_promotion_helper() {
        assert_eq!(Value::Integer(7).type_name(), "inteiro");
        assert_eq!(Value::Real(7.0).type_name(), "real");
    }
}
