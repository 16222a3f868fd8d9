//! Tree-walking evaluator.
//!
//! One `Interpreter` owns the active scope chain; executing a call
//! temporarily swaps it for the callee's captured chain and restores the
//! caller's chain afterwards, so a function body only ever sees the names
//! visible at its own definition site plus its own parameters.

mod control;
mod ops;

pub use control::Signal;

use crate::ast::{
    BinaryOp, ClassDecl, Expr, FuncDecl, Literal, LogicalOp, Program, Stmt, UnaryOp, VarKind,
};
use crate::builtins;
use crate::error::TupaError;
use crate::scope::ScopeChain;
use crate::value::{ClassValue, FunctionValue, InstanceValue, Value};
use std::cell::RefCell;
use std::io::Write as _;
use std::rc::Rc;

pub struct Interpreter {
    scopes: ScopeChain,
}

impl Interpreter {
    pub fn new() -> Self {
        let mut scopes = ScopeChain::new();
        builtins::install(&mut scopes);
        Self { scopes }
    }

    pub fn exec_program(&mut self, program: &Program) -> Result<(), TupaError> {
        match self.exec_block(program)? {
            Signal::None => Ok(()),
            Signal::Return(_) => Ok(()),
        }
    }

    fn exec_block(&mut self, stmts: &[Stmt]) -> Result<Signal, TupaError> {
        for stmt in stmts {
            match self.exec_stmt(stmt)? {
                Signal::None => {}
                returned @ Signal::Return(_) => return Ok(returned),
            }
        }
        Ok(Signal::None)
    }

    fn exec_stmt(&mut self, stmt: &Stmt) -> Result<Signal, TupaError> {
        match stmt {
            Stmt::VarDecl { kind, name, value } => {
                let evaluated = self.eval_expr(value)?;
                let coerced = match kind {
                    VarKind::Plain => evaluated,
                    VarKind::Lista => match evaluated {
                        list @ Value::List(_) => list,
                        other => Value::list(vec![other]),
                    },
                    VarKind::Dicionario => match evaluated {
                        dict @ Value::Dict(_) => dict,
                        _ => Value::dict(Vec::new()),
                    },
                };
                self.scopes.set(name, coerced);
                Ok(Signal::None)
            }
            Stmt::Print(expr) => {
                let value = self.eval_expr(expr)?;
                println!("{}", value.to_canonical_text());
                Ok(Signal::None)
            }
            Stmt::Input { name } => {
                std::io::stdout().flush().ok();
                let mut line = String::new();
                std::io::stdin()
                    .read_line(&mut line)
                    .map_err(|e| TupaError::value(format!("falha ao ler entrada: {e}")))?;
                let text = line.trim_end_matches(['\n', '\r']).to_string();
                // Integer first, then real, else keep the raw text (§4.4).
                let value = if let Ok(i) = text.parse::<i64>() {
                    Value::Integer(i)
                } else if let Ok(r) = text.parse::<f64>() {
                    Value::Real(r)
                } else {
                    Value::Str(text)
                };
                self.scopes.set(name, value);
                Ok(Signal::None)
            }
            Stmt::If {
                condition,
                then_block,
                else_block,
            } => {
                // No frame of its own: an `if`/`senão` body runs in the
                // enclosing scope, so an assignment inside it is visible
                // after the block ends, not just a shadow that vanishes
                // with the branch.
                if self.eval_expr(condition)?.is_truthy() {
                    self.exec_block(then_block)
                } else {
                    self.exec_block(else_block)
                }
            }
            Stmt::While { condition, body } => {
                while self.eval_expr(condition)?.is_truthy() {
                    match self.exec_block(body)? {
                        Signal::None => {}
                        returned @ Signal::Return(_) => return Ok(returned),
                    }
                }
                Ok(Signal::None)
            }
            Stmt::ForRange {
                var,
                start,
                end,
                body,
            } => {
                let start = self.eval_expr(start)?;
                let end = self.eval_expr(end)?;
                let (mut current, limit) = match (&start, &end) {
                    (Value::Integer(a), Value::Integer(b)) => (*a, *b),
                    _ => {
                        return Err(TupaError::type_error(
                            "os limites de um laço 'para' devem ser inteiros",
                        ))
                    }
                };
                // One fresh frame for the whole loop, not one per iteration:
                // the loop variable and anything the body assigns land in
                // this frame (assignment always writes the innermost one),
                // and it is popped once the loop ends on any exit path —
                // normal completion, an early `devolver`, or a propagating
                // error. Names the body assigns that happen to match an
                // outer variable shadow it here rather than mutating it.
                self.scopes.push();
                let mut result = Ok(Signal::None);
                while current <= limit {
                    self.scopes.set(var, Value::Integer(current));
                    match self.exec_block(body) {
                        Ok(Signal::None) => {}
                        Ok(returned @ Signal::Return(_)) => {
                            result = Ok(returned);
                            break;
                        }
                        Err(e) => {
                            result = Err(e);
                            break;
                        }
                    }
                    current += 1;
                }
                self.scopes.pop();
                result
            }
            Stmt::ForEach {
                var,
                iterable,
                body,
            } => {
                let iterable = self.eval_expr(iterable)?;
                let items = match &iterable {
                    Value::List(items) => items.borrow().clone(),
                    Value::Dict(entries) => {
                        entries.borrow().iter().map(|(k, _)| k.clone()).collect()
                    }
                    Value::Str(s) => s.chars().map(|c| Value::Str(c.to_string())).collect(),
                    _ => {
                        return Err(TupaError::type_error(format!(
                            "não é possível iterar sobre '{}'",
                            iterable.type_name()
                        )))
                    }
                };
                // Same single-frame-for-the-whole-loop discipline as
                // `ForRange` above.
                self.scopes.push();
                let mut result = Ok(Signal::None);
                for item in items {
                    self.scopes.set(var, item);
                    match self.exec_block(body) {
                        Ok(Signal::None) => {}
                        Ok(returned @ Signal::Return(_)) => {
                            result = Ok(returned);
                            break;
                        }
                        Err(e) => {
                            result = Err(e);
                            break;
                        }
                    }
                }
                self.scopes.pop();
                result
            }
            Stmt::FuncDecl(decl) => {
                let function = self.make_function(decl);
                self.scopes.set(&decl.name, Value::Function(Rc::new(function)));
                Ok(Signal::None)
            }
            Stmt::Return(expr) => {
                let value = match expr {
                    Some(expr) => self.eval_expr(expr)?,
                    None => Value::Void,
                };
                Ok(Signal::Return(value))
            }
            Stmt::ClassDecl(decl) => {
                let class = self.make_class(decl);
                self.scopes.set(&decl.name, Value::Class(Rc::new(class)));
                Ok(Signal::None)
            }
            Stmt::TryCatch {
                try_block,
                catch_var,
                catch_block,
            } => match self.exec_block(try_block) {
                Ok(signal) => Ok(signal),
                Err(err) => {
                    // Fresh frame for the catch handler, popped on every
                    // exit path: the catch variable only shadows an outer
                    // name of the same spelling for the handler's duration,
                    // and a `criar` inside `catch_block` doesn't leak out.
                    self.scopes.push();
                    self.scopes.set(catch_var, Value::Str(err.catch_text()));
                    let result = self.exec_block(catch_block);
                    self.scopes.pop();
                    result
                }
            },
            Stmt::Use { module } => {
                let exports = builtins::load_module(module)?;
                for (name, value) in exports {
                    self.scopes.set(&name, value);
                }
                Ok(Signal::None)
            }
            Stmt::ExprStmt(expr) => {
                self.eval_expr(expr)?;
                Ok(Signal::None)
            }
        }
    }

    fn make_function(&self, decl: &FuncDecl) -> FunctionValue {
        FunctionValue {
            name: decl.name.clone(),
            params: decl.params.clone(),
            body: Rc::new(decl.body.clone()),
            closure: self.scopes.snapshot(),
        }
    }

    fn make_class(&self, decl: &ClassDecl) -> ClassValue {
        let methods = decl
            .methods
            .iter()
            .map(|m| (m.name.clone(), Rc::new(self.make_function(m))))
            .collect();
        ClassValue {
            name: decl.name.clone(),
            attr_inits: decl.attrs.clone(),
            methods,
            closure: self.scopes.snapshot(),
        }
    }

    fn eval_expr(&mut self, expr: &Expr) -> Result<Value, TupaError> {
        match expr {
            Expr::Literal(lit) => Ok(match lit {
                Literal::Int(n) => Value::Integer(*n),
                Literal::Real(r) => Value::Real(*r),
                Literal::Str(s) => Value::Str(s.clone()),
                Literal::Bool(b) => Value::Bool(*b),
            }),
            Expr::Variable { name, .. } => self.scopes.get(name),
            Expr::Group(inner) => self.eval_expr(inner),
            Expr::Unary {
                op,
                expr,
                line,
                column,
            } => {
                let value = self.eval_expr(expr)?;
                match op {
                    UnaryOp::Not => Ok(Value::Bool(!value.is_truthy())),
                    UnaryOp::Neg => match value {
                        Value::Integer(n) => Ok(Value::Integer(-n)),
                        Value::Real(r) => Ok(Value::Real(-r)),
                        other => Err(TupaError::type_error(format!(
                            "operador unário '-' não suporta '{}'",
                            other.type_name()
                        ))
                        .with_position(*line, *column)),
                    },
                }
            }
            Expr::Binary {
                op,
                left,
                right,
                line,
                column,
            } => {
                let l = self.eval_expr(left)?;
                let r = self.eval_expr(right)?;
                match op {
                    BinaryOp::Add => ops::add(&l, &r, *line, *column),
                    BinaryOp::Sub => ops::sub(&l, &r, *line, *column),
                    BinaryOp::Mul => ops::mul(&l, &r, *line, *column),
                    BinaryOp::Div => ops::div(&l, &r, *line, *column),
                    BinaryOp::Eq => Ok(ops::equal(&l, &r)),
                    BinaryOp::NotEq => Ok(ops::not_equal(&l, &r)),
                    BinaryOp::Lt => ops::less_than(&l, &r, *line, *column),
                    BinaryOp::LtEq => ops::less_or_equal(&l, &r, *line, *column),
                    BinaryOp::Gt => ops::greater_than(&l, &r, *line, *column),
                    BinaryOp::GtEq => ops::greater_or_equal(&l, &r, *line, *column),
                }
            }
            Expr::Logical { op, left, right } => {
                let l = self.eval_expr(left)?;
                match op {
                    LogicalOp::And => {
                        if !l.is_truthy() {
                            Ok(l)
                        } else {
                            self.eval_expr(right)
                        }
                    }
                    LogicalOp::Or => {
                        if l.is_truthy() {
                            Ok(l)
                        } else {
                            self.eval_expr(right)
                        }
                    }
                }
            }
            Expr::Assign { name, value, .. } => {
                let value = self.eval_expr(value)?;
                self.scopes.set(name, value.clone());
                Ok(value)
            }
            Expr::IndexAssign {
                target,
                index,
                value,
                line,
                column,
            } => {
                let target_value = self.eval_expr(target)?;
                let index_value = self.eval_expr(index)?;
                let value = self.eval_expr(value)?;
                match &target_value {
                    Value::List(items) => {
                        let idx = expect_index(&index_value, *line, *column)?;
                        let mut items = items.borrow_mut();
                        if idx >= items.len() {
                            return Err(TupaError::index("índice fora dos limites da lista")
                                .with_position(*line, *column));
                        }
                        items[idx] = value.clone();
                        Ok(value)
                    }
                    Value::Dict(entries) => {
                        let mut entries = entries.borrow_mut();
                        if let Some(entry) = entries
                            .iter_mut()
                            .find(|(k, _)| k.structural_eq(&index_value))
                        {
                            entry.1 = value.clone();
                        } else {
                            entries.push((index_value, value.clone()));
                        }
                        Ok(value)
                    }
                    other => Err(TupaError::type_error(format!(
                        "não é possível indexar '{}'",
                        other.type_name()
                    ))
                    .with_position(*line, *column)),
                }
            }
            Expr::AttrAssign {
                target,
                attr,
                value,
                line,
                column,
            } => {
                let target_value = self.eval_expr(target)?;
                let value = self.eval_expr(value)?;
                match &target_value {
                    Value::Instance(instance) => {
                        instance.borrow_mut().set_attr(attr, value.clone());
                        Ok(value)
                    }
                    other => Err(TupaError::attr(format!(
                        "'{}' não possui atributos",
                        other.type_name()
                    ))
                    .with_position(*line, *column)),
                }
            }
            Expr::Call {
                callee,
                args,
                line,
                column,
            } => {
                let callee_value = self.eval_expr(callee)?;
                let mut arg_values = Vec::with_capacity(args.len());
                for arg in args {
                    arg_values.push(self.eval_expr(arg)?);
                }
                self.call_value(callee_value, arg_values, *line, *column)
            }
            Expr::Index {
                target,
                index,
                line,
                column,
            } => {
                let target_value = self.eval_expr(target)?;
                let index_value = self.eval_expr(index)?;
                match &target_value {
                    Value::List(items) => {
                        let idx = expect_index(&index_value, *line, *column)?;
                        items
                            .borrow()
                            .get(idx)
                            .cloned()
                            .ok_or_else(|| {
                                TupaError::index("índice fora dos limites da lista")
                                    .with_position(*line, *column)
                            })
                    }
                    Value::Dict(entries) => entries
                        .borrow()
                        .iter()
                        .find(|(k, _)| k.structural_eq(&index_value))
                        .map(|(_, v)| v.clone())
                        .ok_or_else(|| {
                            TupaError::index("chave não encontrada no dicionário")
                                .with_position(*line, *column)
                        }),
                    Value::Str(s) => {
                        let idx = expect_index(&index_value, *line, *column)?;
                        s.chars()
                            .nth(idx)
                            .map(|c| Value::Str(c.to_string()))
                            .ok_or_else(|| {
                                TupaError::index("índice fora dos limites do texto")
                                    .with_position(*line, *column)
                            })
                    }
                    other => Err(TupaError::type_error(format!(
                        "não é possível indexar '{}'",
                        other.type_name()
                    ))
                    .with_position(*line, *column)),
                }
            }
            Expr::Attr {
                target,
                attr,
                line,
                column,
            } => {
                let target_value = self.eval_expr(target)?;
                match &target_value {
                    Value::Instance(instance) => {
                        if let Some(value) = instance.borrow().get_attr(attr) {
                            return Ok(value);
                        }
                        let class = instance.borrow().class.clone();
                        if let Some(method) = class.find_method(attr) {
                            return Ok(Value::BoundMethod {
                                instance: instance.clone(),
                                method,
                            });
                        }
                        Err(TupaError::attr(format!(
                            "'{}' não possui o atributo '{attr}'",
                            class.name
                        ))
                        .with_position(*line, *column))
                    }
                    other => Err(TupaError::attr(format!(
                        "'{}' não possui o atributo '{attr}'",
                        other.type_name()
                    ))
                    .with_position(*line, *column)),
                }
            }
            Expr::ListLit(items) => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    values.push(self.eval_expr(item)?);
                }
                Ok(Value::list(values))
            }
            Expr::DictLit(entries) => {
                let mut values: Vec<(Value, Value)> = Vec::with_capacity(entries.len());
                for (key, value) in entries {
                    let key = self.eval_expr(key)?;
                    let value = self.eval_expr(value)?;
                    // Duplicate keys overwrite rather than append (§4.4).
                    match values.iter_mut().find(|(k, _)| k.structural_eq(&key)) {
                        Some(entry) => entry.1 = value,
                        None => values.push((key, value)),
                    }
                }
                Ok(Value::dict(values))
            }
        }
    }

    fn call_value(
        &mut self,
        callee: Value,
        args: Vec<Value>,
        line: usize,
        column: usize,
    ) -> Result<Value, TupaError> {
        match callee {
            Value::Function(f) => self.call_function(&f, args),
            Value::Native(f) => f(&args),
            Value::BoundMethod { instance, method } => {
                self.call_bound_method(instance, &method, args)
            }
            Value::Class(class) => self.construct_instance(&class, args),
            other => Err(TupaError::type_error(format!(
                "'{}' não é chamável",
                other.type_name()
            ))
            .with_position(line, column)),
        }
    }

    /// Swaps the active chain for the function's captured chain, pushes a
    /// fresh call frame, binds parameters positionally (missing arguments
    /// bind to `Value::Void`), runs the body, then restores the caller's
    /// chain regardless of how the body finished.
    fn call_function(&mut self, f: &FunctionValue, args: Vec<Value>) -> Result<Value, TupaError> {
        let caller_chain = std::mem::replace(&mut self.scopes, f.closure.snapshot());
        self.scopes.push();
        for (i, param) in f.params.iter().enumerate() {
            let value = args.get(i).cloned().unwrap_or(Value::Void);
            self.scopes.set(param, value);
        }
        let result = self.exec_block(&f.body);
        self.scopes = caller_chain;
        match result? {
            Signal::Return(value) => Ok(value),
            Signal::None => Ok(Value::Void),
        }
    }

    fn call_bound_method(
        &mut self,
        instance: Rc<RefCell<InstanceValue>>,
        method: &FunctionValue,
        args: Vec<Value>,
    ) -> Result<Value, TupaError> {
        let caller_chain = std::mem::replace(&mut self.scopes, method.closure.snapshot());
        self.scopes.push();
        self.scopes.set("self", Value::Instance(instance));
        for (i, param) in method.params.iter().enumerate() {
            let value = args.get(i).cloned().unwrap_or(Value::Void);
            self.scopes.set(param, value);
        }
        let result = self.exec_block(&method.body);
        self.scopes = caller_chain;
        match result? {
            Signal::Return(value) => Ok(value),
            Signal::None => Ok(Value::Void),
        }
    }

    /// Attribute initializers run in the caller's current scope (so they
    /// can reference names visible at the construction call site), not in
    /// the class's own closure; there is no user-defined constructor.
    fn construct_instance(&mut self, class: &Rc<ClassValue>, _args: Vec<Value>) -> Result<Value, TupaError> {
        let mut attrs = Vec::with_capacity(class.attr_inits.len());
        for (name, init) in &class.attr_inits {
            let value = self.eval_expr(init)?;
            attrs.push((name.clone(), value));
        }
        Ok(Value::Instance(Rc::new(RefCell::new(InstanceValue {
            class: class.clone(),
            attrs,
        }))))
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

fn expect_index(value: &Value, line: usize, column: usize) -> Result<usize, TupaError> {
    match value {
        Value::Integer(n) if *n >= 0 => Ok(*n as usize),
        _ => Err(TupaError::index("o índice deve ser um inteiro não negativo")
            .with_position(line, column)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use crate::parser::Parser;

    fn run(src: &str) -> Interpreter {
        let tokens = Lexer::tokenize(src).expect("lex");
        let program = Parser::parse(tokens).expect("parse");
        let mut interp = Interpreter::new();
        interp.exec_program(&program).expect("exec");
        interp
    }

    #[test]
    fn arithmetic_promotes_to_real_on_division() {
        let mut interp = run("criar x = 7 / 2");
        assert!(matches!(interp.scopes.get("x"), Ok(Value::Real(v)) if v == 3.5));
    }

    #[test]
    fn if_else_picks_the_right_branch() {
        let mut interp = run(
            "criar x = 0\nse falso então\nx = 1\nsenão\nx = 2\nfim",
        );
        assert!(matches!(interp.scopes.get("x"), Ok(Value::Integer(2))));
    }

    #[test]
    fn function_call_returns_value_and_restores_caller_scope() {
        let mut interp = run(
            "função dobro(n)\ndevolver n * 2\nfim\ncriar x = dobro(21)",
        );
        assert!(matches!(interp.scopes.get("x"), Ok(Value::Integer(42))));
        assert!(interp.scopes.get("n").is_err());
    }

    #[test]
    fn closures_capture_their_defining_scope() {
        let mut interp = run(
            "criar base = 10\nfunção soma(n)\ndevolver n + base\nfim\ncriar x = soma(5)",
        );
        assert!(matches!(interp.scopes.get("x"), Ok(Value::Integer(15))));
    }

    #[test]
    fn for_range_pops_its_frame_on_exit() {
        let mut interp = run("criar total = 0\npara i de 1 até 3 fazer\ntotal = i\nfim");
        // the loop variable and anything its body assigns live in the
        // loop's own frame, popped once the loop ends — so both "i" and
        // the shadowed "total" are gone again afterward, while the outer
        // "total" declared before the loop keeps its original value.
        assert!(matches!(interp.scopes.get("total"), Ok(Value::Integer(0))));
        assert!(interp.scopes.get("i").is_err());
    }

    #[test]
    fn for_each_iterates_dict_keys_and_string_chars() {
        run("criar d = {\"a\": 1, \"b\": 2}\npara k em d fazer\nmostrar k\nfim");
        run("para c em \"ab\" fazer\nmostrar c\nfim");
    }

    #[test]
    fn try_catch_binds_the_error_message() {
        // `registros` is a shared list, so writing through it from inside
        // the catch block is visible afterward regardless of the catch
        // frame being popped — unlike a plain reassignment, which only
        // ever touches the catch's own frame (see the test below).
        let mut interp = run(
            "criar registros = [0]\ntentar\ncriar x = 1 / indefinida\npegar e\nregistros[0] = tamanho(e)\nfim",
        );
        let registros = interp.scopes.get("registros").unwrap();
        if let Value::List(items) = registros {
            assert!(matches!(items.borrow()[0], Value::Integer(n) if n > 0));
        } else {
            panic!("expected a list");
        }
    }

    #[test]
    fn try_catch_pops_its_frame_on_exit() {
        // The catch variable and anything the catch block declares live in
        // the handler's own frame, popped once it finishes (spec.md §4.4,
        // §3 Invariants) — so "e" and "msg" are both gone again afterward.
        let mut interp = run(
            "tentar\ncriar x = 1 / indefinida\npegar e\ncriar msg = e\nfim",
        );
        assert!(interp.scopes.get("e").is_err());
        assert!(interp.scopes.get("msg").is_err());
    }

    #[test]
    fn class_instances_carry_independent_attrs() {
        let mut interp = run(
            "classe Ponto\ncriar x = 0\nfim\ncriar a = Ponto()\na.x = 5\ncriar b = Ponto()",
        );
        let a = interp.scopes.get("a").unwrap();
        let b = interp.scopes.get("b").unwrap();
        if let (Value::Instance(a), Value::Instance(b)) = (a, b) {
            assert!(matches!(a.borrow().get_attr("x"), Some(Value::Integer(5))));
            assert!(matches!(b.borrow().get_attr("x"), Some(Value::Integer(0))));
        } else {
            panic!("expected instances");
        }
    }

    #[test]
    fn bound_methods_see_self() {
        let mut interp = run(
            "classe Contador\ncriar valor = 0\nfunção incrementar()\nself.valor = self.valor + 1\nfim\nfim\ncriar c = Contador()\nc.incrementar()\nc.incrementar()",
        );
        let c = interp.scopes.get("c").unwrap();
        if let Value::Instance(inst) = c {
            assert!(matches!(inst.borrow().get_attr("valor"), Some(Value::Integer(2))));
        } else {
            panic!("expected instance");
        }
    }

    #[test]
    fn dict_literal_duplicate_keys_overwrite() {
        let mut interp = run("criar d = {\"a\": 1, \"a\": 2}");
        let d = interp.scopes.get("d").unwrap();
        if let Value::Dict(entries) = d {
            let entries = entries.borrow();
            assert_eq!(entries.len(), 1);
            assert!(matches!(entries[0].1, Value::Integer(2)));
        } else {
            panic!("expected a dict");
        }
    }
}
