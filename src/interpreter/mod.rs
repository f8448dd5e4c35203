//! Tree-walking evaluator: executes a resolved statement list for its side effects.
mod error;

pub use self::error::RuntimeError;

use std::{io::Write, rc::Rc};

use log::debug;

use crate::ast::{
    BinaryExpr, ClassStmt, Expr, ExprId, FunctionStmt, LiteralValue, LogicalExpr, Stmt, UnaryExpr,
};
use crate::environment::Environment;
use crate::resolver::Locals;
use crate::token::{Token, TokenKind};
use crate::value::{Callable, Instance, LoxClass, LoxFunction, NativeFunction, Value};

/// Internal control-flow signal threaded out of statement execution. Distinct from
/// [`RuntimeError`] so a non-local `return` can never be mistaken for a user-visible failure; it
/// is caught at the function-call boundary in [`Interpreter::call_function`] and nowhere else.
enum Unwind {
    Error(RuntimeError),
    Return(Value),
}

impl From<RuntimeError> for Unwind {
    fn from(e: RuntimeError) -> Self {
        Unwind::Error(e)
    }
}

type EvalResult = Result<Value, RuntimeError>;
type ExecResult = Result<(), Unwind>;

/// Generalizes this codebase's `Interpreter` (a `run_statement`/`run_expression`/
/// `run_fn_call`-dispatching walk over a `Scope` stack) to the closures, classes, and bound
/// methods a class-based language needs; `environment` is threaded as a parameter through every
/// recursive call rather than mutated in place, so the caller's scope is restored on every exit
/// path (normal, return, or error) simply by virtue of never having been changed.
pub struct Interpreter<W: Write> {
    globals: Environment,
    locals: Locals,
    out: W,
}

impl<W: Write> Interpreter<W> {
    pub fn new(locals: Locals, out: W) -> Self {
        let globals = Environment::new_global();
        globals.define(
            "clock",
            Value::Callable(Callable::Native(NativeFunction {
                name: "clock",
                arity: 0,
                implementation: native_clock,
            })),
        );
        Self { globals, locals, out }
    }

    pub fn interpret(&mut self, statements: &[Stmt]) -> Result<(), RuntimeError> {
        let env = self.globals.clone();
        for stmt in statements {
            match self.execute(stmt, &env) {
                Ok(()) => {}
                Err(Unwind::Error(e)) => return Err(e),
                Err(Unwind::Return(_)) => unreachable!("resolver rejects top-level return before evaluation starts"),
            }
        }
        debug!("interpreter finished");
        Ok(())
    }

    // --- statements -----------------------------------------------------

    fn execute(&mut self, stmt: &Stmt, env: &Environment) -> ExecResult {
        match stmt {
            Stmt::Expression(s) => {
                self.evaluate(&s.expr, env)?;
                Ok(())
            }
            Stmt::Print(s) => {
                let value = self.evaluate(&s.expr, env)?;
                writeln!(self.out, "{value}").expect("the configured output sink should accept writes");
                Ok(())
            }
            Stmt::Var(s) => {
                let value = match &s.initializer {
                    Some(initializer) => self.evaluate(initializer, env)?,
                    None => Value::Nil,
                };
                env.define(s.name.lexeme.clone(), value);
                Ok(())
            }
            Stmt::Block(s) => self.execute_block(&s.statements, Environment::new_enclosed(env)),
            Stmt::If(s) => {
                if self.evaluate(&s.condition, env)?.is_truthy() {
                    self.execute(&s.then_branch, env)
                } else if let Some(else_branch) = &s.else_branch {
                    self.execute(else_branch, env)
                } else {
                    Ok(())
                }
            }
            Stmt::While(s) => {
                while self.evaluate(&s.condition, env)?.is_truthy() {
                    self.execute(&s.body, env)?;
                }
                Ok(())
            }
            Stmt::Function(f) => {
                self.execute_function_decl(f, env);
                Ok(())
            }
            Stmt::Return(s) => {
                let value = match &s.value {
                    Some(expr) => self.evaluate(expr, env)?,
                    None => Value::Nil,
                };
                Err(Unwind::Return(value))
            }
            Stmt::Class(c) => self.execute_class(c, env),
        }
    }

    fn execute_block(&mut self, statements: &[Stmt], env: Environment) -> ExecResult {
        for stmt in statements {
            self.execute(stmt, &env)?;
        }
        Ok(())
    }

    fn execute_function_decl(&mut self, f: &FunctionStmt, env: &Environment) {
        let function = LoxFunction::new(Rc::new(f.clone()), env.clone(), false);
        env.define(f.name.lexeme.clone(), Value::Callable(Callable::Function(function)));
    }

    fn execute_class(&mut self, c: &ClassStmt, env: &Environment) -> ExecResult {
        let superclass = match &c.superclass {
            Some(super_ref) => {
                let value = self.lookup_var(super_ref.id, &super_ref.name, env)?;
                match value {
                    Value::Callable(Callable::Class(class)) => Some(class),
                    _ => return Err(RuntimeError::new(&super_ref.name, "Superclass must be a class.").into()),
                }
            }
            None => None,
        };

        env.define(c.name.lexeme.clone(), Value::Nil);

        let method_env = match &superclass {
            Some(superclass) => {
                let scope = Environment::new_enclosed(env);
                scope.define("super", Value::Callable(Callable::Class(superclass.clone())));
                scope
            }
            None => env.clone(),
        };

        let methods = c
            .methods
            .iter()
            .map(|method| {
                let is_initializer = method.name.lexeme == "init";
                let function = LoxFunction::new(Rc::new(method.clone()), method_env.clone(), is_initializer);
                (method.name.lexeme.clone(), function)
            })
            .collect();

        let class = LoxClass::new(c.name.lexeme.clone(), superclass, methods);
        env.assign(&c.name.lexeme, Value::Callable(Callable::Class(class)))
            .expect("class name was just defined in this frame");
        Ok(())
    }

    // --- expressions ------------------------------------------------------

    fn evaluate(&mut self, expr: &Expr, env: &Environment) -> EvalResult {
        match expr {
            Expr::Literal(e) => Ok(literal_value(&e.value)),
            Expr::Grouping(e) => self.evaluate(&e.inner, env),
            Expr::Unary(e) => self.evaluate_unary(e, env),
            Expr::Binary(e) => self.evaluate_binary(e, env),
            Expr::Logical(e) => self.evaluate_logical(e, env),
            Expr::Var(e) => self.lookup_var(e.id, &e.name, env),
            Expr::Assign(e) => {
                let value = self.evaluate(&e.value, env)?;
                self.assign_var(e.id, &e.name, value.clone(), env)?;
                Ok(value)
            }
            Expr::Call(e) => {
                let callee = self.evaluate(&e.callee, env)?;
                let mut args = Vec::with_capacity(e.args.len());
                for arg in &e.args {
                    args.push(self.evaluate(arg, env)?);
                }
                self.call_value(callee, args, &e.paren)
            }
            Expr::Get(e) => {
                let object = self.evaluate(&e.object, env)?;
                match object {
                    Value::Instance(instance) => self.get_property(&instance, &e.name),
                    _ => Err(RuntimeError::new(&e.name, "Only instances have properties.")),
                }
            }
            Expr::Set(e) => {
                let object = self.evaluate(&e.object, env)?;
                let Value::Instance(instance) = object else {
                    return Err(RuntimeError::new(&e.name, "Only instances have fields."));
                };
                let value = self.evaluate(&e.value, env)?;
                instance.set(&e.name.lexeme, value.clone());
                Ok(value)
            }
            Expr::This(e) => self.lookup_var(e.id, &e.keyword, env),
            Expr::Super(e) => self.evaluate_super(e.id, &e.method, env),
        }
    }

    fn evaluate_unary(&mut self, e: &UnaryExpr, env: &Environment) -> EvalResult {
        let right = self.evaluate(&e.right, env)?;
        match e.operator.kind {
            TokenKind::Minus => match right {
                Value::Number(n) => Ok(Value::Number(-n)),
                _ => Err(RuntimeError::new(&e.operator, "Operand must be a number.")),
            },
            TokenKind::Bang => Ok(Value::Bool(!right.is_truthy())),
            _ => unreachable!("parser only produces '!' and '-' as unary operators"),
        }
    }

    fn evaluate_binary(&mut self, e: &BinaryExpr, env: &Environment) -> EvalResult {
        let left = self.evaluate(&e.left, env)?;
        let right = self.evaluate(&e.right, env)?;
        let op = &e.operator;

        match op.kind {
            TokenKind::Plus => match (left, right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
                (Value::Str(a), Value::Str(b)) => Ok(Value::Str(a + &b)),
                _ => Err(RuntimeError::new(op, "Operands must be two numbers or two strings.")),
            },
            TokenKind::Minus => numeric_op(op, left, right, |a, b| a - b),
            TokenKind::Star => numeric_op(op, left, right, |a, b| a * b),
            TokenKind::Slash => numeric_op(op, left, right, |a, b| a / b),
            TokenKind::Greater => numeric_cmp(op, left, right, |a, b| a > b),
            TokenKind::GreaterEqual => numeric_cmp(op, left, right, |a, b| a >= b),
            TokenKind::Less => numeric_cmp(op, left, right, |a, b| a < b),
            TokenKind::LessEqual => numeric_cmp(op, left, right, |a, b| a <= b),
            TokenKind::EqualEqual => Ok(Value::Bool(left == right)),
            TokenKind::BangEqual => Ok(Value::Bool(left != right)),
            _ => unreachable!("parser only produces the above kinds as binary operators"),
        }
    }

    fn evaluate_logical(&mut self, e: &LogicalExpr, env: &Environment) -> EvalResult {
        let left = self.evaluate(&e.left, env)?;
        match e.operator.kind {
            TokenKind::Or if left.is_truthy() => Ok(left),
            TokenKind::Or => self.evaluate(&e.right, env),
            TokenKind::And if !left.is_truthy() => Ok(left),
            TokenKind::And => self.evaluate(&e.right, env),
            _ => unreachable!("parser only produces 'and'/'or' as logical operators"),
        }
    }

    fn evaluate_super(&mut self, id: ExprId, method: &Token, env: &Environment) -> EvalResult {
        let distance = *self
            .locals
            .get(&id)
            .expect("resolver always records a distance for 'super'");
        let Value::Callable(Callable::Class(superclass)) = env.get_at(distance, "super") else {
            unreachable!("'super' is only ever bound to a class");
        };
        let Value::Instance(instance) = env.get_at(distance - 1, "this") else {
            unreachable!("'this' is always bound one frame inside the matching 'super' frame");
        };

        superclass
            .find_method(&method.lexeme)
            .map(|m| Value::Callable(Callable::Function(m.bind(&instance))))
            .ok_or_else(|| RuntimeError::new(method, format!("Undefined property '{}'.", method.lexeme)))
    }

    fn get_property(&mut self, instance: &Instance, name: &Token) -> EvalResult {
        if let Some(value) = instance.get_field(&name.lexeme) {
            return Ok(value);
        }
        if let Some(method) = instance.class().find_method(&name.lexeme) {
            return Ok(Value::Callable(Callable::Function(method.bind(instance))));
        }
        Err(RuntimeError::new(name, format!("Undefined property '{}'.", name.lexeme)))
    }

    fn lookup_var(&self, id: ExprId, name: &Token, env: &Environment) -> EvalResult {
        match self.locals.get(&id) {
            Some(&distance) => Ok(env.get_at(distance, &name.lexeme)),
            None => self
                .globals
                .get(&name.lexeme)
                .map_err(|_| RuntimeError::new(name, format!("Undefined variable '{}'.", name.lexeme))),
        }
    }

    fn assign_var(&self, id: ExprId, name: &Token, value: Value, env: &Environment) -> Result<(), RuntimeError> {
        match self.locals.get(&id) {
            Some(&distance) => {
                env.assign_at(distance, &name.lexeme, value);
                Ok(())
            }
            None => self
                .globals
                .assign(&name.lexeme, value)
                .map_err(|_| RuntimeError::new(name, format!("Undefined variable '{}'.", name.lexeme))),
        }
    }

    // --- calling ------------------------------------------------------------

    fn call_value(&mut self, callee: Value, args: Vec<Value>, paren: &Token) -> EvalResult {
        let Value::Callable(callable) = callee else {
            return Err(RuntimeError::new(paren, "Can only call functions and classes."));
        };

        if args.len() != callable.arity() {
            return Err(RuntimeError::new(
                paren,
                format!("Expected {} arguments but got {}.", callable.arity(), args.len()),
            ));
        }

        match callable {
            Callable::Native(native) => Ok((native.implementation)(&args)),
            Callable::Function(func) => self.call_function(&func, args),
            Callable::Class(class) => self.instantiate(&class, args),
        }
    }

    fn call_function(&mut self, func: &LoxFunction, args: Vec<Value>) -> EvalResult {
        let env = Environment::new_enclosed(&func.closure);
        for (param, arg) in func.declaration.params.iter().zip(args) {
            env.define(param.lexeme.clone(), arg);
        }

        match self.execute_block(&func.declaration.body, env) {
            Ok(()) if func.is_initializer => Ok(func.closure.get_at(0, "this")),
            Ok(()) => Ok(Value::Nil),
            Err(Unwind::Return(_)) if func.is_initializer => Ok(func.closure.get_at(0, "this")),
            Err(Unwind::Return(value)) => Ok(value),
            Err(Unwind::Error(e)) => Err(e),
        }
    }

    fn instantiate(&mut self, class: &LoxClass, args: Vec<Value>) -> EvalResult {
        let instance = Instance::new(class.clone());
        if let Some(initializer) = class.find_method("init") {
            self.call_function(&initializer.bind(&instance), args)?;
        }
        Ok(Value::Instance(instance))
    }
}

fn literal_value(value: &LiteralValue) -> Value {
    match value {
        LiteralValue::Number(n) => Value::Number(*n),
        LiteralValue::Str(s) => Value::Str(s.clone()),
        LiteralValue::Bool(b) => Value::Bool(*b),
        LiteralValue::Nil => Value::Nil,
    }
}

fn numeric_op(op: &Token, left: Value, right: Value, f: impl Fn(f64, f64) -> f64) -> EvalResult {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(f(a, b))),
        _ => Err(RuntimeError::new(op, "Operands must be numbers.")),
    }
}

fn numeric_cmp(op: &Token, left: Value, right: Value, f: impl Fn(f64, f64) -> bool) -> EvalResult {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Bool(f(a, b))),
        _ => Err(RuntimeError::new(op, "Operands must be numbers.")),
    }
}

fn native_clock(_args: &[Value]) -> Value {
    let millis = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("system clock should be after the unix epoch")
        .as_millis();
    Value::Number(millis as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use crate::parser::Parser;
    use crate::resolver::Resolver;
    use std::rc::Rc;

    fn run(src: &str) -> String {
        let source: Rc<str> = Rc::from(src);
        let tokens = Lexer::new(src).lex().expect("lex should succeed");
        let statements = Parser::new(tokens, source.clone()).parse().expect("parse should succeed");
        let locals = Resolver::new(source).resolve(&statements).expect("resolve should succeed");

        let mut out = Vec::new();
        let mut interpreter = Interpreter::new(locals, &mut out);
        interpreter.interpret(&statements).expect("interpret should succeed");
        String::from_utf8(out).expect("interpreter only writes utf8")
    }

    fn run_err(src: &str) -> RuntimeError {
        let source: Rc<str> = Rc::from(src);
        let tokens = Lexer::new(src).lex().expect("lex should succeed");
        let statements = Parser::new(tokens, source.clone()).parse().expect("parse should succeed");
        let locals = Resolver::new(source).resolve(&statements).expect("resolve should succeed");

        let mut out = Vec::new();
        let mut interpreter = Interpreter::new(locals, &mut out);
        interpreter.interpret(&statements).expect_err("interpret should fail")
    }

    #[test]
    fn arithmetic_precedence() {
        assert_eq!(run("print 1 + 2 * 3;"), "7\n");
    }

    #[test]
    fn counter_closure_keeps_private_state() {
        let src = "fun make() { var i = 0; fun inc() { i = i + 1; return i; } return inc; }\n\
                    var c = make(); print c(); print c(); print c();";
        assert_eq!(run(src), "1\n2\n3\n");
    }

    #[test]
    fn static_resolution_captures_binding_at_definition_time() {
        let src = "var a = \"global\";\n\
                    { fun show() { print a; } show(); var a = \"local\"; show(); }";
        assert_eq!(run(src), "global\nglobal\n");
    }

    #[test]
    fn inheritance_dispatches_through_super() {
        let src = "class A { speak() { print \"A\"; } }\n\
                    class B < A { speak() { super.speak(); print \"B\"; } }\n\
                    B().speak();";
        assert_eq!(run(src), "A\nB\n");
    }

    #[test]
    fn initializer_returns_the_instance() {
        let src = "class P { init(x) { this.x = x; } }\nvar p = P(42); print p.x;";
        assert_eq!(run(src), "42\n");
    }

    #[test]
    fn initializer_early_return_still_yields_the_instance() {
        let src = "class P { init() { this.ready = true; return; } }\nvar p = P(); print p.ready;";
        assert_eq!(run(src), "true\n");
    }

    #[test]
    fn adding_string_and_number_is_a_runtime_type_error() {
        let err = run_err("print \"a\" + 1;");
        assert!(err.message.contains("Operands must be"));
        assert_eq!(err.line, 1);
    }

    #[test]
    fn division_by_zero_follows_ieee_754_rather_than_erroring() {
        assert_eq!(run("print 1 / 0;"), "inf\n");
    }

    #[test]
    fn integral_numbers_print_without_trailing_zero() {
        assert_eq!(run("print 6 / 2;"), "3\n");
    }

    #[test]
    fn and_or_return_operand_values_not_coerced_booleans() {
        assert_eq!(run("print nil or \"default\";"), "default\n");
        assert_eq!(run("print 1 and 2;"), "2\n");
    }

    #[test]
    fn calling_with_wrong_arity_is_a_runtime_error() {
        let err = run_err("fun f(a, b) { return a + b; } f(1);");
        assert!(err.message.contains("Expected 2 arguments but got 1"));
    }

    #[test]
    fn accessing_undefined_property_is_a_runtime_error() {
        let err = run_err("class A {} print A().missing;");
        assert!(err.message.contains("Undefined property"));
    }
}
