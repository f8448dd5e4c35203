use std::{fmt, rc::Rc};

use crate::ast::FunctionStmt;
use crate::environment::Environment;
use crate::value::{Instance, Value};

/// A closure: the declaration it was built from plus the environment it closed over.
///
/// `is_initializer` is true only for a method literally named `init`; it governs whether
/// falling off the end (or a bare `return;`) yields `this` instead of `nil`.
#[derive(Debug, Clone)]
pub struct LoxFunction {
    pub declaration: Rc<FunctionStmt>,
    pub closure: Environment,
    pub is_initializer: bool,
}

impl LoxFunction {
    pub fn new(declaration: Rc<FunctionStmt>, closure: Environment, is_initializer: bool) -> Self {
        Self {
            declaration,
            closure,
            is_initializer,
        }
    }

    pub fn arity(&self) -> usize {
        self.declaration.params.len()
    }

    pub fn name(&self) -> &str {
        &self.declaration.name.lexeme
    }

    /// Produces a fresh `LoxFunction` whose closure is a one-frame extension of this one,
    /// defining `this` to the bound instance. Used by property lookup to turn a class method
    /// into a bound method without mutating the method's own closure.
    pub fn bind(&self, instance: &Instance) -> LoxFunction {
        let env = Environment::new_enclosed(&self.closure);
        env.define("this", Value::Instance(instance.clone()));
        LoxFunction {
            declaration: self.declaration.clone(),
            closure: env,
            is_initializer: self.is_initializer,
        }
    }

    pub fn identity_eq(&self, other: &LoxFunction) -> bool {
        Rc::ptr_eq(&self.declaration, &other.declaration) && self.closure.identity_eq(&other.closure)
    }
}

impl fmt::Display for LoxFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<fn {}>", self.name())
    }
}
