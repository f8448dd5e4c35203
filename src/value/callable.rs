use std::fmt;

use crate::value::{LoxClass, LoxFunction, Value};

/// A native function exposed to Lox programs, e.g. `clock`. `implementation` never fails: host
/// functions are trusted and take no user-catchable error path.
#[derive(Clone)]
pub struct NativeFunction {
    pub name: &'static str,
    pub arity: usize,
    pub implementation: fn(&[Value]) -> Value,
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeFunction({})", self.name)
    }
}

/// The three things that can be called: a host-provided native, a user `fun`, or a class
/// (calling a class constructs an instance).
#[derive(Debug, Clone)]
pub enum Callable {
    Native(NativeFunction),
    Function(LoxFunction),
    Class(LoxClass),
}

impl Callable {
    pub fn arity(&self) -> usize {
        match self {
            Callable::Native(n) => n.arity,
            Callable::Function(f) => f.arity(),
            Callable::Class(c) => c.arity(),
        }
    }

    pub fn identity_eq(&self, other: &Callable) -> bool {
        match (self, other) {
            (Callable::Native(a), Callable::Native(b)) => a.implementation as usize == b.implementation as usize,
            (Callable::Function(a), Callable::Function(b)) => a.identity_eq(b),
            (Callable::Class(a), Callable::Class(b)) => a.identity_eq(b),
            _ => false,
        }
    }
}

impl fmt::Display for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callable::Native(n) => write!(f, "<native fn {}>", n.name),
            Callable::Function(func) => write!(f, "{func}"),
            Callable::Class(c) => write!(f, "{c}"),
        }
    }
}
