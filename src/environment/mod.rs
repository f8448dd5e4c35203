//! Lexically-chained name → value scopes.
//!
//! Generalizes this codebase's `Scope` (a flat `Vec<HashMap<String, VariableType>>` with
//! `push`/`pop`/`find`/`update`) to a chain of reference-counted frames so that a closure can
//! keep its defining scope alive after the block that created it has exited — the flat stack
//! cannot express that, since popping a frame there drops it unconditionally.
use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::value::Value;

#[derive(Debug)]
struct EnvironmentInner {
    values: HashMap<String, Value>,
    enclosing: Option<Environment>,
}

/// A single scope frame. Cloning an `Environment` clones the handle, not the frame: every
/// closure that captured the same scope shares the same underlying map.
#[derive(Debug, Clone)]
pub struct Environment(Rc<RefCell<EnvironmentInner>>);

impl Environment {
    pub fn new_global() -> Self {
        Self(Rc::new(RefCell::new(EnvironmentInner {
            values: HashMap::new(),
            enclosing: None,
        })))
    }

    pub fn new_enclosed(enclosing: &Environment) -> Self {
        Self(Rc::new(RefCell::new(EnvironmentInner {
            values: HashMap::new(),
            enclosing: Some(enclosing.clone()),
        })))
    }

    /// Binds `name` in the current frame, overwriting any existing binding. Lox allows
    /// redeclaring globals, and this is also how parameters and `var` initializers land.
    pub fn define(&self, name: impl Into<String>, value: Value) {
        self.0.borrow_mut().values.insert(name.into(), value);
    }

    /// Walks the enclosing chain looking for `name`; fails if no frame defines it.
    pub fn get(&self, name: &str) -> Result<Value, ()> {
        let inner = self.0.borrow();
        if let Some(value) = inner.values.get(name) {
            return Ok(value.clone());
        }
        match &inner.enclosing {
            Some(parent) => parent.get(name),
            None => Err(()),
        }
    }

    /// Walks the enclosing chain looking for an existing binding of `name` to overwrite;
    /// fails if no frame defines it (Lox assignment never implicitly creates a variable).
    pub fn assign(&self, name: &str, value: Value) -> Result<(), ()> {
        let mut inner = self.0.borrow_mut();
        if inner.values.contains_key(name) {
            inner.values.insert(name.to_string(), value);
            return Ok(());
        }
        match &inner.enclosing {
            Some(parent) => parent.assign(name, value),
            None => Err(()),
        }
    }

    /// Distance-indexed lookup: walk exactly `distance` enclosing hops, then read unconditionally.
    /// Used whenever the resolver recorded a distance for the reference site.
    pub fn get_at(&self, distance: usize, name: &str) -> Value {
        self.ancestor(distance)
            .0
            .borrow()
            .values
            .get(name)
            .cloned()
            .unwrap_or_else(|| panic!("resolver recorded distance {distance} for undefined '{name}'"))
    }

    pub fn assign_at(&self, distance: usize, name: &str, value: Value) {
        self.ancestor(distance).0.borrow_mut().values.insert(name.to_string(), value);
    }

    pub fn identity_eq(&self, other: &Environment) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    fn ancestor(&self, distance: usize) -> Environment {
        let mut env = self.clone();
        for _ in 0..distance {
            let next = env
                .0
                .borrow()
                .enclosing
                .clone()
                .unwrap_or_else(|| panic!("resolver recorded a distance deeper than the environment chain"));
            env = next;
        }
        env
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shadowing_in_nested_scope_does_not_mutate_outer() {
        let global = Environment::new_global();
        global.define("x", Value::Number(1.0));

        let inner = Environment::new_enclosed(&global);
        inner.define("x", Value::Number(2.0));

        assert_eq!(inner.get("x"), Ok(Value::Number(2.0)));
        assert_eq!(global.get("x"), Ok(Value::Number(1.0)));
    }

    #[test]
    fn assign_walks_up_to_the_defining_frame() {
        let global = Environment::new_global();
        global.define("x", Value::Number(1.0));
        let inner = Environment::new_enclosed(&global);

        inner.assign("x", Value::Number(9.0)).expect("x is defined in an enclosing frame");

        assert_eq!(global.get("x"), Ok(Value::Number(9.0)));
    }

    #[test]
    fn assign_to_undefined_name_fails() {
        let global = Environment::new_global();
        assert!(global.assign("missing", Value::Nil).is_err());
    }

    #[test]
    fn closures_keep_their_defining_scope_alive_after_it_exits() {
        let global = Environment::new_global();
        let captured = {
            let block = Environment::new_enclosed(&global);
            block.define("i", Value::Number(0.0));
            block
        };
        // `block` has gone out of scope here, but `captured` still owns the same frame.
        captured.assign("i", Value::Number(1.0)).unwrap();
        assert_eq!(captured.get("i"), Ok(Value::Number(1.0)));
    }

    #[test]
    fn distance_indexed_access_reaches_the_right_frame() {
        let global = Environment::new_global();
        global.define("x", Value::Number(1.0));
        let a = Environment::new_enclosed(&global);
        let b = Environment::new_enclosed(&a);

        assert_eq!(b.get_at(2, "x"), Value::Number(1.0));
        b.assign_at(2, "x", Value::Number(5.0));
        assert_eq!(global.get("x"), Ok(Value::Number(5.0)));
    }
}
