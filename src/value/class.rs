use std::{collections::HashMap, fmt, rc::Rc};

use crate::value::LoxFunction;

#[derive(Debug)]
struct LoxClassInner {
    name: String,
    superclass: Option<LoxClass>,
    methods: HashMap<String, LoxFunction>,
}

/// `(name, superclass?, methods)`. Shared via `Rc` since every instance and every subclass that
/// names this class as its superclass holds the same handle.
#[derive(Debug, Clone)]
pub struct LoxClass(Rc<LoxClassInner>);

impl LoxClass {
    pub fn new(name: String, superclass: Option<LoxClass>, methods: HashMap<String, LoxFunction>) -> Self {
        Self(Rc::new(LoxClassInner {
            name,
            superclass,
            methods,
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Walks the superclass chain; methods defined closer to `self` shadow inherited ones.
    pub fn find_method(&self, name: &str) -> Option<LoxFunction> {
        self.0
            .methods
            .get(name)
            .cloned()
            .or_else(|| self.0.superclass.as_ref().and_then(|s| s.find_method(name)))
    }

    /// Class arity equals `init`'s arity, or 0 if the class has no initializer.
    pub fn arity(&self) -> usize {
        self.find_method("init").map(|m| m.arity()).unwrap_or(0)
    }

    pub fn identity_eq(&self, other: &LoxClass) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Display for LoxClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.name)
    }
}
