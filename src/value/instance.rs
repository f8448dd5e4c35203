use std::{cell::RefCell, collections::HashMap, fmt, rc::Rc};

use crate::value::{LoxClass, Value};

#[derive(Debug)]
struct InstanceInner {
    class: LoxClass,
    fields: HashMap<String, Value>,
}

/// `(class, fields)`. Fields always shadow methods of the same name; methods are never copied
/// into `fields` — a bound method is materialized fresh on every lookup miss against `fields`.
#[derive(Debug, Clone)]
pub struct Instance(Rc<RefCell<InstanceInner>>);

impl Instance {
    pub fn new(class: LoxClass) -> Self {
        Self(Rc::new(RefCell::new(InstanceInner {
            class,
            fields: HashMap::new(),
        })))
    }

    pub fn class(&self) -> LoxClass {
        self.0.borrow().class.clone()
    }

    /// Field lookup only; the caller binds a method on a field miss since that requires
    /// `Self`-by-reference to build the bound closure (see [`crate::value::LoxFunction::bind`]).
    pub fn get_field(&self, name: &str) -> Option<Value> {
        self.0.borrow().fields.get(name).cloned()
    }

    pub fn set(&self, name: &str, value: Value) {
        self.0.borrow_mut().fields.insert(name.to_string(), value);
    }

    pub fn identity_eq(&self, other: &Instance) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} instance", self.0.borrow().class.name())
    }
}
