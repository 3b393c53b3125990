//! Lexically-scoped environments: one frame of bindings plus an optional
//! parent. Frames are shared (`Rc<RefCell<_>>`) because any number of
//! closures may capture the same frame and must keep it alive.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::runtime::value::Value;

/// Shared handle to an environment frame.
pub type Env = Rc<RefCell<Environment>>;

pub struct Environment {
    bindings: HashMap<String, Value>,
    parent: Option<Env>,
}

impl Environment {
    /// A fresh root frame, as created at program start.
    pub fn root() -> Env {
        Rc::new(RefCell::new(Self {
            bindings: HashMap::new(),
            parent: None,
        }))
    }

    /// A child frame, as created on function application.
    pub fn with_parent(parent: &Env) -> Env {
        Rc::new(RefCell::new(Self {
            bindings: HashMap::new(),
            parent: Some(Rc::clone(parent)),
        }))
    }

    /// Walks the frame chain outward and returns the first binding.
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.bindings.get(name) {
            return Some(value.clone());
        }
        self.parent.as_ref().and_then(|parent| parent.borrow().get(name))
    }

    /// Binds in this frame only, overwriting any existing binding here.
    /// Outer frames are never written through; shadowing is how inner
    /// scopes re-bind.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.bindings.insert(name.into(), value);
    }
}
