use std::cell::RefCell;
use std::rc::Rc;
use rustc_hash::FxHashMap;
use crate::interpreter::value::Value;

/// A scope of bindings. Scopes are shared (`Rc<RefCell<_>>`) so that closures keep
/// their defining scope alive and observe later writes to it.
#[derive(Debug, Default)]
pub struct Environment {
    store: FxHashMap<String, Value>,
    parent: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
    pub fn new_global() -> Rc<RefCell<Environment>> {
        Rc::new(RefCell::new(Environment::default()))
    }

    pub fn new_with_parent(parent: Rc<RefCell<Environment>>) -> Rc<RefCell<Environment>> {
        Rc::new(RefCell::new(Environment {
            store: FxHashMap::default(),
            parent: Some(parent),
        }))
    }

    /// Looks `name` up in this scope, then in each enclosing scope.
    pub fn get(&self, name: &str) -> Option<Value> {
        match self.store.get(name) {
            Some(value) => Some(value.clone()),
            None => self.parent.as_ref().and_then(|parent| parent.borrow().get(name)),
        }
    }

    /// Binds `name` in this scope only; enclosing scopes are never written.
    pub fn set(&mut self, name: String, value: Value) {
        self.store.insert(name, value);
    }
}
