// ABOUTME: Environment module for managing variable bindings and lexical scope chains

use crate::error::EvalError;
use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// A lexical scope: a mapping from symbol to value, chained via an
/// optional parent. Closures hold `Rc<Environment>` to their defining
/// scope, so two environments can reference each other through bound
/// lambdas -- that's tolerated, not specially collected, matching the
/// single-threaded, process-lifetime-bounded design this crate assumes.
#[derive(Debug)]
pub struct Environment {
    bindings: RefCell<HashMap<String, Value>>,
    parent: Option<Rc<Environment>>,
    /// Marks the shared, process-wide root created once at startup.
    /// `def` without a member target writes to the nearest ancestor
    /// just below this marker (the "user global"), never to the root
    /// itself, so unrelated evaluations sharing a root don't clobber
    /// each other's top-level bindings.
    is_root: bool,
}

impl Environment {
    /// Creates the shared root scope with no parent.
    pub fn root() -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            parent: None,
            is_root: true,
        })
    }

    /// Creates a standalone top-level environment with no parent and no
    /// root marker -- convenient for tests and for hosts that don't need
    /// a shared root.
    pub fn new() -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            parent: None,
            is_root: false,
        })
    }

    /// Creates a new child environment with a parent.
    pub fn with_parent(parent: Rc<Environment>) -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            parent: Some(parent),
            is_root: false,
        })
    }

    /// Produces a child scope of `self`.
    pub fn create(self: &Rc<Self>) -> Rc<Self> {
        Environment::with_parent(self.clone())
    }

    /// Defines a binding in THIS scope (doesn't walk the parent chain).
    pub fn define(&self, name: String, value: Value) {
        self.bindings.borrow_mut().insert(name, value);
    }

    /// Looks up a symbol in this scope and its ancestors.
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.bindings.borrow().get(name) {
            return Some(value.clone());
        }
        self.parent.as_ref().and_then(|p| p.get(name))
    }

    /// Updates an existing binding, walking the parent chain to find
    /// where it was originally defined.
    pub fn set(&self, name: &str, value: Value) -> Result<(), EvalError> {
        if self.bindings.borrow().contains_key(name) {
            self.bindings.borrow_mut().insert(name.to_string(), value);
            return Ok(());
        }
        match &self.parent {
            Some(parent) => parent.set(name, value),
            None => Err(EvalError::UndefinedSymbol(name.to_string())),
        }
    }

    /// The top-most non-root ancestor of this scope -- the scope `def`
    /// targets when its binding has no member path. Returns `self` when
    /// there's no root ancestor to stop below (a standalone environment).
    pub fn global(self: &Rc<Self>) -> Rc<Self> {
        if self.is_root {
            return self.clone();
        }
        let mut current = self.clone();
        loop {
            match current.parent.clone() {
                Some(parent) if parent.is_root => return current,
                Some(parent) => current = parent,
                None => return current,
            }
        }
    }
}
