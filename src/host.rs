// ABOUTME: Host-function bridge -- lets an embedding program register its own builtins

use crate::env::Environment;
use crate::value::Value;
use std::rc::Rc;

thread_local! {
    /// The process-wide root scope, created once per thread and shared
    /// by every environment this crate hands out. `Rc<Environment>`
    /// holds a `RefCell` and is neither `Send` nor `Sync`, so this has
    /// to be a thread-local rather than a `static`/`OnceLock` -- which
    /// is the right primitive anyway, since the crate is single-threaded
    /// by design. Nothing is ever defined directly on it;
    /// `Environment::global()` stops one level above it so unrelated
    /// callers sharing a thread don't see each other's top-level
    /// bindings.
    static ROOT: Rc<Environment> = Environment::root();
}

fn shared_root() -> Rc<Environment> {
    ROOT.with(|root| root.clone())
}

/// Builds a fresh user-global environment, seeded with `initial_bindings`,
/// as a child of the shared root. This is the entry point a host calls
/// once at startup, registering whatever arithmetic, I/O, or domain
/// functions it wants to expose to evaluated programs -- the core itself
/// ships none.
pub fn create_environment(initial_bindings: Vec<(String, Value)>) -> Rc<Environment> {
    let global = shared_root().create();
    for (name, value) in initial_bindings {
        global.define(name, value);
    }
    global
}

/// A fresh, unseeded child of the shared root -- what `evaluate` falls
/// back to when called without an environment.
pub(crate) fn fresh_root_child() -> Rc<Environment> {
    shared_root().create()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_initial_bindings() {
        let env = create_environment(vec![("x".to_string(), Value::Number(42.0))]);
        assert!(matches!(env.get("x"), Some(Value::Number(n)) if n == 42.0));
    }

    #[test]
    fn independent_globals_do_not_see_each_others_bindings() {
        let a = create_environment(vec![("x".to_string(), Value::Number(1.0))]);
        let b = create_environment(vec![]);
        assert!(b.get("x").is_none());
        assert!(matches!(a.get("x"), Some(Value::Number(n)) if n == 1.0));
    }

    #[test]
    fn globals_share_the_same_root() {
        let a = create_environment(vec![]);
        let b = create_environment(vec![]);
        assert!(Rc::ptr_eq(&a.global(), &a));
        assert!(Rc::ptr_eq(&b.global(), &b));
    }
}
