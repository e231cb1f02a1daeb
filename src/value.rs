// ABOUTME: Value types shared by the AST, the environment, and the evaluator

use crate::env::Environment;
use crate::error::EvalError;
use std::fmt;
use std::rc::Rc;

/// A host-supplied callable: takes already-evaluated positional arguments
/// and returns a value. `Rc<dyn Fn>` rather than a bare fn pointer so a
/// host can close over its own state -- a database handle, a counter.
pub type HostFn = Rc<dyn Fn(&[Value]) -> Result<Value, EvalError>>;

/// The single value type shared by the AST (parser output) and the
/// evaluator's runtime values. List nodes double as AST: a parsed
/// program is a `Value` whose list forms have symbol heads, e.g.
/// `['if', cond, a, b]`.
#[derive(Clone)]
pub enum Value {
    Number(f64),
    Str(String),
    Bool(bool),
    Nil,
    /// A bare name: resolved by environment lookup when evaluated as an
    /// atom, or used as a special-form/call head when it heads a list.
    /// Kept distinct from `Str` so `` `sym `` (unevaluated symbol) and
    /// `"sym"` (a string literal) never collide.
    Symbol(String),
    List(Vec<Value>),
    /// Insertion-order key/value pairs. A `HashMap` would lose the
    /// order object literals are required to preserve, so this is a
    /// `Vec` of pairs with linear lookup -- fine for the object sizes
    /// an expression language actually builds.
    Object(Vec<(String, Value)>),
    Lambda {
        /// The unevaluated argument-list AST (symbols, `['&', name]` rest,
        /// `['def', name, default]` defaults).
        params: Rc<Value>,
        /// The unevaluated body AST.
        body: Rc<Value>,
        scope: Rc<Environment>,
        is_macro: bool,
        name: Option<String>,
    },
    Host(HostFn),
}

impl Value {
    pub fn symbol(s: impl Into<String>) -> Value {
        Value::Symbol(s.into())
    }

    pub fn list(items: Vec<Value>) -> Value {
        Value::List(items)
    }

    /// Truthiness used by `if`: only `false` and `nil` are falsy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Bool(false) | Value::Nil)
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Value::Symbol(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Bool(_) => "boolean",
            Value::Nil => "nil",
            Value::Symbol(_) => "symbol",
            Value::List(_) => "list",
            Value::Object(_) => "object",
            Value::Lambda { is_macro, .. } => {
                if *is_macro {
                    "macro"
                } else {
                    "lambda"
                }
            }
            Value::Host(_) => "host-function",
        }
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Lambda { .. } | Value::Host(_))
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "Number({n})"),
            Value::Str(s) => write!(f, "Str({s:?})"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Nil => write!(f, "Nil"),
            Value::Symbol(s) => write!(f, "Symbol({s})"),
            Value::List(items) => f.debug_list().entries(items).finish(),
            Value::Object(pairs) => {
                f.debug_map().entries(pairs.iter().map(|(k, v)| (k, v))).finish()
            }
            Value::Lambda { is_macro, name, .. } => {
                write!(f, "Lambda {{ is_macro: {is_macro}, name: {name:?} }}")
            }
            Value::Host(_) => write!(f, "Host(<fn>)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthiness() {
        assert!(Value::Number(0.0).is_truthy());
        assert!(Value::Str(String::new()).is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(!Value::Nil.is_truthy());
        assert!(Value::Bool(true).is_truthy());
    }

    #[test]
    fn type_names() {
        assert_eq!(Value::Number(1.0).type_name(), "number");
        assert_eq!(Value::Nil.type_name(), "nil");
        assert_eq!(Value::Object(vec![]).type_name(), "object");
    }
}
