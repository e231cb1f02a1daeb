// ABOUTME: Error taxonomy for the lexer, parser, and evaluator

use crate::value::Value;
use thiserror::Error;

// ===== Arity constant strings (eliminates allocations in error paths) =====
pub const ARITY_ONE: &str = "1";
pub const ARITY_TWO: &str = "2";
pub const ARITY_AT_LEAST_ONE: &str = "at least 1";

/// No lexer rule matched at the current position.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("unexpected character {character:?} at {line}:{column}")]
pub struct LexError {
    pub character: char,
    pub line: usize,
    pub column: usize,
}

/// A parse failure, carrying the best-effort partial AST built so far so
/// a host can still render incomplete input (lint overlays, live editors).
#[derive(Error, Debug, Clone)]
#[error("{message} at {line}:{column}")]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    pub column: usize,
    pub partial: Box<Value>,
}

#[derive(Error, Debug, Clone)]
pub enum EvalError {
    #[error("Undefined symbol: {0}")]
    UndefinedSymbol(String),

    #[error("cannot index into a {actual}")]
    NotIndexable { actual: &'static str },

    #[error("{function}: expected {expected}, got {actual} at argument {position}")]
    TypeMismatch {
        function: String,
        expected: String,
        actual: &'static str,
        position: usize,
    },

    #[error("{function}: expected {expected} argument{}, got {actual}", if expected == "1" { "" } else { "s" })]
    ArityError {
        function: String,
        expected: String,
        actual: usize,
    },

    #[error("malformed if: {0}")]
    MalformedIf(String),

    #[error("malformed argument definition: {0}")]
    BadArgDef(String),

    #[error("value is not callable: {0}")]
    NotCallable(&'static str),

    #[error("{function}: {message}")]
    HostError { function: String, message: String },

    #[error("{form}: {message}")]
    MalformedForm { form: String, message: String },

    #[error("evaluation cancelled")]
    Cancelled,
}

impl EvalError {
    pub fn type_error(function: &str, expected: &str, actual: &Value, position: usize) -> Self {
        EvalError::TypeMismatch {
            function: function.to_string(),
            expected: expected.to_string(),
            actual: actual.type_name(),
            position,
        }
    }

    pub fn arity_error(function: &str, expected: impl Into<String>, actual: usize) -> Self {
        EvalError::ArityError {
            function: function.to_string(),
            expected: expected.into(),
            actual,
        }
    }

    pub fn malformed(form: &str, message: impl Into<String>) -> Self {
        EvalError::MalformedForm {
            form: form.to_string(),
            message: message.into(),
        }
    }

    pub fn host_error(function: &str, message: impl Into<String>) -> Self {
        EvalError::HostError {
            function: function.to_string(),
            message: message.into(),
        }
    }
}
