// ABOUTME: Library module exposing internal components for embedding and testing

pub mod config;
pub mod env;
pub mod error;
pub mod eval;
pub mod host;
pub mod lexer;
pub mod parser;
pub mod pretty;
pub mod rules;
pub mod token;
pub mod value;

pub use config::TickSignal;
pub use env::Environment;
pub use error::{EvalError, LexError, ParseError};
pub use eval::{evaluate, evaluate_with_hook};
pub use host::create_environment;
pub use lexer::get_token_types;
pub use parser::parse;
pub use pretty::{syntax_tree_to_pretty_string, value_to_pretty_string};
pub use token::{Token, TokenKind};
pub use value::{HostFn, Value};
