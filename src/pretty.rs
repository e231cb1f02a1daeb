// ABOUTME: Diagnostic pretty-printers for runtime values and parsed syntax trees

use crate::value::Value;
use std::fmt::Write as _;

/// Renders `value` the way a user would type it back as a literal --
/// for REPL output and error messages, not for round-tripping through
/// the parser.
pub fn value_to_pretty_string(value: &Value) -> String {
    let mut out = String::new();
    write_value(value, &mut out);
    out
}

fn write_value(value: &Value, out: &mut String) {
    match value {
        Value::Number(n) => {
            let _ = write!(out, "{n}");
        }
        Value::Str(s) => {
            let _ = write!(out, "{s:?}");
        }
        Value::Bool(b) => {
            let _ = write!(out, "{b}");
        }
        Value::Nil => out.push_str("nil"),
        Value::Symbol(s) => out.push_str(s),
        Value::List(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_value(item, out);
            }
            out.push(']');
        }
        Value::Object(pairs) => {
            out.push('{');
            for (i, (key, val)) in pairs.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                let _ = write!(out, "{key}: ");
                write_value(val, out);
            }
            out.push('}');
        }
        Value::Lambda {
            is_macro, name, ..
        } => {
            let kind = if *is_macro { "macro" } else { "lambda" };
            match name {
                Some(n) => {
                    let _ = write!(out, "<{kind} {n}>");
                }
                None => {
                    let _ = write!(out, "<{kind}>");
                }
            }
        }
        Value::Host(_) => out.push_str("<host-function>"),
    }
}

/// Renders `ast` as a fully-parenthesized prefix tree -- `['if', c, a, b]`
/// becomes `(if c a b)` -- for parser/macro diagnostics where seeing the
/// list structure matters more than the surface syntax it came from.
pub fn syntax_tree_to_pretty_string(ast: &Value) -> String {
    let mut out = String::new();
    write_tree(ast, &mut out);
    out
}

fn write_tree(ast: &Value, out: &mut String) {
    match ast {
        Value::List(items) => {
            out.push('(');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                write_tree(item, out);
            }
            out.push(')');
        }
        Value::Object(pairs) => {
            out.push_str("(object");
            for (key, val) in pairs {
                let _ = write!(out, " ({key} ");
                write_tree(val, out);
                out.push(')');
            }
            out.push(')');
        }
        other => write_value(other, out),
    }
}
