// ABOUTME: Tree-walking trampoline evaluator over the homoiconic list AST

use crate::config::{TickHook, TickSignal};
use crate::env::Environment;
use crate::error::EvalError;
use crate::value::Value;
use std::rc::Rc;

/// Reborrows an `Option<TickHook>` for a nested call, the way `&mut`
/// would reborrow a concrete reference. `dyn FnMut` has no `Deref` of
/// its own, so `Option::as_deref_mut` doesn't apply here.
fn reborrow<'a>(hook: &'a mut Option<TickHook<'_>>) -> Option<TickHook<'a>> {
    match hook {
        Some(h) => Some(&mut **h),
        None => None,
    }
}

/// Evaluates `ast` against `env`, looping rather than recursing through
/// tail positions (`if`, `do`, `let`, lambda invocation) so a
/// self-recursive lambda runs in O(1) native stack. When `env` is
/// omitted, evaluation runs against a fresh child of the shared root.
pub fn evaluate(ast: Value, env: Option<Rc<Environment>>) -> Result<Value, EvalError> {
    let env = env.unwrap_or_else(crate::host::fresh_root_child);
    evaluate_with_hook(ast, env, None)
}

/// `evaluate` with an optional tick hook, called once per loop
/// iteration. Kept as a separate entry point so the common case doesn't
/// pay for a closure indirection.
pub fn evaluate_with_hook(
    mut ast: Value,
    env: Rc<Environment>,
    mut hook: Option<TickHook>,
) -> Result<Value, EvalError> {
    let mut env = env;
    loop {
        if let Some(hook) = reborrow(&mut hook) {
            if hook() == TickSignal::Cancel {
                return Err(EvalError::Cancelled);
            }
        }

        let Value::List(items) = &ast else {
            return eval_atom(&ast, &env);
        };
        if items.is_empty() {
            return Ok(Value::Nil);
        }

        if let Some(expanded) = try_expand_macro(items, &env)? {
            ast = expanded;
            continue;
        }

        let head_symbol = items[0].as_symbol().map(|s| s.to_string());
        match head_symbol.as_deref() {
            Some("`") | Some("quote") => return Ok(arg(items, 1).clone()),
            Some("eva") => {
                let produced = eval_value(arg(items, 1).clone(), &env, reborrow(&mut hook))?;
                ast = produced;
                continue;
            }
            Some("~") | Some("macro") => {
                let callable = eval_value(arg(items, 1).clone(), &env, reborrow(&mut hook))?;
                return Ok(flag_as_macro(callable));
            }
            Some("comment") => return Ok(Value::Nil),
            Some("list") => return eval_list_form(&items[1..], &env, reborrow(&mut hook)),
            Some("obj") => return eval_obj_form(&items[1..], &env, reborrow(&mut hook)),
            Some("def") => return eval_def(&items[1..], &env, reborrow(&mut hook)),
            Some("get") => return eval_get(&items[1..], &env, reborrow(&mut hook)),
            Some("let") => {
                let (next_ast, next_env) = eval_let(&items[1..], &env, reborrow(&mut hook))?;
                ast = next_ast;
                env = next_env;
                continue;
            }
            Some("do") => {
                if items.len() == 1 {
                    return Ok(Value::Nil);
                }
                for mid in &items[1..items.len() - 1] {
                    eval_value(mid.clone(), &env, reborrow(&mut hook))?;
                }
                ast = items[items.len() - 1].clone();
                continue;
            }
            Some("if") => {
                if items.len() < 3 {
                    return Err(EvalError::MalformedIf(
                        "expected a condition and a then-branch".to_string(),
                    ));
                }
                let cond = eval_value(items[1].clone(), &env, reborrow(&mut hook))?;
                if cond.is_truthy() {
                    ast = items[2].clone();
                    continue;
                } else if items.len() > 3 {
                    ast = items[3].clone();
                    continue;
                } else {
                    return Ok(Value::Nil);
                }
            }
            Some("try") => return eval_try(&items[1..], &env, reborrow(&mut hook)),
            Some("lambda") | Some("\u{3bb}") => {
                if items.len() != 3 {
                    return Err(EvalError::malformed(
                        "lambda",
                        "expected a parameter list and a body",
                    ));
                }
                return Ok(Value::Lambda {
                    params: Rc::new(items[1].clone()),
                    body: Rc::new(items[2].clone()),
                    scope: env.clone(),
                    is_macro: false,
                    name: None,
                });
            }
            _ => {
                // Default case: invocation.
                let mut evaluated = Vec::with_capacity(items.len());
                for item in items {
                    evaluated.push(eval_value(item.clone(), &env, reborrow(&mut hook))?);
                }
                let callable = evaluated.remove(0);
                match callable {
                    Value::List(ref lam_items)
                        if lam_items.first().and_then(Value::as_symbol) == Some("lambda") =>
                    {
                        if lam_items.len() != 3 {
                            return Err(EvalError::malformed(
                                "lambda",
                                "expected a parameter list and a body",
                            ));
                        }
                        env = bind_function_scope(&env, &lam_items[1], &evaluated)?;
                        ast = lam_items[2].clone();
                        continue;
                    }
                    Value::Lambda {
                        params, body, scope, ..
                    } => {
                        env = bind_function_scope(&scope, &params, &evaluated)?;
                        ast = (*body).clone();
                        continue;
                    }
                    Value::Host(f) => return f(&evaluated),
                    Value::Nil => return Ok(Value::Nil),
                    other => return Err(EvalError::NotCallable(other.type_name())),
                }
            }
        }
    }
}

/// Non-tail evaluation, used wherever a sub-expression's value is
/// needed before the trampoline can continue (arguments, conditions,
/// `let`/`obj`/`list` entries).
fn eval_value(
    ast: Value,
    env: &Rc<Environment>,
    hook: Option<TickHook>,
) -> Result<Value, EvalError> {
    evaluate_with_hook(ast, env.clone(), hook)
}

fn eval_atom(ast: &Value, env: &Rc<Environment>) -> Result<Value, EvalError> {
    match ast {
        Value::Number(_) | Value::Bool(_) | Value::Str(_) | Value::Nil => Ok(ast.clone()),
        Value::Symbol(name) if name == "local" || name == "global" => {
            Ok(Value::Str(format!("<environment:{name}>")))
        }
        Value::Symbol(name) => env
            .get(name)
            .ok_or_else(|| EvalError::UndefinedSymbol(name.clone())),
        Value::List(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(eval_value(item.clone(), env, None)?);
            }
            Ok(Value::List(out))
        }
        other => Ok(other.clone()),
    }
}

fn arg(items: &[Value], index: usize) -> &Value {
    const NIL: Value = Value::Nil;
    items.get(index).unwrap_or(&NIL)
}

fn flag_as_macro(callable: Value) -> Value {
    match callable {
        Value::Lambda {
            params,
            body,
            scope,
            name,
            ..
        } => Value::Lambda {
            params,
            body,
            scope,
            is_macro: true,
            name,
        },
        other => other,
    }
}

/// While `ast`'s head is a symbol bound to a macro, expand it and signal
/// the trampoline to continue on the result instead of the original AST.
fn try_expand_macro(items: &[Value], env: &Rc<Environment>) -> Result<Option<Value>, EvalError> {
    let Some(name) = items[0].as_symbol() else {
        return Ok(None);
    };
    let Some(Value::Lambda {
        params,
        body,
        scope,
        is_macro: true,
        ..
    }) = env.get(name)
    else {
        return Ok(None);
    };
    let unevaluated_args: Vec<Value> = items[1..].to_vec();
    let macro_scope = bind_function_scope(&scope, &params, &unevaluated_args)?;
    let expanded = evaluate_with_hook((*body).clone(), macro_scope, None)?;
    Ok(Some(expanded))
}

fn eval_list_form(
    args: &[Value],
    env: &Rc<Environment>,
    mut hook: Option<TickHook>,
) -> Result<Value, EvalError> {
    let mut out = Vec::new();
    for item in args {
        if is_spread(item) {
            let spread_target = eval_value(spread_inner(item), env, reborrow(&mut hook))?;
            match spread_target {
                Value::List(items) => out.extend(items),
                other => out.push(other),
            }
        } else {
            out.push(eval_value(item.clone(), env, reborrow(&mut hook))?);
        }
    }
    Ok(Value::List(out))
}

fn eval_obj_form(
    entries: &[Value],
    env: &Rc<Environment>,
    mut hook: Option<TickHook>,
) -> Result<Value, EvalError> {
    let mut pairs: Vec<(String, Value)> = Vec::new();
    for entry in entries {
        if is_spread(entry) {
            let spread_target = eval_value(spread_inner(entry), env, reborrow(&mut hook))?;
            if let Value::Object(spread_pairs) = spread_target {
                pairs.extend(spread_pairs);
            }
            continue;
        }
        let Some(pair) = entry.as_list() else {
            return Err(EvalError::malformed("obj", "expected a [key, value] pair"));
        };
        if pair.len() != 2 {
            return Err(EvalError::malformed("obj", "expected a [key, value] pair"));
        }
        let key_value = eval_value(pair[0].clone(), env, reborrow(&mut hook))?;
        let key = value_to_key(&key_value)?;
        let value = eval_value(pair[1].clone(), env, reborrow(&mut hook))?;
        if let Some(existing) = pairs.iter_mut().find(|(k, _)| k == &key) {
            existing.1 = value;
        } else {
            pairs.push((key, value));
        }
    }
    Ok(Value::Object(pairs))
}

fn value_to_key(value: &Value) -> Result<String, EvalError> {
    match value {
        Value::Str(s) | Value::Symbol(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(EvalError::type_error("obj", "string-like key", other, 0)),
    }
}

fn is_spread(value: &Value) -> bool {
    matches!(value.as_list(), Some(items) if items.first().and_then(Value::as_symbol) == Some("..."))
}

fn spread_inner(value: &Value) -> Value {
    value.as_list().and_then(|items| items.get(1)).cloned().unwrap_or(Value::Nil)
}

fn eval_def(
    args: &[Value],
    env: &Rc<Environment>,
    mut hook: Option<TickHook>,
) -> Result<Value, EvalError> {
    if args.len() != 2 {
        return Err(EvalError::malformed("def", "expected a target and a value"));
    }
    let target = &args[0];
    let value = eval_value(args[1].clone(), env, reborrow(&mut hook))?;
    let named_value = name_if_callable(value.clone(), target);

    if let Some(items) = target.as_list() {
        if items.first().and_then(Value::as_symbol) == Some("get") {
            return eval_member_set(items, env, named_value, hook);
        }
    }

    let Some(name) = target.as_symbol() else {
        return Err(EvalError::malformed(
            "def",
            "assignment target must be a symbol or member expression",
        ));
    };
    env.global().define(name.to_string(), named_value.clone());
    Ok(named_value)
}

fn name_if_callable(value: Value, target: &Value) -> Value {
    match (value, target.as_symbol()) {
        (
            Value::Lambda {
                params,
                body,
                scope,
                is_macro,
                name: None,
            },
            Some(target_name),
        ) => Value::Lambda {
            params,
            body,
            scope,
            is_macro,
            name: Some(target_name.to_string()),
        },
        (other, _) => other,
    }
}

/// `a.b = v` is parsed as `['def', ['get', a, [\`, b]], v]`. `Object` is
/// an immutable value (a plain `Vec`, not a `RefCell`-backed handle), so
/// the set walks the member path functionally and, when the base is a
/// bare symbol, writes the rebuilt value back through `env.set` -- the
/// same mechanism ordinary variable mutation uses.
fn eval_member_set(
    get_items: &[Value],
    env: &Rc<Environment>,
    value: Value,
    mut hook: Option<TickHook>,
) -> Result<Value, EvalError> {
    if get_items.len() < 3 {
        return Err(EvalError::malformed("get", "expected a base and at least one member"));
    }
    let base_expr = &get_items[1];
    let base_name = base_expr.as_symbol().map(|s| s.to_string());
    let base_value = eval_value(base_expr.clone(), env, reborrow(&mut hook))?;

    let mut keys = Vec::with_capacity(get_items.len() - 2);
    for member in &get_items[2..] {
        let key_value = eval_value(member.clone(), env, reborrow(&mut hook))?;
        keys.push(value_to_key(&key_value)?);
    }

    let updated_base = set_path(base_value, &keys, value.clone())?;
    if let Some(name) = base_name {
        env.set(&name, updated_base)?;
    }
    Ok(value)
}

/// Functionally rewrites `base` so that `keys` resolves to `value`,
/// building fresh `Object`s along the way (auto-vivifying `nil` into an
/// empty object, so `a = {} a.b = 1` and `a = nil a.b = 1` both work).
fn set_path(base: Value, keys: &[String], value: Value) -> Result<Value, EvalError> {
    let Some((first, rest)) = keys.split_first() else {
        return Ok(value);
    };
    match base {
        Value::Object(mut pairs) => {
            let updated_child = if rest.is_empty() {
                value
            } else {
                let existing = pairs
                    .iter()
                    .find(|(k, _)| k == first)
                    .map(|(_, v)| v.clone())
                    .unwrap_or(Value::Nil);
                set_path(existing, rest, value)?
            };
            if let Some(entry) = pairs.iter_mut().find(|(k, _)| k == first) {
                entry.1 = updated_child;
            } else {
                pairs.push((first.clone(), updated_child));
            }
            Ok(Value::Object(pairs))
        }
        Value::Nil => {
            let updated_child = if rest.is_empty() {
                value
            } else {
                set_path(Value::Nil, rest, value)?
            };
            Ok(Value::Object(vec![(first.clone(), updated_child)]))
        }
        other => Err(EvalError::NotIndexable {
            actual: other.type_name(),
        }),
    }
}

fn eval_get(
    args: &[Value],
    env: &Rc<Environment>,
    mut hook: Option<TickHook>,
) -> Result<Value, EvalError> {
    if args.is_empty() {
        return Err(EvalError::malformed("get", "expected a base expression"));
    }
    let mut current = eval_value(args[0].clone(), env, reborrow(&mut hook))?;
    for member in &args[1..] {
        if let Some(set_pair) = member.as_list() {
            if set_pair.first().and_then(Value::as_symbol) == Some("def") && set_pair.len() == 3 {
                let key_value = eval_value(set_pair[1].clone(), env, reborrow(&mut hook))?;
                let key = value_to_key(&key_value)?;
                let new_value = eval_value(set_pair[2].clone(), env, reborrow(&mut hook))?;
                current = apply_member_set(current, &key, new_value)?;
                continue;
            }
        }
        let key_value = eval_value(member.clone(), env, reborrow(&mut hook))?;
        let key = value_to_key(&key_value)?;
        current = lookup_member(&current, &key)?;
    }
    Ok(current)
}

fn apply_member_set(base: Value, key: &str, value: Value) -> Result<Value, EvalError> {
    match base {
        Value::Object(mut pairs) => {
            if let Some(existing) = pairs.iter_mut().find(|(k, _)| k == key) {
                existing.1 = value.clone();
            } else {
                pairs.push((key.to_string(), value.clone()));
            }
            Ok(Value::Object(pairs))
        }
        other => Err(EvalError::NotIndexable {
            actual: other.type_name(),
        }),
    }
}

fn lookup_member(base: &Value, key: &str) -> Result<Value, EvalError> {
    if key == "__proto__" {
        return Ok(Value::Nil);
    }
    match base {
        Value::Object(pairs) => {
            let value = pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
                .unwrap_or(Value::Nil);
            Ok(bind_method(base.clone(), value))
        }
        Value::List(items) => {
            let index: Result<usize, _> = key.parse();
            match index {
                Ok(i) => {
                    let value = items.get(i).cloned().unwrap_or(Value::Nil);
                    Ok(bind_method(base.clone(), value))
                }
                Err(_) => Ok(Value::Nil),
            }
        }
        other => Err(EvalError::NotIndexable {
            actual: other.type_name(),
        }),
    }
}

/// Applies an already-resolved callable to already-evaluated arguments.
/// Used both by ordinary invocation sites that don't need the trampoline's
/// tail-call loop and by method-bound host wrappers.
fn apply_callable(callable: Value, args: &[Value]) -> Result<Value, EvalError> {
    match callable {
        Value::Lambda {
            params, body, scope, ..
        } => {
            let call_scope = bind_function_scope(&scope, &params, args)?;
            evaluate_with_hook((*body).clone(), call_scope, None)
        }
        Value::Host(f) => f(args),
        other => Err(EvalError::NotCallable(other.type_name())),
    }
}

/// Implements `get`'s method-binding rule: a callable member resolved off
/// an object or list is wrapped so the owning value is implicitly
/// prepended as its first argument when called, the way `obj.method(x)`
/// passes `obj` as the receiver.
fn bind_method(receiver: Value, callable: Value) -> Value {
    if !callable.is_callable() {
        return callable;
    }
    Value::Host(Rc::new(move |args: &[Value]| {
        let mut full_args = Vec::with_capacity(args.len() + 1);
        full_args.push(receiver.clone());
        full_args.extend_from_slice(args);
        apply_callable(callable.clone(), &full_args)
    }))
}

fn eval_let(
    args: &[Value],
    env: &Rc<Environment>,
    mut hook: Option<TickHook>,
) -> Result<(Value, Rc<Environment>), EvalError> {
    if args.len() != 2 {
        return Err(EvalError::malformed("let", "expected bindings and a body"));
    }
    let bindings = args[0]
        .as_list()
        .ok_or_else(|| EvalError::malformed("let", "bindings must be a list"))?;
    let scope = env.create();
    let mut i = 0;
    while i < bindings.len() {
        let name = bindings[i]
            .as_symbol()
            .ok_or_else(|| EvalError::malformed("let", "binding name must be a symbol"))?
            .to_string();
        let value = bindings
            .get(i + 1)
            .cloned()
            .map(|v| eval_value(v, &scope, reborrow(&mut hook)))
            .transpose()?
            .unwrap_or(Value::Nil);
        scope.define(name, value);
        i += 2;
    }
    Ok((args[1].clone(), scope))
}

fn eval_try(
    args: &[Value],
    env: &Rc<Environment>,
    mut hook: Option<TickHook>,
) -> Result<Value, EvalError> {
    if args.is_empty() {
        return Err(EvalError::malformed("try", "expected a body"));
    }
    match eval_value(args[0].clone(), env, reborrow(&mut hook)) {
        Ok(value) => Ok(value),
        Err(err) => {
            let Some(catch) = args.get(1).and_then(Value::as_list) else {
                return Ok(Value::Nil);
            };
            if catch.first().and_then(Value::as_symbol) != Some("catch") || catch.len() != 3 {
                return Ok(Value::Nil);
            }
            let arg_name = catch[1]
                .as_symbol()
                .ok_or_else(|| EvalError::malformed("try", "catch binding must be a symbol"))?
                .to_string();
            let scope = env.create();
            scope.define(arg_name, Value::Str(err.to_string()));
            evaluate_with_hook(catch[2].clone(), scope, reborrow(&mut hook))
        }
    }
}

/// Binds a lambda's parameter AST against already-evaluated call
/// arguments, producing the child scope the body evaluates in.
pub fn bind_function_scope(
    parent: &Rc<Environment>,
    param_defs: &Value,
    given: &[Value],
) -> Result<Rc<Environment>, EvalError> {
    let scope = parent.create();
    let defs = param_defs
        .as_list()
        .ok_or_else(|| EvalError::BadArgDef("parameter list must be a list".to_string()))?;

    let mut i = 0;
    while i < defs.len() {
        match &defs[i] {
            Value::Symbol(s) if s == "&" => {
                let rest_name = defs
                    .get(i + 1)
                    .and_then(Value::as_symbol)
                    .ok_or_else(|| EvalError::BadArgDef("'&' must be followed by a name".to_string()))?;
                scope.define(rest_name.to_string(), Value::List(given.get(i..).unwrap_or(&[]).to_vec()));
                break;
            }
            Value::List(items)
                if items.len() == 2 && items[0].as_symbol() == Some("&") =>
            {
                let rest_name = items[1]
                    .as_symbol()
                    .ok_or_else(|| EvalError::BadArgDef("'&' rest name must be a symbol".to_string()))?;
                scope.define(rest_name.to_string(), Value::List(given.get(i..).unwrap_or(&[]).to_vec()));
                break;
            }
            Value::List(items)
                if items.len() == 2 && items[0].as_symbol() == Some("...") =>
            {
                let rest_name = items[1]
                    .as_symbol()
                    .ok_or_else(|| EvalError::BadArgDef("'...' rest name must be a symbol".to_string()))?;
                scope.define(rest_name.to_string(), Value::List(given.get(i..).unwrap_or(&[]).to_vec()));
                break;
            }
            Value::List(items) if items.len() == 3 && items[0].as_symbol() == Some("def") => {
                let name = items[1]
                    .as_symbol()
                    .ok_or_else(|| EvalError::BadArgDef("default argument name must be a symbol".to_string()))?;
                let value = match given.get(i) {
                    Some(v) => v.clone(),
                    None => evaluate_with_hook(items[2].clone(), scope.clone(), None)?,
                };
                scope.define(name.to_string(), value);
            }
            Value::Symbol(name) => {
                scope.define(name.clone(), given.get(i).cloned().unwrap_or(Value::Nil));
            }
            other => return Err(EvalError::BadArgDef(format!("unrecognized parameter form: {other:?}"))),
        }
        i += 1;
    }
    Ok(scope)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn run(source: &str) -> Value {
        let ast = parse(source).unwrap_or_else(|e| panic!("parse error: {e}"));
        let env = Environment::root().create();
        install_test_bindings(&env);
        evaluate(ast, Some(env)).unwrap_or_else(|e| panic!("eval error: {e}"))
    }

    fn install_test_bindings(env: &Rc<Environment>) {
        env.define(
            "+".to_string(),
            Value::Host(Rc::new(|args: &[Value]| {
                numeric_fold(args, 0.0, |a, b| a + b)
            })),
        );
        env.define(
            "*".to_string(),
            Value::Host(Rc::new(|args: &[Value]| {
                numeric_fold(args, 1.0, |a, b| a * b)
            })),
        );
        env.define(
            "<".to_string(),
            Value::Host(Rc::new(|args: &[Value]| match (&args[0], &args[1]) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Bool(a < b)),
                _ => Err(EvalError::host_error("<", "expected two numbers")),
            })),
        );
        env.define(
            "-".to_string(),
            Value::Host(Rc::new(|args: &[Value]| match args {
                [Value::Number(a)] => Ok(Value::Number(-a)),
                [Value::Number(a), Value::Number(b)] => Ok(Value::Number(a - b)),
                _ => Err(EvalError::host_error("-", "expected one or two numbers")),
            })),
        );
    }

    fn numeric_fold(
        args: &[Value],
        init: f64,
        op: impl Fn(f64, f64) -> f64,
    ) -> Result<Value, EvalError> {
        let mut acc = init;
        for (i, a) in args.iter().enumerate() {
            match a {
                Value::Number(n) => acc = if i == 0 { *n } else { op(acc, *n) },
                other => return Err(EvalError::type_error("+", "number", other, i)),
            }
        }
        Ok(Value::Number(acc))
    }

    #[test]
    fn arithmetic_and_precedence() {
        assert!(matches!(run("1 + 1"), Value::Number(n) if n == 2.0));
        assert!(matches!(run("1 + 2 * 3"), Value::Number(n) if n == 7.0));
        assert!(matches!(run("(1 + 2) * 3"), Value::Number(n) if n == 9.0));
    }

    #[test]
    fn object_literal_and_member_get() {
        let result = run("{a: 1, b: 2}.a");
        assert!(matches!(result, Value::Number(n) if n == 1.0));
    }

    #[test]
    fn lambda_definition_and_call() {
        let result = run("f = x => x * x  f(5)");
        assert!(matches!(result, Value::Number(n) if n == 25.0));
    }

    #[test]
    fn conditional_then_else() {
        assert!(matches!(run("if 1 < 2 then 1 else 2"), Value::Number(n) if n == 1.0));
    }

    #[test]
    fn pipe_applies_lambda() {
        let result = run("(3, 4) -> ((x, y) => x + y)");
        assert!(matches!(result, Value::Number(n) if n == 7.0));
    }

    #[test]
    fn tail_recursive_lambda_runs_without_stack_growth() {
        let source = "count = (n, acc) => if n < 1 then acc else count(n + -1, acc + 1)  count(100000, 0)";
        let result = run(source);
        assert!(matches!(result, Value::Number(n) if n == 100000.0));
    }

    #[test]
    fn undefined_symbol_errors() {
        let ast = parse("missing").unwrap();
        let env = Environment::root().create();
        assert!(matches!(
            evaluate(ast, Some(env)),
            Err(EvalError::UndefinedSymbol(_))
        ));
    }

    #[test]
    fn not_indexable_on_non_object() {
        let ast = parse("x = 5  x.y").unwrap();
        let env = Environment::root().create();
        assert!(matches!(evaluate(ast, Some(env)), Err(EvalError::NotIndexable { .. })));
    }

    #[test]
    fn quote_and_macro_roundtrip() {
        assert!(matches!(run("`hello"), Value::Symbol(s) if s == "hello"));
    }

    #[test]
    fn empty_source_is_nil() {
        let ast = parse("").unwrap();
        let env = Environment::root().create();
        assert!(matches!(evaluate(ast, Some(env)).unwrap(), Value::Nil));
    }

    #[test]
    fn omitted_env_defaults_to_a_fresh_root_child() {
        let ast = parse("1 + 1").unwrap();
        assert!(matches!(
            evaluate(ast, None),
            Err(EvalError::UndefinedSymbol(_))
        ));
    }

    #[test]
    fn deeply_nested_list_does_not_overflow() {
        let mut src = String::new();
        for _ in 0..1000 {
            src.push('(');
        }
        src.push('1');
        for _ in 0..1000 {
            src.push(')');
        }
        assert!(matches!(run(&src), Value::Number(n) if n == 1.0));
    }
}
