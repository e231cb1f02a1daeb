// ABOUTME: Pratt parser turning a token stream into the nested-list AST

use crate::error::ParseError;
use crate::lexer::Lexer;
use crate::rules::{self, LBP_ASSIGN, LBP_COMMA, LBP_CONDITIONAL, LBP_MULTIPLICATIVE, LBP_UNARY};
use crate::token::{Token, TokenKind};
use crate::value::Value;

/// Sentinel head used only internally to carry an undisambiguated
/// parenthesized comma-group (`(a, b)`) forward to the `=>`/`->` led
/// handlers that care whether the group was a tuple. `$` never starts a
/// lexable identifier, so user source can never construct this shape.
const GROUP_HEAD: &str = "$group";

pub struct Parser {
    lexer: Lexer,
    current: Token,
    next: Token,
    saved: Option<(Token, Token)>,
    /// Best-effort record of completed top-level statements, attached to
    /// `ParseError` so a host can still render something for partially
    /// typed input.
    completed: Vec<Value>,
}

impl Parser {
    pub fn new(source: &str) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(source);
        let current = Self::lex(&mut lexer)?;
        let next = Self::lex(&mut lexer)?;
        Ok(Parser {
            lexer,
            current,
            next,
            saved: None,
            completed: Vec::new(),
        })
    }

    fn lex(lexer: &mut Lexer) -> Result<Token, ParseError> {
        lexer.next_token().map_err(|e| ParseError {
            message: e.to_string(),
            line: e.line,
            column: e.column,
            partial: Box::new(Value::Nil),
        })
    }

    fn advance(&mut self) -> Result<Token, ParseError> {
        let taken = std::mem::replace(&mut self.current, self.next.clone());
        self.next = Self::lex(&mut self.lexer)?;
        Ok(taken)
    }

    #[allow(dead_code)]
    fn save(&mut self) {
        self.lexer.save();
        self.saved = Some((self.current.clone(), self.next.clone()));
    }

    #[allow(dead_code)]
    fn restore(&mut self) {
        self.lexer.restore();
        if let Some((current, next)) = self.saved.take() {
            self.current = current;
            self.next = next;
        }
    }

    fn check(&self, kind: TokenKind, value: &str) -> bool {
        self.current.kind == kind && self.current.value == value
    }

    fn check_kind(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    fn accept(&mut self, kind: TokenKind, value: &str) -> Result<bool, ParseError> {
        if self.check(kind, value) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect(&mut self, kind: TokenKind, value: &str) -> Result<Token, ParseError> {
        if self.check(kind, value) {
            self.advance()
        } else {
            Err(self.error(format!(
                "expected {:?} {:?}, found {:?} {:?}",
                kind, value, self.current.kind, self.current.value
            )))
        }
    }

    fn expect_name(&mut self) -> Result<String, ParseError> {
        if self.check_kind(TokenKind::Name) {
            Ok(self.advance()?.value)
        } else {
            Err(self.error(format!(
                "expected a name, found {:?} {:?}",
                self.current.kind, self.current.value
            )))
        }
    }

    fn error(&self, message: String) -> ParseError {
        ParseError {
            message,
            line: self.current.line,
            column: self.current.column,
            partial: Box::new(self.partial_ast()),
        }
    }

    fn partial_ast(&self) -> Value {
        let mut items = vec![Value::symbol("do")];
        items.extend(self.completed.iter().cloned());
        Value::List(items)
    }

    /// `(` has a high default LBP (call), but a call only continues the
    /// left expression when no whitespace separates it from what came
    /// before -- otherwise it starts a fresh statement.
    fn effective_lbp(&self, token: &Token) -> u8 {
        if token.kind == TokenKind::Paren && token.value == "(" && !self.lexer.touches_previous(token.start) {
            rules::LBP_TERMINATOR
        } else {
            rules::lbp(token)
        }
    }

    pub fn parse(&mut self) -> Result<Value, ParseError> {
        if self.current.kind == TokenKind::Eof {
            return Ok(Value::Nil);
        }
        loop {
            let stmt = self.parse_expression(0)?;
            self.completed.push(stmt);
            let _ = self.accept(TokenKind::Semicolon, ";")?;
            if self.current.kind == TokenKind::Eof {
                break;
            }
        }
        if self.completed.len() == 1 {
            Ok(self.completed.pop().unwrap())
        } else {
            Ok(self.partial_ast())
        }
    }

    fn parse_expression(&mut self, rbp: u8) -> Result<Value, ParseError> {
        let token = self.advance()?;
        let mut left = self.nud(token)?;
        while rbp < self.effective_lbp(&self.current) {
            let token = self.advance()?;
            left = self.led(token, left)?;
        }
        Ok(left)
    }

    // ===== nud: tokens that start a (sub)expression =====

    fn nud(&mut self, token: Token) -> Result<Value, ParseError> {
        match token.kind {
            TokenKind::Number => {
                let n: f64 = token.value.parse().map_err(|_| {
                    self.error(format!("invalid number literal {:?}", token.value))
                })?;
                Ok(Value::Number(n))
            }
            TokenKind::String => Ok(Value::List(vec![Value::symbol("`"), Value::Str(token.value)])),
            TokenKind::Name => self.nud_name(token),
            TokenKind::Paren if token.value == "(" => self.nud_paren(),
            TokenKind::Bracket if token.value == "[" => self.nud_array(),
            TokenKind::Op if token.value == "{" => self.nud_object(),
            TokenKind::Op if token.value == "!" => {
                let operand = self.parse_expression(LBP_UNARY)?;
                Ok(Value::List(vec![Value::symbol("!"), operand]))
            }
            TokenKind::Op if token.value == "+" || token.value == "-" => {
                let operand = self.parse_expression(LBP_UNARY)?;
                Ok(Value::List(vec![Value::symbol(token.value), operand]))
            }
            TokenKind::Op if token.value == "`" => {
                let quoted = self.parse_expression(LBP_UNARY)?;
                Ok(Value::List(vec![Value::symbol("`"), quoted]))
            }
            TokenKind::Op if token.value == "~" => {
                let target = self.parse_expression(LBP_UNARY)?;
                Ok(Value::List(vec![Value::symbol("macro"), target]))
            }
            TokenKind::Op if token.value == "..." => {
                let inner = self.parse_expression(LBP_UNARY)?;
                Ok(Value::List(vec![Value::symbol("..."), inner]))
            }
            TokenKind::Op if token.value == "&" => {
                let name = self.expect_name()?;
                Ok(Value::List(vec![Value::symbol("&"), Value::symbol(name)]))
            }
            _ => Err(self.error(format!(
                "unexpected token {:?} {:?}",
                token.kind, token.value
            ))),
        }
    }

    fn nud_name(&mut self, token: Token) -> Result<Value, ParseError> {
        match token.value.as_str() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            "nil" => Ok(Value::Nil),
            "not" => {
                let operand = self.parse_expression(LBP_UNARY)?;
                Ok(Value::List(vec![Value::symbol("!"), operand]))
            }
            "if" => self.nud_if(),
            "macro" => {
                let target = self.parse_expression(LBP_UNARY)?;
                Ok(Value::List(vec![Value::symbol("macro"), target]))
            }
            "lambda" => self.nud_lambda_keyword(),
            _ => Ok(Value::symbol(token.value)),
        }
    }

    fn nud_if(&mut self) -> Result<Value, ParseError> {
        let cond = self.parse_expression(LBP_CONDITIONAL)?;
        let _ = self.accept(TokenKind::Name, "then")?;
        let then_branch = self.parse_expression(LBP_CONDITIONAL)?;
        let mut items = vec![Value::symbol("if"), cond, then_branch];
        if self.accept(TokenKind::Name, "else")? {
            items.push(self.parse_expression(LBP_CONDITIONAL)?);
        }
        Ok(Value::List(items))
    }

    /// `lambda (params) body` -- the keyword spelling of the arrow form,
    /// kept for parity with the reserved-word table.
    fn nud_lambda_keyword(&mut self) -> Result<Value, ParseError> {
        let params = if self.check(TokenKind::Paren, "(") {
            match self.nud_paren()? {
                Value::List(items) if is_group(&items) => Value::List(items[1..].to_vec()),
                single => Value::List(vec![single]),
            }
        } else {
            let name = self.expect_name()?;
            Value::List(vec![Value::symbol(name)])
        };
        let body = self.parse_expression(0)?;
        Ok(Value::List(vec![Value::symbol("lambda"), params, body]))
    }

    /// Parses `( ... )`. Disambiguates, once the close paren is seen,
    /// between plain grouping, an empty/tuple group destined for `=>`
    /// or `->`, and a multi-item group used standalone (treated as a
    /// list literal).
    fn nud_paren(&mut self) -> Result<Value, ParseError> {
        self.expect(TokenKind::Paren, "(")?;
        let mut items = Vec::new();
        if !self.check(TokenKind::Paren, ")") {
            loop {
                items.push(self.parse_expression(LBP_COMMA)?);
                if !self.accept(TokenKind::Comma, ",")? {
                    break;
                }
            }
        }
        self.expect(TokenKind::Paren, ")")?;

        if self.check(TokenKind::Op, "=>") || self.check(TokenKind::Op, "->") {
            let mut group = vec![Value::symbol(GROUP_HEAD)];
            group.extend(items);
            return Ok(Value::List(group));
        }
        match items.len() {
            1 => Ok(items.into_iter().next().unwrap()),
            0 => Ok(Value::List(vec![Value::symbol(GROUP_HEAD)])),
            _ => {
                let mut list = vec![Value::symbol("list")];
                list.extend(items);
                Ok(Value::List(list))
            }
        }
    }

    fn nud_array(&mut self) -> Result<Value, ParseError> {
        self.expect(TokenKind::Bracket, "[")?;
        let mut items = vec![Value::symbol("list")];
        if !self.check(TokenKind::Bracket, "]") {
            loop {
                items.push(self.parse_expression(LBP_COMMA)?);
                if !self.accept(TokenKind::Comma, ",")? {
                    break;
                }
            }
        }
        self.expect(TokenKind::Bracket, "]")?;
        Ok(Value::List(items))
    }

    /// `{ k: v, k2, ...rest }` -> `['obj', [k1, v1], ['...', rest], ...]`.
    /// Pairs are collected then reversed before emission, matching the
    /// shape the stack-based original parser produces.
    fn nud_object(&mut self) -> Result<Value, ParseError> {
        self.expect(TokenKind::Op, "{")?;
        let mut entries = Vec::new();
        if !self.check(TokenKind::Op, "}") {
            loop {
                if self.check(TokenKind::Op, "...") {
                    self.advance()?;
                    let spread = self.parse_expression(LBP_COMMA)?;
                    entries.push(Value::List(vec![Value::symbol("..."), spread]));
                } else {
                    let key = self.parse_object_key()?;
                    if self.accept(TokenKind::Op, ":")? {
                        let value = self.parse_expression(LBP_COMMA)?;
                        entries.push(Value::List(vec![key, value]));
                    } else {
                        // bare `{ name }` shorthand: value is the identifier itself
                        let shorthand_value = match &key {
                            Value::Str(name) => Value::symbol(name.clone()),
                            other => other.clone(),
                        };
                        entries.push(Value::List(vec![key, shorthand_value]));
                    }
                }
                if !self.accept(TokenKind::Comma, ",")? {
                    break;
                }
            }
        }
        self.expect(TokenKind::Op, "}")?;
        entries.reverse();
        let mut result = vec![Value::symbol("obj")];
        result.extend(entries);
        Ok(Value::List(result))
    }

    fn parse_object_key(&mut self) -> Result<Value, ParseError> {
        if self.check(TokenKind::Paren, "(") {
            self.advance()?;
            let key = self.parse_expression(0)?;
            self.expect(TokenKind::Paren, ")")?;
            return Ok(key);
        }
        if self.check_kind(TokenKind::Name) {
            let name = self.advance()?.value;
            return Ok(Value::Str(name));
        }
        if self.check_kind(TokenKind::Number) {
            let n = self.advance()?.value;
            return Ok(Value::Str(n));
        }
        if self.check_kind(TokenKind::String) {
            let s = self.advance()?.value;
            return Ok(Value::Str(s));
        }
        Err(self.error(format!(
            "expected an object key, found {:?} {:?}",
            self.current.kind, self.current.value
        )))
    }

    // ===== led: tokens that continue an expression already parsed =====

    fn led(&mut self, token: Token, left: Value) -> Result<Value, ParseError> {
        match token.kind {
            TokenKind::Paren if token.value == "(" => self.led_call(left),
            TokenKind::Bracket if token.value == "[" => self.led_index(left),
            TokenKind::Comma => {
                // Only reached when a comma list is parsed outside any
                // bracketing construct; treat it as a list literal.
                let mut items = vec![Value::symbol("list"), left];
                loop {
                    items.push(self.parse_expression(LBP_COMMA)?);
                    if !self.accept(TokenKind::Comma, ",")? {
                        break;
                    }
                }
                Ok(Value::List(items))
            }
            TokenKind::Name if token.value == "and" => {
                let rhs = self.parse_expression(rules::LBP_LOGICAL)?;
                Ok(Value::List(vec![Value::symbol("&&"), left, rhs]))
            }
            TokenKind::Name if token.value == "or" => {
                let rhs = self.parse_expression(rules::LBP_LOGICAL)?;
                Ok(Value::List(vec![Value::symbol("||"), left, rhs]))
            }
            TokenKind::Name if token.value == "in" => {
                let rhs = self.parse_expression(rules::LBP_COMPARISON)?;
                Ok(Value::List(vec![Value::symbol("in"), left, rhs]))
            }
            TokenKind::Op => self.led_op(token, left),
            _ => Err(self.error(format!(
                "unexpected token {:?} {:?} in operator position",
                token.kind, token.value
            ))),
        }
    }

    fn led_op(&mut self, token: Token, left: Value) -> Result<Value, ParseError> {
        match token.value.as_str() {
            "." => self.led_member(left),
            "=" => {
                let rhs = self.parse_expression(LBP_ASSIGN - 1)?;
                Ok(self.make_assignment(left, rhs))
            }
            "+=" | "-=" | "*=" | "/=" => {
                let op = &token.value[..1];
                let rhs = self.parse_expression(LBP_ASSIGN - 1)?;
                let combined = Value::List(vec![Value::symbol(op), left.clone(), rhs]);
                Ok(self.make_assignment(left, combined))
            }
            "++" | "--" => {
                let op = &token.value[..1];
                let combined =
                    Value::List(vec![Value::symbol(op), left.clone(), Value::Number(1.0)]);
                Ok(self.make_assignment(left, combined))
            }
            "?" => {
                let then_branch = self.parse_expression(LBP_CONDITIONAL)?;
                self.expect(TokenKind::Op, ":")?;
                let else_branch = self.parse_expression(LBP_CONDITIONAL)?;
                Ok(Value::List(vec![
                    Value::symbol("if"),
                    left,
                    then_branch,
                    else_branch,
                ]))
            }
            "||" => {
                let rhs = self.parse_expression(rules::LBP_LOGICAL)?;
                Ok(Value::List(vec![Value::symbol("||"), left, rhs]))
            }
            "&&" => {
                let rhs = self.parse_expression(rules::LBP_LOGICAL)?;
                Ok(Value::List(vec![Value::symbol("&&"), left, rhs]))
            }
            "==" | "===" | "!=" | "!==" | "<" | "<=" | ">" | ">=" => {
                let rhs = self.parse_expression(rules::LBP_COMPARISON)?;
                let canon = match token.value.as_str() {
                    "===" => "==",
                    "!==" => "!=",
                    other => other,
                };
                Ok(Value::List(vec![Value::symbol(canon), left, rhs]))
            }
            "+" | "-" => {
                let rhs = self.parse_expression(rules::LBP_ADDITIVE)?;
                Ok(Value::List(vec![Value::symbol(token.value), left, rhs]))
            }
            "*" | "/" | "%" => {
                let rhs = self.parse_expression(LBP_MULTIPLICATIVE)?;
                Ok(Value::List(vec![Value::symbol(token.value), left, rhs]))
            }
            "->" => self.led_pipe(left),
            "=>" => self.led_lambda(left),
            "!" => Ok(Value::List(vec![Value::symbol("!"), left])),
            other => Err(self.error(format!("unexpected operator {other:?}"))),
        }
    }

    fn make_assignment(&self, target: Value, value: Value) -> Value {
        Value::List(vec![Value::symbol("def"), target, value])
    }

    fn led_member(&mut self, left: Value) -> Result<Value, ParseError> {
        let member = if self.accept(TokenKind::Paren, "(")? {
            let key = self.parse_expression(0)?;
            self.expect(TokenKind::Paren, ")")?;
            key
        } else {
            let name = self.expect_name()?;
            Value::List(vec![Value::symbol("`"), Value::symbol(name)])
        };
        self.append_get(left, member)
    }

    fn led_index(&mut self, left: Value) -> Result<Value, ParseError> {
        let key = self.parse_expression(0)?;
        self.expect(TokenKind::Bracket, "]")?;
        self.append_get(left, key)
    }

    fn append_get(&self, left: Value, member: Value) -> Result<Value, ParseError> {
        match left {
            Value::List(mut items) if items.first().and_then(Value::as_symbol) == Some("get") => {
                items.push(member);
                Ok(Value::List(items))
            }
            other => Ok(Value::List(vec![Value::symbol("get"), other, member])),
        }
    }

    fn led_call(&mut self, left: Value) -> Result<Value, ParseError> {
        self.expect(TokenKind::Paren, "(")?;
        let mut items = vec![left];
        if !self.check(TokenKind::Paren, ")") {
            loop {
                items.push(self.parse_expression(LBP_COMMA)?);
                if !self.accept(TokenKind::Comma, ",")? {
                    break;
                }
            }
        }
        self.expect(TokenKind::Paren, ")")?;
        Ok(Value::List(items))
    }

    fn led_lambda(&mut self, left: Value) -> Result<Value, ParseError> {
        let params = match left {
            Value::List(items) if is_group(&items) => Value::List(items[1..].to_vec()),
            other => Value::List(vec![other]),
        };
        let body = self.parse_expression(0)?;
        Ok(Value::List(vec![Value::symbol("lambda"), params, body]))
    }

    fn led_pipe(&mut self, left: Value) -> Result<Value, ParseError> {
        let args = match left {
            Value::List(items) if is_group(&items) => items[1..].to_vec(),
            other => vec![other],
        };
        let rhs = self.parse_expression(LBP_MULTIPLICATIVE)?;
        Ok(match rhs {
            Value::List(items) if items.first().and_then(Value::as_symbol) == Some("lambda") => {
                let mut call = vec![Value::List(items)];
                call.extend(args);
                Value::List(call)
            }
            Value::List(items) if !items.is_empty() => {
                let mut call = vec![items[0].clone()];
                call.extend(args);
                call.extend(items[1..].iter().cloned());
                Value::List(call)
            }
            other => {
                let mut call = vec![other];
                call.extend(args);
                Value::List(call)
            }
        })
    }
}

fn is_group(items: &[Value]) -> bool {
    matches!(items.first().and_then(Value::as_symbol), Some(GROUP_HEAD))
}

/// Parses `source` into an Expreva AST.
pub fn parse(source: &str) -> Result<Value, ParseError> {
    let mut parser = Parser::new(source)?;
    parser.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(src: &str) -> Value {
        parse(src).unwrap_or_else(|e| panic!("parse failed for {src:?}: {e}"))
    }

    fn list(items: Vec<Value>) -> Value {
        Value::List(items)
    }

    fn eq(a: &Value, b: &Value) -> bool {
        format!("{a:?}") == format!("{b:?}")
    }

    #[test]
    fn parses_number_literal() {
        assert!(matches!(p("42"), Value::Number(n) if n == 42.0));
    }

    #[test]
    fn parses_string_literal_as_quoted() {
        let ast = p("'hi'");
        assert!(matches!(
            &ast,
            Value::List(items) if items[0].as_symbol() == Some("`")
        ));
    }

    #[test]
    fn respects_precedence() {
        let ast = p("1 + 2 * 3");
        let expected = list(vec![
            Value::symbol("+"),
            Value::Number(1.0),
            list(vec![Value::symbol("*"), Value::Number(2.0), Value::Number(3.0)]),
        ]);
        assert!(eq(&ast, &expected));
    }

    #[test]
    fn parens_override_precedence() {
        let ast = p("(1 + 2) * 3");
        let expected = list(vec![
            Value::symbol("*"),
            list(vec![Value::symbol("+"), Value::Number(1.0), Value::Number(2.0)]),
            Value::Number(3.0),
        ]);
        assert!(eq(&ast, &expected));
    }

    #[test]
    fn parses_assignment() {
        let ast = p("x = 1");
        let expected = list(vec![Value::symbol("def"), Value::symbol("x"), Value::Number(1.0)]);
        assert!(eq(&ast, &expected));
    }

    #[test]
    fn parses_member_assignment() {
        let ast = p("a.b = 1");
        let target = list(vec![
            Value::symbol("get"),
            Value::symbol("a"),
            list(vec![Value::symbol("`"), Value::symbol("b")]),
        ]);
        let expected = list(vec![Value::symbol("def"), target, Value::Number(1.0)]);
        assert!(eq(&ast, &expected));
    }

    #[test]
    fn parses_lambda_arrow() {
        let ast = p("x => x * x");
        let expected = list(vec![
            Value::symbol("lambda"),
            list(vec![Value::symbol("x")]),
            list(vec![Value::symbol("*"), Value::symbol("x"), Value::symbol("x")]),
        ]);
        assert!(eq(&ast, &expected));
    }

    #[test]
    fn parses_multi_arg_lambda() {
        let ast = p("(x, y) => x + y");
        let expected = list(vec![
            Value::symbol("lambda"),
            list(vec![Value::symbol("x"), Value::symbol("y")]),
            list(vec![Value::symbol("+"), Value::symbol("x"), Value::symbol("y")]),
        ]);
        assert!(eq(&ast, &expected));
    }

    #[test]
    fn parses_call() {
        let ast = p("f(5)");
        let expected = list(vec![Value::symbol("f"), Value::Number(5.0)]);
        assert!(eq(&ast, &expected));
    }

    #[test]
    fn parses_pipe_to_named_function() {
        let ast = p("x -> f");
        let expected = list(vec![Value::symbol("f"), Value::symbol("x")]);
        assert!(eq(&ast, &expected));
    }

    #[test]
    fn parses_pipe_to_call() {
        let ast = p("x -> f(y)");
        let expected = list(vec![Value::symbol("f"), Value::symbol("x"), Value::symbol("y")]);
        assert!(eq(&ast, &expected));
    }

    #[test]
    fn parses_pipe_with_tuple_args() {
        let ast = p("(3, 4) -> ((x, y) => x + y)");
        match ast {
            Value::List(items) => {
                assert!(matches!(&items[0], Value::List(l) if l[0].as_symbol() == Some("lambda")));
                assert!(matches!(items[1], Value::Number(n) if n == 3.0));
                assert!(matches!(items[2], Value::Number(n) if n == 4.0));
            }
            other => panic!("unexpected ast {other:?}"),
        }
    }

    #[test]
    fn parses_array_literal() {
        let ast = p("[1, 2, 3]");
        let expected = list(vec![
            Value::symbol("list"),
            Value::Number(1.0),
            Value::Number(2.0),
            Value::Number(3.0),
        ]);
        assert!(eq(&ast, &expected));
    }

    #[test]
    fn parses_object_literal_with_shorthand_and_reversal() {
        let ast = p("{a: 1, b}");
        // pairs are collected then reversed before emission
        let expected = list(vec![
            Value::symbol("obj"),
            list(vec![Value::Str("b".to_string()), Value::symbol("b")]),
            list(vec![Value::Str("a".to_string()), Value::Number(1.0)]),
        ]);
        assert!(eq(&ast, &expected));
    }

    #[test]
    fn parses_conditional_ternary() {
        let ast = p("1 < 2 ? 'yes' : 'no'");
        match ast {
            Value::List(items) => assert_eq!(items[0].as_symbol(), Some("if")),
            other => panic!("unexpected ast {other:?}"),
        }
    }

    #[test]
    fn parses_if_then_else_keyword_form() {
        let ast = p("if 1 < 2 then 'yes' else 'no'");
        match ast {
            Value::List(items) => {
                assert_eq!(items[0].as_symbol(), Some("if"));
                assert_eq!(items.len(), 4);
            }
            other => panic!("unexpected ast {other:?}"),
        }
    }

    #[test]
    fn parses_logical_keywords() {
        let ast = p("a and b");
        let expected = list(vec![Value::symbol("&&"), Value::symbol("a"), Value::symbol("b")]);
        assert!(eq(&ast, &expected));

        let ast = p("not a");
        let expected = list(vec![Value::symbol("!"), Value::symbol("a")]);
        assert!(eq(&ast, &expected));
    }

    #[test]
    fn parses_compound_assignment() {
        let ast = p("x += 1");
        let expected = list(vec![
            Value::symbol("def"),
            Value::symbol("x"),
            list(vec![Value::symbol("+"), Value::symbol("x"), Value::Number(1.0)]),
        ]);
        assert!(eq(&ast, &expected));
    }

    #[test]
    fn parses_postfix_increment() {
        let ast = p("x++");
        let expected = list(vec![
            Value::symbol("def"),
            Value::symbol("x"),
            list(vec![Value::symbol("+"), Value::symbol("x"), Value::Number(1.0)]),
        ]);
        assert!(eq(&ast, &expected));
    }

    #[test]
    fn call_requires_no_preceding_whitespace() {
        // two statements: `a` and grouped `(b)`, not a call `a(b)`
        let ast = p("a (b)");
        let expected = list(vec![Value::symbol("do"), Value::symbol("a"), Value::symbol("b")]);
        assert!(eq(&ast, &expected));
    }

    #[test]
    fn multi_statement_whitespace_separated() {
        let ast = p("a = {} a.b = 'hi' a");
        match ast {
            Value::List(items) => {
                assert_eq!(items[0].as_symbol(), Some("do"));
                assert_eq!(items.len(), 4);
            }
            other => panic!("unexpected ast {other:?}"),
        }
    }

    #[test]
    fn empty_source_parses_to_nil() {
        assert!(matches!(p(""), Value::Nil));
    }

    #[test]
    fn parses_rest_and_default_params() {
        let ast = p("(a, b = 1, &rest) => a");
        match ast {
            Value::List(items) => {
                let params = items[1].as_list().unwrap();
                assert_eq!(params[0].as_symbol(), Some("a"));
                assert!(matches!(&params[1], Value::List(l) if l[0].as_symbol() == Some("def")));
                assert!(matches!(&params[2], Value::List(l) if l[0].as_symbol() == Some("&")));
            }
            other => panic!("unexpected ast {other:?}"),
        }
    }

    #[test]
    fn parse_error_carries_partial_ast() {
        let err = parse("x = ").unwrap_err();
        assert!(matches!(*err.partial, Value::List(_)));
    }
}
