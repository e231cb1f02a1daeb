// ABOUTME: Lexer turning source text into a token stream via an ordered rule table

use crate::error::LexError;
use crate::token::{Token, TokenKind};

/// Multi-character operators, longest match first so that e.g. `==` is
/// not lexed as two `=` tokens. Single-character operators are tried
/// after this list exhausts.
const MULTI_CHAR_OPS: &[&str] = &[
    "...", "===", "!==", "==", "!=", "<=", ">=", "&&", "||", "++", "--", "+=", "-=", "*=", "/=",
    "->", "=>",
];

const SINGLE_CHAR_OPS: &str = "+-*/%^=<>!&|.?:~`";

/// Walks `source` left-to-right, producing tokens by matching the first
/// rule from an ordered table anchored at the current position:
/// whitespace/comments, numbers, strings, identifiers, multi-char
/// operators, single-char operators, brackets, separators.
pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
    /// Single-slot bookmark used by the parser for the two local
    /// disambiguations the grammar needs (`x -> y` vs `x -> y => body`,
    /// and prefix-operator vs grouped-call). A deeper stack of saves is
    /// never needed.
    bookmark: Option<(usize, usize, usize)>,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Lexer {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            bookmark: None,
        }
    }

    pub fn save(&mut self) {
        self.bookmark = Some((self.pos, self.line, self.column));
    }

    pub fn restore(&mut self) {
        if let Some((pos, line, column)) = self.bookmark.take() {
            self.pos = pos;
            self.line = line;
            self.column = column;
        }
    }

    pub fn position(&self) -> (usize, usize) {
        (self.line, self.column)
    }

    /// True if the byte immediately preceding `pos` in the source is not
    /// whitespace -- used by the parser to tell `f(x)` (call) from
    /// `f (x)` (grouping) by peeking the raw character before a `(`.
    pub fn touches_previous(&self, pos: usize) -> bool {
        pos > 0 && !self.chars[pos - 1].is_whitespace()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.advance();
                }
                Some('/') if self.peek_at(1) == Some('/') => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                Some('/') if self.peek_at(1) == Some('*') => {
                    self.advance();
                    self.advance();
                    while let Some(c) = self.peek() {
                        if c == '*' && self.peek_at(1) == Some('/') {
                            self.advance();
                            self.advance();
                            break;
                        }
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    /// Produces the next token, or `Eof` once the input is exhausted.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace_and_comments();

        let start = self.pos;
        let (line, column) = self.position();

        let Some(c) = self.peek() else {
            return Ok(Token::eof(line, column, start));
        };

        if c.is_ascii_digit() || (c == '.' && self.peek_at(1).is_some_and(|d| d.is_ascii_digit()))
        {
            return Ok(self.lex_number(start, line, column));
        }

        if c == '"' || c == '\'' {
            return self.lex_string(c, start, line, column);
        }

        if c.is_alphabetic() || c == '_' {
            return Ok(self.lex_name(start, line, column));
        }

        if c == '(' || c == ')' {
            self.advance();
            return Ok(self.make_token(TokenKind::Paren, c.to_string(), start, line, column));
        }

        if c == '[' || c == ']' {
            self.advance();
            return Ok(self.make_token(TokenKind::Bracket, c.to_string(), start, line, column));
        }

        if c == ',' {
            self.advance();
            return Ok(self.make_token(TokenKind::Comma, c.to_string(), start, line, column));
        }

        if c == ';' {
            self.advance();
            return Ok(self.make_token(TokenKind::Semicolon, c.to_string(), start, line, column));
        }

        // `{` and `}` are generic operator punctuation: the object-literal
        // grammar disambiguates by parse position, not by token kind.
        if c == '{' || c == '}' {
            self.advance();
            return Ok(self.make_token(TokenKind::Op, c.to_string(), start, line, column));
        }

        if let Some(op) = self.match_multi_char_op() {
            return Ok(self.make_token(TokenKind::Op, op, start, line, column));
        }

        if SINGLE_CHAR_OPS.contains(c) {
            self.advance();
            return Ok(self.make_token(TokenKind::Op, c.to_string(), start, line, column));
        }

        Err(LexError {
            character: c,
            line,
            column,
        })
    }

    fn match_multi_char_op(&mut self) -> Option<String> {
        for op in MULTI_CHAR_OPS {
            let chars: Vec<char> = op.chars().collect();
            if chars
                .iter()
                .enumerate()
                .all(|(i, &ch)| self.peek_at(i) == Some(ch))
            {
                for _ in 0..chars.len() {
                    self.advance();
                }
                return Some((*op).to_string());
            }
        }
        None
    }

    fn lex_number(&mut self, start: usize, line: usize, column: usize) -> Token {
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                text.push(c);
                self.advance();
            } else {
                break;
            }
        }
        if self.peek() == Some('.') && self.peek_at(1).is_some_and(|d| d.is_ascii_digit()) {
            text.push('.');
            self.advance();
            while let Some(c) = self.peek() {
                if c.is_ascii_digit() {
                    text.push(c);
                    self.advance();
                } else {
                    break;
                }
            }
        } else if self.peek() == Some('.') && text.is_empty() {
            text.push('.');
            self.advance();
            while let Some(c) = self.peek() {
                if c.is_ascii_digit() {
                    text.push(c);
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.make_token(TokenKind::Number, text, start, line, column)
    }

    /// Decodes a single- or double-quoted string literal with backslash
    /// escapes, via the same escape table JSON strings use.
    fn lex_string(
        &mut self,
        quote: char,
        start: usize,
        line: usize,
        column: usize,
    ) -> Result<Token, LexError> {
        self.advance(); // opening quote
        let mut value = String::new();
        loop {
            match self.peek() {
                None => break,
                Some(c) if c == quote => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    match self.advance() {
                        Some('n') => value.push('\n'),
                        Some('t') => value.push('\t'),
                        Some('r') => value.push('\r'),
                        Some('b') => value.push('\u{8}'),
                        Some('f') => value.push('\u{C}'),
                        Some('"') => value.push('"'),
                        Some('\'') => value.push('\''),
                        Some('\\') => value.push('\\'),
                        Some('/') => value.push('/'),
                        Some('u') => {
                            let mut hex = String::new();
                            for _ in 0..4 {
                                if let Some(h) = self.advance() {
                                    hex.push(h);
                                }
                            }
                            if let Ok(code) = u32::from_str_radix(&hex, 16) {
                                if let Some(ch) = char::from_u32(code) {
                                    value.push(ch);
                                }
                            }
                        }
                        Some(other) => value.push(other),
                        None => break,
                    }
                }
                Some(c) => {
                    value.push(c);
                    self.advance();
                }
            }
        }
        Ok(self.make_token(TokenKind::String, value, start, line, column))
    }

    fn lex_name(&mut self, start: usize, line: usize, column: usize) -> Token {
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                text.push(c);
                self.advance();
            } else {
                break;
            }
        }
        self.make_token(TokenKind::Name, text, start, line, column)
    }

    fn make_token(
        &self,
        kind: TokenKind,
        value: String,
        start: usize,
        line: usize,
        column: usize,
    ) -> Token {
        Token {
            kind,
            value,
            line,
            column,
            start,
            end: self.pos,
        }
    }
}

/// `(kind, pattern)` pairs in the same order the lexer tries them, for
/// the editor/highlighter collaborator's syntax-highlighting mode.
pub fn get_token_types() -> Vec<(TokenKind, &'static str)> {
    let mut types = vec![
        (TokenKind::Number, r"\d+(\.\d+)?|\.\d+"),
        (TokenKind::String, r#""([^"\\]|\\.)*"|'([^'\\]|\\.)*'"#),
        (TokenKind::Name, r"[A-Za-z_][A-Za-z0-9_]*"),
    ];
    for op in MULTI_CHAR_OPS {
        types.push((TokenKind::Op, op));
    }
    types.push((TokenKind::Op, SINGLE_CHAR_OPS));
    types.push((TokenKind::Paren, r"[()]"));
    types.push((TokenKind::Bracket, r"[\[\]]"));
    types.push((TokenKind::Comma, r","));
    types.push((TokenKind::Semicolon, r";"));
    types
}
