use std::collections::VecDeque;

use sema_core::error::{Result, SemaError};
use sema_core::token::{Token, TokenKind};

const TWO_CHAR_OPS: [&str; 9] = ["->", "=>", "==", "!=", "<=", ">=", "||", "&&", ":="];

/// Streaming tokenizer. Whitespace between tokens becomes the next token's
/// `leading_space`. Replacement text supplied via `inject` is re-tokenized
/// into a pending queue that is drained before the primary source resumes.
pub struct Tokenizer {
    src: Vec<char>,
    pos: usize,
    pending: VecDeque<Token>,
    trailing_space: String,
}

impl Tokenizer {
    pub fn new(src: &str) -> Self {
        Tokenizer {
            src: src.chars().collect(),
            pos: 0,
            pending: VecDeque::new(),
            trailing_space: String::new(),
        }
    }

    /// Replaces the token just emitted: re-tokenizes `replacement` and queues
    /// the resulting tokens ahead of the primary source. Malformed constructs
    /// inside the replacement are swallowed, not propagated.
    pub fn inject(&mut self, replacement: &str) {
        self.inject_with_space(replacement, "");
    }

    /// As `inject`, but the first replacement token inherits the given
    /// leading space (usually the replaced token's).
    pub fn inject_with_space(&mut self, replacement: &str, space: &str) {
        let mut sub = Tokenizer::new(replacement);
        let mut first = true;
        while let Ok(Some(mut tok)) = sub.next_token() {
            if first {
                tok.leading_space = format!("{}{}", space, tok.leading_space);
                first = false;
            }
            self.pending.push_back(tok);
        }
    }

    /// Whitespace left over at end of input, for span `trailing_space`.
    pub fn take_trailing_space(&mut self) -> String {
        std::mem::take(&mut self.trailing_space)
    }

    fn peek(&self) -> Option<char> {
        self.src.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn two_char_op(&self) -> Option<&'static str> {
        if self.pos + 1 >= self.src.len() {
            return None;
        }
        let pair: String = self.src[self.pos..self.pos + 2].iter().collect();
        TWO_CHAR_OPS.iter().copied().find(|op| *op == pair)
    }

    pub fn next_token(&mut self) -> Result<Option<Token>> {
        if let Some(tok) = self.pending.pop_front() {
            return Ok(Some(tok));
        }

        let mut space = String::new();
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            space.push(self.bump().unwrap_or(' '));
        }

        let c = match self.peek() {
            Some(c) => c,
            None => {
                self.trailing_space.push_str(&space);
                return Ok(None);
            }
        };

        let tok = if c.is_ascii_digit() {
            let mut text = String::new();
            while matches!(self.peek(), Some(d) if d.is_ascii_digit()) {
                text.push(self.bump().unwrap_or('0'));
            }
            Token::with_space(TokenKind::Number, text, space)
        } else if c == '"' {
            let mut text = String::from(self.bump().unwrap_or('"'));
            let mut closed = false;
            while let Some(ch) = self.bump() {
                text.push(ch);
                if ch == '\\' {
                    if let Some(esc) = self.bump() {
                        text.push(esc);
                    }
                } else if ch == '"' {
                    closed = true;
                    break;
                }
            }
            if !closed {
                return Err(SemaError::Syntax(format!("unterminated string: {}", text)));
            }
            Token::with_space(TokenKind::Str, text, space)
        } else if c == 'λ' {
            // λx splits into the introducer plus a name token.
            self.bump();
            Token::with_space(TokenKind::Operator, "λ", space)
        } else if is_name_start(c) {
            let mut text = String::new();
            while matches!(self.peek(), Some(ch) if is_name_continue(ch)) {
                text.push(self.bump().unwrap_or('_'));
            }
            Token::with_space(TokenKind::Name, text, space)
        } else if sema_core::token::DELIMS.iter().any(|(o, cl)| o.chars().next() == Some(c) || cl.chars().next() == Some(c)) {
            self.bump();
            Token::with_space(TokenKind::Delimiter, c.to_string(), space)
        } else if let Some(op) = self.two_char_op() {
            self.pos += 2;
            Token::with_space(TokenKind::Operator, op, space)
        } else {
            self.bump();
            Token::with_space(TokenKind::Operator, c.to_string(), space)
        };
        Ok(Some(tok))
    }
}

fn is_name_start(c: char) -> bool {
    (c.is_alphabetic() && c != 'λ') || c == '_'
}

fn is_name_continue(c: char) -> bool {
    (c.is_alphanumeric() && c != 'λ') || c == '_' || c == '\''
}
