use serde::{Deserialize, Serialize};

use crate::token::Token;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SpanKind {
    #[default]
    Plain,
    /// Marked when the span opens with a lambda introducer, e.g. `[λx. x]`.
    Lambda,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SpanItem {
    Token(Token),
    Span(Span),
}

impl SpanItem {
    pub fn as_token(&self) -> Option<&Token> {
        match self {
            SpanItem::Token(t) => Some(t),
            SpanItem::Span(_) => None,
        }
    }

    /// Text of a token item; `None` for nested spans.
    pub fn token_text(&self) -> Option<&str> {
        self.as_token().map(|t| t.text.as_str())
    }

    pub fn is_delim(&self) -> bool {
        matches!(self, SpanItem::Token(t) if t.is_delim())
    }
}

/// An ordered sequence of tokens and nested spans, produced by matching
/// open/close delimiter pairs. Delimiters are kept in the span (open first,
/// close last) so `source` reproduces the input text exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Span {
    pub kind: SpanKind,
    pub items: Vec<SpanItem>,
    pub trailing_space: String,
}

impl Span {
    pub fn new() -> Self {
        Span::default()
    }

    pub fn push_token(&mut self, t: Token) {
        self.items.push(SpanItem::Token(t));
    }

    pub fn push_span(&mut self, s: Span) {
        self.items.push(SpanItem::Span(s));
    }

    pub fn is_lambda(&self) -> bool {
        self.kind == SpanKind::Lambda
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Depth-first iterator over the span's leaf tokens.
    pub fn leaves(&self) -> Leaves<'_> {
        Leaves { stack: vec![self.items.iter()] }
    }

    /// The span's effective leading space is its first leaf's, by delegation.
    pub fn leading_space(&self) -> &str {
        self.leaves().next().map(|t| t.leading_space.as_str()).unwrap_or("")
    }

    pub fn set_leading_space(&mut self, space: impl Into<String>) {
        if let Some(first) = self.items.first_mut() {
            match first {
                SpanItem::Token(t) => t.leading_space = space.into(),
                SpanItem::Span(s) => s.set_leading_space(space),
            }
        }
    }

    /// Exact surface text: every leaf with its leading space, then the
    /// trailing space. `parse` then `source` round-trips the input.
    pub fn source(&self) -> String {
        let mut out = String::new();
        for t in self.leaves() {
            out.push_str(&t.leading_space);
            out.push_str(&t.text);
        }
        out.push_str(&self.trailing_space);
        out
    }

    /// Count of visible items, ignoring empty tokens.
    pub fn print_len(&self) -> usize {
        self.items
            .iter()
            .filter(|i| match i {
                SpanItem::Token(t) => !t.text.is_empty(),
                SpanItem::Span(_) => true,
            })
            .count()
    }

    /// Items with the surrounding delimiter pair stripped, when present.
    pub fn inner_items(&self) -> &[SpanItem] {
        let items = self.items.as_slice();
        if items.len() >= 2 && items.first().is_some_and(|i| i.is_delim()) {
            &items[1..items.len() - 1]
        } else {
            items
        }
    }
}

pub struct Leaves<'a> {
    stack: Vec<std::slice::Iter<'a, SpanItem>>,
}

impl<'a> Iterator for Leaves<'a> {
    type Item = &'a Token;

    fn next(&mut self) -> Option<&'a Token> {
        loop {
            let iter = self.stack.last_mut()?;
            match iter.next() {
                Some(SpanItem::Token(t)) => return Some(t),
                Some(SpanItem::Span(s)) => self.stack.push(s.items.iter()),
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;
    use pretty_assertions::assert_eq;

    fn tok(text: &str, space: &str) -> Token {
        Token::with_space(TokenKind::Name, text, space)
    }

    #[test]
    fn leaves_walk_nested_spans_in_order() {
        let mut inner = Span::new();
        inner.push_token(tok("b", " "));
        let mut outer = Span::new();
        outer.push_token(tok("a", ""));
        outer.push_span(inner);
        outer.push_token(tok("c", " "));
        let texts: Vec<&str> = outer.leaves().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
        assert_eq!(outer.source(), "a b c");
    }

    #[test]
    fn new_spans_are_plain() {
        assert_eq!(Span::new().kind, SpanKind::Plain);
        assert!(!Span::new().is_lambda());
    }

    #[test]
    fn leading_space_delegates_to_first_leaf() {
        let mut inner = Span::new();
        inner.push_token(tok("x", "  "));
        let mut outer = Span::new();
        outer.push_span(inner);
        assert_eq!(outer.leading_space(), "  ");
        outer.set_leading_space("");
        assert_eq!(outer.leading_space(), "");
    }
}
