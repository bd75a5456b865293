use std::collections::BTreeMap;

use sema_core::error::{Result, SemaError};
use sema_core::span::{Span, SpanKind};
use sema_core::token::Token;

use crate::tokenizer::Tokenizer;

/// Literal token text → replacement text, applied through the tokenizer's
/// injection mechanism while a span is being built. Suppressed inside lambda
/// spans so their code prints back verbatim.
#[derive(Debug, Clone, Default)]
pub struct Substitutions(pub BTreeMap<String, String>);

impl Substitutions {
    pub fn new() -> Self {
        Substitutions::default()
    }

    pub fn insert(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.0.insert(from.into(), to.into());
    }

    fn get(&self, text: &str) -> Option<&str> {
        self.0.get(text).map(String::as_str)
    }

    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Parses one line (or pre-joined statement) into a span tree.
pub fn parse(src: &str) -> Result<Span> {
    parse_with_subs(src, &Substitutions::default())
}

pub fn parse_with_subs(src: &str, subs: &Substitutions) -> Result<Span> {
    let mut tz = Tokenizer::new(src);
    let mut span = parse_span(&mut tz, None, subs)?;
    span.trailing_space = tz.take_trailing_space();
    Ok(span)
}

fn parse_span(tz: &mut Tokenizer, open: Option<Token>, subs: &Substitutions) -> Result<Span> {
    let mut span = Span::new();
    let open_text = open.as_ref().map(|t| t.text.clone());
    if let Some(t) = open {
        span.push_token(t);
    }

    while let Some(tok) = tz.next_token()? {
        if !span.is_lambda() {
            if let Some(repl) = subs.get(&tok.text) {
                // Replace the token in-stream and rescan; the first
                // replacement token keeps the replaced token's spacing.
                tz.inject_with_space(repl, &tok.leading_space);
                continue;
            }
        }

        if !tok.is_delim() {
            if tok.text == "λ" && span.items.last().is_some_and(|i| i.is_delim()) {
                span.kind = SpanKind::Lambda;
            }
            span.push_token(tok);
        } else if open_text.as_deref().is_some_and(|o| tok.closes(o)) {
            span.push_token(tok);
            return Ok(span);
        } else if tok.is_open_delim() {
            // An explicit parenthesized parameter list overrides the
            // lambda shorthand for the enclosing span.
            if span.items.last().and_then(|i| i.token_text()) == Some("λ") {
                span.kind = SpanKind::Plain;
            }
            let child_subs = if span.is_lambda() && !subs.is_empty() {
                Substitutions::default()
            } else {
                subs.clone()
            };
            let child = parse_span(tz, Some(tok), &child_subs)?;
            span.push_span(child);
        } else {
            return Err(SemaError::Syntax(format!("unmatched delimiter: {}", tok.text)));
        }
    }

    match open_text {
        Some(o) => Err(SemaError::Syntax(format!("missing closing delimiter for {}", o))),
        None => Ok(span),
    }
}
