use sema_core::error::{Result, SemaError};
use sema_core::span::{Span, SpanItem};
use sema_core::token::{Token, TokenKind};
use sema_core::value::{is_implicit_var, Param, Term};

use crate::parser::parse;

/// Parses surface text straight to a term.
pub fn parse_term(src: &str) -> Result<Term> {
    lower_span(&parse(src)?)
}

/// Lowers a parsed span into the term algebra. Shapes with no term
/// counterpart stay deferred as `Code`.
pub fn lower_span(span: &Span) -> Result<Term> {
    if span.is_lambda() {
        return parse_lambda(span);
    }
    let opener = span
        .items
        .first()
        .and_then(|i| i.as_token())
        .filter(|t| t.is_open_delim())
        .map(|t| t.text.clone());
    match opener.as_deref() {
        Some("⟨") => Ok(Term::tuple(lower_groups(span.inner_items())?)),
        Some("{") => Ok(Term::set(lower_groups(span.inner_items())?)),
        Some("(") => {
            let groups = split_commas(span.inner_items());
            if groups.len() == 1 && groups[0].is_empty() {
                Ok(Term::tuple(Vec::new()))
            } else if groups.len() == 1 {
                lower_items(&groups[0])
            } else {
                Ok(Term::tuple(
                    groups.iter().map(|g| lower_items(g)).collect::<Result<Vec<_>>>()?,
                ))
            }
        }
        Some("[") => Ok(Term::tuple(lower_groups(span.inner_items())?)),
        _ => lower_items(&span.items),
    }
}

fn lower_groups(items: &[SpanItem]) -> Result<Vec<Term>> {
    if items.is_empty() {
        return Ok(Vec::new());
    }
    split_commas(items).iter().map(|g| lower_items(g)).collect()
}

fn split_commas(items: &[SpanItem]) -> Vec<Vec<SpanItem>> {
    let mut groups = vec![Vec::new()];
    for item in items {
        if item.token_text() == Some(",") {
            groups.push(Vec::new());
        } else if let Some(group) = groups.last_mut() {
            group.push(item.clone());
        }
    }
    groups
}

fn lower_items(items: &[SpanItem]) -> Result<Term> {
    match items {
        [] => Ok(Term::constant("")),
        [SpanItem::Token(t)] if t.text == "∅" => Ok(Term::set(Vec::new())),
        [SpanItem::Token(t)] => lower_token(t),
        [SpanItem::Span(s)] => lower_span(s),
        [SpanItem::Token(t), SpanItem::Span(s)]
            if t.text == "tree" && s.items.first().and_then(|i| i.token_text()) == Some("[") =>
        {
            lower_tree(s)
        }
        _ => Ok(Term::code(sequence_span(items))),
    }
}

fn lower_token(t: &Token) -> Result<Term> {
    match t.kind {
        TokenKind::Number => t
            .text
            .parse::<i64>()
            .map(Term::Number)
            .map_err(|e| SemaError::Syntax(format!("invalid number {}: {}", t.text, e))),
        TokenKind::Str => Ok(Term::constant(unquote(&t.text))),
        TokenKind::Name => {
            if is_implicit_var(&t.text) {
                Ok(Term::var(t.text.clone()))
            } else {
                Ok(Term::constant(t.text.clone()))
            }
        }
        _ => Ok(Term::code(sequence_span(&[SpanItem::Token(t.clone())]))),
    }
}

/// `tree[_name child …]`: an optional `_`-prefixed label, then
/// space-separated children. A nested comma-free `[…]` span is itself a tree.
fn lower_tree(span: &Span) -> Result<Term> {
    let inner = span.inner_items();
    let mut name = Term::constant("");
    let mut children = Vec::new();
    let mut rest = inner;
    if let Some(SpanItem::Token(t)) = inner.first() {
        if t.is_name() && t.text.len() > 1 && t.text.starts_with('_') {
            name = Term::constant(&t.text[1..]);
            rest = &inner[1..];
        }
    }
    for item in rest {
        match item {
            SpanItem::Token(t) => children.push(lower_token(t)?),
            SpanItem::Span(s) => {
                let bracketed = s.items.first().and_then(|i| i.token_text()) == Some("[");
                let has_comma = s.items.iter().any(|i| i.token_text() == Some(","));
                if bracketed && !has_comma {
                    children.push(lower_tree(s)?);
                } else {
                    children.push(lower_span(s)?);
                }
            }
        }
    }
    Ok(Term::tree(name, children))
}

/// `[λ x ∈ τ : guard . body]` with optional type annotations, an optional
/// guard, and comma-separated parameters.
fn parse_lambda(span: &Span) -> Result<Term> {
    let open_ok = span
        .items
        .first()
        .and_then(|i| i.as_token())
        .is_some_and(|t| t.is_open_delim());
    if !open_ok {
        return Err(SemaError::Syntax("strange delimiter for lambda".into()));
    }
    let items = span.inner_items();
    let mut i = 0;
    match items.get(i).and_then(|it| it.token_text()) {
        Some("λ") => i += 1,
        other => {
            return Err(SemaError::Syntax(format!(
                "incorrect operator for lambda: {}",
                other.unwrap_or("<none>")
            )))
        }
    }

    let mut params = Vec::new();
    loop {
        let tok = items
            .get(i)
            .and_then(|it| it.as_token())
            .ok_or_else(|| SemaError::Syntax("missing lambda parameter".into()))?;
        if !tok.is_name() {
            return Err(SemaError::Syntax(format!("incorrect variable: {}", tok.text)));
        }
        let name = tok.text.clone();
        i += 1;
        let mut type_hint = Some("e".to_string());
        if matches!(items.get(i).and_then(|it| it.token_text()), Some("∈") | Some("/")) {
            i += 1;
            type_hint = Some(match items.get(i) {
                Some(SpanItem::Token(t)) => t.text.clone(),
                Some(SpanItem::Span(s)) => s.source().trim().to_string(),
                None => return Err(SemaError::Syntax("missing type after ∈ in lambda".into())),
            });
            i += 1;
        }
        params.push(Param::new(name, type_hint));
        if items.get(i).and_then(|it| it.token_text()) == Some(",") {
            i += 1;
            continue;
        }
        break;
    }

    let mut guard = None;
    match items.get(i).and_then(|it| it.token_text()) {
        Some(".") => i += 1,
        Some(":") => {
            i += 1;
            let mut g = Span::new();
            loop {
                match items.get(i) {
                    Some(SpanItem::Token(t)) if t.text == "." => {
                        i += 1;
                        break;
                    }
                    Some(item) => {
                        g.items.push(item.clone());
                        i += 1;
                    }
                    None => return Err(SemaError::Syntax("missing . in lambda".into())),
                }
            }
            guard = Some(g);
        }
        other => {
            return Err(SemaError::Syntax(format!(
                "stray item before . in lambda: {}",
                other.unwrap_or("<none>")
            )))
        }
    }

    let body = sequence_span(&items[i..]);
    if body.is_empty() {
        return Err(SemaError::Syntax("missing lambda body".into()));
    }
    Ok(Term::Lambda { params, body, guard, env: Default::default() })
}

fn sequence_span(items: &[SpanItem]) -> Span {
    Span { items: items.to_vec(), ..Span::default() }
}

fn unquote(text: &str) -> String {
    let inner = text.strip_prefix('"').and_then(|s| s.strip_suffix('"')).unwrap_or(text);
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(esc) = chars.next() {
                out.push(esc);
            }
        } else {
            out.push(c);
        }
    }
    out
}
