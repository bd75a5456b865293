use sema_core::error::Result;
use sema_core::pretty::format_term;
use sema_core::span::{Span, SpanItem};
use sema_core::value::{Bindings, Term};
use sema_parser::parser::parse;
use sema_parser::term::lower_span;

/// Substitutes bound names into a term. Bindings for names not present are
/// no-ops; every variant returns a fresh term.
pub fn update_term(term: &Term, binds: &Bindings) -> Result<Term> {
    if let Some(name) = term.name() {
        if let Some(bound) = binds.get(name) {
            return Ok(bound.clone());
        }
    }
    match term {
        Term::Constant(s) => update_constant(s, binds),
        Term::Var { .. } | Term::Number(_) => Ok(term.clone()),
        Term::Tuple(items) => Ok(Term::Tuple(
            items.iter().map(|t| update_term(t, binds)).collect::<Result<Vec<_>>>()?,
        )),
        Term::Set(items) => Ok(Term::set(
            items.iter().map(|t| update_term(t, binds)).collect::<Result<Vec<_>>>()?,
        )),
        Term::Tree { name, children } => Ok(Term::tree(
            update_term(name, binds)?,
            children.iter().map(|t| update_term(t, binds)).collect::<Result<Vec<_>>>()?,
        )),
        Term::Lambda { params, body, guard, env } => {
            // Bindings fold into the captured environment; the declared
            // parameters shadow and are excluded.
            let mut env = env.clone();
            for (k, v) in binds {
                if params.iter().any(|p| &p.name == k) {
                    continue;
                }
                env.insert(k.clone(), v.clone());
            }
            Ok(Term::Lambda { params: params.clone(), body: body.clone(), guard: guard.clone(), env })
        }
        Term::Code(span) => Ok(Term::Code(update_span(span, binds)?)),
    }
}

/// String-template fallback: a multi-character constant with no binding of
/// its own substitutes any bound single characters.
fn update_constant(s: &str, binds: &Bindings) -> Result<Term> {
    if s.chars().count() < 2 || !s.chars().any(|c| binds.contains_key(c.to_string().as_str())) {
        return Ok(Term::constant(s));
    }
    let mut out = String::new();
    for c in s.chars() {
        match binds.get(c.to_string().as_str()) {
            Some(t) => out.push_str(&render_term(t)?),
            None => out.push(c),
        }
    }
    Ok(Term::constant(out))
}

/// Substitutes bound names into a span: bound name tokens are replaced by the
/// re-parsed rendering of the bound term (keeping the original spacing), and
/// lambda subspans absorb the bindings into their environment. A name
/// followed by `=` is a keyword position and is left alone.
pub fn update_span(span: &Span, binds: &Bindings) -> Result<Span> {
    let mut out = Span { kind: span.kind, items: Vec::with_capacity(span.items.len()), trailing_space: span.trailing_space.clone() };
    for (n, item) in span.items.iter().enumerate() {
        let peek = span.items.get(n + 1).and_then(|i| i.token_text());
        match item {
            SpanItem::Token(t)
                if t.is_name() && binds.contains_key(&t.text) && peek != Some("=") =>
            {
                let bound = &binds[&t.text];
                log::debug!(target: "sema::subst", "replacing {} -> {}", t.text, format_term(bound));
                push_parsed(&mut out, &render_term(bound)?, &t.leading_space)?;
            }
            SpanItem::Span(s) if s.is_lambda() => {
                let lam = update_term(&lower_span(s)?, binds)?;
                push_parsed(&mut out, &render_term(&lam)?, s.leading_space())?;
            }
            SpanItem::Span(s) => out.push_span(update_span(s, binds)?),
            SpanItem::Token(t) => out.push_token(t.clone()),
        }
    }
    Ok(out)
}

fn push_parsed(out: &mut Span, rendered: &str, space: &str) -> Result<()> {
    let mut parsed = parse(rendered)?;
    parsed.set_leading_space(space);
    if parsed.print_len() == 1 {
        out.items.extend(parsed.items);
    } else {
        out.push_span(parsed);
    }
    Ok(())
}

/// Like `format_term`, but renders a lambda with its captured environment
/// substituted into the guard and body, the way the term would print.
pub fn render_term(term: &Term) -> Result<String> {
    match term {
        Term::Lambda { params, body, guard, env } => {
            let ps: Vec<String> = params
                .iter()
                .map(|p| match &p.type_hint {
                    Some(ty) => format!("{}∈{}", p.name, ty),
                    None => p.name.clone(),
                })
                .collect();
            let mut out = format!("[λ{}", ps.join(", "));
            if let Some(g) = guard {
                out.push_str(": ");
                out.push_str(update_span(g, env)?.source().trim());
            }
            out.push('.');
            out.push_str(update_span(body, env)?.source().trim_end());
            out.push(']');
            Ok(out)
        }
        other => Ok(format_term(other)),
    }
}
