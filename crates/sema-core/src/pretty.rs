use crate::value::{Bindings, Term};

/// Renders a term back to surface syntax. The output re-parses to an equal
/// term, which is what the substitution layer relies on.
pub fn format_term(t: &Term) -> String {
    match t {
        Term::Constant(s) => s.clone(),
        Term::Var { name, .. } => name.clone(),
        Term::Number(n) => n.to_string(),
        Term::Tuple(items) => {
            let inner: Vec<String> = items.iter().map(format_term).collect();
            format!("⟨{}⟩", inner.join(", "))
        }
        Term::Set(items) => {
            if items.is_empty() {
                return "∅".into();
            }
            let inner: Vec<String> = items.iter().map(format_term).collect();
            format!("{{{}}}", inner.join(", "))
        }
        Term::Tree { name, children } => {
            let mut parts: Vec<String> = Vec::with_capacity(children.len() + 1);
            if let Term::Constant(n) = &**name {
                if !n.is_empty() {
                    parts.push(format!("_{}", n));
                }
            } else {
                parts.push(format!("_{}", format_term(name)));
            }
            parts.extend(children.iter().map(format_term));
            format!("tree[{}]", parts.join(" "))
        }
        Term::Lambda { params, body, guard, .. } => {
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
                out.push_str(g.source().trim());
            }
            out.push('.');
            out.push_str(body.source().trim_end());
            out.push(']');
            out
        }
        Term::Code(span) => span.source().trim().to_string(),
    }
}

pub fn format_bindings(b: &Bindings) -> String {
    let parts: Vec<String> = b.iter().map(|(k, v)| format!("{}: {}", k, format_term(v))).collect();
    format!("{{{}}}", parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn containers_render_in_surface_notation() {
        let t = Term::tuple(vec![Term::constant("a"), Term::Number(2)]);
        assert_eq!(format_term(&t), "⟨a, 2⟩");
        let s = Term::set(vec![Term::constant("b"), Term::constant("a")]);
        assert_eq!(format_term(&s), "{a, b}");
        assert_eq!(format_term(&Term::set(vec![])), "∅");
    }

    #[test]
    fn trees_render_with_name_prefix() {
        let t = Term::tree(
            Term::constant("S"),
            vec![Term::constant("NP"), Term::constant("VP")],
        );
        assert_eq!(format_term(&t), "tree[_S NP VP]");
        let u = Term::unnamed_tree(vec![Term::constant("a")]);
        assert_eq!(format_term(&u), "tree[a]");
    }
}
