use sema_core::pretty::format_term;
use sema_core::value::{Bindings, Term, VarSet};

/// Result of a successful match. `Many` arises only from constant/string
/// segment matching, which can be genuinely ambiguous.
#[derive(Debug, Clone, PartialEq)]
pub enum Match {
    One(Bindings),
    Many(Vec<Bindings>),
}

impl Match {
    pub fn single(self) -> Option<Bindings> {
        match self {
            Match::One(b) => Some(b),
            Match::Many(_) => None,
        }
    }
}

/// One-directional structural match of `pattern` against `target`.
pub fn match_term(pattern: &Term, target: &Term, vars: &VarSet) -> Option<Match> {
    if vars.is_variable(pattern) {
        let name = pattern.name()?.to_string();
        let mut b = Bindings::new();
        b.insert(name, target.clone());
        return Some(Match::One(b));
    }
    if pattern == target {
        return Some(Match::One(Bindings::new()));
    }

    match (pattern, target) {
        (Term::Tuple(ps), Term::Tuple(ts)) => match_slice(ps, ts, vars).map(Match::One),
        (Term::Tree { name: pn, children: pc }, Term::Tree { name: tn, children: tc }) => {
            let mut binds = match pn.as_ref() {
                Term::Constant(s) if s.is_empty() => Bindings::new(),
                _ => match_term(pn, tn, vars)?.single()?,
            };
            let child_binds = match_slice(pc, tc, vars)?;
            if !safe_union(&mut binds, child_binds) {
                return None;
            }
            Some(Match::One(binds))
        }
        (Term::Set(ps), Term::Set(ts)) => {
            let binds = match_set(ps, ts, vars)?;
            log::debug!(target: "sema::matcher", "set match {} ~ {} ok", format_term(pattern), format_term(target));
            Some(Match::One(binds))
        }
        (Term::Constant(p), Term::Constant(t)) => {
            let all = segment_match(p, t, vars);
            if all.is_empty() {
                None
            } else {
                Some(Match::Many(all))
            }
        }
        _ => None,
    }
}

/// Position-wise match with exact arity. A child that yields multiple
/// segmentations fails the whole container.
fn match_slice(ps: &[Term], ts: &[Term], vars: &VarSet) -> Option<Bindings> {
    if ps.len() != ts.len() {
        return None;
    }
    let mut binds = Bindings::new();
    for (p, t) in ps.iter().zip(ts) {
        let bs = match_term(p, t, vars)?.single()?;
        if !safe_union(&mut binds, bs) {
            return None;
        }
    }
    Some(binds)
}

/// Order-free set matching. Concrete pattern elements are removed from the
/// target by equality; leftover target elements are assigned one-to-one to
/// the remaining pattern variables, first-fit, without backtracking over
/// alternative assignments.
fn match_set(ps: &[Term], ts: &[Term], vars: &VarSet) -> Option<Bindings> {
    let mut pvars: Vec<&Term> = ps.iter().filter(|p| vars.is_variable(p)).collect();
    let mut prest: Vec<&Term> = ps.iter().filter(|p| !vars.is_variable(p)).collect();
    let mut binds = Bindings::new();
    for t in ts {
        if let Some(pos) = prest.iter().position(|p| *p == t) {
            prest.remove(pos);
            continue;
        }
        if let Some(pos) = pvars.iter().position(|v| *v == t) {
            // The target element is itself one of the pattern's variables.
            pvars.remove(pos);
            continue;
        }
        let var = pvars.pop()?;
        let name = var.name()?.to_string();
        if !safe_insert(&mut binds, name, t.clone()) {
            return None;
        }
    }
    if prest.is_empty() && pvars.is_empty() {
        Some(binds)
    } else {
        None
    }
}

/// Enumerates every consistent segmentation of `target` against a character
/// pattern whose variable positions may absorb any prefix, including empty.
fn segment_match(pattern: &str, target: &str, vars: &VarSet) -> Vec<Bindings> {
    let p: Vec<char> = pattern.chars().collect();
    let t: Vec<char> = target.chars().collect();
    segments(&p, &t, vars)
}

fn segments(pattern: &[char], target: &[char], vars: &VarSet) -> Vec<Bindings> {
    let Some(head) = pattern.first() else {
        // Empties match with no variables left over.
        return if target.is_empty() { vec![Bindings::new()] } else { Vec::new() };
    };
    let head_s = head.to_string();

    if vars.is_variable_name(&head_s) {
        let mut out = Vec::new();
        for i in 0..=target.len() {
            let prefix: String = target[..i].iter().collect();
            for mut ms in segments(&pattern[1..], &target[i..], vars) {
                match ms.get(&head_s) {
                    Some(prev) if *prev != Term::Constant(prefix.clone()) => continue,
                    _ => {
                        ms.insert(head_s.clone(), Term::constant(prefix.clone()));
                        out.push(ms);
                    }
                }
            }
        }
        return out;
    }

    match target.first() {
        Some(t0) if t0 == head => segments(&pattern[1..], &target[1..], vars),
        _ => Vec::new(),
    }
}

/// Merges `src` into `dst`; fails when a variable would be rebound to a
/// different value anywhere in the recursion.
pub fn safe_union(dst: &mut Bindings, src: Bindings) -> bool {
    for (k, v) in src {
        if !safe_insert(dst, k, v) {
            return false;
        }
    }
    true
}

fn safe_insert(dst: &mut Bindings, key: String, value: Term) -> bool {
    match dst.get(&key) {
        Some(prev) => *prev == value,
        None => {
            dst.insert(key, value);
            true
        }
    }
}
