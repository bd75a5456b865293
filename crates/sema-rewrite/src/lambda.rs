use sema_core::error::{Result, SemaError};
use sema_core::pretty::format_term;
use sema_core::value::{Bindings, Term};
use sema_parser::term::lower_span;

use crate::engine::Engine;
use crate::subst::update_span;

impl Engine {
    /// Lambda application. Keyword-only calls curry the bindings into the
    /// captured environment; positional calls check the guard against the
    /// declared domain and evaluate the substituted body to fixpoint.
    pub fn apply_lambda(&self, lam: &Term, args: &[Term], kwargs: &Bindings) -> Result<Term> {
        let Term::Lambda { params, body, guard, env } = lam else {
            return Err(SemaError::Domain(format!("{} is not a function", format_term(lam))));
        };

        if args.is_empty() && !kwargs.is_empty() {
            let mut env = env.clone();
            for (k, v) in kwargs {
                if params.iter().any(|p| &p.name == k) {
                    continue;
                }
                env.insert(k.clone(), v.clone());
            }
            return Ok(Term::Lambda {
                params: params.clone(),
                body: body.clone(),
                guard: guard.clone(),
                env,
            });
        }

        let mut binds: Bindings = env.clone();
        for (p, a) in params.iter().zip(args) {
            binds.insert(p.name.clone(), a.clone());
        }

        if let Some(g) = guard {
            let g = update_span(g, &binds)?;
            let out = self.evaluate_to_fixpoint(lower_span(&g)?, self.max_steps);
            // A guard that stays unresolved or comes back falsy puts the
            // argument outside the function's domain.
            if out.term.is_code() || out.term.is_falsy() {
                let shown: Vec<String> = args.iter().map(format_term).collect();
                return Err(SemaError::Domain(shown.join(", ")));
            }
        }

        let body = update_span(body, &binds)?;
        Ok(self.evaluate_to_fixpoint(lower_span(&body)?, self.max_steps).term)
    }

    /// The extension of a function over a finite domain: the set of elements
    /// it maps to a true value. Domain errors and false or unresolved
    /// results exclude the element rather than propagate.
    pub fn extension(&self, lam: &Term, domain: &[Term]) -> Term {
        Term::set(domain.iter().filter(|x| {
            matches!(
                self.apply_lambda(lam, std::slice::from_ref(x), &Bindings::new()),
                Ok(Term::Number(1))
            )
        }).cloned())
    }
}

/// Applies a set as a function. A set of 2-tuples encodes a partial
/// function: the argument selects the matching pairs' second components
/// (`Domain` error when absent). Any other set acts as its characteristic
/// function.
pub fn set_apply(set: &Term, arg: &Term) -> Result<Term> {
    let Term::Set(items) = set else {
        return Err(SemaError::Domain(format!("{} is not a set", format_term(set))));
    };
    let functional = !items.is_empty()
        && !matches!(arg, Term::Tuple(_))
        && items.iter().all(|i| matches!(i, Term::Tuple(p) if p.len() == 2));
    if functional {
        let mut outs: Vec<Term> = Vec::new();
        for item in items {
            if let Term::Tuple(pair) = item {
                if &pair[0] == arg {
                    outs.push(pair[1].clone());
                }
            }
        }
        return match outs.len() {
            0 => Err(SemaError::Domain(format!(
                "{} is not in the domain of {}",
                format_term(arg),
                format_term(set)
            ))),
            1 => Ok(outs.pop().unwrap_or(Term::Number(0))),
            _ => Ok(Term::Tuple(outs)),
        };
    }
    Ok(Term::Number(if items.contains(arg) { 1 } else { 0 }))
}
