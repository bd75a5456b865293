use serde::{Deserialize, Serialize};

use sema_core::error::Result;
use sema_core::pretty::format_term;
use sema_core::value::{Bindings, Term, VarSet};
use sema_parser::term::parse_term;

use crate::engine::Engine;
use crate::matcher::{match_term, Match};
use crate::subst::update_term;

/// A named rewrite rule: pattern term → output template. Both sides are
/// pre-parsed into terms at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub name: String,
    pub pattern: Term,
    pub output: Term,
}

impl Rule {
    pub fn new(name: impl Into<String>, pattern: Term, output: Term) -> Self {
        Rule { name: name.into(), pattern, output }
    }

    pub fn from_text(name: impl Into<String>, pattern: &str, output: &str) -> Result<Self> {
        Ok(Rule { name: name.into(), pattern: parse_term(pattern)?, output: parse_term(output)? })
    }

    /// Every candidate output of the rule on `target`, one per admissible
    /// binding map. Structural matches yield at most one; segment matches
    /// yield one per segmentation.
    pub fn run_all(&self, target: &Term, extra: &Bindings, engine: &Engine) -> Vec<Term> {
        let Some(m) = match_term(&self.pattern, target, &VarSet::implicit()) else {
            return Vec::new();
        };
        match m {
            Match::Many(maps) => maps
                .iter()
                .filter_map(|bs| update_term(&self.output, bs).ok())
                .collect(),
            Match::One(mut binds) => {
                for (k, v) in extra {
                    binds.insert(k.clone(), v.clone());
                }
                log::debug!(
                    target: "sema::rule",
                    "rule {} matched {} with {} bindings",
                    self.name,
                    format_term(target),
                    binds.len()
                );
                let Ok(out) = update_term(&self.output, &binds) else {
                    return Vec::new();
                };
                // An error during the final evaluation means this rule does
                // not apply, not that the whole interpretation fails.
                match engine.evaluate_strict(out) {
                    Ok(ev) => vec![ev.term],
                    Err(_) => Vec::new(),
                }
            }
        }
    }

    /// Applies the rule to `target` as a single interpretation: no candidate
    /// is no result, and multiple segmentation candidates collect into a
    /// tuple.
    pub fn run(&self, target: &Term, extra: &Bindings, engine: &Engine) -> Option<Term> {
        let mut outs = self.run_all(target, extra, engine);
        match outs.len() {
            0 => None,
            1 => outs.pop(),
            _ => Some(Term::Tuple(outs)),
        }
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} -> {}", self.name, format_term(&self.pattern), format_term(&self.output))
    }
}
