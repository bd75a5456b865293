use std::collections::{BTreeMap, HashMap};

use sema_core::error::{Result, SemaError};
use sema_core::pretty::format_term;
use sema_core::span::Span;
use sema_core::value::{Bindings, Term};
use sema_parser::parser::{parse_with_subs, Substitutions};
use sema_parser::term::lower_span;

use crate::host::{HostEvaluator, NullHost};
use crate::rule::Rule;
use crate::trace::TraceRecord;

/// Outcome of bounded fixpoint evaluation. `converged` is false only when
/// the step budget ran out before the term stabilized.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluated {
    pub term: Term,
    pub converged: bool,
}

type MemoKey = (Term, Bindings);

/// The rewrite context: rule registry, lexicon, and memo cache, owned
/// together so that any mutation of the first two can invalidate the third
/// before the next lookup.
pub struct Engine {
    rules: BTreeMap<String, Rule>,
    lexicon: BTreeMap<String, String>,
    memo: HashMap<MemoKey, (Term, String)>,
    host: Box<dyn HostEvaluator>,
    pub max_steps: usize,
    trace_enabled: bool,
    trace_steps: Vec<TraceRecord>,
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new()
    }
}

impl Engine {
    pub fn new() -> Self {
        Engine::with_host(Box::new(NullHost))
    }

    pub fn with_host(host: Box<dyn HostEvaluator>) -> Self {
        Engine {
            rules: BTreeMap::new(),
            lexicon: BTreeMap::new(),
            memo: HashMap::new(),
            host,
            max_steps: 100,
            trace_enabled: false,
            trace_steps: Vec::new(),
        }
    }

    // ---- registration surface -------------------------------------------

    /// Parses both sides and registers the rule; re-registering a name
    /// overwrites. Any registration invalidates the memo cache.
    pub fn define_rule(&mut self, name: &str, pattern: &str, output: &str) -> Result<()> {
        let rule = Rule::from_text(name, pattern, output)?;
        self.register(rule);
        Ok(())
    }

    pub fn register(&mut self, rule: Rule) {
        log::debug!(target: "sema::engine", "rule {} registered", rule.name);
        self.memo.clear();
        self.rules.insert(rule.name.clone(), rule);
    }

    pub fn delete_rule(&mut self, name: &str) -> bool {
        self.memo.clear();
        self.rules.remove(name).is_some()
    }

    pub fn clear_rules(&mut self) {
        self.memo.clear();
        self.rules.clear();
    }

    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules.values()
    }

    // ---- lexicon ---------------------------------------------------------

    /// Extends the lexicon; the memo cache is invalidated first so no reader
    /// can observe an entry computed under the old lexicon.
    pub fn update_lexicon(&mut self, entries: impl IntoIterator<Item = (String, String)>) {
        self.memo.clear();
        self.lexicon.extend(entries);
    }

    /// Lexicon lookup with identity fallback for missing symbols.
    pub fn lexicon_lookup<'a>(&'a self, name: &'a str) -> &'a str {
        self.lexicon.get(name).map(String::as_str).unwrap_or(name)
    }

    /// Parses a line with the lexicon applied as a token substitution map.
    pub fn parse(&self, src: &str) -> Result<Span> {
        let mut subs = Substitutions::new();
        for (k, v) in &self.lexicon {
            subs.insert(k.clone(), v.clone());
        }
        parse_with_subs(src, &subs)
    }

    pub fn parse_term(&self, src: &str) -> Result<Term> {
        lower_span(&self.parse(src)?)
    }

    // ---- tracing ---------------------------------------------------------

    /// Turning tracing on clears the memo so every derivation step is
    /// recomputed rather than replayed from cache.
    pub fn set_tracing(&mut self, on: bool) {
        if on {
            self.memo.clear();
        }
        self.trace_enabled = on;
    }

    pub fn take_trace(&mut self) -> Vec<TraceRecord> {
        std::mem::take(&mut self.trace_steps)
    }

    // ---- interpretation --------------------------------------------------

    /// Asks every registered rule for an interpretation of `term`. Exactly
    /// one distinct result is required: zero is `Uninterpretable`, and any
    /// concrete divergence is `Ambiguous` (never silently resolved).
    pub fn interpret(&mut self, term: &Term, extra: &Bindings, memoize: bool) -> Result<(Term, String)> {
        let key: MemoKey = (term.clone(), extra.clone());
        if memoize {
            if let Some((out, rule)) = self.memo.get(&key) {
                return Ok((out.clone(), rule.clone()));
            }
        }

        let rules: Vec<Rule> = self.rules.values().cloned().collect();
        let mut results: Vec<(String, Term)> = Vec::new();
        for r in &rules {
            if let Some(out) = r.run(term, extra, self) {
                results.push((r.name.clone(), out));
            }
        }

        let mut distinct: Vec<Term> = Vec::new();
        for (_, out) in &results {
            if !distinct.contains(out) {
                distinct.push(out.clone());
            }
        }

        let (rule, out) = match distinct.len() {
            0 => return Err(SemaError::Uninterpretable(format_term(term))),
            1 => results.swap_remove(0),
            // Deferred code results are exempt from the confluence check.
            _ if distinct.iter().all(|t| t.is_code()) => results.swap_remove(0),
            _ => return Err(SemaError::Ambiguous(format_term(term))),
        };

        if self.trace_enabled {
            self.trace_steps.push(TraceRecord {
                input: term.clone(),
                bindings: extra.clone(),
                rule: rule.clone(),
                output: out.clone(),
            });
        }
        if memoize {
            self.memo.insert(key, (out.clone(), rule.clone()));
        }
        Ok((out, rule))
    }

    // ---- evaluation loop -------------------------------------------------

    /// Bounded fixpoint evaluation; never fails. Host errors are logged and
    /// the last good term is returned.
    pub fn evaluate_to_fixpoint(&self, term: Term, limit: usize) -> Evaluated {
        match self.fixpoint(term, limit, false) {
            Ok(ev) => ev,
            // Unreachable in lenient mode, but don't panic over it.
            Err(_) => Evaluated { term: Term::constant(""), converged: false },
        }
    }

    /// Strict variant used by rule application: a host error propagates so
    /// the caller can treat the rule as not applicable.
    pub(crate) fn evaluate_strict(&self, term: Term) -> Result<Evaluated> {
        self.fixpoint(term, self.max_steps, true)
    }

    fn fixpoint(&self, mut term: Term, mut limit: usize, strict: bool) -> Result<Evaluated> {
        loop {
            let src = match &term {
                // Concrete, non-code values are not rewritable further.
                Term::Code(span) => span.source().trim().to_string(),
                _ => return Ok(Evaluated { term, converged: true }),
            };
            match self.host.eval(&src) {
                Ok(next) => {
                    if next == term {
                        // Self-evaluating fixpoint.
                        return Ok(Evaluated { term, converged: true });
                    }
                    if limit == 0 {
                        log::debug!(target: "sema::engine", "looped too many times evaluating {}", src);
                        return Ok(Evaluated { term, converged: false });
                    }
                    limit -= 1;
                    term = next;
                }
                Err(msg) => {
                    let err = SemaError::Host { src, msg };
                    if strict {
                        return Err(err);
                    }
                    log::debug!(target: "sema::engine", "{}", err);
                    return Ok(Evaluated { term, converged: true });
                }
            }
        }
    }

    // ---- formal-system stepping ------------------------------------------

    /// Applies every rule to every frontier term for `n` rounds, collecting
    /// the deduplicated outputs. Segmentation candidates enter the frontier
    /// individually, not as a collected tuple. With `accumulate`,
    /// intermediate rounds are kept; otherwise only the final round is
    /// returned.
    pub fn step_all(&self, start: &[Term], n: usize, accumulate: bool) -> Vec<Term> {
        let rules: Vec<Rule> = self.rules.values().cloned().collect();
        let empty = Bindings::new();
        let mut rounds: Vec<Vec<Term>> = vec![dedup(start.to_vec())];
        for _ in 0..n {
            let frontier = rounds.last().cloned().unwrap_or_default();
            let mut next = Vec::new();
            for term in &frontier {
                for r in &rules {
                    next.extend(r.run_all(term, &empty, self));
                }
            }
            if !accumulate {
                rounds.remove(0);
            }
            rounds.push(dedup(next));
        }
        rounds.into_iter().flatten().collect()
    }
}

fn dedup(mut v: Vec<Term>) -> Vec<Term> {
    v.sort();
    v.dedup();
    v
}
