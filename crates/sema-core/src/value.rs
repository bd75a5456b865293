use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::span::Span;

/// Variable → term map produced by a successful match.
pub type Bindings = BTreeMap<String, Term>;

/// Captured environment of a lambda term.
pub type Env = BTreeMap<String, Term>;

/// A declared lambda parameter with its optional domain tag.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub type_hint: Option<String>,
}

impl Param {
    pub fn new(name: impl Into<String>, type_hint: Option<String>) -> Self {
        Param { name: name.into(), type_hint }
    }
}

/// The closed term algebra. All variants are immutable: every "update" is a
/// substitution returning a fresh term.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Term {
    /// Atomic symbol or string literal.
    Constant(String),
    /// Explicit pattern variable, tagged at lowering time.
    Var { name: String, type_hint: Option<String> },
    Number(i64),
    /// Ordered, position-significant, fixed arity.
    Tuple(Vec<Term>),
    /// Unordered and duplicate-free; kept sorted so equality and hashing are
    /// order-insensitive.
    Set(Vec<Term>),
    /// Labeled n-ary tree; unnamed trees carry `Constant("")`.
    Tree { name: Box<Term>, children: Vec<Term> },
    Lambda { params: Vec<Param>, body: Span, guard: Option<Span>, env: Env },
    /// Deferred surface syntax, evaluated through the host evaluator.
    Code(Span),
}

impl Term {
    pub fn constant(s: impl Into<String>) -> Self {
        Term::Constant(s.into())
    }

    pub fn var(name: impl Into<String>) -> Self {
        Term::Var { name: name.into(), type_hint: None }
    }

    pub fn tuple(items: Vec<Term>) -> Self {
        Term::Tuple(items)
    }

    /// Builds a set in canonical (sorted, deduplicated) form.
    pub fn set(items: impl IntoIterator<Item = Term>) -> Self {
        let mut v: Vec<Term> = items.into_iter().collect();
        v.sort();
        v.dedup();
        Term::Set(v)
    }

    pub fn tree(name: Term, children: Vec<Term>) -> Self {
        Term::Tree { name: Box::new(name), children }
    }

    pub fn unnamed_tree(children: Vec<Term>) -> Self {
        Term::tree(Term::constant(""), children)
    }

    pub fn code(span: Span) -> Self {
        Term::Code(span)
    }

    /// The symbol a binding for this term would be keyed by.
    pub fn name(&self) -> Option<&str> {
        match self {
            Term::Constant(s) => Some(s),
            Term::Var { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn is_code(&self) -> bool {
        matches!(self, Term::Code(_))
    }

    /// Falsy at the guard boundary: zero, the empty constant, the empty set.
    pub fn is_falsy(&self) -> bool {
        match self {
            Term::Number(0) => true,
            Term::Constant(s) => s.is_empty(),
            Term::Set(v) => v.is_empty(),
            _ => false,
        }
    }
}

/// The single Greek-letter range the original notation reserves for implicit
/// pattern variables.
pub fn is_implicit_var(name: &str) -> bool {
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => (910..=990).contains(&(c as u32)),
        _ => false,
    }
}

/// Designates which identifiers count as pattern variables for a match. With
/// an empty set, `Term::Var` tagging (and the Greek-letter convention for raw
/// constants) is the implicit fallback.
#[derive(Debug, Clone, Default)]
pub struct VarSet {
    names: BTreeSet<String>,
}

impl VarSet {
    pub fn implicit() -> Self {
        VarSet::default()
    }

    pub fn explicit(names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        VarSet { names: names.into_iter().map(Into::into).collect() }
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn is_variable_name(&self, name: &str) -> bool {
        if self.names.is_empty() {
            is_implicit_var(name)
        } else {
            self.names.contains(name)
        }
    }

    pub fn is_variable(&self, term: &Term) -> bool {
        match term {
            Term::Var { .. } => true,
            Term::Constant(s) => self.is_variable_name(s),
            _ => false,
        }
    }
}
