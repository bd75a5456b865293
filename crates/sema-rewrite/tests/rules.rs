use pretty_assertions::assert_eq;
use sema_core::error::SemaError;
use sema_core::value::{Bindings, Term};
use sema_rewrite::{Engine, Rule};

fn c(s: &str) -> Term {
    Term::constant(s)
}

fn no_extra() -> Bindings {
    Bindings::new()
}

#[test]
fn single_rule_interprets_a_literal() {
    let mut eng = Engine::new();
    eng.define_rule("R1", "p", "a").expect("rule");
    let (out, rule) = eng.interpret(&c("p"), &no_extra(), true).expect("interpret");
    assert_eq!(out, c("a"));
    assert_eq!(rule, "R1");
}

#[test]
fn unmatched_term_is_uninterpretable() {
    let mut eng = Engine::new();
    eng.define_rule("R1", "p", "a").expect("rule");
    let err = eng.interpret(&c("q"), &no_extra(), true).unwrap_err();
    assert!(matches!(err, SemaError::Uninterpretable(_)));
}

#[test]
fn divergent_rules_are_ambiguous() {
    let mut eng = Engine::new();
    eng.define_rule("R1", "p", "a").expect("rule");
    eng.define_rule("R2", "p", "b").expect("rule");
    let err = eng.interpret(&c("p"), &no_extra(), true).unwrap_err();
    assert!(matches!(err, SemaError::Ambiguous(_)));
}

#[test]
fn agreeing_rules_are_not_ambiguous() {
    let mut eng = Engine::new();
    eng.define_rule("R1", "p", "a").expect("rule");
    eng.define_rule("R2", "p", "a").expect("rule");
    let (out, _) = eng.interpret(&c("p"), &no_extra(), true).expect("interpret");
    assert_eq!(out, c("a"));
}

#[test]
fn variable_rule_projects_bindings_into_output() {
    let mut eng = Engine::new();
    eng.define_rule("fst", "⟨φ, ψ⟩", "φ").expect("rule");
    let pair = Term::tuple(vec![c("a"), c("b")]);
    let (out, _) = eng.interpret(&pair, &no_extra(), true).expect("interpret");
    assert_eq!(out, c("a"));
}

#[test]
fn extra_bindings_reach_the_output() {
    let mut eng = Engine::new();
    eng.define_rule("K", "p", "ψ").expect("rule");
    let extra: Bindings = [("ψ".to_string(), Term::Number(5))].into();
    let (out, _) = eng.interpret(&c("p"), &extra, true).expect("interpret");
    assert_eq!(out, Term::Number(5));
}

#[test]
fn segment_rule_rewrites_string_constants() {
    let mut eng = Engine::new();
    eng.define_rule("dbl", "φb", "φbb").expect("rule");
    let (out, _) = eng.interpret(&c("ab"), &no_extra(), true).expect("interpret");
    assert_eq!(out, c("abb"));
}

#[test]
fn multiple_segmentations_collect_into_a_tuple() {
    let eng = Engine::new();
    let rule = Rule::from_text("sp", "φψ", "⟨φ, ψ⟩").expect("rule");
    let out = rule.run(&c("ab"), &no_extra(), &eng).expect("applies");
    let Term::Tuple(alts) = out else { panic!("expected a tuple of alternatives") };
    assert_eq!(alts.len(), 3);
    assert!(alts.contains(&Term::tuple(vec![c("a"), c("b")])));
}

#[test]
fn redefining_a_rule_invalidates_the_memo() {
    let mut eng = Engine::new();
    eng.define_rule("R1", "p", "a").expect("rule");
    let (first, _) = eng.interpret(&c("p"), &no_extra(), true).expect("interpret");
    assert_eq!(first, c("a"));

    eng.define_rule("R1", "p", "b").expect("rule");
    let (second, _) = eng.interpret(&c("p"), &no_extra(), true).expect("interpret");
    assert_eq!(second, c("b"));
}

#[test]
fn deleting_a_rule_invalidates_the_memo() {
    let mut eng = Engine::new();
    eng.define_rule("R1", "p", "a").expect("rule");
    eng.interpret(&c("p"), &no_extra(), true).expect("interpret");

    assert!(eng.delete_rule("R1"));
    let err = eng.interpret(&c("p"), &no_extra(), true).unwrap_err();
    assert!(matches!(err, SemaError::Uninterpretable(_)));
}

#[test]
fn lexicon_substitution_applies_during_parsing() {
    let mut eng = Engine::new();
    eng.update_lexicon([("John".to_string(), "j".to_string())]);
    assert_eq!(eng.parse_term("John").expect("parse"), c("j"));
    assert_eq!(eng.lexicon_lookup("John"), "j");
    assert_eq!(eng.lexicon_lookup("Mary"), "Mary");
}

#[test]
fn lexicon_update_invalidates_the_memo() {
    let mut eng = Engine::new();
    eng.define_rule("R1", "p", "a").expect("rule");
    eng.interpret(&c("p"), &no_extra(), true).expect("interpret");
    // Any lexicon change drops cached entries; the derivation still works.
    eng.update_lexicon([("x".to_string(), "y".to_string())]);
    let (out, _) = eng.interpret(&c("p"), &no_extra(), true).expect("interpret");
    assert_eq!(out, c("a"));
}

#[test]
fn tracing_records_each_derivation_step() {
    let mut eng = Engine::new();
    eng.define_rule("R1", "p", "a").expect("rule");
    eng.set_tracing(true);
    eng.interpret(&c("p"), &no_extra(), true).expect("interpret");

    let trace = eng.take_trace();
    assert_eq!(trace.len(), 1);
    assert_eq!(trace[0].rule, "R1");
    assert_eq!(trace[0].input, c("p"));
    assert_eq!(trace[0].output, c("a"));
    assert!(eng.take_trace().is_empty());
}

#[test]
fn step_all_advances_a_formal_system() {
    let mut eng = Engine::new();
    eng.define_rule("s1", "a", "b").expect("rule");
    eng.define_rule("s2", "b", "c").expect("rule");

    assert_eq!(eng.step_all(&[c("a")], 1, false), vec![c("b")]);
    assert_eq!(eng.step_all(&[c("a")], 2, false), vec![c("c")]);
    assert_eq!(eng.step_all(&[c("a")], 2, true), vec![c("a"), c("b"), c("c")]);
}

#[test]
fn step_all_keeps_segmentation_candidates_separate() {
    let mut eng = Engine::new();
    eng.define_rule("miu", "φIψ", "φIUψ").expect("rule");
    // Each segmentation is its own frontier string, so later rounds rewrite
    // every alternative.
    assert_eq!(eng.step_all(&[c("II")], 1, false), vec![c("IIU"), c("IUI")]);
    assert_eq!(
        eng.step_all(&[c("II")], 2, false),
        vec![c("IIUU"), c("IUIU"), c("IUUI")]
    );
}

#[test]
fn rule_display_shows_both_sides() {
    let rule = Rule::from_text("fst", "⟨φ, ψ⟩", "φ").expect("rule");
    assert_eq!(rule.to_string(), "fst: ⟨φ, ψ⟩ -> φ");
}
