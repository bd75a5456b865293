use pretty_assertions::assert_eq;
use sema_core::value::{Param, Term};
use sema_parser::parse_term;

fn c(s: &str) -> Term {
    Term::constant(s)
}

#[test]
fn parenthesized_sequence_lowers_to_tuple() {
    let t = parse_term("(a,b,c)").expect("parse");
    assert_eq!(t, Term::tuple(vec![c("a"), c("b"), c("c")]));
}

#[test]
fn angle_brackets_lower_to_tuple() {
    let t = parse_term("⟨a, 2⟩").expect("parse");
    assert_eq!(t, Term::tuple(vec![c("a"), Term::Number(2)]));
}

#[test]
fn braces_lower_to_canonical_set() {
    let t = parse_term("{b, a, b}").expect("parse");
    assert_eq!(t, Term::set(vec![c("a"), c("b")]));
    assert_eq!(parse_term("∅").expect("parse"), Term::set(vec![]));
}

#[test]
fn grouping_parens_are_transparent() {
    assert_eq!(parse_term("(a)").expect("parse"), c("a"));
}

#[test]
fn greek_letters_are_tagged_as_variables() {
    assert_eq!(parse_term("φ").expect("parse"), Term::var("φ"));
    assert_eq!(parse_term("x").expect("parse"), c("x"));
}

#[test]
fn string_literals_unquote() {
    assert_eq!(parse_term("\"a b\"").expect("parse"), c("a b"));
}

#[test]
fn tree_notation_with_label_and_children() {
    let t = parse_term("tree[_S NP VP]").expect("parse");
    assert_eq!(t, Term::tree(c("S"), vec![c("NP"), c("VP")]));
}

#[test]
fn nested_bracket_spans_are_implicit_trees() {
    let t = parse_term("tree[_S [_NP John] VP]").expect("parse");
    assert_eq!(
        t,
        Term::tree(c("S"), vec![Term::tree(c("NP"), vec![c("John")]), c("VP")])
    );
}

#[test]
fn lambda_header_fields() {
    let t = parse_term("[λx∈e: x ∈ D. x]").expect("parse");
    match t {
        Term::Lambda { params, body, guard, env } => {
            assert_eq!(params, vec![Param::new("x", Some("e".into()))]);
            assert!(guard.is_some());
            assert_eq!(body.source().trim(), "x");
            assert!(env.is_empty());
        }
        other => panic!("expected lambda, got {:?}", other),
    }
}

#[test]
fn lambda_without_annotation_defaults_to_entity_type() {
    let t = parse_term("[λx. x]").expect("parse");
    match t {
        Term::Lambda { params, guard, .. } => {
            assert_eq!(params, vec![Param::new("x", Some("e".into()))]);
            assert!(guard.is_none());
        }
        other => panic!("expected lambda, got {:?}", other),
    }
}

#[test]
fn malformed_lambda_headers_are_syntax_errors() {
    use sema_core::error::SemaError;
    assert!(matches!(parse_term("[λ. x]"), Err(SemaError::Syntax(_))));
    assert!(matches!(parse_term("[λx y. x]"), Err(SemaError::Syntax(_))));
}

#[test]
fn operator_sequences_stay_deferred_as_code() {
    let t = parse_term("a + b").expect("parse");
    assert!(t.is_code());
}
