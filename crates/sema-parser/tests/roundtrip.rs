use pretty_assertions::assert_eq;
use sema_parser::parse;

fn roundtrip_ok(src: &str) {
    let span = parse(src).expect("parse");
    assert_eq!(span.source(), src);
}

#[test]
fn rt_flat() {
    roundtrip_ok("f a  b");
}

#[test]
fn rt_nested_delimiters() {
    roundtrip_ok("(a, {b, ⟨c, 1⟩})");
}

#[test]
fn rt_leading_and_trailing_space() {
    roundtrip_ok("  a (b )  ");
}

#[test]
fn rt_lambda_span() {
    roundtrip_ok("[λx∈e: x ∈ {A, B}. x]");
}

#[test]
fn rt_string_literal() {
    roundtrip_ok("rule \"some text\" done");
}

#[test]
fn rt_operators() {
    roundtrip_ok("p -> q == r");
}
