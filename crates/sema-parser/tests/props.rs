use proptest::prelude::*;
use sema_parser::parse;

fn word() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("a".to_string()),
        Just("bc".to_string()),
        Just("x'".to_string()),
        Just("1".to_string()),
        Just("42".to_string()),
        Just("+".to_string()),
        Just(",".to_string()),
        Just("->".to_string()),
        Just("λ".to_string()),
    ]
}

fn spacing() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), Just(" ".to_string()), Just("  ".to_string())]
}

fn line() -> impl Strategy<Value = String> {
    prop::collection::vec((spacing(), word()), 0..8).prop_map(|pieces| {
        let mut s = String::new();
        for (sp, w) in pieces {
            s.push_str(&sp);
            s.push_str(&w);
        }
        s
    })
}

proptest! {
    #[test]
    fn serialization_reproduces_the_input(src in line()) {
        let span = parse(&src).expect("delimiter-free input parses");
        prop_assert_eq!(span.source(), src);
    }

    #[test]
    fn wrapping_in_delimiters_preserves_roundtrip(src in line()) {
        let wrapped = format!("({})", src);
        let span = parse(&wrapped).expect("balanced input parses");
        prop_assert_eq!(span.source(), wrapped);
    }
}
