pub mod parser;
pub mod term;
pub mod tokenizer;

pub use parser::{parse, parse_with_subs, Substitutions};
pub use term::{lower_span, parse_term};
pub use tokenizer::Tokenizer;
