use serde::{Deserialize, Serialize};

/// Paired open/close delimiters recognized by the span parser.
pub const DELIMS: [(&str, &str); 4] = [("(", ")"), ("[", "]"), ("{", "}"), ("⟨", "⟩")];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    Name,
    Number,
    Str,
    Operator,
    Delimiter,
    Other,
}

/// One surface token. `leading_space` holds the exact whitespace that
/// preceded the token in the source so that serialization round-trips.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub leading_space: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Token { kind, text: text.into(), leading_space: String::new() }
    }

    pub fn with_space(kind: TokenKind, text: impl Into<String>, space: impl Into<String>) -> Self {
        Token { kind, text: text.into(), leading_space: space.into() }
    }

    pub fn is_open_delim(&self) -> bool {
        DELIMS.iter().any(|(o, _)| *o == self.text)
    }

    pub fn is_delim(&self) -> bool {
        DELIMS.iter().any(|(o, c)| *o == self.text || *c == self.text)
    }

    /// True when this token closes the given opening delimiter.
    pub fn closes(&self, open: &str) -> bool {
        DELIMS.iter().any(|(o, c)| *o == open && *c == self.text)
    }

    pub fn is_name(&self) -> bool {
        self.kind == TokenKind::Name
    }

    /// The token rendered with its leading whitespace.
    pub fn source(&self) -> String {
        format!("{}{}", self.leading_space, self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn delimiter_pairing() {
        let close = Token::new(TokenKind::Delimiter, "⟩");
        assert!(close.closes("⟨"));
        assert!(!close.closes("("));
        assert!(close.is_delim());
        assert!(!close.is_open_delim());
    }

    #[test]
    fn source_includes_leading_space() {
        let t = Token::with_space(TokenKind::Name, "abc", "  ");
        assert_eq!(t.source(), "  abc");
    }
}
