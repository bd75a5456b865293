use thiserror::Error;

pub type Result<T> = std::result::Result<T, SemaError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SemaError {
    #[error("syntax error: {0}")]
    Syntax(String),
    #[error("not in the domain: {0}")]
    Domain(String),
    #[error("{0} is not interpretable")]
    Uninterpretable(String),
    #[error("{0} has multiple interpretations")]
    Ambiguous(String),
    #[error("host evaluation of `{src}` failed: {msg}")]
    Host { src: String, msg: String },
}
