pub mod error;
pub mod pretty;
pub mod span;
pub mod token;
pub mod value;

pub use error::{Result, SemaError};
pub use pretty::format_term;
pub use span::{Span, SpanItem, SpanKind};
pub use token::{Token, TokenKind};
pub use value::{Bindings, Env, Param, Term, VarSet};
