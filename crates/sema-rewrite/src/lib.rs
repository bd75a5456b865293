pub mod engine;
pub mod host;
pub mod lambda;
pub mod matcher;
pub mod rule;
pub mod subst;
pub mod trace;

pub use engine::{Engine, Evaluated};
pub use host::{HostEvaluator, NullHost};
pub use lambda::set_apply;
pub use matcher::{match_term, Match};
pub use rule::Rule;
pub use subst::{update_span, update_term};
pub use trace::TraceRecord;
