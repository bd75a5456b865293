use serde::{Deserialize, Serialize};

use sema_core::value::{Bindings, Term};

/// One successful rule application, for the "show derivation" surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceRecord {
    pub input: Term,
    pub bindings: Bindings,
    pub rule: String,
    pub output: Term,
}
