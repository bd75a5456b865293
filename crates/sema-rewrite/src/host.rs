use sema_core::value::Term;

/// The external expression evaluator consulted for `Code` terms. Blocking and
/// synchronous; implementations must return an error value rather than panic
/// across the boundary.
pub trait HostEvaluator {
    fn eval(&self, src: &str) -> Result<Term, String>;
}

/// Default collaborator: every expression is an error, so `Code` terms are
/// simply left unevaluated.
#[derive(Debug, Default)]
pub struct NullHost;

impl HostEvaluator for NullHost {
    fn eval(&self, _src: &str) -> Result<Term, String> {
        Err("no host evaluator installed".into())
    }
}
