//! Declaration pass errors.

use super::{DefineError, ValueError};

/// Errors returned by a full declaration pass over a variable selection.
/// Aggregates the two underlying failure channels via `From` conversions and
/// keeps the chained case — a fallback declaration failing right after a
/// value computation already failed — in one piece for the caller.
#[derive(Debug, thiserror::Error)]
pub enum DeclareError {
    #[error(transparent)]
    Define(#[from] DefineError),

    #[error(transparent)]
    Value(#[from] ValueError),

    #[error("declaring fallback for `{name}` failed: {define_error} (after value error: {value_error})")]
    FallbackFailed {
        name: &'static str,
        value_error: ValueError,
        define_error: DefineError,
    },
}
