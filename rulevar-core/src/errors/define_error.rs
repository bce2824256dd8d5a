//! Declaration interface errors.

use crate::registry::ValueKind;

/// Errors raised by a [`VariableDefiner`](crate::traits::VariableDefiner)
/// implementation when the underlying engine rejects a declaration. These are
/// infrastructure failures and always abort the declaration pass.
#[derive(Debug, thiserror::Error)]
pub enum DefineError {
    #[error("engine rejected variable `{name}`: {message}")]
    Rejected { name: String, message: String },

    #[error("type mismatch for variable `{name}`: expected {expected}")]
    TypeMismatch { name: String, expected: ValueKind },
}

impl DefineError {
    /// Wrap an engine-side rejection message.
    pub fn rejected(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Rejected {
            name: name.into(),
            message: message.into(),
        }
    }
}
