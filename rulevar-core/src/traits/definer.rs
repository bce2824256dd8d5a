//! The variable declaration seam.

use crate::errors::DefineError;
use crate::registry::VariableValue;

/// The single operation both of the engine's declaration surfaces expose:
/// bind a name to a concrete typed value. The compiler side declares
/// placeholders before compilation, the scanner side declares computed values
/// before matching; this crate treats them identically.
pub trait VariableDefiner {
    /// Declare `name` with `value` on the underlying engine surface.
    fn define_variable(&mut self, name: &str, value: VariableValue) -> Result<(), DefineError>;
}
