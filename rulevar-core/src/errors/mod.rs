//! Error handling for rulevar.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod declare_error;
pub mod define_error;
pub mod parse_error;
pub mod value_error;

pub use declare_error::DeclareError;
pub use define_error::DefineError;
pub use parse_error::ParseError;
pub use value_error::ValueError;
