//! Boundary traits shared across the crate.

pub mod cancellation;
pub mod definer;

pub use cancellation::CancellationToken;
pub use definer::VariableDefiner;
