//! rulevar-core: scan-time external variable resolution.
//!
//! A signature-matching rule engine requires every external variable a rule
//! references to be declared before compilation and defined before each scan.
//! This crate owns that contract:
//! - Registry: the closed vocabulary of recognized variables, each with a
//!   name, value kind, and default.
//! - Scan context: the per-scan snapshot of facts (file, process, flags,
//!   cancellation) values are computed from.
//! - Valuers: one pure computation per variable, platform-specialized where
//!   the underlying OS fact differs.
//! - Selection sets: the ordered, deduplicated subset of the vocabulary one
//!   compiled rule unit uses, with the compile-time and scan-time
//!   declaration passes.
//!
//! The rule engine itself — parsing, compilation, matching — is an external
//! collaborator reached through the [`VariableDefiner`] seam.

pub mod context;
pub mod errors;
pub mod logging;
pub mod registry;
pub mod selection;
pub mod traits;
pub mod valuers;

// Re-exports for convenience
pub use context::{ProcessInfo, ScanContext, SystemProcess, ValueErrorHandler};
pub use errors::{DeclareError, DefineError, ParseError, ValueError};
pub use registry::{ScanTarget, ValueKind, VariableType, VariableValue};
pub use selection::VariableSet;
pub use traits::{CancellationToken, VariableDefiner};
pub use valuers::{ValueFn, ValuerTable};
