//! rulevar-analysis: static analysis of parsed rule files.
//!
//! Determines which external variables, include directives, and import
//! directives a body of rules references, so the host can build a
//! [`VariableSet`](rulevar_core::VariableSet) covering exactly what a
//! compilation unit needs — no over-fetching of expensive process or
//! filesystem facts for variables no rule uses.
//!
//! Parsing belongs to the engine's own grammar parser; it enters this crate
//! through the [`RuleParser`] seam as an already-built [`ast::RuleFile`].

pub mod analyzer;
pub mod ast;

// Re-exports for convenience
pub use analyzer::{AnalysisResult, AnalyzerConfig, RuleAnalyzer, RuleParser};
pub use ast::{ArithOp, CompareOp, ConditionNode, Rule, RuleFile};
