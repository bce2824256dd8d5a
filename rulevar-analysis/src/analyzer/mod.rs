//! Rule-body analysis.
//!
//! Walks parsed rule trees to discover which external variables, includes,
//! and imports a rule body uses. One analyzer instance accumulates across
//! calls, so a whole rule directory can be aggregated into a single result
//! before the selection set is built.

use std::path::Path;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use rulevar_core::errors::ParseError;
use rulevar_core::registry::VariableType;

use crate::ast::{ConditionNode, RuleFile};

/// The external rule-grammar parser seam. Hosts adapt their engine's parser
/// to this trait, mapping its diagnostics into [`ParseError`].
pub trait RuleParser {
    /// Parse one rule source into its syntax tree.
    fn parse(&self, source: &str) -> Result<RuleFile, ParseError>;
}

/// Configuration for the rule-body analyzer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Maximum condition nesting depth the traversal will follow. Nodes
    /// beyond the bound are skipped silently; see
    /// [`RuleAnalyzer::truncation_count`].
    pub max_condition_depth: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            max_condition_depth: 1024,
        }
    }
}

impl AnalyzerConfig {
    /// Load from a TOML document; missing keys keep their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }
}

/// Accumulated analysis output: which vocabulary entries, includes, and
/// imports the analyzed rule bodies reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisResult {
    /// Referenced variables, deduplicated, in first-occurrence order.
    pub variables: Vec<VariableType>,
    /// Include targets, deduplicated, in first-occurrence order.
    pub includes: Vec<String>,
    /// Import targets, deduplicated, in first-occurrence order.
    pub imports: Vec<String>,
}

/// Static analyzer over parsed rule files.
///
/// Traversal is an explicit worklist with a depth budget rather than
/// recursion, so pathological or adversarial rule trees cannot blow the
/// stack; nodes past the bound are skipped as a documented safety valve, and
/// the skip count is observable. Identifier resolution is cached per
/// analyzer: the first occurrence of a name resolves against the registry,
/// every later occurrence — variable or not — is a set lookup.
#[derive(Debug, Default)]
pub struct RuleAnalyzer {
    config: AnalyzerConfig,
    variables: Vec<VariableType>,
    includes: Vec<String>,
    imports: Vec<String>,
    resolved: FxHashSet<String>,
    seen_includes: FxHashSet<String>,
    seen_imports: FxHashSet<String>,
    truncated: usize,
}

impl RuleAnalyzer {
    /// Create an analyzer with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an analyzer with an explicit configuration.
    pub fn with_config(config: AnalyzerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Analyze one parsed rule file, accumulating onto prior results.
    pub fn analyze(&mut self, file: &RuleFile) {
        let skipped_before = self.truncated;

        for include in &file.includes {
            if self.seen_includes.insert(include.clone()) {
                self.includes.push(include.clone());
            }
        }
        for import in &file.imports {
            if self.seen_imports.insert(import.clone()) {
                self.imports.push(import.clone());
            }
        }
        for rule in &file.rules {
            self.visit_condition(&rule.condition);
        }

        if self.truncated > skipped_before {
            tracing::debug!(
                rules = file.rules.len(),
                skipped = self.truncated - skipped_before,
                max_depth = self.config.max_condition_depth,
                "condition nesting exceeded the depth bound; deeper nodes were not analyzed"
            );
        }
    }

    /// Parse `source` with the host's parser, then analyze it. A parse
    /// failure propagates as-is and leaves the accumulated state untouched.
    pub fn analyze_source(
        &mut self,
        parser: &dyn RuleParser,
        source: &str,
    ) -> Result<(), ParseError> {
        let file = parser.parse(source)?;
        self.analyze(&file);
        Ok(())
    }

    /// Read a rule file from disk, then [`analyze_source`](Self::analyze_source) it.
    pub fn analyze_path(
        &mut self,
        parser: &dyn RuleParser,
        path: impl AsRef<Path>,
    ) -> Result<(), ParseError> {
        let source = std::fs::read_to_string(path)?;
        self.analyze_source(parser, &source)
    }

    /// Referenced variables so far, in first-occurrence order.
    pub fn variables(&self) -> &[VariableType] {
        &self.variables
    }

    /// Include targets so far, deduplicated, in first-occurrence order.
    pub fn includes(&self) -> &[String] {
        &self.includes
    }

    /// Import targets so far, deduplicated, in first-occurrence order.
    pub fn imports(&self) -> &[String] {
        &self.imports
    }

    /// How many condition nodes were skipped because they sat beyond the
    /// depth bound. Non-zero means some variable references may be unseen.
    pub fn truncation_count(&self) -> usize {
        self.truncated
    }

    /// Consume the analyzer, yielding its accumulated result.
    pub fn finish(self) -> AnalysisResult {
        AnalysisResult {
            variables: self.variables,
            includes: self.includes,
            imports: self.imports,
        }
    }

    fn visit_condition(&mut self, root: &ConditionNode) {
        let mut stack: Vec<(&ConditionNode, usize)> = vec![(root, 1)];
        while let Some((node, depth)) = stack.pop() {
            if depth > self.config.max_condition_depth {
                self.truncated += 1;
                continue;
            }
            if let ConditionNode::Identifier { name } = node {
                self.record_identifier(name);
            }
            // Push in reverse so the worklist visits left-to-right preorder,
            // keeping first-occurrence order equal to source order.
            for child in node.children().into_iter().rev() {
                stack.push((child, depth + 1));
            }
        }
    }

    fn record_identifier(&mut self, name: &str) {
        if self.resolved.contains(name) {
            return;
        }
        self.resolved.insert(name.to_string());
        if let Some(variable) = VariableType::from_name(name) {
            self.variables.push(variable);
        }
    }
}
