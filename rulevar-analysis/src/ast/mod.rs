//! Rule syntax tree — the boundary contract with the external rule parser.
//!
//! The engine's own grammar parser produces these trees; this crate never
//! parses condition grammar itself. Hosts lower their parser's output into
//! [`RuleFile`] (in-process, or across a process boundary via serde), and the
//! analyzer only needs two things from a node: its children and, for leaf
//! identifiers, the textual name.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// One parsed rule source: its directives and rules.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RuleFile {
    /// Include-directive targets, in source order.
    pub includes: Vec<String>,
    /// Import-directive targets, in source order.
    pub imports: Vec<String>,
    pub rules: Vec<Rule>,
}

/// One rule with its condition tree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Rule {
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub is_global: bool,
    pub condition: ConditionNode,
}

/// Comparison operators a condition can apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Contains,
    Matches,
}

/// Arithmetic operators a condition can apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

/// Condition expression node — language-independent representation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ConditionNode {
    // ---- Leaves ----
    Boolean { value: bool },
    Integer { value: i64 },
    Float { value: f64 },
    Str { value: String },
    Regex { pattern: String },
    Filesize,
    /// A bare identifier — where external variable references live.
    Identifier { name: String },
    /// A string pattern reference (`$a`).
    PatternMatch { pattern: String },
    /// A pattern occurrence count (`#a`).
    PatternCount { pattern: String },

    // ---- Pattern operations ----
    PatternOffset {
        pattern: String,
        index: Option<Box<ConditionNode>>,
    },
    PatternLength {
        pattern: String,
        index: Option<Box<ConditionNode>>,
    },
    PatternAt {
        pattern: String,
        offset: Box<ConditionNode>,
    },
    PatternIn {
        pattern: String,
        from: Box<ConditionNode>,
        to: Box<ConditionNode>,
    },

    // ---- Access ----
    FieldAccess {
        object: Box<ConditionNode>,
        field: String,
    },
    Index {
        object: Box<ConditionNode>,
        index: Box<ConditionNode>,
    },

    // ---- Operators ----
    Not { operand: Box<ConditionNode> },
    Neg { operand: Box<ConditionNode> },
    And { operands: Vec<ConditionNode> },
    Or { operands: Vec<ConditionNode> },
    Compare {
        op: CompareOp,
        left: Box<ConditionNode>,
        right: Box<ConditionNode>,
    },
    Arith {
        op: ArithOp,
        left: Box<ConditionNode>,
        right: Box<ConditionNode>,
    },

    // ---- Quantifiers ----
    ForOf {
        quantifier: Box<ConditionNode>,
        patterns: Vec<String>,
        body: Option<Box<ConditionNode>>,
    },
    ForIn {
        quantifier: Box<ConditionNode>,
        bindings: Vec<String>,
        iterable: Box<ConditionNode>,
        body: Box<ConditionNode>,
    },

    // ---- Catch-all — no data loss ----
    Other {
        kind: String,
        children: Vec<ConditionNode>,
    },
}

impl ConditionNode {
    /// Get the kind name of this node.
    pub fn kind(&self) -> &str {
        match self {
            Self::Boolean { .. } => "boolean",
            Self::Integer { .. } => "integer",
            Self::Float { .. } => "float",
            Self::Str { .. } => "str",
            Self::Regex { .. } => "regex",
            Self::Filesize => "filesize",
            Self::Identifier { .. } => "identifier",
            Self::PatternMatch { .. } => "pattern_match",
            Self::PatternCount { .. } => "pattern_count",
            Self::PatternOffset { .. } => "pattern_offset",
            Self::PatternLength { .. } => "pattern_length",
            Self::PatternAt { .. } => "pattern_at",
            Self::PatternIn { .. } => "pattern_in",
            Self::FieldAccess { .. } => "field_access",
            Self::Index { .. } => "index",
            Self::Not { .. } => "not",
            Self::Neg { .. } => "neg",
            Self::And { .. } => "and",
            Self::Or { .. } => "or",
            Self::Compare { .. } => "compare",
            Self::Arith { .. } => "arith",
            Self::ForOf { .. } => "for_of",
            Self::ForIn { .. } => "for_in",
            Self::Other { kind, .. } => kind,
        }
    }

    /// Child nodes in source order.
    pub fn children(&self) -> SmallVec<[&ConditionNode; 4]> {
        let mut out = SmallVec::new();
        match self {
            Self::Boolean { .. }
            | Self::Integer { .. }
            | Self::Float { .. }
            | Self::Str { .. }
            | Self::Regex { .. }
            | Self::Filesize
            | Self::Identifier { .. }
            | Self::PatternMatch { .. }
            | Self::PatternCount { .. } => {}
            Self::PatternOffset { index, .. } | Self::PatternLength { index, .. } => {
                if let Some(index) = index {
                    out.push(index.as_ref());
                }
            }
            Self::PatternAt { offset, .. } => out.push(offset.as_ref()),
            Self::PatternIn { from, to, .. } => {
                out.push(from.as_ref());
                out.push(to.as_ref());
            }
            Self::FieldAccess { object, .. } => out.push(object.as_ref()),
            Self::Index { object, index } => {
                out.push(object.as_ref());
                out.push(index.as_ref());
            }
            Self::Not { operand } | Self::Neg { operand } => out.push(operand.as_ref()),
            Self::And { operands } | Self::Or { operands } => out.extend(operands.iter()),
            Self::Compare { left, right, .. } | Self::Arith { left, right, .. } => {
                out.push(left.as_ref());
                out.push(right.as_ref());
            }
            Self::ForOf {
                quantifier, body, ..
            } => {
                out.push(quantifier.as_ref());
                if let Some(body) = body {
                    out.push(body.as_ref());
                }
            }
            Self::ForIn {
                quantifier,
                iterable,
                body,
                ..
            } => {
                out.push(quantifier.as_ref());
                out.push(iterable.as_ref());
                out.push(body.as_ref());
            }
            Self::Other { children, .. } => out.extend(children.iter()),
        }
        out
    }

    /// Count total nodes in this subtree.
    pub fn node_count(&self) -> usize {
        1 + self
            .children()
            .into_iter()
            .map(|c| c.node_count())
            .sum::<usize>()
    }

    // Construction helpers, mainly for hosts lowering parser output and for
    // tests building conditions by hand.

    pub fn ident(name: impl Into<String>) -> Self {
        Self::Identifier { name: name.into() }
    }

    pub fn str(value: impl Into<String>) -> Self {
        Self::Str {
            value: value.into(),
        }
    }

    pub fn int(value: i64) -> Self {
        Self::Integer { value }
    }

    pub fn and(operands: Vec<ConditionNode>) -> Self {
        Self::And { operands }
    }

    pub fn or(operands: Vec<ConditionNode>) -> Self {
        Self::Or { operands }
    }

    pub fn not(operand: ConditionNode) -> Self {
        Self::Not {
            operand: Box::new(operand),
        }
    }

    pub fn compare(op: CompareOp, left: ConditionNode, right: ConditionNode) -> Self {
        Self::Compare {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn eq(left: ConditionNode, right: ConditionNode) -> Self {
        Self::compare(CompareOp::Eq, left, right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_children_in_source_order() {
        let cond = ConditionNode::and(vec![
            ConditionNode::ident("a"),
            ConditionNode::ident("b"),
        ]);
        let names: Vec<_> = cond.children().into_iter().map(|c| c.kind()).collect();
        assert_eq!(names, vec!["identifier", "identifier"]);
    }

    #[test]
    fn test_node_count_spans_nested_operators() {
        let cond = ConditionNode::eq(
            ConditionNode::ident("file_path"),
            ConditionNode::str(""),
        );
        assert_eq!(cond.node_count(), 3);
        assert_eq!(ConditionNode::not(cond).node_count(), 4);
    }

    #[test]
    fn test_other_preserves_children() {
        let node = ConditionNode::Other {
            kind: "vendor_extension".into(),
            children: vec![ConditionNode::ident("os")],
        };
        assert_eq!(node.kind(), "vendor_extension");
        assert_eq!(node.children().len(), 1);
    }
}
