//! End-to-end tests: parser seam → analyzer → selection set → declaration.

use rulevar_analysis::{ConditionNode, Rule, RuleAnalyzer, RuleFile, RuleParser};
use rulevar_core::errors::{DefineError, ParseError};
use rulevar_core::{ScanContext, VariableDefiner, VariableSet, VariableType, VariableValue};

/// Stand-in for the engine's grammar parser: returns a pre-lowered tree for
/// any input, the way a host adapter would after a successful parse.
struct StubParser {
    file: RuleFile,
}

impl RuleParser for StubParser {
    fn parse(&self, _source: &str) -> Result<RuleFile, ParseError> {
        Ok(self.file.clone())
    }
}

/// Parser adapter whose underlying parse always fails.
struct FailingParser;

impl RuleParser for FailingParser {
    fn parse(&self, _source: &str) -> Result<RuleFile, ParseError> {
        Err(ParseError::syntax("unexpected token `}` at line 7"))
    }
}

#[derive(Default)]
struct RecordingDefiner {
    calls: Vec<(String, VariableValue)>,
}

impl VariableDefiner for RecordingDefiner {
    fn define_variable(&mut self, name: &str, value: VariableValue) -> Result<(), DefineError> {
        self.calls.push((name.to_string(), value));
        Ok(())
    }
}

fn sample_file() -> RuleFile {
    // include "shared.rules"
    // import "pe"
    // rule hidden_dropper {
    //     condition: file_hidden and file_extension == "exe" and $payload
    // }
    RuleFile {
        includes: vec!["shared.rules".into()],
        imports: vec!["pe".into()],
        rules: vec![Rule {
            name: "hidden_dropper".into(),
            tags: vec!["dropper".into()],
            is_private: false,
            is_global: false,
            condition: ConditionNode::and(vec![
                ConditionNode::ident("file_hidden"),
                ConditionNode::eq(
                    ConditionNode::ident("file_extension"),
                    ConditionNode::str("exe"),
                ),
                ConditionNode::PatternMatch {
                    pattern: "payload".into(),
                },
            ]),
        }],
    }
}

#[test]
fn test_analyze_then_declare_pipeline() {
    let parser = StubParser {
        file: sample_file(),
    };
    let mut analyzer = RuleAnalyzer::new();
    analyzer.analyze_source(&parser, "rule hidden_dropper { .. }").unwrap();

    assert_eq!(analyzer.includes(), &["shared.rules".to_string()]);
    assert_eq!(analyzer.imports(), &["pe".to_string()]);

    let result = analyzer.finish();
    let set = VariableSet::with_variables(&result.variables);
    assert_eq!(
        set.variables(),
        &[VariableType::FileHidden, VariableType::FileExtension]
    );

    // Compiler side: defaults so the unit can compile.
    let mut compiler = RecordingDefiner::default();
    set.declare_defaults(&mut compiler).unwrap();
    assert_eq!(
        compiler.calls,
        vec![
            ("file_hidden".to_string(), VariableValue::Bool(false)),
            ("file_extension".to_string(), VariableValue::Str(String::new())),
        ]
    );

    // Scanner side: computed values for a concrete target.
    let mut ctx = ScanContext::new();
    ctx.set_file_path("/srv/uploads/invoice.exe");
    ctx.set_in_filesystem(true);
    let mut scanner = RecordingDefiner::default();
    set.declare_computed(&ctx, &mut scanner).unwrap();
    assert_eq!(
        scanner.calls[1],
        ("file_extension".to_string(), VariableValue::Str("exe".into()))
    );
}

#[test]
fn test_parse_failure_leaves_analyzer_untouched() {
    let good = StubParser {
        file: sample_file(),
    };
    let mut analyzer = RuleAnalyzer::new();
    analyzer.analyze_source(&good, "first unit").unwrap();
    let variables_before = analyzer.variables().to_vec();
    let includes_before = analyzer.includes().to_vec();

    let err = analyzer
        .analyze_source(&FailingParser, "rule broken {")
        .unwrap_err();
    assert!(matches!(err, ParseError::Syntax { ref message } if message.contains("line 7")));

    assert_eq!(analyzer.variables(), variables_before.as_slice());
    assert_eq!(analyzer.includes(), includes_before.as_slice());
}

#[test]
fn test_analyze_path_reads_rule_sources() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dropper.rules");
    std::fs::write(&path, "rule hidden_dropper { .. }").unwrap();

    let parser = StubParser {
        file: sample_file(),
    };
    let mut analyzer = RuleAnalyzer::new();
    analyzer.analyze_path(&parser, &path).unwrap();
    assert_eq!(
        analyzer.variables(),
        &[VariableType::FileHidden, VariableType::FileExtension]
    );

    let missing = dir.path().join("absent.rules");
    let err = analyzer.analyze_path(&parser, &missing).unwrap_err();
    assert!(matches!(err, ParseError::Io(_)));
    // State is still only the first file's.
    assert_eq!(analyzer.variables().len(), 2);
}

/// A host parser in another process can hand the lowered tree over as JSON.
#[test]
fn test_rule_file_handoff_as_json() {
    let json = r#"{
        "imports": ["elf"],
        "rules": [{
            "name": "persistent_daemon",
            "condition": {"and": {"operands": [
                {"compare": {
                    "op": "eq",
                    "left": {"identifier": {"name": "process_user_name"}},
                    "right": {"str": {"value": "root"}}
                }},
                {"compare": {
                    "op": "contains",
                    "left": {"identifier": {"name": "process_command_line"}},
                    "right": {"str": {"value": "--daemon"}}
                }}
            ]}}
        }]
    }"#;

    let file: RuleFile = serde_json::from_str(json).unwrap();
    let mut analyzer = RuleAnalyzer::new();
    analyzer.analyze(&file);

    assert_eq!(analyzer.imports(), &["elf".to_string()]);
    assert_eq!(
        analyzer.variables(),
        &[
            VariableType::ProcessUserName,
            VariableType::ProcessCommandLine
        ]
    );
}
