//! Tests for the two declaration passes against realistic scan contexts.

use std::sync::Mutex;

use rayon::prelude::*;

use rulevar_core::{
    DefineError, ScanContext, SystemProcess, ValueKind, VariableDefiner, VariableSet,
    VariableType, VariableValue,
};

/// Definer that records declarations behind a mutex so scan threads can share
/// one for assertions.
#[derive(Default)]
struct SharedDefiner {
    calls: Mutex<Vec<(String, VariableValue)>>,
}

impl VariableDefiner for &SharedDefiner {
    fn define_variable(&mut self, name: &str, value: VariableValue) -> Result<(), DefineError> {
        self.calls.lock().unwrap().push((name.to_string(), value));
        Ok(())
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

/// The compile-then-scan round trip: defaults first so the unit compiles,
/// computed values before matching.
#[test]
fn test_compile_then_scan_roundtrip() {
    let set = VariableSet::with_variables(&[
        VariableType::Os,
        VariableType::FileName,
        VariableType::FileExtension,
        VariableType::InFileSystem,
    ]);

    let mut compiler = RecordingDefiner::default();
    set.declare_defaults(&mut compiler).unwrap();
    assert_eq!(compiler.calls.len(), set.len());
    for ((name, value), var) in compiler.calls.iter().zip(set.variables()) {
        assert_eq!(name, var.name());
        assert_eq!(*value, var.default_value());
    }

    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("dropper.exe");
    std::fs::write(&target, b"MZ").unwrap();

    let mut ctx = ScanContext::new();
    ctx.set_file_path(&target);
    ctx.set_file_metadata(std::fs::metadata(&target).unwrap());
    ctx.set_in_filesystem(true);

    let mut scanner = RecordingDefiner::default();
    set.declare_computed(&ctx, &mut scanner).unwrap();
    assert_eq!(
        scanner.calls[1],
        ("file_name".to_string(), VariableValue::Str("dropper.exe".into()))
    );
    assert_eq!(
        scanner.calls[2],
        ("file_extension".to_string(), VariableValue::Str("exe".into()))
    );
    assert_eq!(
        scanner.calls[3],
        ("in_filesystem".to_string(), VariableValue::Bool(true))
    );
}

/// One compiled rule set, many concurrent scanners: each worker takes its own
/// clone of the selection and its own context.
#[test]
fn test_concurrent_scans_with_cloned_selections() {
    let set = VariableSet::with_variables(&[
        VariableType::Os,
        VariableType::FilePath,
        VariableType::FileName,
        VariableType::ProcessId,
    ]);
    let definer = SharedDefiner::default();

    (0..16u32).into_par_iter().for_each(|i| {
        let local = set.clone();
        let mut ctx = ScanContext::new();
        ctx.set_file_path(format!("/tmp/sample-{i}.bin"));
        ctx.set_pid(i);
        let mut sink = &definer;
        local.declare_computed(&ctx, &mut sink).unwrap();
    });

    let calls = definer.calls.lock().unwrap();
    assert_eq!(calls.len(), 16 * set.len());
    // Every worker declared its own file name, not a neighbour's.
    let names: Vec<_> = calls
        .iter()
        .filter(|(n, _)| n == "file_name")
        .map(|(_, v)| v.clone())
        .collect();
    for i in 0..16 {
        assert!(names.contains(&VariableValue::Str(format!("sample-{i}.bin"))));
    }
}

/// Process scan against the live current process through the sysinfo-backed
/// handle.
#[test]
fn test_process_scan_against_self() {
    let pid = std::process::id();
    let mut set = VariableSet::new();
    set.init_for(
        rulevar_core::ScanTarget::Process,
        &[
            VariableType::ProcessId,
            VariableType::ProcessParentId,
            VariableType::ProcessName,
            VariableType::ProcessCommandLine,
            VariableType::FileHidden, // filtered out: not a process variable
        ],
    );
    assert_eq!(set.len(), 4);

    let mut ctx = ScanContext::new();
    ctx.set_pid(pid);
    ctx.set_in_process(true);
    ctx.set_process_info(Box::new(SystemProcess::attach(pid).unwrap()));

    let mut scanner = RecordingDefiner::default();
    set.declare_computed(&ctx, &mut scanner).unwrap();

    assert_eq!(
        scanner.calls[0],
        ("process_id".to_string(), VariableValue::Int(i64::from(pid)))
    );
    let (_, parent) = &scanner.calls[1];
    assert!(matches!(parent, VariableValue::Int(ppid) if *ppid > 0));
    let (_, name) = &scanner.calls[2];
    assert!(matches!(name, VariableValue::Str(s) if !s.is_empty()));
}

/// Every declared variable carries a value of its declared kind, whatever the
/// context looks like.
#[test]
fn test_declared_values_match_declared_kinds() {
    let set = VariableSet::with_variables(&VariableType::ALL);
    let mut scanner = RecordingDefiner::default();
    set.declare_computed(&ScanContext::new(), &mut scanner).unwrap();

    assert_eq!(scanner.calls.len(), VariableType::COUNT);
    for ((name, value), var) in scanner.calls.iter().zip(VariableType::ALL) {
        assert_eq!(name, var.name());
        assert_eq!(
            value.kind(),
            var.kind(),
            "declared value for {name} has the wrong kind"
        );
    }
}

#[test]
fn test_value_kind_display_names() {
    assert_eq!(ValueKind::Bool.to_string(), "boolean");
    assert_eq!(ValueKind::Str.to_string(), "string");
}
