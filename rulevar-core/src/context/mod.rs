//! Per-scan context.
//!
//! A [`ScanContext`] is the snapshot of facts one in-flight scan exposes to
//! the valuers: what is being scanned (file path, file metadata, pid, process
//! handle), which kind of scan is running, an advisory cancellation token,
//! and an optional policy hook for value-computation failures. A context is
//! owned by exactly one scan at a time; [`ScanContext::reset`] recycles the
//! instance for the next scan without reallocation of the struct itself.

mod process;

pub use process::{ProcessInfo, SystemProcess};

use std::fs::Metadata;
use std::path::{Path, PathBuf};

use crate::errors::ValueError;
use crate::registry::VariableType;
use crate::traits::{CancellationToken, VariableDefiner};

/// Policy hook invoked when a valuer fails. Returning `Ok(())` suppresses the
/// failure and lets the declaration pass continue; returning an error aborts
/// the pass with that error.
pub type ValueErrorHandler =
    Box<dyn Fn(&mut dyn VariableDefiner, VariableType, ValueError) -> Result<(), ValueError> + Send + Sync>;

/// Mutable, reusable per-scan snapshot consumed by valuers.
///
/// Every accessor has a defined answer for the unset state — empty, `None`,
/// or zero — never an error. Unset fields simply mean the corresponding
/// variables resolve to absence and fall back to their type defaults.
#[derive(Default)]
pub struct ScanContext {
    token: CancellationToken,
    file_path: Option<PathBuf>,
    file_metadata: Option<Metadata>,
    pid: u32,
    process: Option<Box<dyn ProcessInfo>>,
    in_filesystem: bool,
    in_process: bool,
    value_error_handler: Option<ValueErrorHandler>,
}

impl ScanContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear every field to its zero state so the instance can serve the next
    /// scan. The cancellation token is replaced, not reused: a cancel
    /// requested against the previous scan must not leak into this one.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// The scan's cancellation token. Always present; a context that was
    /// never given one carries a token that never fires.
    pub fn cancellation(&self) -> &CancellationToken {
        &self.token
    }

    pub fn set_cancellation(&mut self, token: CancellationToken) {
        self.token = token;
    }

    /// Path of the scanned file, or the process image path during a process
    /// scan. `None` = unknown.
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn set_file_path(&mut self, path: impl Into<PathBuf>) {
        self.file_path = Some(path.into());
    }

    /// Metadata of the scanned file. `None` = unknown.
    pub fn file_metadata(&self) -> Option<&Metadata> {
        self.file_metadata.as_ref()
    }

    pub fn set_file_metadata(&mut self, metadata: Metadata) {
        self.file_metadata = Some(metadata);
    }

    /// Target process id. `0` = unknown.
    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub fn set_pid(&mut self, pid: u32) {
        self.pid = pid;
    }

    /// Handle onto the target process. `None` = unknown.
    pub fn process_info(&self) -> Option<&dyn ProcessInfo> {
        self.process.as_deref()
    }

    pub fn set_process_info(&mut self, process: Box<dyn ProcessInfo>) {
        self.process = Some(process);
    }

    /// Whether the current scan operates over a filesystem object.
    pub fn in_filesystem(&self) -> bool {
        self.in_filesystem
    }

    pub fn set_in_filesystem(&mut self, v: bool) {
        self.in_filesystem = v;
    }

    /// Whether the current scan operates over a live process.
    pub fn in_process(&self) -> bool {
        self.in_process
    }

    pub fn set_in_process(&mut self, v: bool) {
        self.in_process = v;
    }

    /// Install a policy hook for value-computation failures. Without one, the
    /// default policy is to propagate.
    pub fn set_value_error_handler<F>(&mut self, handler: F)
    where
        F: Fn(&mut dyn VariableDefiner, VariableType, ValueError) -> Result<(), ValueError>
            + Send
            + Sync
            + 'static,
    {
        self.value_error_handler = Some(Box::new(handler));
    }

    /// Route a valuer failure through the installed handler, or return it
    /// unchanged when none is installed.
    pub fn handle_value_error(
        &self,
        definer: &mut dyn VariableDefiner,
        variable: VariableType,
        error: ValueError,
    ) -> Result<(), ValueError> {
        match &self.value_error_handler {
            Some(handler) => handler(definer, variable, error),
            None => Err(error),
        }
    }
}
