//! Value computation for the external variable vocabulary.
//!
//! One pure function per registry entry maps a [`ScanContext`] to a value.
//! `Ok(None)` means "no computable value here" — wrong platform, unknown
//! context field — and the caller declares the type default silently.
//! `Err(_)` means the computation was attempted and failed; policy for that
//! lives with the caller and the context's value-error handler.
//!
//! Platform-dependent computations (file attribute bits, inode change time)
//! live in the `unix` / `windows` submodules; everything else is shared.

#[cfg(unix)]
mod unix;
#[cfg(unix)]
use unix as platform;

#[cfg(windows)]
mod windows;
#[cfg(windows)]
use windows as platform;

use chrono::{DateTime, Datelike, Local, Timelike};
use std::io::ErrorKind;
use std::time::SystemTime;

use crate::context::ScanContext;
use crate::errors::ValueError;
use crate::registry::{VariableType, VariableValue};

/// A single value computation. Must not mutate the context.
pub type ValueFn = fn(&ScanContext) -> Result<Option<VariableValue>, ValueError>;

/// Dense table of value computations, one per vocabulary entry.
///
/// [`ValuerTable::default`] wires up the standard valuers; [`ValuerTable::set`]
/// substitutes a single strategy, which is the supported seam for tests and
/// for hosts that compute a variable differently. Tables are cheap to clone
/// and carry no state of their own.
#[derive(Clone)]
pub struct ValuerTable {
    entries: [ValueFn; VariableType::COUNT],
}

impl Default for ValuerTable {
    fn default() -> Self {
        let mut entries: [ValueFn; VariableType::COUNT] = [absent_value; VariableType::COUNT];
        for var in VariableType::ALL {
            entries[var.index()] = standard_valuer(var);
        }
        Self { entries }
    }
}

impl ValuerTable {
    /// Compute the value of `variable` against `ctx`.
    pub fn value(
        &self,
        variable: VariableType,
        ctx: &ScanContext,
    ) -> Result<Option<VariableValue>, ValueError> {
        (self.entries[variable.index()])(ctx)
    }

    /// Replace the computation strategy for one variable.
    pub fn set(&mut self, variable: VariableType, valuer: ValueFn) {
        self.entries[variable.index()] = valuer;
    }
}

/// The standard computation for one vocabulary entry.
fn standard_valuer(variable: VariableType) -> ValueFn {
    match variable {
        VariableType::Os => os_value,
        VariableType::OsLinux => os_linux_value,
        VariableType::OsWindows => os_windows_value,
        VariableType::OsDarwin => os_darwin_value,
        VariableType::OsAix => os_aix_value,
        VariableType::InFileSystem => in_filesystem_value,
        VariableType::InProcess => in_process_value,
        VariableType::TimeNow => time_now_value,
        VariableType::FilePath => file_path_value,
        VariableType::FileName => file_name_value,
        VariableType::FileExtension => file_extension_value,
        VariableType::FileReadonly => file_readonly_value,
        VariableType::FileHidden => platform::file_hidden_value,
        VariableType::FileSystem => platform::file_system_value,
        VariableType::FileCompressed => platform::file_compressed_value,
        VariableType::FileEncrypted => platform::file_encrypted_value,
        VariableType::FileModifiedTime => file_modified_time_value,
        VariableType::FileAccessedTime => file_accessed_time_value,
        VariableType::FileChangedTime => platform::file_changed_time_value,
        VariableType::FileBirthTime => file_birth_time_value,
        VariableType::ProcessId => process_id_value,
        VariableType::ProcessParentId => process_parent_id_value,
        VariableType::ProcessUserName => process_user_name_value,
        VariableType::ProcessUserSid => process_user_sid_value,
        VariableType::ProcessSessionId => process_session_id_value,
        VariableType::ProcessName => process_name_value,
        // The context path holds the process image path during process scans.
        VariableType::ProcessPath => file_path_value,
        VariableType::ProcessCommandLine => process_command_line_value,
    }
}

fn absent_value(_: &ScanContext) -> Result<Option<VariableValue>, ValueError> {
    Ok(None)
}

/// Encode a local timestamp as a YYYYMMDDHHMMSS integer. Numeric order
/// equals chronological order for any two timestamps after year 0.
pub(crate) fn encode_datetime(dt: DateTime<Local>) -> i64 {
    i64::from(dt.year()) * 10_000_000_000
        + i64::from(dt.month()) * 100_000_000
        + i64::from(dt.day()) * 1_000_000
        + i64::from(dt.hour()) * 10_000
        + i64::from(dt.minute()) * 100
        + i64::from(dt.second())
}

fn encode_system_time(time: SystemTime) -> i64 {
    encode_datetime(DateTime::<Local>::from(time))
}

/// Map a metadata timestamp lookup: value, capability-absent, or failure.
fn metadata_time(result: std::io::Result<SystemTime>) -> Result<Option<VariableValue>, ValueError> {
    match result {
        Ok(time) => Ok(Some(VariableValue::Int(encode_system_time(time)))),
        Err(e) if e.kind() == ErrorKind::Unsupported => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn os_name() -> &'static str {
    // Rule authors match on "darwin", not the Rust target name.
    if cfg!(target_os = "macos") {
        "darwin"
    } else {
        std::env::consts::OS
    }
}

fn os_value(_: &ScanContext) -> Result<Option<VariableValue>, ValueError> {
    Ok(Some(VariableValue::Str(os_name().to_string())))
}

fn os_linux_value(_: &ScanContext) -> Result<Option<VariableValue>, ValueError> {
    Ok(Some(VariableValue::Bool(cfg!(target_os = "linux"))))
}

fn os_windows_value(_: &ScanContext) -> Result<Option<VariableValue>, ValueError> {
    Ok(Some(VariableValue::Bool(cfg!(windows))))
}

fn os_darwin_value(_: &ScanContext) -> Result<Option<VariableValue>, ValueError> {
    Ok(Some(VariableValue::Bool(cfg!(target_os = "macos"))))
}

fn os_aix_value(_: &ScanContext) -> Result<Option<VariableValue>, ValueError> {
    Ok(Some(VariableValue::Bool(cfg!(target_os = "aix"))))
}

fn in_filesystem_value(ctx: &ScanContext) -> Result<Option<VariableValue>, ValueError> {
    Ok(Some(VariableValue::Bool(ctx.in_filesystem())))
}

fn in_process_value(ctx: &ScanContext) -> Result<Option<VariableValue>, ValueError> {
    Ok(Some(VariableValue::Bool(ctx.in_process())))
}

fn time_now_value(_: &ScanContext) -> Result<Option<VariableValue>, ValueError> {
    Ok(Some(VariableValue::Int(encode_datetime(Local::now()))))
}

fn file_path_value(ctx: &ScanContext) -> Result<Option<VariableValue>, ValueError> {
    let path = ctx
        .file_path()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(Some(VariableValue::Str(path)))
}

fn file_name_value(ctx: &ScanContext) -> Result<Option<VariableValue>, ValueError> {
    // An unknown path propagates as the empty name rather than erroring.
    let name = ctx
        .file_path()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(Some(VariableValue::Str(name)))
}

fn file_extension_value(ctx: &ScanContext) -> Result<Option<VariableValue>, ValueError> {
    // `Path::extension` already treats a pure dotfile as extensionless and
    // never includes the leading dot.
    let ext = ctx
        .file_path()
        .and_then(|p| p.extension())
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(Some(VariableValue::Str(ext)))
}

fn file_readonly_value(ctx: &ScanContext) -> Result<Option<VariableValue>, ValueError> {
    // Readonly for all users on Unixes; the readonly attribute on Windows.
    let Some(meta) = ctx.file_metadata() else {
        return Ok(None);
    };
    Ok(Some(VariableValue::Bool(meta.permissions().readonly())))
}

fn file_modified_time_value(ctx: &ScanContext) -> Result<Option<VariableValue>, ValueError> {
    let Some(meta) = ctx.file_metadata() else {
        return Ok(None);
    };
    metadata_time(meta.modified())
}

fn file_accessed_time_value(ctx: &ScanContext) -> Result<Option<VariableValue>, ValueError> {
    let Some(meta) = ctx.file_metadata() else {
        return Ok(None);
    };
    metadata_time(meta.accessed())
}

fn file_birth_time_value(ctx: &ScanContext) -> Result<Option<VariableValue>, ValueError> {
    let Some(meta) = ctx.file_metadata() else {
        return Ok(None);
    };
    metadata_time(meta.created())
}

fn process_id_value(ctx: &ScanContext) -> Result<Option<VariableValue>, ValueError> {
    Ok(Some(VariableValue::Int(i64::from(ctx.pid()))))
}

fn process_parent_id_value(ctx: &ScanContext) -> Result<Option<VariableValue>, ValueError> {
    let Some(process) = ctx.process_info() else {
        return Ok(None);
    };
    Ok(process.parent_id()?.map(VariableValue::Int))
}

fn process_user_name_value(ctx: &ScanContext) -> Result<Option<VariableValue>, ValueError> {
    let Some(process) = ctx.process_info() else {
        return Ok(None);
    };
    Ok(process.user_name()?.map(VariableValue::Str))
}

fn process_user_sid_value(ctx: &ScanContext) -> Result<Option<VariableValue>, ValueError> {
    let Some(process) = ctx.process_info() else {
        return Ok(None);
    };
    Ok(process.user_sid()?.map(VariableValue::Str))
}

fn process_session_id_value(ctx: &ScanContext) -> Result<Option<VariableValue>, ValueError> {
    let Some(process) = ctx.process_info() else {
        return Ok(None);
    };
    Ok(process.session_id()?.map(VariableValue::Int))
}

fn process_name_value(ctx: &ScanContext) -> Result<Option<VariableValue>, ValueError> {
    let Some(process) = ctx.process_info() else {
        return Ok(None);
    };
    Ok(process.name(ctx.cancellation())?.map(VariableValue::Str))
}

fn process_command_line_value(ctx: &ScanContext) -> Result<Option<VariableValue>, ValueError> {
    let Some(process) = ctx.process_info() else {
        return Ok(None);
    };
    Ok(process.command_line(ctx.cancellation())?.map(VariableValue::Str))
}
