//! The external variable vocabulary.
//!
//! A closed set of 28 variables that rule conditions may reference and that
//! the host defines on the engine's compiler and scanner before a scan runs.
//! The vocabulary is fixed at build time; adding an entry is additive,
//! renaming or retyping one is a breaking change for every rule set that
//! references it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One entry of the external variable vocabulary.
///
/// Entries are declared in the order they are listed to rule authors; that
/// order is also the declaration order used by [`VariableType::all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum VariableType {
    /// Operating system name: `linux`, `windows`, `darwin` or `aix`.
    Os,
    OsLinux,
    OsWindows,
    OsDarwin,
    OsAix,
    /// True when the current scan targets a filesystem object.
    #[serde(rename = "in_filesystem")]
    InFileSystem,
    /// True when the current scan targets a live process.
    InProcess,
    /// Current local time as a `YYYYMMDDHHMMSS` integer.
    TimeNow,
    FilePath,
    /// Base name of the file, extension included.
    FileName,
    /// Extension without the leading dot.
    FileExtension,
    FileReadonly,
    FileHidden,
    /// Windows system attribute; absent elsewhere.
    FileSystem,
    /// Windows compressed attribute; absent elsewhere.
    FileCompressed,
    /// Windows encrypted attribute; absent elsewhere.
    FileEncrypted,
    FileModifiedTime,
    FileAccessedTime,
    /// Inode change time; absent on Windows.
    FileChangedTime,
    /// Creation time; absent where the platform or filesystem does not
    /// report it (notably Linux).
    FileBirthTime,
    ProcessId,
    ProcessParentId,
    ProcessUserName,
    /// Account SID on Windows, numeric uid as a string on Unixes.
    ProcessUserSid,
    ProcessSessionId,
    ProcessName,
    ProcessPath,
    ProcessCommandLine,
}

/// The declared value type of a variable. Exactly one kind per entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Bool,
    Int,
    Float,
    Str,
}

/// What kind of scan a variable is meaningful for. Used to narrow a
/// selection down to the variables a filesystem or process scan can
/// actually answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanTarget {
    FileSystem,
    Process,
}

/// A concrete typed value for one variable, as handed to the engine's
/// declaration interface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl VariableType {
    /// Every vocabulary entry, in declaration order.
    pub const ALL: [VariableType; 28] = [
        Self::Os,
        Self::OsLinux,
        Self::OsWindows,
        Self::OsDarwin,
        Self::OsAix,
        Self::InFileSystem,
        Self::InProcess,
        Self::TimeNow,
        Self::FilePath,
        Self::FileName,
        Self::FileExtension,
        Self::FileReadonly,
        Self::FileHidden,
        Self::FileSystem,
        Self::FileCompressed,
        Self::FileEncrypted,
        Self::FileModifiedTime,
        Self::FileAccessedTime,
        Self::FileChangedTime,
        Self::FileBirthTime,
        Self::ProcessId,
        Self::ProcessParentId,
        Self::ProcessUserName,
        Self::ProcessUserSid,
        Self::ProcessSessionId,
        Self::ProcessName,
        Self::ProcessPath,
        Self::ProcessCommandLine,
    ];

    /// Number of vocabulary entries.
    pub const COUNT: usize = Self::ALL.len();

    /// The full vocabulary in declaration order, freshly allocated per call.
    pub fn all() -> Vec<VariableType> {
        Self::ALL.to_vec()
    }

    /// Canonical identifier, bit-exact as it appears in rule text.
    pub fn name(self) -> &'static str {
        match self {
            Self::Os => "os",
            Self::OsLinux => "os_linux",
            Self::OsWindows => "os_windows",
            Self::OsDarwin => "os_darwin",
            Self::OsAix => "os_aix",
            Self::InFileSystem => "in_filesystem",
            Self::InProcess => "in_process",
            Self::TimeNow => "time_now",
            Self::FilePath => "file_path",
            Self::FileName => "file_name",
            Self::FileExtension => "file_extension",
            Self::FileReadonly => "file_readonly",
            Self::FileHidden => "file_hidden",
            Self::FileSystem => "file_system",
            Self::FileCompressed => "file_compressed",
            Self::FileEncrypted => "file_encrypted",
            Self::FileModifiedTime => "file_modified_time",
            Self::FileAccessedTime => "file_accessed_time",
            Self::FileChangedTime => "file_changed_time",
            Self::FileBirthTime => "file_birth_time",
            Self::ProcessId => "process_id",
            Self::ProcessParentId => "process_parent_id",
            Self::ProcessUserName => "process_user_name",
            Self::ProcessUserSid => "process_user_sid",
            Self::ProcessSessionId => "process_session_id",
            Self::ProcessName => "process_name",
            Self::ProcessPath => "process_path",
            Self::ProcessCommandLine => "process_command_line",
        }
    }

    /// Reverse lookup from a rule-text identifier.
    pub fn from_name(name: &str) -> Option<VariableType> {
        Self::ALL.iter().copied().find(|v| v.name() == name)
    }

    /// The declared value type of this variable.
    pub fn kind(self) -> ValueKind {
        match self {
            Self::Os
            | Self::FilePath
            | Self::FileName
            | Self::FileExtension
            | Self::ProcessUserName
            | Self::ProcessUserSid
            | Self::ProcessName
            | Self::ProcessPath
            | Self::ProcessCommandLine => ValueKind::Str,
            Self::OsLinux
            | Self::OsWindows
            | Self::OsDarwin
            | Self::OsAix
            | Self::InFileSystem
            | Self::InProcess
            | Self::FileReadonly
            | Self::FileHidden
            | Self::FileSystem
            | Self::FileCompressed
            | Self::FileEncrypted => ValueKind::Bool,
            Self::TimeNow
            | Self::FileModifiedTime
            | Self::FileAccessedTime
            | Self::FileChangedTime
            | Self::FileBirthTime
            | Self::ProcessId
            | Self::ProcessParentId
            | Self::ProcessSessionId => ValueKind::Int,
        }
    }

    /// The value declared when no computed value is available.
    pub fn default_value(self) -> VariableValue {
        self.kind().default_value()
    }

    /// Whether this variable is meaningful for the given scan target.
    ///
    /// The path-derived variables apply to both targets: during a process
    /// scan the context path holds the process image path.
    pub fn applies_to(self, target: ScanTarget) -> bool {
        match self {
            Self::Os
            | Self::OsLinux
            | Self::OsWindows
            | Self::OsDarwin
            | Self::OsAix
            | Self::InFileSystem
            | Self::InProcess
            | Self::TimeNow
            | Self::FilePath
            | Self::FileName
            | Self::FileExtension => true,
            Self::FileReadonly
            | Self::FileHidden
            | Self::FileSystem
            | Self::FileCompressed
            | Self::FileEncrypted
            | Self::FileModifiedTime
            | Self::FileAccessedTime
            | Self::FileChangedTime
            | Self::FileBirthTime => target == ScanTarget::FileSystem,
            Self::ProcessId
            | Self::ProcessParentId
            | Self::ProcessUserName
            | Self::ProcessUserSid
            | Self::ProcessSessionId
            | Self::ProcessName
            | Self::ProcessPath
            | Self::ProcessCommandLine => target == ScanTarget::Process,
        }
    }

    /// Dense 0-based index, stable within a build. Used for the valuer table.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for VariableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl ValueKind {
    /// The zero value of this kind.
    pub fn default_value(self) -> VariableValue {
        match self {
            Self::Bool => VariableValue::Bool(false),
            Self::Int => VariableValue::Int(0),
            Self::Float => VariableValue::Float(0.0),
            Self::Str => VariableValue::Str(String::new()),
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Bool => "boolean",
            Self::Int => "integer",
            Self::Float => "float",
            Self::Str => "string",
        })
    }
}

impl VariableValue {
    /// The kind this value belongs to.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::Float(_) => ValueKind::Float,
            Self::Str(_) => ValueKind::Str,
        }
    }
}

impl From<bool> for VariableValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for VariableValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for VariableValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for VariableValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<&str> for VariableValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}
