//! Unix valuers: dot-prefix hidden files, inode change time, and absence for
//! the Windows-only attribute variables.

use chrono::TimeZone;
use std::os::unix::fs::MetadataExt;

use super::encode_datetime;
use crate::context::ScanContext;
use crate::errors::ValueError;
use crate::registry::VariableValue;

pub(super) fn file_hidden_value(
    ctx: &ScanContext,
) -> Result<Option<VariableValue>, ValueError> {
    let Some(path) = ctx.file_path() else {
        return Ok(None);
    };
    let hidden = path
        .file_name()
        .map(|name| name.to_string_lossy().starts_with('.'))
        .unwrap_or(false);
    Ok(Some(VariableValue::Bool(hidden)))
}

pub(super) fn file_system_value(_: &ScanContext) -> Result<Option<VariableValue>, ValueError> {
    Ok(None)
}

pub(super) fn file_compressed_value(_: &ScanContext) -> Result<Option<VariableValue>, ValueError> {
    Ok(None)
}

pub(super) fn file_encrypted_value(_: &ScanContext) -> Result<Option<VariableValue>, ValueError> {
    Ok(None)
}

pub(super) fn file_changed_time_value(
    ctx: &ScanContext,
) -> Result<Option<VariableValue>, ValueError> {
    let Some(meta) = ctx.file_metadata() else {
        return Ok(None);
    };
    let dt = chrono::Local
        .timestamp_opt(meta.ctime(), meta.ctime_nsec() as u32)
        .single()
        .ok_or(ValueError::TimestampOutOfRange)?;
    Ok(Some(VariableValue::Int(encode_datetime(dt))))
}
