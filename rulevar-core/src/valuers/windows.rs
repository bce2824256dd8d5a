//! Windows valuers: file attribute bits. Change time has no Windows
//! counterpart and reports absence.

use std::os::windows::fs::MetadataExt;

use crate::context::ScanContext;
use crate::errors::ValueError;
use crate::registry::VariableValue;

const FILE_ATTRIBUTE_HIDDEN: u32 = 0x0000_0002;
const FILE_ATTRIBUTE_SYSTEM: u32 = 0x0000_0004;
const FILE_ATTRIBUTE_COMPRESSED: u32 = 0x0000_0800;
const FILE_ATTRIBUTE_ENCRYPTED: u32 = 0x0000_4000;

fn has_attribute(
    ctx: &ScanContext,
    attribute: u32,
) -> Result<Option<VariableValue>, ValueError> {
    let Some(meta) = ctx.file_metadata() else {
        return Ok(None);
    };
    Ok(Some(VariableValue::Bool(
        meta.file_attributes() & attribute != 0,
    )))
}

pub(super) fn file_hidden_value(ctx: &ScanContext) -> Result<Option<VariableValue>, ValueError> {
    has_attribute(ctx, FILE_ATTRIBUTE_HIDDEN)
}

pub(super) fn file_system_value(ctx: &ScanContext) -> Result<Option<VariableValue>, ValueError> {
    has_attribute(ctx, FILE_ATTRIBUTE_SYSTEM)
}

pub(super) fn file_compressed_value(
    ctx: &ScanContext,
) -> Result<Option<VariableValue>, ValueError> {
    has_attribute(ctx, FILE_ATTRIBUTE_COMPRESSED)
}

pub(super) fn file_encrypted_value(
    ctx: &ScanContext,
) -> Result<Option<VariableValue>, ValueError> {
    has_attribute(ctx, FILE_ATTRIBUTE_ENCRYPTED)
}

pub(super) fn file_changed_time_value(
    _: &ScanContext,
) -> Result<Option<VariableValue>, ValueError> {
    Ok(None)
}
