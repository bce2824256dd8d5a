//! Valuer computation errors.

/// Errors that can occur while computing a variable's value from a scan
/// context. "The fact is unavailable here" is not an error — valuers report
/// that as absence, and the type default is declared silently.
#[derive(Debug, thiserror::Error)]
pub enum ValueError {
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("process {pid} is gone or inaccessible")]
    ProcessGone { pid: u32 },

    #[error("timestamp out of representable range")]
    TimestampOutOfRange,

    #[error("value computation cancelled")]
    Cancelled,

    #[error("{0}")]
    Other(String),
}
