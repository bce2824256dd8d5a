//! Rule-source parse errors.

/// Errors surfaced when handing rule source to the external rule-grammar
/// parser. Parsing itself belongs to the host engine; this type is the shape
/// its failures take at the analysis boundary.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("i/o failure reading rule source: {0}")]
    Io(#[from] std::io::Error),

    #[error("rule syntax error: {message}")]
    Syntax { message: String },
}

impl ParseError {
    /// Wrap a syntax diagnostic from the host parser.
    pub fn syntax(message: impl Into<String>) -> Self {
        Self::Syntax {
            message: message.into(),
        }
    }
}
