//! Error types for SerializedFile decoding and encoding.

use thiserror::Error;

/// Result type for SerializedFile operations.
pub type Result<T> = std::result::Result<T, FormatError>;

/// Errors surfaced by the strict decode/encode entry points.
///
/// The engine itself reports failure through sticky state flags so that a
/// partially decoded file can still be returned for diagnostics; these
/// variants are what those flags map to at the API boundary.
#[derive(Error, Debug)]
pub enum FormatError {
    /// The stream ended inside a structure.
    #[error("unexpected end of stream while decoding")]
    UnexpectedEof,

    /// The stream decoded, but violated the format's structure.
    #[error("malformed SerializedFile: {0}")]
    Malformed(String),

    /// I/O error reading the input.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FormatError {
    /// Create a new malformed-data error.
    pub fn malformed<S: Into<String>>(msg: S) -> Self {
        Self::Malformed(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FormatError::malformed("negative table length");
        assert_eq!(
            err.to_string(),
            "malformed SerializedFile: negative table length"
        );
        assert!(matches!(err, FormatError::Malformed(_)));
    }
}
