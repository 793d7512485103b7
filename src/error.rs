// Error type shared by the delimiter resolver and the record processor.

use std::io;

use thiserror::Error;

/// Errors produced while resolving a delimiter or wrapping a stream.
#[derive(Debug, Error)]
pub enum WrapError {
    /// A `0x` token whose body is not a hexadecimal integer.
    #[error("invalid hex value '{token}': {reason}")]
    InvalidDelimiterSyntax { token: String, reason: String },
    /// A `0x` token whose value is not in `0..=0x10FFFF`.
    #[error("hex value '{token}' out of valid Unicode range")]
    DelimiterOutOfRange { token: String },
    /// Read, write or flush failure on one of the streams.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl WrapError {
    /// True for the two delimiter-resolution variants.
    pub fn is_delimiter_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidDelimiterSyntax { .. } | Self::DelimiterOutOfRange { .. }
        )
    }
}
