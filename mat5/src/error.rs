//! Error type for decode and encode operations
//!
//! Every failure is fatal: a decode or encode call runs to completion or
//! to the first error, and recursive record parsing propagates errors
//! unchanged to the top-level call.

use mat5_core::FormatError;

/// Errors that can occur while reading or writing a MAT-file
#[derive(Debug, thiserror::Error)]
pub enum MatError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("format error: {0}")]
    Format(#[from] FormatError),

    #[error("could not decompress data: {0}")]
    Decompression(String),

    #[error("incorrect data tag: {0}")]
    UnexpectedTag(String),

    #[error("incorrect array class: {0}")]
    UnknownClass(u8),

    #[error("matrix record was not read fully, {0} bytes remaining")]
    Desync(i64),

    #[error("truncated stream inside a record")]
    Truncated,

    #[error("malformed record: {0}")]
    Malformed(&'static str),

    #[error("cannot write array of this kind: {0}")]
    UnsupportedWrite(&'static str),
}

/// Result type for decode and encode operations
pub type Result<T> = std::result::Result<T, MatError>;
