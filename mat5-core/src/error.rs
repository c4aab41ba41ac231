//! Error types for MAT-file format operations

/// Errors that can occur at the binary format layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatError {
    /// Descriptive text does not start with the MAT-file signature
    InvalidSignature,
    /// Endian indicator is not the little-endian marker
    UnsupportedEndian,
    /// Element tag is malformed
    InvalidTag,
    /// Index outside the buffer bounds
    IndexOutOfBounds,
    /// Read or write exceeds the remaining buffer capacity
    BufferOverflow,
    /// Byte length is not a multiple of the element width
    ElementAlignment,
    /// Size arithmetic would overflow
    SizeOverflow,
    /// Buffer shorter than a fixed-size structure requires
    InsufficientBuffer,
}

impl core::fmt::Display for FormatError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            FormatError::InvalidSignature => "not a MATLAB 5.0 MAT-file",
            FormatError::UnsupportedEndian => "big-endian MAT-files are not supported",
            FormatError::InvalidTag => "malformed element tag",
            FormatError::IndexOutOfBounds => "index out of bounds",
            FormatError::BufferOverflow => "read or write past the buffer capacity",
            FormatError::ElementAlignment => "byte length not aligned to the element width",
            FormatError::SizeOverflow => "size calculation would overflow",
            FormatError::InsufficientBuffer => "insufficient buffer space",
        };
        write!(f, "{msg}")
    }
}

impl core::error::Error for FormatError {}

/// Result type for format-layer operations
pub type Result<T> = core::result::Result<T, FormatError>;
