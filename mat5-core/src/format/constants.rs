//! Format constants and signature bytes for Level 5 MAT-files

/// Size of the file preamble in bytes
pub const HEADER_SIZE: usize = 128;

/// Size of the descriptive text field at the start of the preamble
pub const DESCRIPTION_SIZE: usize = 116;

/// Required prefix of the descriptive text
pub const SIGNATURE: &[u8] = b"MATLAB 5.0 MAT-file";

/// Canonical format version word
pub const VERSION: u16 = 0x0100;

/// Endian indicator for little-endian files
pub const ENDIAN_LE: [u8; 2] = *b"IM";

/// Endian indicator for big-endian files (rejected on read)
pub const ENDIAN_BE: [u8; 2] = *b"MI";

/// Payload alignment boundary for long-form elements
pub const LONG_ALIGNMENT: usize = 8;

/// Payload alignment boundary for short-form (packed) elements
pub const SHORT_ALIGNMENT: usize = 4;

/// Largest payload length that packs into a short-form tag
pub const SHORT_FORM_MAX: u32 = 4;

/// Attribute flag bits within the first word of the flags element
pub mod attr {
    /// Array holds an imaginary part
    pub const COMPLEX: u32 = 0x0800;

    /// Array is a global workspace variable
    pub const GLOBAL: u32 = 0x0400;

    /// Array holds logical values
    pub const LOGICAL: u32 = 0x0200;

    /// Mask selecting the array class byte
    pub const CLASS_MASK: u32 = 0xFF;
}
