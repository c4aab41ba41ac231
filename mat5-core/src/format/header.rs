//! The fixed 128-byte MAT-file preamble
//!
//! Bytes 0-115 carry zero-terminated, zero-padded descriptive text that
//! must start with the literal signature; bytes 116-123 are reserved;
//! bytes 124-125 hold the version word and bytes 126-127 the endian
//! indicator. Only little-endian files are supported - the swapped
//! indicator is rejected as an unsupported format.

use alloc::string::String;

use super::constants::{DESCRIPTION_SIZE, ENDIAN_LE, HEADER_SIZE, SIGNATURE, VERSION};
use crate::buffer::ByteCursor;
use crate::error::{FormatError, Result};

/// Descriptor for the 128-byte file preamble
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatHeader {
    description: [u8; DESCRIPTION_SIZE],
    version: u16,
    endian: [u8; 2],
}

impl MatHeader {
    /// Size of the preamble in bytes
    pub const SIZE: usize = HEADER_SIZE;

    /// Create a header with the given descriptive text.
    ///
    /// The text is truncated to 116 bytes and zero-padded; it must start
    /// with the MAT-file signature for the result to be readable.
    pub fn with_description(text: &str) -> Self {
        let mut description = [0u8; DESCRIPTION_SIZE];
        let bytes = text.as_bytes();
        let len = bytes.len().min(DESCRIPTION_SIZE);
        description[..len].copy_from_slice(&bytes[..len]);
        MatHeader {
            description,
            version: VERSION,
            endian: ENDIAN_LE,
        }
    }

    /// Create a header with the default descriptive text
    pub fn new() -> Self {
        Self::with_description("MATLAB 5.0 MAT-file, written by mat5")
    }

    /// Parse a preamble from its first 128 bytes.
    ///
    /// Fails with a signature error when the descriptive text does not
    /// start with `"MATLAB 5.0 MAT-file"`, and with an unsupported-endian
    /// error for any indicator other than `IM` - in particular the
    /// big-endian `MI` marker.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < Self::SIZE {
            return Err(FormatError::InsufficientBuffer);
        }

        if !bytes.starts_with(SIGNATURE) {
            return Err(FormatError::InvalidSignature);
        }

        let mut description = [0u8; DESCRIPTION_SIZE];
        description.copy_from_slice(&bytes[..DESCRIPTION_SIZE]);

        // bytes 116-123 are reserved and ignored on read
        let version = u16::from_le_bytes([bytes[124], bytes[125]]);
        let endian = [bytes[126], bytes[127]];

        if endian != ENDIAN_LE {
            // byte-swapped (`MI`) input is explicitly not supported
            return Err(FormatError::UnsupportedEndian);
        }

        Ok(MatHeader {
            description,
            version,
            endian,
        })
    }

    /// Emit the 128-byte preamble
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[..DESCRIPTION_SIZE].copy_from_slice(&self.description);
        // bytes 116-123 reserved, written as zero
        bytes[124..126].copy_from_slice(&self.version.to_le_bytes());
        bytes[126..128].copy_from_slice(&self.endian);
        bytes
    }

    /// Write the preamble through a cursor
    pub fn write_to(&self, cur: &mut ByteCursor) -> Result<()> {
        cur.put_bytes(&self.to_bytes())
    }

    /// The descriptive text up to its first zero byte
    pub fn description(&self) -> String {
        let end = self
            .description
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(DESCRIPTION_SIZE);
        String::from_utf8_lossy(&self.description[..end]).into_owned()
    }

    /// The version word (canonically `0x0100`)
    pub fn version(&self) -> u16 {
        self.version
    }

    /// The two endian indicator bytes
    pub fn endian_indicator(&self) -> [u8; 2] {
        self.endian
    }

    /// Does the header carry the signature and the little-endian marker?
    pub fn is_valid(&self) -> bool {
        self.description.starts_with(SIGNATURE) && self.endian == ENDIAN_LE
    }
}

impl Default for MatHeader {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for MatHeader {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "[descriptive text: {}, version: 0x{:04x}, endian: {}{}]",
            self.description(),
            self.version,
            self.endian[0] as char,
            self.endian[1] as char
        )
    }
}
