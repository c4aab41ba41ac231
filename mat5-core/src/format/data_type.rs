//! Data type registry for MAT-file elements
//!
//! Every element in the stream is tagged with one of these type codes.
//! The registry maps codes to byte widths and display names.

/// Data types carried by MAT-file elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u32)]
pub enum DataType {
    /// 8-bit, signed
    Int8 = 1,
    /// 8-bit, unsigned
    UInt8 = 2,
    /// 16-bit, signed
    Int16 = 3,
    /// 16-bit, unsigned
    UInt16 = 4,
    /// 32-bit, signed
    Int32 = 5,
    /// 32-bit, unsigned
    UInt32 = 6,
    /// IEEE 754 single format
    Single = 7,
    /// IEEE 754 double format
    Double = 9,
    /// 64-bit, signed
    Int64 = 12,
    /// 64-bit, unsigned
    UInt64 = 13,
    /// Container element holding one matrix record
    Matrix = 14,
    /// Container element holding a deflated sub-stream
    Compressed = 15,
    /// Unicode UTF-8 encoded character data
    Utf8 = 16,
    /// Unicode UTF-16 encoded character data
    Utf16 = 17,
    /// Unicode UTF-32 encoded character data
    Utf32 = 18,
}

impl DataType {
    /// Convert from the raw tag code
    pub const fn from_u32(code: u32) -> Option<Self> {
        match code {
            1 => Some(DataType::Int8),
            2 => Some(DataType::UInt8),
            3 => Some(DataType::Int16),
            4 => Some(DataType::UInt16),
            5 => Some(DataType::Int32),
            6 => Some(DataType::UInt32),
            7 => Some(DataType::Single),
            9 => Some(DataType::Double),
            12 => Some(DataType::Int64),
            13 => Some(DataType::UInt64),
            14 => Some(DataType::Matrix),
            15 => Some(DataType::Compressed),
            16 => Some(DataType::Utf8),
            17 => Some(DataType::Utf16),
            18 => Some(DataType::Utf32),
            _ => None,
        }
    }

    /// Convert to the raw tag code
    pub const fn to_u32(self) -> u32 {
        self as u32
    }

    /// Get the width in bytes of one value of this type
    pub const fn size_bytes(self) -> usize {
        type_width(self as u32)
    }
}

impl core::fmt::Display for DataType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", type_name(*self as u32))
    }
}

/// Width in bytes of one value of the given type code.
///
/// Unrecognized codes report a width of 1, mirroring the historical
/// lenience of existing MAT-file tooling.
pub const fn type_width(code: u32) -> usize {
    match code {
        1 | 2 => 1,
        3 | 4 => 2,
        5 | 6 | 7 => 4,
        9 | 12 | 13 => 8,
        _ => 1,
    }
}

/// Display name for the given type code
pub const fn type_name(code: u32) -> &'static str {
    match code {
        1 => "int8",
        2 => "uint8",
        3 => "int16",
        4 => "uint16",
        5 => "int32",
        6 => "uint32",
        7 => "single",
        9 => "double",
        12 => "int64",
        13 => "uint64",
        14 => "matrix",
        15 => "compressed",
        16 => "utf8",
        17 => "utf16",
        18 => "utf32",
        _ => "unknown",
    }
}
