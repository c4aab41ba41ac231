//! Array class codes and attribute flags
//!
//! Each matrix record declares its class (cell, struct, char, sparse or
//! one of the numeric widths) and an attribute bitmask in the flags
//! element at the start of the record.

use super::constants::attr;

/// Array classes a matrix record can declare
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum ArrayClass {
    /// Cell array
    Cell = 1,
    /// Structure array
    Struct = 2,
    /// Object
    Object = 3,
    /// Character array
    Char = 4,
    /// Sparse array
    Sparse = 5,
    /// Double precision array
    Double = 6,
    /// Single precision array
    Single = 7,
    /// 8-bit, signed integer array
    Int8 = 8,
    /// 8-bit, unsigned integer array
    UInt8 = 9,
    /// 16-bit, signed integer array
    Int16 = 10,
    /// 16-bit, unsigned integer array
    UInt16 = 11,
    /// 32-bit, signed integer array
    Int32 = 12,
    /// 32-bit, unsigned integer array
    UInt32 = 13,
    /// 64-bit, signed integer array
    Int64 = 14,
    /// 64-bit, unsigned integer array
    UInt64 = 15,
    /// Function handle
    Function = 16,
    /// Opaque
    Opaque = 17,
}

impl ArrayClass {
    /// Convert from the class byte of the flags word
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(ArrayClass::Cell),
            2 => Some(ArrayClass::Struct),
            3 => Some(ArrayClass::Object),
            4 => Some(ArrayClass::Char),
            5 => Some(ArrayClass::Sparse),
            6 => Some(ArrayClass::Double),
            7 => Some(ArrayClass::Single),
            8 => Some(ArrayClass::Int8),
            9 => Some(ArrayClass::UInt8),
            10 => Some(ArrayClass::Int16),
            11 => Some(ArrayClass::UInt16),
            12 => Some(ArrayClass::Int32),
            13 => Some(ArrayClass::UInt32),
            14 => Some(ArrayClass::Int64),
            15 => Some(ArrayClass::UInt64),
            16 => Some(ArrayClass::Function),
            17 => Some(ArrayClass::Opaque),
            _ => None,
        }
    }

    /// Convert to the class byte of the flags word
    pub const fn to_u8(self) -> u8 {
        self as u8
    }
}

impl core::fmt::Display for ArrayClass {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            ArrayClass::Cell => "cell",
            ArrayClass::Struct => "struct",
            ArrayClass::Object => "object",
            ArrayClass::Char => "char",
            ArrayClass::Sparse => "sparse",
            ArrayClass::Double => "double",
            ArrayClass::Single => "single",
            ArrayClass::Int8 => "int8",
            ArrayClass::UInt8 => "uint8",
            ArrayClass::Int16 => "int16",
            ArrayClass::UInt16 => "uint16",
            ArrayClass::Int32 => "int32",
            ArrayClass::UInt32 => "uint32",
            ArrayClass::Int64 => "int64",
            ArrayClass::UInt64 => "uint64",
            ArrayClass::Function => "function_handle",
            ArrayClass::Opaque => "opaque",
        };
        write!(f, "{name}")
    }
}

/// Attribute bits orthogonal to the array class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attributes(u32);

impl Attributes {
    /// No attributes set
    pub const fn none() -> Self {
        Attributes(0)
    }

    /// Attributes with the complex bit set
    pub const fn complex() -> Self {
        Attributes(attr::COMPLEX)
    }

    /// Extract the attribute bits from the first flags word
    pub const fn from_word(word: u32) -> Self {
        Attributes(word & !attr::CLASS_MASK)
    }

    /// Raw attribute bits as stored above the class byte
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Array holds an imaginary part
    pub const fn is_complex(self) -> bool {
        self.0 & attr::COMPLEX != 0
    }

    /// Array is a global workspace variable
    pub const fn is_global(self) -> bool {
        self.0 & attr::GLOBAL != 0
    }

    /// Array holds logical values
    pub const fn is_logical(self) -> bool {
        self.0 & attr::LOGICAL != 0
    }

    /// Set or clear the complex bit
    pub fn set_complex(&mut self, complex: bool) {
        if complex {
            self.0 |= attr::COMPLEX;
        } else {
            self.0 &= !attr::COMPLEX;
        }
    }

    /// Set or clear the global bit
    pub fn set_global(&mut self, global: bool) {
        if global {
            self.0 |= attr::GLOBAL;
        } else {
            self.0 &= !attr::GLOBAL;
        }
    }

    /// Set or clear the logical bit
    pub fn set_logical(&mut self, logical: bool) {
        if logical {
            self.0 |= attr::LOGICAL;
        } else {
            self.0 &= !attr::LOGICAL;
        }
    }
}

/// Decoded contents of a matrix record's flags element.
///
/// The first integer packs the class byte with the attribute bits; the
/// second holds the non-zero capacity for sparse arrays and is zero for
/// everything else. The class byte is kept raw here so a record can be
/// name-filtered before its class is validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrayFlags {
    /// Raw class byte from the first flags word
    pub class_code: u8,
    /// Attribute bits from the first flags word
    pub attributes: Attributes,
    /// Declared non-zero capacity (sparse arrays only)
    pub nz_max: u32,
}

impl ArrayFlags {
    /// Decode from the two integers of the flags element
    pub const fn from_words(first: u32, second: u32) -> Self {
        ArrayFlags {
            class_code: (first & attr::CLASS_MASK) as u8,
            attributes: Attributes::from_word(first),
            nz_max: second,
        }
    }

    /// Encode into the two integers of the flags element
    pub const fn to_words(self) -> [u32; 2] {
        [
            self.class_code as u32 | self.attributes.bits(),
            self.nz_max,
        ]
    }

    /// Resolve the raw class byte against the known class set
    pub const fn class(self) -> Option<ArrayClass> {
        ArrayClass::from_u8(self.class_code)
    }
}
