//! Element tags - the binary header preceding every element
//!
//! Tags come in two encodings. The long form spends two 32-bit words on
//! type code and byte length and pads the payload to an 8-byte boundary.
//! When the payload is 1 to 4 bytes the tag packs both fields into a
//! single word (length in the high 16 bits, type in the low 16) and the
//! payload follows immediately, padded to a 4-byte boundary.

use alloc::vec::Vec;

use super::constants::{LONG_ALIGNMENT, SHORT_ALIGNMENT, SHORT_FORM_MAX};
use super::data_type::{type_name, type_width, DataType};
use crate::buffer::ByteCursor;
use crate::error::Result;
use crate::layout::padding_for;

/// Binary header preceding every element in the stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementTag {
    /// Raw data type code
    pub data_type: u32,
    /// Payload length in bytes (padding excluded)
    pub len: u32,
    /// Whether the payload is packed into the tag word (short form)
    short: bool,
}

impl ElementTag {
    /// Create a tag for a payload, selecting the form by its length.
    ///
    /// The form is a property of the payload: 1 to 4 bytes pack into the
    /// short form, everything else takes the long form.
    pub fn for_payload(data_type: DataType, len: u32) -> Self {
        ElementTag {
            data_type: data_type.to_u32(),
            len,
            short: (1..=SHORT_FORM_MAX).contains(&len),
        }
    }

    /// Decode one tag from the cursor.
    ///
    /// Reads a single 32-bit word; a zero upper half means the long form
    /// and a second length word follows, otherwise both fields are packed
    /// into the word just read.
    pub fn read(cur: &mut ByteCursor) -> Result<Self> {
        let word = cur.get_u32()?;
        if word >> 16 == 0 {
            let len = cur.get_u32()?;
            Ok(ElementTag {
                data_type: word,
                len,
                short: false,
            })
        } else {
            Ok(ElementTag {
                data_type: word & 0xFFFF,
                len: word >> 16,
                short: true,
            })
        }
    }

    /// Encode the tag header into a byte sink
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        if self.short {
            let word = (self.len << 16) | (self.data_type & 0xFFFF);
            out.extend_from_slice(&word.to_le_bytes());
        } else {
            out.extend_from_slice(&self.data_type.to_le_bytes());
            out.extend_from_slice(&self.len.to_le_bytes());
        }
    }

    /// Is this the packed short form?
    pub const fn is_short(&self) -> bool {
        self.short
    }

    /// Number of padding bytes following the payload.
    ///
    /// Padding is always added after the payload, never before: to the
    /// next 4-byte boundary for the short form, 8-byte for the long form.
    pub const fn padding(&self) -> usize {
        let boundary = if self.short {
            SHORT_ALIGNMENT
        } else {
            LONG_ALIGNMENT
        };
        padding_for(self.len as usize, boundary)
    }

    /// Width in bytes of one value of the tagged type
    pub const fn value_width(&self) -> usize {
        type_width(self.data_type)
    }

    /// Number of values in the payload
    pub const fn element_count(&self) -> usize {
        self.len as usize / self.value_width()
    }

    /// Resolve the raw code against the known type set
    pub const fn resolved_type(&self) -> Option<DataType> {
        DataType::from_u32(self.data_type)
    }
}

impl core::fmt::Display for ElementTag {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "[tag: {} size: {}]", type_name(self.data_type), self.len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn decode(bytes: &[u8]) -> ElementTag {
        let mut cur = ByteCursor::from_slice(bytes);
        ElementTag::read(&mut cur).unwrap()
    }

    #[test]
    fn long_form_decode() {
        let tag = decode(&[9, 0, 0, 0, 24, 0, 0, 0]);
        assert!(!tag.is_short());
        assert_eq!(tag.resolved_type(), Some(DataType::Double));
        assert_eq!(tag.len, 24);
        assert_eq!(tag.element_count(), 3);
        assert_eq!(tag.padding(), 0);
    }

    #[test]
    fn short_form_decode() {
        // length 2 in the high half, miINT8 in the low half
        let tag = decode(&[1, 0, 2, 0]);
        assert!(tag.is_short());
        assert_eq!(tag.resolved_type(), Some(DataType::Int8));
        assert_eq!(tag.len, 2);
        assert_eq!(tag.padding(), 2);
    }

    #[test]
    fn padding_boundaries() {
        // 3-byte long-form payload pads to the 8-byte boundary
        let tag = ElementTag {
            data_type: DataType::Int8.to_u32(),
            len: 3,
            short: false,
        };
        assert_eq!(tag.padding(), 5);

        // the same payload in short form pads to the 4-byte boundary
        let tag = ElementTag::for_payload(DataType::Int8, 3);
        assert!(tag.is_short());
        assert_eq!(tag.padding(), 1);
    }

    #[test]
    fn form_follows_payload_length() {
        assert!(!ElementTag::for_payload(DataType::Int8, 0).is_short());
        assert!(ElementTag::for_payload(DataType::Int8, 1).is_short());
        assert!(ElementTag::for_payload(DataType::Int8, 4).is_short());
        assert!(!ElementTag::for_payload(DataType::Int8, 5).is_short());
    }

    #[test]
    fn encode_decode_roundtrip() {
        let mut out = vec![];
        ElementTag::for_payload(DataType::Int32, 4).encode_into(&mut out);
        assert_eq!(out.len(), 4);
        assert_eq!(decode(&out), ElementTag::for_payload(DataType::Int32, 4));

        let mut out = vec![];
        ElementTag::for_payload(DataType::Double, 16).encode_into(&mut out);
        assert_eq!(out.len(), 8);
        assert_eq!(decode(&out), ElementTag::for_payload(DataType::Double, 16));
    }
}
