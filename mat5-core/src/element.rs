//! Element type constraints for numeric array payloads
//!
//! This module defines the trait binding each primitive payload type to
//! its on-disk data type and declared array class, plus the conversions
//! the narrowing/widening read fallback needs.

use crate::format::{ArrayClass, DataType};

/// Trait for primitives that can back a numeric MAT array.
///
/// All element types are plain-old-data (`bytemuck::Pod`) so buffers of
/// them can be viewed as raw bytes and read back without alignment
/// assumptions.
pub trait ArrayElement: bytemuck::Pod + PartialEq + core::fmt::Display {
    /// On-disk data type written for buffers of this element
    fn data_type() -> DataType;

    /// Array class declared for a matrix of this element
    fn array_class() -> ArrayClass;

    /// Width in bytes of this element type
    fn size_bytes() -> usize {
        core::mem::size_of::<Self>()
    }

    /// Convert from f64 for the value-by-value conversion fallback.
    ///
    /// The format permits storing values in a narrower on-disk type than
    /// the declared array class; values are widened through f64 on read.
    fn from_f64(value: f64) -> Self;

    /// Convert to f64 for generic value access
    fn to_f64(self) -> f64;
}

macro_rules! impl_array_element {
    ($($ty:ty => $data_type:ident, $class:ident, $from:expr;)+) => {
        $(
            impl ArrayElement for $ty {
                fn data_type() -> DataType {
                    DataType::$data_type
                }

                fn array_class() -> ArrayClass {
                    ArrayClass::$class
                }

                fn from_f64(value: f64) -> Self {
                    $from(value)
                }

                fn to_f64(self) -> f64 {
                    self as f64
                }
            }
        )+
    };
}

impl_array_element! {
    i8  => Int8,   Int8,   |v: f64| v as i8;
    u8  => UInt8,  UInt8,  |v: f64| v as u8;
    i16 => Int16,  Int16,  |v: f64| v as i16;
    u16 => UInt16, UInt16, |v: f64| v as u16;
    i32 => Int32,  Int32,  |v: f64| v as i32;
    u32 => UInt32, UInt32, |v: f64| v as u32;
    i64 => Int64,  Int64,  |v: f64| v as i64;
    u64 => UInt64, UInt64, |v: f64| v as u64;
    f32 => Single, Single, |v: f64| v as f32;
    f64 => Double, Double, |v: f64| v;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths_match_data_types() {
        assert_eq!(<i8 as ArrayElement>::size_bytes(), 1);
        assert_eq!(<f32 as ArrayElement>::size_bytes(), 4);
        assert_eq!(<u64 as ArrayElement>::size_bytes(), 8);
        assert_eq!(
            <i16 as ArrayElement>::size_bytes(),
            <i16 as ArrayElement>::data_type().size_bytes()
        );
    }

    #[test]
    fn classes() {
        assert_eq!(<f64 as ArrayElement>::array_class(), ArrayClass::Double);
        assert_eq!(<u8 as ArrayElement>::array_class(), ArrayClass::UInt8);
    }

    #[test]
    fn f64_conversions() {
        assert_eq!(i8::from_f64(-3.0), -3);
        assert_eq!(u16::from_f64(65535.0), 65535);
        assert_eq!(f32::from_f64(0.5).to_f64(), 0.5);
        assert_eq!((42i64).to_f64(), 42.0);
    }
}
