//! The typed in-memory array model
//!
//! Arrays decoded from or encoded into a MAT-file are represented by the
//! closed [`MatArray`] enum: one variant per array class plus the empty
//! placeholder that stands in for missing cell and struct entries. All
//! variants share the [`ArrayMeta`] record of name, dimensions and
//! attribute flags, and address their payload column-major.

pub mod cell;
pub mod chars;
pub mod numeric;
pub mod sparse;
pub mod structure;

pub use cell::CellArray;
pub use chars::CharArray;
pub use numeric::{
    DoubleArray, Int16Array, Int32Array, Int64Array, Int8Array, NumericArray, SingleArray,
    UInt16Array, UInt32Array, UInt64Array, UInt8Array,
};
pub use sparse::SparseArray;
pub use structure::StructArray;

use mat5_core::{ArrayClass, ArrayFlags, Attributes};

/// Name the codec assigns to arrays constructed without one
pub const DEFAULT_NAME: &str = "@";

/// Name, dimensions and attribute flags shared by every array variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayMeta {
    name: String,
    dims: Vec<usize>,
    attributes: Attributes,
}

impl ArrayMeta {
    /// Create metadata; an empty name falls back to the default `"@"`
    pub fn new(name: &str, dims: Vec<usize>, attributes: Attributes) -> Self {
        let name = if name.is_empty() {
            String::from(DEFAULT_NAME)
        } else {
            String::from(name)
        };
        ArrayMeta {
            name,
            dims,
            attributes,
        }
    }

    /// The array name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The array dimensions
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Number of dimensions
    pub fn ndims(&self) -> usize {
        self.dims.len()
    }

    /// The first (row) dimension
    pub fn m(&self) -> usize {
        self.dims.first().copied().unwrap_or(0)
    }

    /// The flattened second dimension: dimensions beyond the second are
    /// folded into the column count
    pub fn n(&self) -> usize {
        match self.dims.len() {
            0 | 1 => 0,
            2 => self.dims[1],
            _ => self.dims[1..].iter().product(),
        }
    }

    /// Total element count (`M * N`)
    pub fn size(&self) -> usize {
        self.m() * self.n()
    }

    /// An array is empty exactly when its size is zero
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Attribute flags
    pub fn attributes(&self) -> Attributes {
        self.attributes
    }

    /// Does the array carry an imaginary part?
    pub fn is_complex(&self) -> bool {
        self.attributes.is_complex()
    }

    /// Is the array a global workspace variable?
    pub fn is_global(&self) -> bool {
        self.attributes.is_global()
    }

    /// Does the array hold logical values?
    pub fn is_logical(&self) -> bool {
        self.attributes.is_logical()
    }

    /// Column-major flat index of `(m, n)`
    pub fn index_of(&self, m: usize, n: usize) -> usize {
        m + n * self.m()
    }
}

/// The empty-array placeholder.
///
/// Stands in for unset cell entries and struct fields; the decoder
/// stores one wherever a zero-length sub-record appears. It has no body
/// grammar of its own, so the encoder rejects it.
#[derive(Debug, Clone, PartialEq)]
pub struct EmptyArray {
    meta: ArrayMeta,
}

impl EmptyArray {
    /// Create an anonymous 0x0 placeholder
    pub fn new() -> Self {
        Self::with_name(DEFAULT_NAME)
    }

    /// Create a named 0x0 placeholder
    pub fn with_name(name: &str) -> Self {
        EmptyArray {
            meta: ArrayMeta::new(name, vec![0, 0], Attributes::none()),
        }
    }

    /// Shared metadata
    pub fn meta(&self) -> &ArrayMeta {
        &self.meta
    }
}

impl Default for EmptyArray {
    fn default() -> Self {
        Self::new()
    }
}

/// One named, typed array - the unit the codec reads and writes
#[derive(Debug, Clone, PartialEq)]
pub enum MatArray {
    /// 8-bit signed numeric array
    Int8(NumericArray<i8>),
    /// 8-bit unsigned numeric array
    UInt8(NumericArray<u8>),
    /// 16-bit signed numeric array
    Int16(NumericArray<i16>),
    /// 16-bit unsigned numeric array
    UInt16(NumericArray<u16>),
    /// 32-bit signed numeric array
    Int32(NumericArray<i32>),
    /// 32-bit unsigned numeric array
    UInt32(NumericArray<u32>),
    /// 64-bit signed numeric array
    Int64(NumericArray<i64>),
    /// 64-bit unsigned numeric array
    UInt64(NumericArray<u64>),
    /// Single precision numeric array
    Single(NumericArray<f32>),
    /// Double precision numeric array
    Double(NumericArray<f64>),
    /// Character array
    Char(CharArray),
    /// Cell array
    Cell(CellArray),
    /// Structure array
    Struct(StructArray),
    /// Sparse array
    Sparse(SparseArray),
    /// Empty placeholder
    Empty(EmptyArray),
}

macro_rules! for_each_variant {
    ($self:expr, $inner:pat => $body:expr) => {
        match $self {
            MatArray::Int8($inner) => $body,
            MatArray::UInt8($inner) => $body,
            MatArray::Int16($inner) => $body,
            MatArray::UInt16($inner) => $body,
            MatArray::Int32($inner) => $body,
            MatArray::UInt32($inner) => $body,
            MatArray::Int64($inner) => $body,
            MatArray::UInt64($inner) => $body,
            MatArray::Single($inner) => $body,
            MatArray::Double($inner) => $body,
            MatArray::Char($inner) => $body,
            MatArray::Cell($inner) => $body,
            MatArray::Struct($inner) => $body,
            MatArray::Sparse($inner) => $body,
            MatArray::Empty($inner) => $body,
        }
    };
}

impl MatArray {
    /// Shared metadata of any variant
    pub fn meta(&self) -> &ArrayMeta {
        for_each_variant!(self, a => a.meta())
    }

    /// The array name
    pub fn name(&self) -> &str {
        self.meta().name()
    }

    /// The array dimensions
    pub fn dims(&self) -> &[usize] {
        self.meta().dims()
    }

    /// The first (row) dimension
    pub fn m(&self) -> usize {
        self.meta().m()
    }

    /// The flattened second dimension
    pub fn n(&self) -> usize {
        self.meta().n()
    }

    /// Total element count
    pub fn size(&self) -> usize {
        self.meta().size()
    }

    /// An array is empty exactly when its size is zero
    pub fn is_empty(&self) -> bool {
        self.meta().is_empty()
    }

    /// Does the array carry an imaginary part?
    pub fn is_complex(&self) -> bool {
        self.meta().is_complex()
    }

    /// The declared array class.
    ///
    /// The empty placeholder reports the double class, the class byte
    /// such records carry on disk.
    pub fn class(&self) -> ArrayClass {
        match self {
            MatArray::Int8(_) => ArrayClass::Int8,
            MatArray::UInt8(_) => ArrayClass::UInt8,
            MatArray::Int16(_) => ArrayClass::Int16,
            MatArray::UInt16(_) => ArrayClass::UInt16,
            MatArray::Int32(_) => ArrayClass::Int32,
            MatArray::UInt32(_) => ArrayClass::UInt32,
            MatArray::Int64(_) => ArrayClass::Int64,
            MatArray::UInt64(_) => ArrayClass::UInt64,
            MatArray::Single(_) => ArrayClass::Single,
            MatArray::Double(_) => ArrayClass::Double,
            MatArray::Char(_) => ArrayClass::Char,
            MatArray::Cell(_) => ArrayClass::Cell,
            MatArray::Struct(_) => ArrayClass::Struct,
            MatArray::Sparse(_) => ArrayClass::Sparse,
            MatArray::Empty(_) => ArrayClass::Double,
        }
    }

    /// The flags element contents for this array
    pub fn flags(&self) -> ArrayFlags {
        let nz_max = match self {
            MatArray::Sparse(s) => s.nz_max() as u32,
            _ => 0,
        };
        ArrayFlags {
            class_code: self.class().to_u8(),
            attributes: self.meta().attributes(),
            nz_max,
        }
    }

    /// Render the array contents as text.
    ///
    /// Large numeric arrays fall back to the summary line.
    pub fn content_to_string(&self) -> String {
        for_each_variant!(self, a => a.content_to_string())
    }
}

impl std::fmt::Display for MatArray {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let meta = self.meta();
        if meta.ndims() > 3 {
            write!(f, "[{}D", meta.ndims())?;
        } else {
            write!(f, "[{}", meta.m())?;
            for d in &meta.dims()[1..] {
                write!(f, "x{d}")?;
            }
        }
        write!(f, "  {} array", self.class())?;
        if matches!(self, MatArray::Sparse(_)) {
            write!(f, " (sparse")?;
            if meta.is_complex() {
                write!(f, " complex")?;
            }
            write!(f, ")")?;
        } else if meta.is_complex() {
            write!(f, " (complex)")?;
        }
        write!(f, "]")
    }
}

macro_rules! impl_from_numeric {
    ($($ty:ty => $variant:ident;)+) => {
        $(
            impl From<NumericArray<$ty>> for MatArray {
                fn from(array: NumericArray<$ty>) -> Self {
                    MatArray::$variant(array)
                }
            }
        )+
    };
}

impl_from_numeric! {
    i8 => Int8;
    u8 => UInt8;
    i16 => Int16;
    u16 => UInt16;
    i32 => Int32;
    u32 => UInt32;
    i64 => Int64;
    u64 => UInt64;
    f32 => Single;
    f64 => Double;
}

impl From<CharArray> for MatArray {
    fn from(array: CharArray) -> Self {
        MatArray::Char(array)
    }
}

impl From<CellArray> for MatArray {
    fn from(array: CellArray) -> Self {
        MatArray::Cell(array)
    }
}

impl From<StructArray> for MatArray {
    fn from(array: StructArray) -> Self {
        MatArray::Struct(array)
    }
}

impl From<SparseArray> for MatArray {
    fn from(array: SparseArray) -> Self {
        MatArray::Sparse(array)
    }
}

impl From<EmptyArray> for MatArray {
    fn from(array: EmptyArray) -> Self {
        MatArray::Empty(array)
    }
}

impl EmptyArray {
    fn content_to_string(&self) -> String {
        format!("{} = []\n", self.meta.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meta_derived_quantities() {
        let meta = ArrayMeta::new("a", vec![3, 4], Attributes::none());
        assert_eq!(meta.m(), 3);
        assert_eq!(meta.n(), 4);
        assert_eq!(meta.size(), 12);
        assert!(!meta.is_empty());

        // dimensions beyond two flatten into the column count
        let meta = ArrayMeta::new("b", vec![2, 3, 4], Attributes::none());
        assert_eq!(meta.m(), 2);
        assert_eq!(meta.n(), 12);

        let meta = ArrayMeta::new("c", vec![0, 0], Attributes::none());
        assert!(meta.is_empty());
    }

    #[test]
    fn empty_name_defaults() {
        let meta = ArrayMeta::new("", vec![1, 1], Attributes::none());
        assert_eq!(meta.name(), DEFAULT_NAME);
    }

    #[test]
    fn column_major_index() {
        let meta = ArrayMeta::new("a", vec![3, 4], Attributes::none());
        assert_eq!(meta.index_of(0, 0), 0);
        assert_eq!(meta.index_of(2, 0), 2);
        assert_eq!(meta.index_of(0, 1), 3);
        assert_eq!(meta.index_of(2, 3), 11);
    }

    #[test]
    fn summary_line() {
        let a: MatArray = DoubleArray::from_slice("x", &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 3)
            .unwrap()
            .into();
        assert_eq!(format!("{a}"), "[3x2  double array]");
    }

    #[test]
    fn empty_placeholder() {
        let e = MatArray::Empty(EmptyArray::new());
        assert_eq!(e.name(), DEFAULT_NAME);
        assert_eq!(e.dims(), &[0, 0]);
        assert!(e.is_empty());
        assert_eq!(e.class(), ArrayClass::Double);
    }
}
