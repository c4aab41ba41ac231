//! Numeric arrays, generic over the element primitive
//!
//! A numeric array owns one or two byte-backed buffers (real, and
//! imaginary when the complex attribute is set), each exactly
//! `size * width` bytes, addressed column-major. One implementation
//! serves every primitive width through [`ArrayElement`].

use std::marker::PhantomData;

use mat5_core::{byte_len, ArrayElement, Attributes, FormatError};

use super::{ArrayMeta, DEFAULT_NAME};
use crate::error::{MatError, Result};

/// Numeric array backed by little-endian byte buffers
#[derive(Debug, Clone, PartialEq)]
pub struct NumericArray<T: ArrayElement> {
    meta: ArrayMeta,
    real: Vec<u8>,
    imaginary: Option<Vec<u8>>,
    _element: PhantomData<T>,
}

/// Double precision array
pub type DoubleArray = NumericArray<f64>;
/// Single precision array
pub type SingleArray = NumericArray<f32>;
/// 8-bit signed array
pub type Int8Array = NumericArray<i8>;
/// 8-bit unsigned array
pub type UInt8Array = NumericArray<u8>;
/// 16-bit signed array
pub type Int16Array = NumericArray<i16>;
/// 16-bit unsigned array
pub type UInt16Array = NumericArray<u16>;
/// 32-bit signed array
pub type Int32Array = NumericArray<i32>;
/// 32-bit unsigned array
pub type UInt32Array = NumericArray<u32>;
/// 64-bit signed array
pub type Int64Array = NumericArray<i64>;
/// 64-bit unsigned array
pub type UInt64Array = NumericArray<u64>;

impl<T: ArrayElement> NumericArray<T> {
    /// Create a zero-filled real array with the given dimensions
    pub fn new(name: &str, dims: Vec<usize>) -> Result<Self> {
        Self::with_attributes(name, dims, Attributes::none())
    }

    /// Create a zero-filled array with explicit attribute flags.
    ///
    /// The imaginary buffer is allocated exactly when the complex
    /// attribute is set.
    pub fn with_attributes(name: &str, dims: Vec<usize>, attributes: Attributes) -> Result<Self> {
        let meta = ArrayMeta::new(name, dims, attributes);
        let bytes = byte_len(meta.size(), T::size_bytes()).map_err(MatError::Format)?;
        let imaginary = attributes.is_complex().then(|| vec![0u8; bytes]);
        Ok(NumericArray {
            meta,
            real: vec![0u8; bytes],
            imaginary,
            _element: PhantomData,
        })
    }

    /// Construct a 2-D real matrix from a column-packed value slice with
    /// `m` rows
    pub fn from_slice(name: &str, vals: &[T], m: usize) -> Result<Self> {
        if m == 0 || vals.len() % m != 0 {
            return Err(MatError::Format(FormatError::ElementAlignment));
        }
        let mut array = Self::new(name, vec![m, vals.len() / m])?;
        array.real.copy_from_slice(bytemuck::cast_slice(vals));
        Ok(array)
    }

    /// Construct a 2-D real matrix from rows of equal length
    pub fn from_rows(name: &str, rows: &[Vec<T>]) -> Result<Self> {
        if rows.is_empty() {
            return Self::new(name, vec![0, 0]);
        }
        let packed = pack_rows(rows)?;
        Self::from_slice(name, &packed, rows.len())
    }

    /// Construct a 2-D complex matrix from column-packed real and
    /// imaginary value slices with `m` rows
    pub fn from_complex_slices(name: &str, real: &[T], imag: &[T], m: usize) -> Result<Self> {
        if imag.len() != real.len() {
            return Err(MatError::Malformed(
                "imaginary values must match the real values in length",
            ));
        }
        if m == 0 || real.len() % m != 0 {
            return Err(MatError::Format(FormatError::ElementAlignment));
        }
        let mut array =
            Self::with_attributes(name, vec![m, real.len() / m], Attributes::complex())?;
        array.real.copy_from_slice(bytemuck::cast_slice(real));
        if let Some(buf) = array.imaginary.as_mut() {
            buf.copy_from_slice(bytemuck::cast_slice(imag));
        }
        Ok(array)
    }

    /// Shared metadata
    pub fn meta(&self) -> &ArrayMeta {
        &self.meta
    }

    /// Read one real element by column-packed index.
    ///
    /// Panics when the index is outside `[0, size)`.
    pub fn real(&self, index: usize) -> T {
        read_element(&self.real, index)
    }

    /// Read one real element at `(m, n)`
    pub fn real_rc(&self, m: usize, n: usize) -> T {
        self.real(self.meta.index_of(m, n))
    }

    /// Store one real element by column-packed index.
    ///
    /// Panics when the index is outside `[0, size)`.
    pub fn set_real(&mut self, index: usize, value: T) {
        write_element(&mut self.real, index, value);
    }

    /// Store one real element at `(m, n)`
    pub fn set_real_rc(&mut self, m: usize, n: usize, value: T) {
        self.set_real(self.meta.index_of(m, n), value);
    }

    /// Read one imaginary element by column-packed index.
    ///
    /// Arrays without the complex attribute report zero.
    pub fn imag(&self, index: usize) -> T {
        match &self.imaginary {
            Some(buf) => read_element(buf, index),
            None => T::from_f64(0.0),
        }
    }

    /// Read one imaginary element at `(m, n)`
    pub fn imag_rc(&self, m: usize, n: usize) -> T {
        self.imag(self.meta.index_of(m, n))
    }

    /// Store one imaginary element by column-packed index.
    ///
    /// Silently ignored on arrays without the complex attribute.
    pub fn set_imag(&mut self, index: usize, value: T) {
        if let Some(buf) = self.imaginary.as_mut() {
            write_element(buf, index, value);
        }
    }

    /// Store one imaginary element at `(m, n)`
    pub fn set_imag_rc(&mut self, m: usize, n: usize, value: T) {
        self.set_imag(self.meta.index_of(m, n), value);
    }

    /// The raw little-endian real buffer
    pub fn real_bytes(&self) -> &[u8] {
        &self.real
    }

    /// Mutable access to the raw real buffer
    pub fn real_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.real
    }

    /// The raw little-endian imaginary buffer, present iff complex
    pub fn imaginary_bytes(&self) -> Option<&[u8]> {
        self.imaginary.as_deref()
    }

    /// Mutable access to the raw imaginary buffer
    pub fn imaginary_bytes_mut(&mut self) -> Option<&mut [u8]> {
        self.imaginary.as_deref_mut()
    }

    /// Export the real values as a column-packed vector
    pub fn to_vec(&self) -> Vec<T> {
        collect_elements(&self.real)
    }

    /// Export the imaginary values as a column-packed vector, when present
    pub fn imag_to_vec(&self) -> Option<Vec<T>> {
        self.imaginary.as_deref().map(collect_elements)
    }

    /// Export the real values as `M` rows of `N` values
    pub fn to_rows(&self) -> Vec<Vec<T>> {
        (0..self.meta.m())
            .map(|m| (0..self.meta.n()).map(|n| self.real_rc(m, n)).collect())
            .collect()
    }

    /// Render the contents; arrays past 1000 elements fall back to a
    /// summary line
    pub fn content_to_string(&self) -> String {
        let mut out = format!("{} = \n", self.meta.name());
        if self.meta.size() > 1000 {
            out.push_str(&format!(
                "[{}x{}  {} array]",
                self.meta.m(),
                self.meta.n(),
                T::array_class()
            ));
            return out;
        }
        for m in 0..self.meta.m() {
            out.push('\t');
            for n in 0..self.meta.n() {
                out.push_str(&format!("{}", self.real_rc(m, n)));
                if self.meta.is_complex() {
                    out.push_str(&format!("+{}", self.imag_rc(m, n)));
                }
                out.push('\t');
            }
            out.push('\n');
        }
        out
    }
}

impl<T: ArrayElement> Default for NumericArray<T> {
    /// An anonymous 0x0 array
    fn default() -> Self {
        NumericArray {
            meta: ArrayMeta::new(DEFAULT_NAME, vec![0, 0], Attributes::none()),
            real: Vec::new(),
            imaginary: None,
            _element: PhantomData,
        }
    }
}

fn read_element<T: ArrayElement>(buf: &[u8], index: usize) -> T {
    let width = T::size_bytes();
    bytemuck::pod_read_unaligned(&buf[index * width..(index + 1) * width])
}

fn write_element<T: ArrayElement>(buf: &mut [u8], index: usize, value: T) {
    let width = T::size_bytes();
    buf[index * width..(index + 1) * width].copy_from_slice(bytemuck::bytes_of(&value));
}

fn collect_elements<T: ArrayElement>(buf: &[u8]) -> Vec<T> {
    buf.chunks_exact(T::size_bytes())
        .map(bytemuck::pod_read_unaligned)
        .collect()
}

/// Flatten equal-length rows into a column-packed vector
fn pack_rows<T: ArrayElement>(rows: &[Vec<T>]) -> Result<Vec<T>> {
    let Some(first) = rows.first() else {
        return Ok(Vec::new());
    };
    if rows.iter().any(|row| row.len() != first.len()) {
        return Err(MatError::Malformed("rows must all have the same length"));
    }
    let mut packed = Vec::with_capacity(rows.len() * first.len());
    for n in 0..first.len() {
        for row in rows {
            packed.push(row[n]);
        }
    }
    Ok(packed)
}
