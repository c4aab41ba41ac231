//! Character arrays
//!
//! A character matrix backed by a 16-bit code unit buffer, with
//! row-to-text extraction.

use mat5_core::Attributes;

use super::ArrayMeta;

/// Character array backed by 16-bit code units
#[derive(Debug, Clone, PartialEq)]
pub struct CharArray {
    meta: ArrayMeta,
    chars: Vec<u16>,
}

impl CharArray {
    /// Create a zero-filled character array with the given dimensions
    pub fn new(name: &str, dims: Vec<usize>) -> Self {
        Self::with_attributes(name, dims, Attributes::none())
    }

    /// Create a zero-filled character array with explicit attributes
    pub fn with_attributes(name: &str, dims: Vec<usize>, attributes: Attributes) -> Self {
        let meta = ArrayMeta::new(name, dims, attributes);
        let chars = vec![0u16; meta.size()];
        CharArray { meta, chars }
    }

    /// Create a 1-row character array holding `text`
    pub fn from_str(name: &str, text: &str) -> Self {
        let units: Vec<u16> = text.encode_utf16().collect();
        let rows = if units.is_empty() { 0 } else { 1 };
        let mut array = Self::new(name, vec![rows, units.len()]);
        array.chars.copy_from_slice(&units);
        array
    }

    /// Shared metadata
    pub fn meta(&self) -> &ArrayMeta {
        &self.meta
    }

    /// Read the code unit at a column-packed index.
    ///
    /// Panics when the index is outside `[0, size)`.
    pub fn char_at(&self, index: usize) -> u16 {
        self.chars[index]
    }

    /// Read the code unit at `(m, n)`
    pub fn char_rc(&self, m: usize, n: usize) -> u16 {
        self.chars[self.meta.index_of(m, n)]
    }

    /// Store a code unit at a column-packed index.
    ///
    /// Panics when the index is outside `[0, size)`.
    pub fn set_char(&mut self, index: usize, unit: u16) {
        self.chars[index] = unit;
    }

    /// The backing code unit buffer
    pub fn chars(&self) -> &[u16] {
        &self.chars
    }

    /// Extract the `m`-th row as text
    pub fn row_string(&self, m: usize) -> String {
        let units: Vec<u16> = (0..self.meta.n()).map(|n| self.char_rc(m, n)).collect();
        String::from_utf16_lossy(&units)
    }

    /// Render the contents, one quoted row per line
    pub fn content_to_string(&self) -> String {
        let mut out = format!("{} = \n", self.meta.name());
        for m in 0..self.meta.m() {
            out.push('\t');
            out.push('\'');
            out.push_str(&self.row_string(m));
            out.push_str("'\n");
        }
        out
    }
}
