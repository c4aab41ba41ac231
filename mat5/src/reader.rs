//! MAT-file reader
//!
//! Parses a byte stream into named [`MatArray`] values: the 128-byte
//! preamble once, then a loop of tagged records. `COMPRESSED` records
//! are inflated into a fresh in-memory stream and re-entered
//! recursively; `MATRIX` records go through the recursive matrix-record
//! grammar. Every record is held to strict accounting - the bytes
//! consumed (or skipped, for filtered-out records) must equal the
//! declared length, or the stream is declared desynchronized.
//!
//! The recursion threads one mutable [`ByteCursor`] through every call;
//! the cursor position is the only state crossing call boundaries.

use std::io::Read;

use hashbrown::HashMap;
use mat5_core::{
    ArrayClass, ArrayFlags, ArrayElement, Attributes, ByteCursor, DataType, ElementTag,
    FormatError, MatHeader,
};

use crate::array::{
    CellArray, CharArray, EmptyArray, MatArray, NumericArray, SparseArray, StructArray,
};
use crate::error::{MatError, Result};
use crate::filter::NameFilter;

/// A decoded MAT-file: the preamble plus arrays keyed by name
#[derive(Debug, Clone)]
pub struct MatFile {
    header: MatHeader,
    arrays: Vec<MatArray>,
    index: HashMap<String, usize>,
}

impl MatFile {
    /// Decode a MAT-file from any reader, accepting every array name
    pub fn read<R: Read>(reader: R) -> Result<Self> {
        MatFileReader::new().read(reader)
    }

    /// Decode a MAT-file already held in memory
    pub fn read_bytes(data: &[u8]) -> Result<Self> {
        MatFileReader::new().read_bytes(data)
    }

    /// Decode a MAT-file from disk through a memory mapping
    #[cfg(feature = "mmap")]
    pub fn read_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        MatFileReader::new().read_path(path)
    }

    /// The decoded file preamble
    pub fn header(&self) -> &MatHeader {
        &self.header
    }

    /// The array of the given name, if the file holds one
    pub fn get(&self, name: &str) -> Option<&MatArray> {
        self.index.get(name).map(|&i| &self.arrays[i])
    }

    /// All decoded arrays in stream order
    pub fn arrays(&self) -> &[MatArray] {
        &self.arrays
    }

    /// Consume the file, returning the arrays in stream order
    pub fn into_arrays(self) -> Vec<MatArray> {
        self.arrays
    }

    /// Number of decoded arrays
    pub fn len(&self) -> usize {
        self.arrays.len()
    }

    /// Did the file hold no (matching) arrays?
    pub fn is_empty(&self) -> bool {
        self.arrays.is_empty()
    }

    fn insert(&mut self, array: MatArray) {
        let name = String::from(array.name());
        match self.index.get(&name).copied() {
            Some(i) => self.arrays[i] = array,
            None => {
                self.index.insert(name, self.arrays.len());
                self.arrays.push(array);
            }
        }
    }
}

/// MAT-file reader with an optional name filter
#[derive(Debug, Clone, Default)]
pub struct MatFileReader {
    filter: NameFilter,
}

impl MatFileReader {
    /// Reader that materializes every array
    pub fn new() -> Self {
        MatFileReader {
            filter: NameFilter::new(),
        }
    }

    /// Reader that materializes only arrays matching `filter`
    pub fn with_filter(filter: NameFilter) -> Self {
        MatFileReader { filter }
    }

    /// Decode a MAT-file from any reader
    pub fn read<R: Read>(&self, mut reader: R) -> Result<MatFile> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        self.read_bytes(&data)
    }

    /// Decode a MAT-file already held in memory
    pub fn read_bytes(&self, data: &[u8]) -> Result<MatFile> {
        let mut cur = ByteCursor::from_slice(data);

        let mut header_bytes = [0u8; MatHeader::SIZE];
        cur.get_bytes(&mut header_bytes)
            .map_err(|_| MatError::Format(FormatError::InsufficientBuffer))?;
        let header = MatHeader::from_bytes(&header_bytes)?;

        let mut file = MatFile {
            header,
            arrays: Vec::new(),
            index: HashMap::new(),
        };
        while cur.has_remaining() {
            self.read_element(&mut cur, &mut file)?;
        }
        Ok(file)
    }

    /// Decode a MAT-file from disk through a memory mapping
    #[cfg(feature = "mmap")]
    pub fn read_path<P: AsRef<std::path::Path>>(&self, path: P) -> Result<MatFile> {
        let file = std::fs::File::open(path)?;
        // SAFETY: the mapping is read-only and dropped before returning
        let map = unsafe { memmap2::Mmap::map(&file)? };
        self.read_bytes(&map)
    }

    /// Read one top-level element: `COMPRESSED` or `MATRIX`
    fn read_element(&self, cur: &mut ByteCursor, file: &mut MatFile) -> Result<()> {
        let tag = ElementTag::read(cur).map_err(truncated)?;
        match tag.resolved_type() {
            Some(DataType::Compressed) => {
                let compressed = cur.take(tag.len as usize).map_err(truncated)?;
                let inflated = inflate(compressed)?;
                // the outer loop terminates independently of the inner one
                let mut inner = ByteCursor::from_vec(inflated);
                while inner.has_remaining() {
                    self.read_element(&mut inner, file)?;
                }
                Ok(())
            }
            Some(DataType::Matrix) => {
                let declared = tag.len as usize;
                let start = cur.position();
                let parsed = self.read_matrix(cur, true)?;
                match parsed {
                    Some(array) => file.insert(array),
                    None => {
                        // filtered out: still skip exactly to the record end
                        let consumed = cur.position() - start;
                        cur.skip(declared.saturating_sub(consumed)).map_err(truncated)?;
                    }
                }
                let consumed = cur.position() - start;
                if consumed != declared {
                    return Err(MatError::Desync(declared as i64 - consumed as i64));
                }
                Ok(())
            }
            _ => Err(MatError::UnexpectedTag(tag.to_string())),
        }
    }

    /// Parse one matrix record: flags, dimensions, name, class body.
    ///
    /// Returns `None` when a root-level record fails the name filter;
    /// the caller must still skip to the record's declared end.
    fn read_matrix(&self, cur: &mut ByteCursor, is_root: bool) -> Result<Option<MatArray>> {
        let flags = self.read_flags(cur)?;
        let dims = self.read_dimensions(cur)?;
        let name = self.read_name(cur)?;

        // filtering happens only at the root level, before the class is
        // even validated
        if is_root && !self.filter.matches(&name) {
            return Ok(None);
        }

        let class = flags
            .class()
            .ok_or(MatError::UnknownClass(flags.class_code))?;
        let attributes = flags.attributes;

        let array: MatArray = match class {
            ArrayClass::Double => self.read_numeric::<f64>(cur, &name, dims, attributes)?.into(),
            ArrayClass::Single => self.read_numeric::<f32>(cur, &name, dims, attributes)?.into(),
            ArrayClass::Int8 => self.read_numeric::<i8>(cur, &name, dims, attributes)?.into(),
            ArrayClass::UInt8 => self.read_numeric::<u8>(cur, &name, dims, attributes)?.into(),
            ArrayClass::Int16 => self.read_numeric::<i16>(cur, &name, dims, attributes)?.into(),
            ArrayClass::UInt16 => self.read_numeric::<u16>(cur, &name, dims, attributes)?.into(),
            ArrayClass::Int32 => self.read_numeric::<i32>(cur, &name, dims, attributes)?.into(),
            ArrayClass::UInt32 => self.read_numeric::<u32>(cur, &name, dims, attributes)?.into(),
            ArrayClass::Int64 => self.read_numeric::<i64>(cur, &name, dims, attributes)?.into(),
            ArrayClass::UInt64 => self.read_numeric::<u64>(cur, &name, dims, attributes)?.into(),
            ArrayClass::Char => self.read_char(cur, &name, dims, attributes)?.into(),
            ArrayClass::Cell => self.read_cell(cur, &name, dims, attributes)?.into(),
            ArrayClass::Struct => self.read_struct(cur, &name, dims, attributes)?.into(),
            ArrayClass::Sparse => self
                .read_sparse(cur, &name, dims, attributes, flags.nz_max)?
                .into(),
            ArrayClass::Object | ArrayClass::Function | ArrayClass::Opaque => {
                return Err(MatError::UnknownClass(flags.class_code))
            }
        };
        Ok(Some(array))
    }

    /// Flags element: a two-integer array packing class, attributes and
    /// the sparse capacity
    fn read_flags(&self, cur: &mut ByteCursor) -> Result<ArrayFlags> {
        let tag = ElementTag::read(cur).map_err(truncated)?;
        let words = read_i32_array(cur, &tag)?;
        let first = words.first().copied().unwrap_or(0) as u32;
        let second = words.get(1).copied().unwrap_or(0) as u32;
        Ok(ArrayFlags::from_words(first, second))
    }

    /// Dimensions element: an integer array of length at least two
    fn read_dimensions(&self, cur: &mut ByteCursor) -> Result<Vec<usize>> {
        let tag = ElementTag::read(cur).map_err(truncated)?;
        let raw = read_i32_array(cur, &tag)?;
        if raw.len() < 2 {
            return Err(MatError::Malformed(
                "dimensions element must hold at least two values",
            ));
        }
        raw.into_iter()
            .map(|d| {
                usize::try_from(d)
                    .map_err(|_| MatError::Malformed("negative array dimension"))
            })
            .collect()
    }

    /// Name element: a character array converted to text
    fn read_name(&self, cur: &mut ByteCursor) -> Result<String> {
        let tag = ElementTag::read(cur).map_err(truncated)?;
        let units = read_chars(cur, &tag)?;
        Ok(String::from_utf16_lossy(&units))
    }

    /// Numeric body: one data element for the real part, a second for
    /// the imaginary part when the complex attribute is set
    fn read_numeric<T: ArrayElement>(
        &self,
        cur: &mut ByteCursor,
        name: &str,
        dims: Vec<usize>,
        attributes: Attributes,
    ) -> Result<NumericArray<T>> {
        let mut array = NumericArray::with_attributes(name, dims, attributes)?;

        let tag = ElementTag::read(cur).map_err(truncated)?;
        read_into_buffer::<T>(cur, &tag, array.real_bytes_mut())?;

        if array.meta().is_complex() {
            let tag = ElementTag::read(cur).map_err(truncated)?;
            if let Some(buf) = array.imaginary_bytes_mut() {
                read_into_buffer::<T>(cur, &tag, buf)?;
            }
        }
        Ok(array)
    }

    /// Character body: one data element read into the 16-bit buffer
    fn read_char(
        &self,
        cur: &mut ByteCursor,
        name: &str,
        dims: Vec<usize>,
        attributes: Attributes,
    ) -> Result<CharArray> {
        let tag = ElementTag::read(cur).map_err(truncated)?;
        let units = read_chars(cur, &tag)?;
        let mut array = CharArray::with_attributes(name, dims, attributes);
        if units.len() > array.meta().size() {
            return Err(MatError::Malformed(
                "character element longer than the declared size",
            ));
        }
        for (i, unit) in units.into_iter().enumerate() {
            array.set_char(i, unit);
        }
        Ok(array)
    }

    /// Cell body: one sub-record per position; a zero-length sub-tag
    /// stores the empty placeholder
    fn read_cell(
        &self,
        cur: &mut ByteCursor,
        name: &str,
        dims: Vec<usize>,
        attributes: Attributes,
    ) -> Result<CellArray> {
        let mut array = CellArray::with_attributes(name, dims, attributes);
        for index in 0..array.meta().size() {
            let tag = ElementTag::read(cur).map_err(truncated)?;
            if tag.len > 0 {
                array.set_cell(index, self.read_child(cur)?);
            }
        }
        Ok(array)
    }

    /// Struct body: field-name stride, the packed name table, then one
    /// sub-record per field per instance in declared order
    fn read_struct(
        &self,
        cur: &mut ByteCursor,
        name: &str,
        dims: Vec<usize>,
        attributes: Attributes,
    ) -> Result<StructArray> {
        // field name length element, a single integer stride
        let stride_tag = ElementTag::read(cur).map_err(truncated)?;
        let stride = cur.get_i32().map_err(truncated)?;
        cur.skip(stride_tag.padding()).map_err(truncated)?;
        let stride = usize::try_from(stride)
            .ok()
            .filter(|&s| s > 0)
            .ok_or(MatError::Malformed("invalid field name stride"))?;

        // all field names concatenated as fixed-width, zero-terminated
        // strings
        let names_tag = ElementTag::read(cur).map_err(truncated)?;
        let count = names_tag.len as usize / stride;
        let mut field_names = Vec::with_capacity(count);
        for _ in 0..count {
            let raw = cur.take(stride).map_err(truncated)?;
            field_names.push(zero_terminated_to_string(raw));
        }
        cur.skip(names_tag.padding()).map_err(truncated)?;

        let mut array = StructArray::with_attributes(name, dims, attributes);
        for index in 0..array.meta().size() {
            for field in &field_names {
                let tag = ElementTag::read(cur).map_err(truncated)?;
                let value = if tag.len > 0 {
                    self.read_child(cur)?
                } else {
                    MatArray::Empty(EmptyArray::new())
                };
                array.set_field(field, index, value);
            }
        }
        Ok(array)
    }

    /// Sparse body: row indices, column pointers, real values and
    /// optionally imaginary values, in fixed order
    fn read_sparse(
        &self,
        cur: &mut ByteCursor,
        name: &str,
        dims: Vec<usize>,
        attributes: Attributes,
        nz_max: u32,
    ) -> Result<SparseArray> {
        let tag = ElementTag::read(cur).map_err(truncated)?;
        let ir = read_i32_array(cur, &tag)?;
        let tag = ElementTag::read(cur).map_err(truncated)?;
        let jc = read_i32_array(cur, &tag)?;
        let tag = ElementTag::read(cur).map_err(truncated)?;
        let pr = read_f64_array(cur, &tag)?;

        let mut array =
            SparseArray::with_attributes(name, dims, attributes, nz_max as usize);
        assign_sparse(&mut array, &ir, &jc, &pr, SparsePart::Real)?;

        if array.meta().is_complex() {
            let tag = ElementTag::read(cur).map_err(truncated)?;
            let pi = read_f64_array(cur, &tag)?;
            assign_sparse(&mut array, &ir, &jc, &pi, SparsePart::Imaginary)?;
        }
        Ok(array)
    }

    /// Parse a nested sub-record; the name filter never applies below
    /// the root
    fn read_child(&self, cur: &mut ByteCursor) -> Result<MatArray> {
        match self.read_matrix(cur, false)? {
            Some(array) => Ok(array),
            None => Err(MatError::Malformed("filter applied below the record root")),
        }
    }
}

#[derive(Clone, Copy)]
enum SparsePart {
    Real,
    Imaginary,
}

/// Reconstruct coordinates from the exported arrays: position `i` lives
/// in column `jc[i]` while `i < N`, after which the column holds at the
/// last assigned value. Iteration order is preserved as insertion order.
fn assign_sparse(
    array: &mut SparseArray,
    ir: &[i32],
    jc: &[i32],
    values: &[f64],
    part: SparsePart,
) -> Result<()> {
    let n_cols = array.meta().n();
    let mut col = 0usize;
    for (i, &row) in ir.iter().enumerate() {
        if i < n_cols {
            let pointer = jc
                .get(i)
                .copied()
                .ok_or(MatError::Malformed("column pointer array too short"))?;
            col = usize::try_from(pointer)
                .map_err(|_| MatError::Malformed("negative column pointer"))?;
        }
        let row = usize::try_from(row)
            .map_err(|_| MatError::Malformed("negative row index"))?;
        let value = values
            .get(i)
            .copied()
            .ok_or(MatError::Malformed("sparse value array too short"))?;
        match part {
            SparsePart::Real => array.set_real(row, col, value),
            SparsePart::Imaginary => array.set_imaginary(row, col, value),
        }
    }
    Ok(())
}

/// Inflate one compressed record payload into a fresh buffer
fn inflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut inflated = Vec::with_capacity(data.len().saturating_mul(4));
    flate2::read::ZlibDecoder::new(data)
        .read_to_end(&mut inflated)
        .map_err(|e| MatError::Decompression(e.to_string()))?;
    Ok(inflated)
}

/// Read one element payload into a typed destination buffer.
///
/// When the on-disk width equals the element width the payload is copied
/// raw; otherwise each value is converted through its typed accessor,
/// because the format permits storing values in a narrower on-disk type
/// than the declared array class.
fn read_into_buffer<T: ArrayElement>(
    cur: &mut ByteCursor,
    tag: &ElementTag,
    dest: &mut [u8],
) -> Result<()> {
    let start = cur.position();
    if tag.value_width() == T::size_bytes() {
        let n = dest.len().min(tag.len as usize);
        cur.get_bytes(&mut dest[..n]).map_err(truncated)?;
        // land exactly on the element boundary even if the buffer and
        // the payload disagree; the record accounting settles the rest
        cur.set_position(start + tag.len as usize)
            .map_err(|_| MatError::Truncated)?;
    } else {
        let width = T::size_bytes();
        for chunk in dest.chunks_exact_mut(width) {
            let value = T::from_f64(read_value_f64(cur, tag.data_type)?);
            chunk.copy_from_slice(bytemuck::bytes_of(&value));
        }
    }
    cur.skip(tag.padding()).map_err(truncated)
}

/// Read one value of the tagged on-disk type, widened to f64
fn read_value_f64(cur: &mut ByteCursor, data_type: u32) -> Result<f64> {
    let value = match DataType::from_u32(data_type) {
        Some(DataType::UInt8) => f64::from(cur.get_u8().map_err(truncated)?),
        Some(DataType::Int8) => f64::from(cur.get_i8().map_err(truncated)?),
        Some(DataType::UInt16) => f64::from(cur.get_u16().map_err(truncated)?),
        Some(DataType::Int16) => f64::from(cur.get_i16().map_err(truncated)?),
        Some(DataType::UInt32) => f64::from(cur.get_u32().map_err(truncated)?),
        Some(DataType::Int32) => f64::from(cur.get_i32().map_err(truncated)?),
        Some(DataType::UInt64) => cur.get_u64().map_err(truncated)? as f64,
        Some(DataType::Int64) => cur.get_i64().map_err(truncated)? as f64,
        Some(DataType::Single) => f64::from(cur.get_f32().map_err(truncated)?),
        Some(DataType::Double) => cur.get_f64().map_err(truncated)?,
        _ => {
            return Err(MatError::UnexpectedTag(format!(
                "[tag: {} size: ?]",
                mat5_core::type_name(data_type)
            )))
        }
    };
    Ok(value)
}

/// Read a whole element as an i32 array through the typed accessor,
/// skipping the trailing padding
fn read_i32_array(cur: &mut ByteCursor, tag: &ElementTag) -> Result<Vec<i32>> {
    let count = tag.element_count();
    let mut values = Vec::with_capacity(count);
    for _ in 0..count {
        values.push(read_value_f64(cur, tag.data_type)? as i32);
    }
    cur.skip(tag.padding()).map_err(truncated)?;
    Ok(values)
}

/// Read a whole element as an f64 array through the typed accessor,
/// skipping the trailing padding
fn read_f64_array(cur: &mut ByteCursor, tag: &ElementTag) -> Result<Vec<f64>> {
    let count = tag.element_count();
    let mut values = Vec::with_capacity(count);
    for _ in 0..count {
        values.push(read_value_f64(cur, tag.data_type)?);
    }
    cur.skip(tag.padding()).map_err(truncated)?;
    Ok(values)
}

/// Read a whole element as 16-bit characters, skipping the trailing
/// padding
fn read_chars(cur: &mut ByteCursor, tag: &ElementTag) -> Result<Vec<u16>> {
    let count = tag.element_count();
    let mut units = Vec::with_capacity(count);
    for _ in 0..count {
        let unit = match DataType::from_u32(tag.data_type) {
            Some(DataType::UInt8) | Some(DataType::Utf8) => {
                u16::from(cur.get_u8().map_err(truncated)?)
            }
            Some(DataType::Int8) => cur.get_i8().map_err(truncated)? as u8 as u16,
            Some(DataType::UInt16) => cur.get_u16().map_err(truncated)?,
            Some(DataType::Int16) => cur.get_i16().map_err(truncated)? as u16,
            Some(DataType::UInt32) => cur.get_u32().map_err(truncated)? as u16,
            Some(DataType::Int32) => cur.get_i32().map_err(truncated)? as u16,
            Some(DataType::Double) => cur.get_f64().map_err(truncated)? as u16,
            _ => return Err(MatError::UnexpectedTag(tag.to_string())),
        };
        units.push(unit);
    }
    cur.skip(tag.padding()).map_err(truncated)?;
    Ok(units)
}

/// Text up to the first zero byte of a fixed-width name slot
fn zero_terminated_to_string(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

/// End-of-buffer inside a record means the file is truncated; other
/// format errors pass through unchanged
fn truncated(err: FormatError) -> MatError {
    match err {
        FormatError::BufferOverflow => MatError::Truncated,
        other => MatError::Format(other),
    }
}
