//! MAT-file writer
//!
//! Serializes arrays back to the binary format: the 128-byte preamble,
//! then one matrix record per array. Each record is built in a private
//! scratch buffer first; with compression enabled the scratch bytes are
//! deflated into an RFC-1950 zlib stream (2-byte header, DEFLATE body,
//! Adler-32 trailer) and framed by a `COMPRESSED` tag, otherwise the
//! scratch bytes are emitted directly. Tag form is never a caller
//! choice - payloads of 1 to 4 bytes pack into the short form.

use std::io::Write;

use mat5_core::{ArrayElement, ByteCursor, DataType, ElementTag, FormatError, MatHeader};

use crate::array::{CellArray, CharArray, MatArray, NumericArray, SparseArray, StructArray};
use crate::error::{MatError, Result};

/// MAT-file writer with optional per-record compression
#[derive(Debug, Clone)]
pub struct MatFileWriter {
    header: MatHeader,
    compress: bool,
}

impl MatFileWriter {
    /// Writer with the default preamble and compression enabled
    pub fn new() -> Self {
        MatFileWriter {
            header: MatHeader::new(),
            compress: true,
        }
    }

    /// Select whether each record is deflated
    pub fn compressed(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Replace the preamble (for custom descriptive text)
    pub fn with_header(mut self, header: MatHeader) -> Self {
        self.header = header;
        self
    }

    /// Serialize the arrays to any writer
    pub fn write<W: Write>(&self, mut writer: W, arrays: &[MatArray]) -> Result<()> {
        let mut preamble = ByteCursor::new(MatHeader::SIZE);
        self.header.write_to(&mut preamble).map_err(MatError::Format)?;
        writer.write_all(preamble.as_slice())?;

        for array in arrays {
            let mut record = Vec::new();
            write_matrix(&mut record, array)?;

            if self.compress {
                let compressed = deflate(&record)?;
                let mut framed =
                    Vec::with_capacity(2 * core::mem::size_of::<u32>() + compressed.len());
                framed.extend_from_slice(&DataType::Compressed.to_u32().to_le_bytes());
                framed.extend_from_slice(&payload_len(&compressed)?.to_le_bytes());
                framed.extend_from_slice(&compressed);
                writer.write_all(&framed)?;
            } else {
                writer.write_all(&record)?;
            }
        }
        writer.flush()?;
        Ok(())
    }

    /// Serialize the arrays to a file on disk
    pub fn write_path<P: AsRef<std::path::Path>>(
        &self,
        path: P,
        arrays: &[MatArray],
    ) -> Result<()> {
        let file = std::fs::File::create(path)?;
        self.write(std::io::BufWriter::new(file), arrays)
    }
}

impl Default for MatFileWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Serialize arrays to a writer in one call
pub fn write<W: Write>(writer: W, arrays: &[MatArray], compress: bool) -> Result<()> {
    MatFileWriter::new().compressed(compress).write(writer, arrays)
}

/// Serialize one complete matrix record (tag plus body) into `out`.
///
/// Struct, cell and sparse bodies recurse back into this same routine
/// for their sub-records.
fn write_matrix(out: &mut Vec<u8>, array: &MatArray) -> Result<()> {
    let mut body = Vec::new();

    write_flags(&mut body, array)?;
    write_dimensions(&mut body, array)?;
    write_name(&mut body, array)?;

    match array {
        MatArray::Int8(a) => write_numeric_body(&mut body, a)?,
        MatArray::UInt8(a) => write_numeric_body(&mut body, a)?,
        MatArray::Int16(a) => write_numeric_body(&mut body, a)?,
        MatArray::UInt16(a) => write_numeric_body(&mut body, a)?,
        MatArray::Int32(a) => write_numeric_body(&mut body, a)?,
        MatArray::UInt32(a) => write_numeric_body(&mut body, a)?,
        MatArray::Int64(a) => write_numeric_body(&mut body, a)?,
        MatArray::UInt64(a) => write_numeric_body(&mut body, a)?,
        MatArray::Single(a) => write_numeric_body(&mut body, a)?,
        MatArray::Double(a) => write_numeric_body(&mut body, a)?,
        MatArray::Char(a) => write_char_body(&mut body, a)?,
        MatArray::Cell(a) => write_cell_body(&mut body, a)?,
        MatArray::Struct(a) => write_struct_body(&mut body, a)?,
        MatArray::Sparse(a) => write_sparse_body(&mut body, a)?,
        MatArray::Empty(_) => {
            // the placeholder has no body grammar of its own
            return Err(MatError::UnsupportedWrite("empty array placeholder"));
        }
    }

    // matrix records always use the long tag form; the body is a
    // multiple of 8 because every sub-element is padded
    out.extend_from_slice(&DataType::Matrix.to_u32().to_le_bytes());
    out.extend_from_slice(&payload_len(&body)?.to_le_bytes());
    out.extend_from_slice(&body);
    Ok(())
}

/// Flags element: class byte and attribute bits in the first integer,
/// the sparse capacity (or zero) in the second
fn write_flags(out: &mut Vec<u8>, array: &MatArray) -> Result<()> {
    let words = array.flags().to_words();
    let mut payload = Vec::with_capacity(8);
    payload.extend_from_slice(&words[0].to_le_bytes());
    payload.extend_from_slice(&words[1].to_le_bytes());
    write_element(out, DataType::UInt32, &payload)
}

/// Dimensions element: every dimension as a 32-bit integer
fn write_dimensions(out: &mut Vec<u8>, array: &MatArray) -> Result<()> {
    let mut payload = Vec::with_capacity(array.dims().len() * 4);
    for &dim in array.dims() {
        let dim = i32::try_from(dim).map_err(|_| MatError::Format(FormatError::SizeOverflow))?;
        payload.extend_from_slice(&dim.to_le_bytes());
    }
    write_element(out, DataType::Int32, &payload)
}

/// Name element: the name bytes as an 8-bit character array
fn write_name(out: &mut Vec<u8>, array: &MatArray) -> Result<()> {
    write_element(out, DataType::Int8, array.name().as_bytes())
}

/// Numeric body: the real buffer, then the imaginary buffer when the
/// complex attribute is set
fn write_numeric_body<T: ArrayElement>(
    out: &mut Vec<u8>,
    array: &NumericArray<T>,
) -> Result<()> {
    write_element(out, T::data_type(), array.real_bytes())?;
    if let Some(imaginary) = array.imaginary_bytes() {
        write_element(out, T::data_type(), imaginary)?;
    }
    Ok(())
}

/// Character body: the 16-bit code unit buffer
fn write_char_body(out: &mut Vec<u8>, array: &CharArray) -> Result<()> {
    let mut payload = Vec::with_capacity(array.chars().len() * 2);
    for &unit in array.chars() {
        payload.extend_from_slice(&unit.to_le_bytes());
    }
    write_element(out, DataType::UInt16, &payload)
}

/// Cell body: one sub-record per child in column-major order
fn write_cell_body(out: &mut Vec<u8>, array: &CellArray) -> Result<()> {
    for cell in array.cells() {
        write_matrix(out, cell)?;
    }
    Ok(())
}

/// Struct body: the field-name stride, the packed name table, then one
/// sub-record per field per instance in declared order
fn write_struct_body(out: &mut Vec<u8>, array: &StructArray) -> Result<()> {
    // field name length - this element always uses the packed form
    let stride = array.max_field_len();
    let stride_word =
        i32::try_from(stride).map_err(|_| MatError::Format(FormatError::SizeOverflow))?;
    ElementTag::for_payload(DataType::Int32, 4).encode_into(out);
    out.extend_from_slice(&stride_word.to_le_bytes());

    // field names as fixed-width, zero-terminated strings
    let mut names = Vec::with_capacity(stride * array.field_names().len());
    for name in array.field_names() {
        let mut slot = vec![0u8; stride];
        slot[..name.len()].copy_from_slice(name.as_bytes());
        names.extend_from_slice(&slot);
    }
    write_element(out, DataType::Int8, &names)?;

    for field in array.all_fields() {
        write_matrix(out, field)?;
    }
    Ok(())
}

/// Sparse body: row indices, column pointers, real values, imaginary
/// values when complex - in fixed order
fn write_sparse_body(out: &mut Vec<u8>, array: &SparseArray) -> Result<()> {
    let mut ir = Vec::with_capacity(array.nz_max() * 4);
    for row in array.row_indices() {
        let row = i32::try_from(row).map_err(|_| MatError::Format(FormatError::SizeOverflow))?;
        ir.extend_from_slice(&row.to_le_bytes());
    }
    write_element(out, DataType::Int32, &ir)?;

    let mut jc = Vec::with_capacity((array.meta().n() + 1) * 4);
    for pointer in array.col_pointers() {
        let pointer =
            i32::try_from(pointer).map_err(|_| MatError::Format(FormatError::SizeOverflow))?;
        jc.extend_from_slice(&pointer.to_le_bytes());
    }
    write_element(out, DataType::Int32, &jc)?;

    write_element(out, DataType::Double, bytemuck::cast_slice(&array.export_real()))?;
    if array.meta().is_complex() {
        write_element(
            out,
            DataType::Double,
            bytemuck::cast_slice(&array.export_imaginary()),
        )?;
    }
    Ok(())
}

/// Emit one element: tag, payload, then padding to the form's boundary
fn write_element(out: &mut Vec<u8>, data_type: DataType, payload: &[u8]) -> Result<()> {
    let tag = ElementTag::for_payload(data_type, payload_len(payload)?);
    tag.encode_into(out);
    out.extend_from_slice(payload);
    out.resize(out.len() + tag.padding(), 0);
    Ok(())
}

fn payload_len(payload: &[u8]) -> Result<u32> {
    u32::try_from(payload.len()).map_err(|_| MatError::Format(FormatError::SizeOverflow))
}

/// Deflate a record into a zlib-wrapped stream; the zlib framing carries
/// the 2-byte format marker and the Adler-32 checksum the reader expects
fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder =
        flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::{DoubleArray, Int8Array, SparseArray, StructArray};

    #[test]
    fn short_form_element_framing() {
        let mut out = Vec::new();
        write_element(&mut out, DataType::Int8, &[7, 8]).unwrap();
        // one packed word, two payload bytes, two padding bytes
        assert_eq!(out, vec![1, 0, 2, 0, 7, 8, 0, 0]);
    }

    #[test]
    fn long_form_element_framing() {
        let mut out = Vec::new();
        write_element(&mut out, DataType::Int32, &[1, 0, 0, 0, 2, 0, 0, 0]).unwrap();
        assert_eq!(&out[..8], &[5, 0, 0, 0, 8, 0, 0, 0]);
        assert_eq!(out.len(), 16);
    }

    #[test]
    fn flags_words_carry_class_and_attributes() {
        let z = DoubleArray::from_complex_slices("z", &[1.0], &[2.0], 1).unwrap();
        let mut out = Vec::new();
        write_flags(&mut out, &z.into()).unwrap();
        // long tag, then complex | double, then a zero capacity word
        assert_eq!(&out[8..12], &0x0806u32.to_le_bytes());
        assert_eq!(&out[12..16], &0u32.to_le_bytes());
    }

    #[test]
    fn sparse_flags_carry_nz_max() {
        let sp = SparseArray::new("s", vec![2, 2], 4);
        let mut out = Vec::new();
        write_flags(&mut out, &sp.into()).unwrap();
        assert_eq!(&out[8..12], &5u32.to_le_bytes());
        assert_eq!(&out[12..16], &4u32.to_le_bytes());
    }

    #[test]
    fn struct_stride_element_is_packed() {
        let mut st = StructArray::new("st", vec![1, 1]);
        st.set("ab", Int8Array::from_slice("", &[1], 1).unwrap().into());
        let mut out = Vec::new();
        write_struct_body(&mut out, &st).unwrap();
        // packed tag word: length 4 in the high half, the stride type in
        // the low half, then the stride itself ("ab" plus its NUL)
        assert_eq!(&out[..4], &0x0004_0005u32.to_le_bytes());
        assert_eq!(&out[4..8], &3i32.to_le_bytes());
    }

    #[test]
    fn records_frame_with_the_long_matrix_tag() {
        let a = Int8Array::from_slice("t", &[1, 2, 3], 3).unwrap();
        let mut out = Vec::new();
        write_matrix(&mut out, &a.into()).unwrap();
        assert_eq!(&out[..4], &14u32.to_le_bytes());
        let declared = u32::from_le_bytes([out[4], out[5], out[6], out[7]]) as usize;
        assert_eq!(out.len() - 8, declared);
        assert_eq!(declared % 8, 0);
    }
}
