//! Integration tests for the MAT-file codec
//!
//! Round-trips every supported array variant through encode and decode,
//! with and without compression, and checks the failure paths a reader
//! must treat as fatal.

use mat5::{
    ArrayClass, CellArray, CharArray, DataType, DoubleArray, ElementTag, EmptyArray,
    Int8Array, MatArray, MatError, MatFile, MatFileReader, MatFileWriter, MatHeader,
    NameFilter, NumericArray, SparseArray, StructArray,
};

fn write_bytes(arrays: &[MatArray], compress: bool) -> Vec<u8> {
    let mut out = Vec::new();
    mat5::write(&mut out, arrays, compress).unwrap();
    out
}

fn roundtrip(arrays: &[MatArray], compress: bool) -> MatFile {
    MatFile::read_bytes(&write_bytes(arrays, compress)).unwrap()
}

// =============================================================================
// Numeric round-trips
// =============================================================================

macro_rules! roundtrip_numeric_type {
    ($ty:ty, $variant:ident, $vals:expr) => {{
        let vals: Vec<$ty> = $vals;
        let array = NumericArray::<$ty>::from_slice("arr", &vals, vals.len()).unwrap();
        for compress in [false, true] {
            let file = roundtrip(&[array.clone().into()], compress);
            assert_eq!(file.len(), 1);
            match file.get("arr").unwrap() {
                MatArray::$variant(decoded) => {
                    assert_eq!(decoded, &array);
                    assert_eq!(decoded.to_vec(), vals);
                }
                other => panic!("wrong variant decoded: {other}"),
            }
        }
    }};
}

#[test]
fn roundtrip_every_numeric_type() {
    roundtrip_numeric_type!(i8, Int8, vec![-128, -1, 0, 1, 127]);
    roundtrip_numeric_type!(u8, UInt8, vec![0, 1, 128, 255]);
    roundtrip_numeric_type!(i16, Int16, vec![i16::MIN, -2, 0, 2, i16::MAX]);
    roundtrip_numeric_type!(u16, UInt16, vec![0, 1, u16::MAX]);
    roundtrip_numeric_type!(i32, Int32, vec![i32::MIN, -3, 0, 3, i32::MAX]);
    roundtrip_numeric_type!(u32, UInt32, vec![0, 7, u32::MAX]);
    roundtrip_numeric_type!(i64, Int64, vec![i64::MIN, -4, 0, 4, i64::MAX]);
    roundtrip_numeric_type!(u64, UInt64, vec![0, 9, u64::MAX]);
    roundtrip_numeric_type!(f32, Single, vec![-1.5, 0.0, 0.25, f32::MAX]);
    roundtrip_numeric_type!(f64, Double, vec![-2.5, 0.0, 0.125, f64::MAX]);
}

#[test]
fn roundtrip_matrix_shape() {
    let array = DoubleArray::from_slice("m", &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 3).unwrap();
    let file = roundtrip(&[array.into()], false);
    let decoded = match file.get("m").unwrap() {
        MatArray::Double(a) => a,
        other => panic!("wrong variant decoded: {other}"),
    };
    assert_eq!(decoded.meta().dims(), &[3, 2]);
    assert_eq!(decoded.real_rc(2, 1), 6.0);
}

#[test]
fn roundtrip_complex_numeric() {
    let array = DoubleArray::from_complex_slices(
        "z",
        &[1.0, 2.0, 3.0],
        &[-1.0, -2.0, -3.0],
        3,
    )
    .unwrap();
    for compress in [false, true] {
        let file = roundtrip(&[array.clone().into()], compress);
        match file.get("z").unwrap() {
            MatArray::Double(decoded) => {
                assert!(decoded.meta().is_complex());
                assert_eq!(decoded, &array);
                assert_eq!(decoded.imag_to_vec().unwrap(), vec![-1.0, -2.0, -3.0]);
            }
            other => panic!("wrong variant decoded: {other}"),
        }
    }
}

// =============================================================================
// Character arrays
// =============================================================================

#[test]
fn roundtrip_char() {
    let array = CharArray::from_str("greeting", "I am dummy");
    for compress in [false, true] {
        let file = roundtrip(&[array.clone().into()], compress);
        match file.get("greeting").unwrap() {
            MatArray::Char(decoded) => {
                assert_eq!(decoded, &array);
                assert_eq!(decoded.row_string(0), "I am dummy");
            }
            other => panic!("wrong variant decoded: {other}"),
        }
    }
}

// =============================================================================
// Structure arrays
// =============================================================================

#[test]
fn roundtrip_struct_preserves_field_order() {
    let mut st = StructArray::new("st", vec![1, 1]);
    st.set("w", Int8Array::from_slice("", &[1], 1).unwrap().into());
    st.set("y", Int8Array::from_slice("", &[2], 1).unwrap().into());
    st.set("z", Int8Array::from_slice("", &[3], 1).unwrap().into());

    for compress in [false, true] {
        let file = roundtrip(&[st.clone().into()], compress);
        match file.get("st").unwrap() {
            MatArray::Struct(decoded) => {
                assert_eq!(decoded.field_names(), &["w", "y", "z"]);
                for (name, expected) in [("w", 1i8), ("y", 2), ("z", 3)] {
                    match decoded.field(name, 0) {
                        Some(MatArray::Int8(a)) => assert_eq!(a.real(0), expected),
                        other => panic!("field {name} decoded wrong: {other:?}"),
                    }
                }
            }
            other => panic!("wrong variant decoded: {other}"),
        }
    }
}

// =============================================================================
// Cell arrays
// =============================================================================

#[test]
fn roundtrip_cell_of_strings() {
    let texts = ["Hello", "World", "I am", "a", "MAT-file"];
    let cells: Vec<MatArray> = texts
        .iter()
        .map(|t| CharArray::from_str("", t).into())
        .collect();
    let cell = CellArray::from_vec("c", vec![5, 1], cells).unwrap();

    for compress in [false, true] {
        let file = roundtrip(&[cell.clone().into()], compress);
        match file.get("c").unwrap() {
            MatArray::Cell(decoded) => {
                assert_eq!(decoded.meta().dims(), &[5, 1]);
                for (i, text) in texts.iter().enumerate() {
                    match decoded.cell(i) {
                        MatArray::Char(s) => assert_eq!(&s.row_string(0), text),
                        other => panic!("cell {i} decoded wrong: {other}"),
                    }
                }
            }
            other => panic!("wrong variant decoded: {other}"),
        }
    }
}

// =============================================================================
// Sparse arrays
// =============================================================================

#[test]
fn roundtrip_sparse_as_triples() {
    let mut sp = SparseArray::new("sp", vec![3, 3], 3);
    sp.set_real(0, 0, 1.5);
    sp.set_real(1, 1, 2.5);
    sp.set_real(2, 2, 3.5);

    for compress in [false, true] {
        let file = roundtrip(&[sp.clone().into()], compress);
        match file.get("sp").unwrap() {
            MatArray::Sparse(decoded) => {
                // compare as a set of triples, not raw IR/JC equality
                let mut got: Vec<(usize, usize, f64)> =
                    decoded.entries().map(|(m, n, re, _)| (m, n, re)).collect();
                got.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
                assert_eq!(got, vec![(0, 0, 1.5), (1, 1, 2.5), (2, 2, 3.5)]);
                assert_eq!(decoded.nz_max(), 3);
            }
            other => panic!("wrong variant decoded: {other}"),
        }
    }
}

// =============================================================================
// Header rejection
// =============================================================================

#[test]
fn rejects_bad_signature() {
    let mut bytes = write_bytes(&[CharArray::from_str("a", "x").into()], false);
    bytes[..20].copy_from_slice(b"NOT A MATFILE HEADER");
    match MatFile::read_bytes(&bytes) {
        Err(MatError::Format(mat5::FormatError::InvalidSignature)) => {}
        other => panic!("expected a signature error, got {other:?}"),
    }
}

#[test]
fn rejects_big_endian_marker() {
    let mut bytes = write_bytes(&[CharArray::from_str("a", "x").into()], false);
    bytes[126] = b'M';
    bytes[127] = b'I';
    match MatFile::read_bytes(&bytes) {
        Err(MatError::Format(mat5::FormatError::UnsupportedEndian)) => {}
        other => panic!("expected an unsupported-endian error, got {other:?}"),
    }
}

#[test]
fn custom_header_description_roundtrips() {
    let header = MatHeader::with_description(
        "MATLAB 5.0 MAT-file, Platform: linux, CREATED on: Thu Aug 6 2026",
    );
    let mut bytes = Vec::new();
    MatFileWriter::new()
        .with_header(header)
        .compressed(false)
        .write(&mut bytes, &[CharArray::from_str("a", "x").into()])
        .unwrap();

    let file = MatFile::read_bytes(&bytes).unwrap();
    assert!(file.header().description().contains("Platform: linux"));
    assert_eq!(file.header().version(), 0x0100);
}

// =============================================================================
// Name filtering
// =============================================================================

#[test]
fn filter_materializes_only_matches() {
    let arrays: Vec<MatArray> = vec![
        DoubleArray::from_slice("Names", &[1.0, 2.0, 3.0], 3).unwrap().into(),
        DoubleArray::from_slice("X", &[9.0], 1).unwrap().into(),
    ];

    for compress in [false, true] {
        let bytes = write_bytes(&arrays, compress);
        let reader = MatFileReader::with_filter(NameFilter::from_names(["Names"]));
        // a desynchronized skip of the filtered record would fail the
        // whole decode, so a clean result also proves the accounting
        let file = reader.read_bytes(&bytes).unwrap();
        assert_eq!(file.len(), 1);
        assert!(file.get("Names").is_some());
        assert!(file.get("X").is_none());
    }
}

// =============================================================================
// Tag padding
// =============================================================================

#[test]
fn padding_follows_the_tag_form() {
    // 3-byte long-form payload pads to the 8-byte boundary
    let mut long = Vec::new();
    long.extend_from_slice(&DataType::Int8.to_u32().to_le_bytes());
    long.extend_from_slice(&3u32.to_le_bytes());
    let mut cur = mat5::ByteCursor::from_slice(&long);
    let tag = ElementTag::read(&mut cur).unwrap();
    assert!(!tag.is_short());
    assert_eq!(tag.padding(), 5);

    // 2-byte short-form payload pads to the 4-byte boundary
    let tag = ElementTag::for_payload(DataType::Int8, 2);
    assert!(tag.is_short());
    assert_eq!(tag.padding(), 2);
}

#[test]
fn records_are_eight_byte_aligned() {
    // 3 int8 values: data payload of 3 bytes must pad out so the whole
    // record stays a multiple of 8
    let bytes = write_bytes(
        &[Int8Array::from_slice("t", &[1, 2, 3], 3).unwrap().into()],
        false,
    );
    assert_eq!((bytes.len() - MatHeader::SIZE) % 8, 0);
    let file = MatFile::read_bytes(&bytes).unwrap();
    assert_eq!(file.len(), 1);
}

// =============================================================================
// Idempotence
// =============================================================================

#[test]
fn encode_decode_is_idempotent_on_content() {
    let mut st = StructArray::new("st", vec![1, 1]);
    st.set("values", DoubleArray::from_slice("", &[1.0, 2.0], 2).unwrap().into());
    st.set("label", CharArray::from_str("", "tag").into());

    let arrays: Vec<MatArray> = vec![
        DoubleArray::from_complex_slices("z", &[1.0], &[2.0], 1).unwrap().into(),
        CharArray::from_str("s", "text").into(),
        st.into(),
    ];

    let first = roundtrip(&arrays, true);
    let second = roundtrip(first.arrays(), false);
    assert_eq!(first.arrays(), second.arrays());
}

// =============================================================================
// Narrowed on-disk storage
// =============================================================================

/// A double array whose data element is stored as miINT8 widens through
/// the value-by-value fallback.
#[test]
fn narrow_storage_widens_to_the_declared_class() {
    let mut body = Vec::new();
    // flags element: class double, no attributes
    push_element(&mut body, DataType::UInt32, {
        let mut words = Vec::new();
        words.extend_from_slice(&u32::from(ArrayClass::Double.to_u8()).to_le_bytes());
        words.extend_from_slice(&0u32.to_le_bytes());
        words
    });
    // dimensions element: 1 x 3
    push_element(&mut body, DataType::Int32, {
        let mut dims = Vec::new();
        dims.extend_from_slice(&1i32.to_le_bytes());
        dims.extend_from_slice(&3i32.to_le_bytes());
        dims
    });
    // name element: "d"
    push_element(&mut body, DataType::Int8, b"d".to_vec());
    // data element: three int8 values standing in for doubles
    push_element(&mut body, DataType::Int8, vec![1u8, 2, 254]);

    let mut bytes = MatHeader::new().to_bytes().to_vec();
    bytes.extend_from_slice(&DataType::Matrix.to_u32().to_le_bytes());
    bytes.extend_from_slice(&(body.len() as u32).to_le_bytes());
    bytes.extend_from_slice(&body);

    let file = MatFile::read_bytes(&bytes).unwrap();
    match file.get("d").unwrap() {
        MatArray::Double(a) => assert_eq!(a.to_vec(), vec![1.0, 2.0, -2.0]),
        other => panic!("wrong variant decoded: {other}"),
    }
}

fn push_element(out: &mut Vec<u8>, data_type: DataType, payload: Vec<u8>) {
    let tag = ElementTag::for_payload(data_type, payload.len() as u32);
    let mut tag_bytes = Vec::new();
    tag.encode_into(&mut tag_bytes);
    out.extend_from_slice(&tag_bytes);
    out.extend_from_slice(&payload);
    out.resize(out.len() + tag.padding(), 0);
}

// =============================================================================
// Failure paths
// =============================================================================

#[test]
fn corrupt_compressed_payload_is_fatal() {
    let mut bytes = MatHeader::new().to_bytes().to_vec();
    bytes.extend_from_slice(&DataType::Compressed.to_u32().to_le_bytes());
    bytes.extend_from_slice(&8u32.to_le_bytes());
    bytes.extend_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF, 0x00, 0x11, 0x22, 0x33]);
    match MatFile::read_bytes(&bytes) {
        Err(MatError::Decompression(_)) => {}
        other => panic!("expected a decompression error, got {other:?}"),
    }
}

#[test]
fn truncated_record_is_fatal() {
    let bytes = write_bytes(
        &[DoubleArray::from_slice("d", &[1.0, 2.0, 3.0, 4.0], 2).unwrap().into()],
        false,
    );
    let cut = &bytes[..bytes.len() - 12];
    assert!(MatFile::read_bytes(cut).is_err());
}

#[test]
fn unknown_top_level_tag_is_fatal() {
    let mut bytes = MatHeader::new().to_bytes().to_vec();
    // a bare miDOUBLE element is not a valid top-level record
    bytes.extend_from_slice(&DataType::Double.to_u32().to_le_bytes());
    bytes.extend_from_slice(&8u32.to_le_bytes());
    bytes.extend_from_slice(&[0u8; 8]);
    match MatFile::read_bytes(&bytes) {
        Err(MatError::UnexpectedTag(_)) => {}
        other => panic!("expected an unexpected-tag error, got {other:?}"),
    }
}

#[test]
fn placeholder_is_not_writable() {
    let result = mat5::write(Vec::new(), &[EmptyArray::new().into()], false);
    match result {
        Err(MatError::UnsupportedWrite(_)) => {}
        other => panic!("expected an unsupported-write error, got {other:?}"),
    }
}

// =============================================================================
// Bulk data
// =============================================================================

#[test]
fn bulk_random_roundtrip() {
    use rand::{Rng, SeedableRng};
    let mut rng = rand::rngs::StdRng::seed_from_u64(0x5EED);

    let vals: Vec<f64> = (0..64 * 32).map(|_| rng.gen_range(-1.0..1.0)).collect();
    let doubles = DoubleArray::from_slice("big", &vals, 64).unwrap();

    let words: Vec<u16> = (0..513).map(|_| rng.gen()).collect();
    let shorts = NumericArray::<u16>::from_slice("words", &words, 27).unwrap();

    for compress in [false, true] {
        let file = roundtrip(&[doubles.clone().into(), shorts.clone().into()], compress);
        match file.get("big").unwrap() {
            MatArray::Double(a) => assert_eq!(a.to_vec(), vals),
            other => panic!("wrong variant decoded: {other}"),
        }
        match file.get("words").unwrap() {
            MatArray::UInt16(a) => assert_eq!(a.to_vec(), words),
            other => panic!("wrong variant decoded: {other}"),
        }
    }
}
