//! mat5 - MATLAB Level-5 MAT-file reader and writer
//!
//! This library reads and writes the Level-5 MAT-file container: named,
//! typed, multi-dimensional arrays (numeric, character, cell, structure
//! and sparse variants) with optional per-record zlib compression.
//!
//! ## Architecture
//!
//! The workspace follows a clean specification/implementation split:
//!
//! - **mat5-core**: pure format definitions - tags, type codes, the
//!   128-byte preamble, the byte cursor (no I/O)
//! - **mat5**: the typed array model plus the concrete reader and writer
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mat5::{DoubleArray, MatArray, MatFile, MatFileWriter};
//!
//! fn example() -> mat5::Result<()> {
//!     // build a 3x2 double matrix, packed by columns
//!     let arr = DoubleArray::from_slice("double_arr", &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 3)?;
//!
//!     // write it, compressed
//!     let arrays = vec![MatArray::from(arr)];
//!     MatFileWriter::new().write_path("data.mat", &arrays)?;
//!
//!     // read it back by name
//!     let file = MatFile::read_path("data.mat")?;
//!     if let Some(arr) = file.get("double_arr") {
//!         println!("{}", arr.content_to_string());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Limits
//!
//! Only little-endian files are supported; the byte-swapped endian
//! marker is rejected. The codec is fully synchronous and single-pass -
//! a decode or encode call runs to completion or to a fatal error.

// Re-export core format definitions
pub use mat5_core::{
    // Byte-level primitives
    buffer::ByteCursor,
    element::ArrayElement,
    // Error handling
    error::FormatError,
    // Format definitions
    format::{type_name, type_width, ArrayClass, ArrayFlags, Attributes, DataType, ElementTag,
             MatHeader},
};

// Implementation modules
pub mod array;
pub mod error;
pub mod filter;
pub mod reader;
pub mod writer;

// Public exports
pub use array::{
    ArrayMeta, CellArray, CharArray, DoubleArray, EmptyArray, Int16Array, Int32Array,
    Int64Array, Int8Array, MatArray, NumericArray, SingleArray, SparseArray, StructArray,
    UInt16Array, UInt32Array, UInt64Array, UInt8Array,
};
pub use error::{MatError, Result};
pub use filter::NameFilter;
pub use reader::{MatFile, MatFileReader};
pub use writer::{write, MatFileWriter};
