//! Binary format definitions for the Level 5 MAT-file container
//!
//! This module contains pure data structure definitions for the wire
//! format. No I/O operations or concrete implementations - only format
//! specifications.

pub mod class;
pub mod constants;
pub mod data_type;
pub mod header;
pub mod tag;

// Re-export format definitions
pub use class::{ArrayClass, ArrayFlags, Attributes};
pub use data_type::{type_name, type_width, DataType};
pub use header::MatHeader;
pub use tag::ElementTag;
