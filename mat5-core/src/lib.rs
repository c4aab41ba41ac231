#![no_std]

//! mat5-core - MAT-file (Level 5) binary format definitions
//!
//! This crate provides the core format definitions for MATLAB Level-5
//! MAT-files: the data type registry, element tags, the 128-byte file
//! preamble, the byte cursor and the element trait shared by the reader
//! and writer. No I/O operations - only format specifications.

extern crate alloc;

pub mod buffer;
pub mod element;
pub mod error;
pub mod format;
pub mod layout;

pub use buffer::*;
pub use element::*;
pub use error::*;
pub use format::*;
pub use layout::*;
