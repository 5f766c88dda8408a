//! Compression algorithms implementation.
//!
//! This module provides:
//! - Bit-level stream adapters (`bit_io`)
//! - Huffman coding with a preorder tree header (`huffman`)
//!
//! # Examples
//!
//! ```rust
//! use treehuff::compression::{huffman::HuffProcessor, Compression};
//!
//! let processor = HuffProcessor::new();
//! let packed = processor.compress(b"mississippi").unwrap();
//! assert_eq!(processor.decompress(&packed).unwrap(), b"mississippi");
//! ```

use crate::error::Error;

/// Result type for compression operations
pub type Result<T> = std::result::Result<T, Error>;

/// Trait for compression algorithms
pub trait Compression {
    /// Compress the input data
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>>;

    /// Decompress the compressed data
    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>>;
}

pub mod bit_io;
pub mod huffman;

pub use bit_io::{BitInput, BitOutput, BitReader, BitWriter};
pub use huffman::{CompressStats, DebugLevel, DecompressStats, HuffProcessor};
