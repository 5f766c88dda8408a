pub mod compression;
pub mod error;

pub use compression::{
    huffman, BitInput, BitOutput, BitReader, BitWriter, CompressStats, Compression, DebugLevel,
    DecompressStats, HuffProcessor,
};
pub use error::{Error, Result};
