//! Huffman coding with a self-describing tree header.
//!
//! A compressed stream is laid out as:
//!
//! 1. the 32-bit magic number [`HUFF_TREE`],
//! 2. the code tree in preorder (see [`header`]),
//! 3. the code of every input byte, followed by the code of [`PSEUDO_EOF`].
//!
//! There is no length field; the end-of-stream code is the only terminator.
//! The final byte is zero-padded by the bit sink.
//!
//! # Example
//!
//! ```
//! use treehuff::compression::Compression;
//! use treehuff::HuffProcessor;
//!
//! let processor = HuffProcessor::new();
//! let packed = processor.compress(b"abracadabra").unwrap();
//! assert_eq!(processor.decompress(&packed).unwrap(), b"abracadabra");
//! ```

use std::io::Cursor;

use crate::compression::bit_io::{BitInput, BitOutput, BitReader, BitWriter};
use crate::compression::{Compression, Result};
use crate::error::Error;

pub mod codes;
pub mod decoder;
pub mod frequency;
pub mod header;
pub mod node;
pub mod tree;

pub use codes::{Code, CodeTable};
pub use decoder::{DecodeObserver, Decoder, NoopObserver};
pub use frequency::FrequencyTable;
pub use header::{header_bit_len, read_tree_header, write_tree_header};
pub use node::HuffmanNode;
pub use tree::build_huffman_tree;

/// A symbol: a byte value or [`PSEUDO_EOF`].
pub type Symbol = u16;

pub const BITS_PER_WORD: u32 = 8;
pub const BITS_PER_INT: u32 = 32;
/// Number of byte values.
pub const ALPHABET_SIZE: usize = 1 << BITS_PER_WORD;
/// End-of-stream symbol, one past the last byte value.
pub const PSEUDO_EOF: Symbol = ALPHABET_SIZE as Symbol;
/// Width of a leaf symbol in the tree header, enough for every byte plus
/// [`PSEUDO_EOF`].
pub const SYMBOL_WIDTH: u32 = BITS_PER_WORD + 1;
/// Base magic number of the format family.
pub const HUFF_NUMBER: u32 = 0xface_8200;
/// Magic number of streams that carry a tree header.
pub const HUFF_TREE: u32 = HUFF_NUMBER | 1;

/// How much the processor reports about its work through `log`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum DebugLevel {
    #[default]
    Off,
    /// Stage summaries: counts, tree size, header and body lengths.
    Low,
    /// Summaries plus one record per decoded byte.
    High,
}

/// Bit accounting for one compression.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompressStats {
    /// Bytes consumed from the input in the encoding pass
    pub bytes_read: u64,
    /// Size of the tree header, magic number excluded
    pub header_bits: u64,
    /// Size of the coded body, end-of-stream code included
    pub body_bits: u64,
    /// Everything written: magic, header and body, padding excluded
    pub bits_written: u64,
}

/// Bit accounting for one decompression.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecompressStats {
    /// Bits consumed from the compressed input, magic included
    pub bits_read: u64,
    pub bytes_written: u64,
}

/// Writes `code` to `out`, first branch first.
fn write_code<O: BitOutput>(code: &Code, out: &mut O) -> Result<()> {
    for bit in code.iter().by_vals() {
        out.write_bit(bit)?;
    }
    Ok(())
}

/// Encodes every byte left in `input`, then the end-of-stream code.
///
/// Returns `(bytes_read, bits_written)`. A byte without a code means the input
/// changed since the table was built and is reported as
/// [`Error::InvalidInput`].
pub fn encode_body<I: BitInput, O: BitOutput>(
    input: &mut I,
    codes: &CodeTable,
    out: &mut O,
) -> Result<(u64, u64)> {
    let mut bytes_read = 0u64;
    let mut bits_written = 0u64;
    while let Some(value) = input.read_bits(BITS_PER_WORD)? {
        let code = codes.get(value as Symbol).ok_or_else(|| {
            Error::invalid(format!(
                "byte {:#04x} at offset {} has no code; input changed between passes",
                value, bytes_read
            ))
        })?;
        write_code(code, out)?;
        bytes_read += 1;
        bits_written += code.len() as u64;
    }

    let eof = codes
        .get(PSEUDO_EOF)
        .ok_or_else(|| Error::invalid("code table has no PSEUDO_EOF entry"))?;
    write_code(eof, out)?;
    bits_written += eof.len() as u64;
    Ok((bytes_read, bits_written))
}

/// Compresses and decompresses streams in the tree-header format.
///
/// The processor holds only its configuration, so one instance can serve
/// any number of calls. Both directions close the output before returning,
/// whether or not they succeed.
#[derive(Debug, Clone, Copy, Default)]
pub struct HuffProcessor {
    debug: DebugLevel,
}

impl HuffProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_debug(debug: DebugLevel) -> Self {
        HuffProcessor { debug }
    }

    /// Compresses `input` into `output`.
    ///
    /// The input is read twice: once to count byte frequencies, then again
    /// after a `reset` to encode it.
    pub fn compress_stream<I, O>(&self, input: &mut I, output: &mut O) -> Result<CompressStats>
    where
        I: BitInput,
        O: BitOutput,
    {
        let result = self.compress_inner(input, output);
        let closed = output.close();
        let stats = result?;
        closed?;
        Ok(stats)
    }

    fn compress_inner<I: BitInput, O: BitOutput>(
        &self,
        input: &mut I,
        output: &mut O,
    ) -> Result<CompressStats> {
        let frequencies = FrequencyTable::count(input)?;
        let tree = build_huffman_tree(&frequencies)?;
        let codes = CodeTable::from_tree(&tree);
        if self.debug >= DebugLevel::Low {
            log::debug!(
                "counted {} bytes over {} distinct symbols",
                frequencies.total_bytes(),
                codes.len()
            );
        }

        let start = output.bits_written();
        output.write_bits(BITS_PER_INT, HUFF_TREE)?;
        let header_bits = write_tree_header(&tree, output)?;
        let (bytes_read, body_bits) = encode_body(input, &codes, output)?;

        let stats = CompressStats {
            bytes_read,
            header_bits,
            body_bits,
            bits_written: output.bits_written() - start,
        };
        if self.debug >= DebugLevel::Low {
            log::debug!(
                "compressed {} bytes: header {} bits, body {} bits, {} bits total",
                stats.bytes_read,
                stats.header_bits,
                stats.body_bits,
                stats.bits_written
            );
        }
        Ok(stats)
    }

    /// Decompresses `input` into `output`.
    ///
    /// The magic number is checked before anything else is read. Bytes
    /// decoded before an error stay in `output`.
    pub fn decompress_stream<I, O>(&self, input: &mut I, output: &mut O) -> Result<DecompressStats>
    where
        I: BitInput,
        O: BitOutput,
    {
        let debug = self.debug;
        let mut trace = |byte: u8, bits_read: u64| {
            if debug >= DebugLevel::High {
                log::trace!("decoded {:#04x} after {} bits", byte, bits_read);
            }
        };
        self.decompress_with_observer(input, output, &mut trace)
    }

    /// Like [`decompress_stream`](Self::decompress_stream), reporting each
    /// decoded byte to `observer`.
    pub fn decompress_with_observer<I, O, Obs>(
        &self,
        input: &mut I,
        output: &mut O,
        observer: &mut Obs,
    ) -> Result<DecompressStats>
    where
        I: BitInput,
        O: BitOutput,
        Obs: DecodeObserver + ?Sized,
    {
        let result = self.decompress_inner(input, output, observer);
        let closed = output.close();
        if let Err(e) = &result {
            log::warn!("decompression failed: {}", e);
        }
        let stats = result?;
        closed?;
        Ok(stats)
    }

    fn decompress_inner<I, O, Obs>(
        &self,
        input: &mut I,
        output: &mut O,
        observer: &mut Obs,
    ) -> Result<DecompressStats>
    where
        I: BitInput,
        O: BitOutput,
        Obs: DecodeObserver + ?Sized,
    {
        let magic = input.read_bits(BITS_PER_INT)?;
        if magic != Some(HUFF_TREE) {
            return Err(Error::BadMagic { found: magic });
        }

        let tree = read_tree_header(input)?;
        if self.debug >= DebugLevel::Low {
            log::debug!(
                "read tree header: {} leaves, {} bits",
                tree.leaf_count(),
                header_bit_len(&tree)
            );
        }

        let bytes_written = Decoder::new(&tree)?.decode(input, output, observer)?;
        let stats = DecompressStats {
            bits_read: input.bits_read(),
            bytes_written,
        };
        if self.debug >= DebugLevel::Low {
            log::debug!(
                "decompressed {} bytes from {} bits",
                stats.bytes_written,
                stats.bits_read
            );
        }
        Ok(stats)
    }
}

impl Compression for HuffProcessor {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut input = BitReader::new(Cursor::new(data));
        let mut output = BitWriter::new(Vec::new());
        self.compress_stream(&mut input, &mut output)?;
        Ok(output.into_inner()?)
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut input = BitReader::new(Cursor::new(data));
        let mut output = BitWriter::new(Vec::new());
        self.decompress_stream(&mut input, &mut output)?;
        Ok(output.into_inner()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(data: &[u8]) -> Vec<u8> {
        let processor = HuffProcessor::new();
        let packed = processor.compress(data).unwrap();
        processor.decompress(&packed).unwrap()
    }

    #[test]
    fn test_huffman_empty_input() {
        let processor = HuffProcessor::new();
        let packed = processor.compress(&[]).unwrap();
        // magic + 21 header bits + 1 body bit = 54 bits
        assert_eq!(packed.len(), 7);
        assert_eq!(&packed[..4], &HUFF_TREE.to_be_bytes());
        assert!(processor.decompress(&packed).unwrap().is_empty());
    }

    #[test]
    fn test_huffman_aab_exact_bits() {
        let processor = HuffProcessor::new();
        let packed = processor.compress(b"aab").unwrap();
        // magic, then header 0 1[0x61] 0 1[0x62] 1[256], then body 0 0 10 11
        let mut expected = BitWriter::new(Vec::new());
        expected.write_bits(32, HUFF_TREE).unwrap();
        expected.write_bits(2, 0b01).unwrap();
        expected.write_bits(9, 0x61).unwrap();
        expected.write_bits(2, 0b01).unwrap();
        expected.write_bits(9, 0x62).unwrap();
        expected.write_bits(1, 1).unwrap();
        expected.write_bits(9, 256).unwrap();
        expected.write_bits(6, 0b001011).unwrap();
        assert_eq!(packed, expected.into_inner().unwrap());
        assert_eq!(processor.decompress(&packed).unwrap(), b"aab");
    }

    #[test]
    fn test_huffman_single_symbol() {
        let input = vec![0x41u8; 1000];
        assert_eq!(roundtrip(&input), input);
    }

    #[test]
    fn test_huffman_all_bytes() {
        let input: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
        assert_eq!(roundtrip(&input), input);
    }

    #[test]
    fn test_huffman_mixed_content() {
        let input = b"Huffman coding in rust is fun! It builds optimal prefix codes.".to_vec();
        assert_eq!(roundtrip(&input), input);
    }

    #[test]
    fn test_stream_stats() {
        let processor = HuffProcessor::with_debug(DebugLevel::High);
        let mut input = BitReader::new(Cursor::new(b"aab".to_vec()));
        let mut output = BitWriter::new(Vec::new());
        let stats = processor.compress_stream(&mut input, &mut output).unwrap();
        assert_eq!(
            stats,
            CompressStats {
                bytes_read: 3,
                header_bits: 32,
                body_bits: 6,
                bits_written: 70,
            }
        );
        let packed = output.into_inner().unwrap();

        let mut input = BitReader::new(Cursor::new(packed));
        let mut out = BitWriter::new(Vec::new());
        let stats = processor.decompress_stream(&mut input, &mut out).unwrap();
        assert_eq!(
            stats,
            DecompressStats {
                bits_read: 70,
                bytes_written: 3,
            }
        );
    }

    #[test]
    fn test_bad_magic_rejected_before_tree() {
        let processor = HuffProcessor::new();
        let mut packed = processor.compress(b"some bytes").unwrap();
        packed[..4].copy_from_slice(&HUFF_NUMBER.to_be_bytes());
        match processor.decompress(&packed) {
            Err(Error::BadMagic { found }) => assert_eq!(found, Some(HUFF_NUMBER)),
            other => panic!("expected bad magic, got {:?}", other),
        }
    }

    #[test]
    fn test_stream_shorter_than_magic_is_bad_magic() {
        let processor = HuffProcessor::new();
        for short in [&[][..], &[0xfa][..], &[0xfa, 0xce, 0x82][..]] {
            match processor.decompress(short) {
                Err(Error::BadMagic { found: None }) => {}
                other => panic!("{:02x?} gave {:?}", short, other),
            }
        }
    }

    #[test]
    fn test_output_closed_on_error() {
        let processor = HuffProcessor::new();
        let mut input = BitReader::new(Cursor::new(vec![0u8; 8]));
        let mut out = BitWriter::new(Vec::new());
        assert!(processor.decompress_stream(&mut input, &mut out).is_err());
        assert!(out.write_bit(true).is_err());
    }

    #[test]
    fn test_encode_body_rejects_unknown_byte() {
        let tree = build_huffman_tree(&FrequencyTable::from_bytes(b"aab")).unwrap();
        let codes = CodeTable::from_tree(&tree);
        let mut input = BitReader::new(Cursor::new(b"abc".to_vec()));
        let mut output = BitWriter::new(Vec::new());
        let err = encode_body(&mut input, &codes, &mut output).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
