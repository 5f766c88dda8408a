//! Bit-level adapters over byte streams.
//!
//! Bits are packed most-significant-bit first. Reading reports the natural end
//! of the underlying stream as `Ok(None)`, never as an error, so callers can
//! decide for themselves whether running out of bits is legal at that point.

use std::io::{self, BufReader, BufWriter, Read, Seek, SeekFrom, Write};

/// Widest value a single `read_bits`/`write_bits` call can carry.
pub const MAX_BITS_PER_CALL: u32 = 32;

/// A source of bits that can be rewound to its beginning.
pub trait BitInput {
    /// Reads `n` bits (at most 32) and returns them as the low bits of the
    /// result, first bit read being the most significant.
    ///
    /// Returns `Ok(None)` when the stream ends before `n` bits are available.
    /// Bits consumed before the end was hit are lost.
    fn read_bits(&mut self, n: u32) -> io::Result<Option<u32>>;

    /// Reads a single bit.
    fn read_bit(&mut self) -> io::Result<Option<bool>> {
        Ok(self.read_bits(1)?.map(|bit| bit == 1))
    }

    /// Rewinds to the first bit of the underlying data.
    fn reset(&mut self) -> io::Result<()>;

    /// Number of bits consumed since construction or the last `reset`.
    fn bits_read(&self) -> u64;
}

/// A sink of bits.
pub trait BitOutput {
    /// Appends the low `n` bits (at most 32) of `value`, most significant first.
    fn write_bits(&mut self, n: u32, value: u32) -> io::Result<()>;

    /// Appends a single bit.
    fn write_bit(&mut self, bit: bool) -> io::Result<()> {
        self.write_bits(1, bit as u32)
    }

    /// Pads the final partial byte with zeros and flushes. Further writes fail;
    /// closing twice is a no-op.
    fn close(&mut self) -> io::Result<()>;

    /// Number of bits written so far, padding excluded.
    fn bits_written(&self) -> u64;
}

fn check_width(n: u32) -> io::Result<()> {
    if n > MAX_BITS_PER_CALL {
        let message = format!("cannot transfer {} bits in one call", n);
        return Err(io::Error::new(io::ErrorKind::InvalidInput, message));
    }
    Ok(())
}

/// MSB-first bit reader over any seekable byte source.
///
/// # Example
///
/// ```
/// use std::io::Cursor;
/// use treehuff::compression::bit_io::{BitInput, BitReader};
///
/// let mut bits = BitReader::new(Cursor::new(vec![0b1010_0000]));
/// assert_eq!(bits.read_bits(3).unwrap(), Some(0b101));
/// assert_eq!(bits.read_bits(8).unwrap(), None);
/// ```
#[derive(Debug)]
pub struct BitReader<R: Read + Seek> {
    inner: BufReader<R>,
    current: u8,
    remaining: u32,
    bits_read: u64,
}

impl<R: Read + Seek> BitReader<R> {
    pub fn new(inner: R) -> Self {
        BitReader {
            inner: BufReader::new(inner),
            current: 0,
            remaining: 0,
            bits_read: 0,
        }
    }

    fn refill(&mut self) -> io::Result<bool> {
        let mut byte = [0u8; 1];
        match self.inner.read_exact(&mut byte) {
            Ok(()) => {
                self.current = byte[0];
                self.remaining = 8;
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(false),
            Err(e) => Err(e),
        }
    }
}

impl<R: Read + Seek> BitInput for BitReader<R> {
    fn read_bits(&mut self, n: u32) -> io::Result<Option<u32>> {
        check_width(n)?;
        let mut value: u32 = 0;
        for _ in 0..n {
            if self.remaining == 0 && !self.refill()? {
                return Ok(None);
            }
            self.remaining -= 1;
            let bit = (self.current >> self.remaining) & 1;
            // Shifting a u32 by 32 would overflow, so build the value bit by bit.
            value = (value << 1) | bit as u32;
            self.bits_read += 1;
        }
        Ok(Some(value))
    }

    fn reset(&mut self) -> io::Result<()> {
        self.inner.seek(SeekFrom::Start(0))?;
        self.current = 0;
        self.remaining = 0;
        self.bits_read = 0;
        Ok(())
    }

    fn bits_read(&self) -> u64 {
        self.bits_read
    }
}

/// MSB-first bit writer over any byte sink.
///
/// # Example
///
/// ```
/// use treehuff::compression::bit_io::{BitOutput, BitWriter};
///
/// let mut bits = BitWriter::new(Vec::new());
/// bits.write_bits(3, 0b110).unwrap();
/// bits.write_bits(2, 0b11).unwrap();
/// assert_eq!(bits.into_inner().unwrap(), vec![0b1101_1000]);
/// ```
#[derive(Debug)]
pub struct BitWriter<W: Write> {
    inner: BufWriter<W>,
    current: u8,
    filled: u32,
    bits_written: u64,
    closed: bool,
}

impl<W: Write> BitWriter<W> {
    pub fn new(inner: W) -> Self {
        BitWriter {
            inner: BufWriter::new(inner),
            current: 0,
            filled: 0,
            bits_written: 0,
            closed: false,
        }
    }

    /// Closes the writer and returns the underlying sink.
    pub fn into_inner(mut self) -> io::Result<W> {
        self.close()?;
        self.inner.into_inner().map_err(|e| e.into_error())
    }

    fn push_bit(&mut self, bit: bool) -> io::Result<()> {
        self.current = (self.current << 1) | bit as u8;
        self.filled += 1;
        self.bits_written += 1;
        if self.filled == 8 {
            self.inner.write_all(&[self.current])?;
            self.current = 0;
            self.filled = 0;
        }
        Ok(())
    }
}

impl<W: Write> BitOutput for BitWriter<W> {
    fn write_bits(&mut self, n: u32, value: u32) -> io::Result<()> {
        check_width(n)?;
        if self.closed {
            return Err(io::Error::other("write to a closed bit writer"));
        }
        for shift in (0..n).rev() {
            self.push_bit((value >> shift) & 1 == 1)?;
        }
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        if self.filled > 0 {
            let padded = self.current << (8 - self.filled);
            self.inner.write_all(&[padded])?;
            self.current = 0;
            self.filled = 0;
        }
        self.inner.flush()
    }

    fn bits_written(&self) -> u64 {
        self.bits_written
    }
}
