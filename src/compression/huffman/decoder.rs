use super::node::HuffmanNode;
use super::{BITS_PER_WORD, PSEUDO_EOF};
use crate::compression::bit_io::{BitInput, BitOutput};
use crate::compression::Result;
use crate::error::Error;

/// Receives every byte the decoder emits.
///
/// Closures taking `(byte, bits_read)` implement this trait.
pub trait DecodeObserver {
    /// Called after `byte` has been written, with the number of bits consumed
    /// from the input so far.
    fn on_symbol(&mut self, byte: u8, bits_read: u64);
}

impl<F: FnMut(u8, u64)> DecodeObserver for F {
    fn on_symbol(&mut self, byte: u8, bits_read: u64) {
        self(byte, bits_read)
    }
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl DecodeObserver for NoopObserver {
    fn on_symbol(&mut self, _byte: u8, _bits_read: u64) {}
}

/// Walks a code tree one input bit at a time.
#[derive(Debug, Clone, Copy)]
pub struct Decoder<'t> {
    root: &'t HuffmanNode,
}

impl<'t> Decoder<'t> {
    /// Fails when `root` is a leaf, since no bit sequence leads to it.
    pub fn new(root: &'t HuffmanNode) -> Result<Self> {
        if root.is_leaf() {
            return Err(Error::MalformedHeader("tree is a single leaf".to_string()));
        }
        Ok(Decoder { root })
    }

    /// Decodes body bits from `input` into `output` until the PSEUDO_EOF leaf
    /// is reached, and returns the number of bytes written.
    ///
    /// Each bit moves from the current node to its left (`0`) or right (`1`)
    /// child. Landing on a byte leaf writes that byte and restarts at the
    /// root. Landing on PSEUDO_EOF is the only successful end: running out of
    /// input first is [`Error::TruncatedBody`], and bytes written before that
    /// stay in `output`.
    pub fn decode<I, O, Obs>(
        &self,
        input: &mut I,
        output: &mut O,
        observer: &mut Obs,
    ) -> Result<u64>
    where
        I: BitInput,
        O: BitOutput,
        Obs: DecodeObserver + ?Sized,
    {
        let mut current = self.root;
        let mut written = 0u64;

        loop {
            let bit = match input.read_bit()? {
                Some(bit) => bit,
                None => {
                    return Err(Error::TruncatedBody {
                        bits_read: input.bits_read(),
                        symbols_decoded: written,
                    });
                }
            };

            let Some(next) = current.child(bit) else {
                return Err(Error::MalformedHeader("walked below a leaf".to_string()));
            };
            current = next;

            if let HuffmanNode::Leaf { symbol, .. } = current {
                if *symbol == PSEUDO_EOF {
                    return Ok(written);
                }
                output.write_bits(BITS_PER_WORD, *symbol as u32)?;
                written += 1;
                observer.on_symbol(*symbol as u8, input.bits_read());
                current = self.root;
            }
        }
    }
}
