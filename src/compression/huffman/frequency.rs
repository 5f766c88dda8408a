use super::{Symbol, ALPHABET_SIZE, BITS_PER_WORD, PSEUDO_EOF};
use crate::compression::bit_io::BitInput;
use crate::compression::Result;

/// Occurrence counts for every symbol, end-of-stream included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: Vec<u64>,
}

impl FrequencyTable {
    /// Counts every 8-bit unit of `input`, then rewinds it.
    ///
    /// The end-of-stream count is set to exactly 1 afterwards, so even an
    /// empty input yields a table with a symbol to build a tree from.
    pub fn count<I: BitInput>(input: &mut I) -> Result<Self> {
        let mut counts = vec![0u64; ALPHABET_SIZE + 1];
        while let Some(value) = input.read_bits(BITS_PER_WORD)? {
            counts[value as usize] += 1;
        }
        input.reset()?;
        counts[PSEUDO_EOF as usize] = 1;
        Ok(FrequencyTable { counts })
    }

    /// Builds the table directly from an in-memory byte slice.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut counts = vec![0u64; ALPHABET_SIZE + 1];
        for &byte in data {
            counts[byte as usize] += 1;
        }
        counts[PSEUDO_EOF as usize] = 1;
        FrequencyTable { counts }
    }

    /// Count for `symbol`; 0 for values outside the symbol space.
    pub fn get(&self, symbol: Symbol) -> u64 {
        self.counts.get(symbol as usize).copied().unwrap_or(0)
    }

    /// Symbols with a non-zero count, in ascending order.
    pub fn present(&self) -> impl Iterator<Item = (Symbol, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .map(|(symbol, &count)| (symbol as Symbol, count))
    }

    /// Number of input bytes counted (end-of-stream excluded).
    pub fn total_bytes(&self) -> u64 {
        self.counts[..ALPHABET_SIZE].iter().sum()
    }
}
