//! Preorder serialization of the code tree.
//!
//! Each internal node is a single `0` bit followed by its left then right
//! subtree. Each leaf is a `1` bit followed by its symbol in
//! [`SYMBOL_WIDTH`](super::SYMBOL_WIDTH) bits.

use bitvec::prelude::*;

use super::node::HuffmanNode;
use super::{ALPHABET_SIZE, PSEUDO_EOF, SYMBOL_WIDTH};
use crate::compression::bit_io::{BitInput, BitOutput};
use crate::compression::Result;
use crate::error::Error;

/// Writes `tree` in preorder and returns the number of bits written.
pub fn write_tree_header<O: BitOutput>(tree: &HuffmanNode, out: &mut O) -> Result<u64> {
    match tree {
        HuffmanNode::Leaf { symbol, .. } => {
            out.write_bit(true)?;
            out.write_bits(SYMBOL_WIDTH, *symbol as u32)?;
            Ok(1 + SYMBOL_WIDTH as u64)
        }
        HuffmanNode::Internal { left, right, .. } => {
            out.write_bit(false)?;
            let left_bits = write_tree_header(left, out)?;
            let right_bits = write_tree_header(right, out)?;
            Ok(1 + left_bits + right_bits)
        }
    }
}

/// Size of the header [`write_tree_header`] produces for `tree`.
pub fn header_bit_len(tree: &HuffmanNode) -> u64 {
    let leaves = tree.leaf_count() as u64;
    let internals = tree.internal_count() as u64;
    leaves * (1 + SYMBOL_WIDTH as u64) + internals
}

/// Reads a tree written by [`write_tree_header`].
///
/// Running out of bits anywhere in the header is a
/// [`TruncatedHeader`](Error::TruncatedHeader) error. A complete header is
/// still rejected as [`MalformedHeader`](Error::MalformedHeader) when it
/// holds an out-of-range or repeated symbol, nests deeper than any tree over
/// the symbol space can, lacks a PSEUDO_EOF leaf, or is a lone leaf that no
/// body bit could reach.
pub fn read_tree_header<I: BitInput>(input: &mut I) -> Result<HuffmanNode> {
    let mut seen = bitvec![0; ALPHABET_SIZE + 1];
    let root = read_node(input, 0, &mut seen)?;
    if root.is_leaf() {
        return Err(Error::MalformedHeader("tree is a single leaf".to_string()));
    }
    if !root.contains_eof() {
        return Err(Error::MalformedHeader("tree has no PSEUDO_EOF leaf".to_string()));
    }
    Ok(root)
}

fn read_node<I: BitInput>(input: &mut I, depth: usize, seen: &mut BitVec) -> Result<HuffmanNode> {
    if depth > ALPHABET_SIZE {
        return Err(Error::MalformedHeader(format!(
            "tree nests deeper than {} levels",
            ALPHABET_SIZE
        )));
    }
    let is_leaf = input.read_bit()?.ok_or_else(|| Error::TruncatedHeader {
        bits_read: input.bits_read(),
    })?;
    if !is_leaf {
        let left = read_node(input, depth + 1, seen)?;
        let right = read_node(input, depth + 1, seen)?;
        // Weights are not stored; decoding only needs the shape.
        return Ok(HuffmanNode::Internal {
            weight: 0,
            left: Box::new(left),
            right: Box::new(right),
        });
    }

    let value = input
        .read_bits(SYMBOL_WIDTH)?
        .ok_or_else(|| Error::TruncatedHeader {
            bits_read: input.bits_read(),
        })?;
    if value > PSEUDO_EOF as u32 {
        return Err(Error::MalformedHeader(format!(
            "leaf symbol {} is outside the alphabet",
            value
        )));
    }
    if seen.replace(value as usize, true) {
        return Err(Error::MalformedHeader(format!(
            "symbol {} appears on more than one leaf",
            value
        )));
    }
    Ok(HuffmanNode::leaf(value as u16, 0))
}
