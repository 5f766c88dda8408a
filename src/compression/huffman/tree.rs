use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::frequency::FrequencyTable;
use super::node::HuffmanNode;
use crate::compression::Result;
use crate::error::Error;

/// A helper wrapper for HuffmanNode for use in a BinaryHeap.
/// The lightest node has the highest priority; equal weights come out in the
/// order they went in.
#[derive(Debug)]
struct NodeWrapper {
    node: HuffmanNode,
    sequence: usize,
}

impl PartialEq for NodeWrapper {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for NodeWrapper {}

impl Ord for NodeWrapper {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap.
        other
            .node
            .weight()
            .cmp(&self.node.weight())
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for NodeWrapper {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Build the Huffman tree for a frequency table.
///
/// Leaves are queued in ascending symbol order. The two lightest nodes are
/// popped (first becomes the left child, second the right) and their merge is
/// queued behind every node already present, until a single root remains.
///
/// When only one symbol has a non-zero count (the end-of-stream symbol of an
/// empty input), a zero-weight leaf for an unused byte is added so the root
/// is never itself a leaf.
///
/// # Example
///
/// ```
/// use treehuff::compression::huffman::{build_huffman_tree, FrequencyTable};
///
/// let tree = build_huffman_tree(&FrequencyTable::from_bytes(b"aab")).unwrap();
/// assert_eq!(tree.leaf_count(), 3);
/// ```
pub fn build_huffman_tree(frequencies: &FrequencyTable) -> Result<HuffmanNode> {
    let mut heap = BinaryHeap::new();
    let mut sequence = 0;
    for (symbol, weight) in frequencies.present() {
        heap.push(NodeWrapper {
            node: HuffmanNode::leaf(symbol, weight),
            sequence,
        });
        sequence += 1;
    }
    match heap.peek().map(|only| only.node.symbol()) {
        None => return Err(Error::invalid("cannot build a tree without symbols")),
        Some(Some(symbol)) if heap.len() == 1 => {
            // Empty input: only PSEUDO_EOF is present. Pair it with an unused
            // zero-weight leaf so its code is one bit long instead of empty.
            let filler = if symbol == 0 { 1 } else { 0 };
            heap.push(NodeWrapper {
                node: HuffmanNode::leaf(filler, 0),
                sequence,
            });
            sequence += 1;
        }
        _ => {}
    }

    while let (Some(left), Some(right)) = (heap.pop(), heap.pop()) {
        let merged = HuffmanNode::merge(left.node, right.node);
        if heap.is_empty() {
            log::debug!(
                "built Huffman tree: {} leaves, depth {}, weight {}",
                merged.leaf_count(),
                merged.depth(),
                merged.weight()
            );
            return Ok(merged);
        }
        heap.push(NodeWrapper {
            node: merged,
            sequence,
        });
        sequence += 1;
    }
    Err(Error::invalid("priority queue drained without producing a root"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compression::huffman::PSEUDO_EOF;

    #[test]
    fn test_aab_tree_shape() {
        let tree = build_huffman_tree(&FrequencyTable::from_bytes(b"aab")).unwrap();
        // 0x62 and PSEUDO_EOF (both weight 1) merge first, then join 0x61.
        let expected = HuffmanNode::merge(
            HuffmanNode::leaf(0x61, 2),
            HuffmanNode::merge(HuffmanNode::leaf(0x62, 1), HuffmanNode::leaf(PSEUDO_EOF, 1)),
        );
        assert_eq!(tree, expected);
        assert_eq!(tree.weight(), 4);
    }

    #[test]
    fn test_empty_input_tree() {
        let tree = build_huffman_tree(&FrequencyTable::from_bytes(&[])).unwrap();
        let eof = HuffmanNode::leaf(PSEUDO_EOF, 1);
        let expected = HuffmanNode::merge(HuffmanNode::leaf(0, 0), eof);
        assert_eq!(tree, expected);
        assert_eq!(tree.weight(), 1);
    }

    #[test]
    fn test_single_symbol_has_two_leaves() {
        let data = vec![0x41u8; 1000];
        let tree = build_huffman_tree(&FrequencyTable::from_bytes(&data)).unwrap();
        assert_eq!(tree.leaf_count(), 2);
        assert_eq!(tree.weight(), 1001);
        assert!(!tree.is_leaf());
        assert!(tree.contains_eof());
    }

    #[test]
    fn test_every_byte_present() {
        let data: Vec<u8> = (0..=255).collect();
        let tree = build_huffman_tree(&FrequencyTable::from_bytes(&data)).unwrap();
        assert_eq!(tree.leaf_count(), 257);
        assert_eq!(tree.internal_count(), 256);
        assert_eq!(tree.weight(), 257);
    }

    #[test]
    fn test_skewed_weights_give_deep_tree() {
        // Fibonacci counts force a maximally unbalanced tree.
        let mut data = Vec::new();
        let (mut a, mut b) = (1usize, 2usize);
        for symbol in 0..10u8 {
            data.extend(std::iter::repeat(symbol).take(a));
            let next = a + b;
            a = b;
            b = next;
        }
        let tree = build_huffman_tree(&FrequencyTable::from_bytes(&data)).unwrap();
        assert_eq!(tree.leaf_count(), 11);
        assert_eq!(tree.depth(), 10);
    }

    #[test]
    fn test_build_is_deterministic() {
        let data = b"abracadabra alakazam";
        let table = FrequencyTable::from_bytes(data);
        let first = build_huffman_tree(&table).unwrap();
        let second = build_huffman_tree(&table).unwrap();
        assert_eq!(first, second);
    }
}
