use bitvec::prelude::*;

use super::node::HuffmanNode;
use super::{Symbol, ALPHABET_SIZE};

/// Root-to-leaf path of a symbol; `0` is the left branch, `1` the right.
pub type Code = BitVec<u8, Msb0>;

/// Maps every leaf symbol of a tree to its code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: Vec<Option<Code>>,
}

impl CodeTable {
    /// Walks `tree` once and records the path to each leaf.
    ///
    /// A tree that is a single leaf gives that leaf an empty code, which no
    /// decoder can recognise; trees from [`build_huffman_tree`] always have at
    /// least two leaves.
    ///
    /// [`build_huffman_tree`]: super::build_huffman_tree
    pub fn from_tree(tree: &HuffmanNode) -> Self {
        let mut codes = vec![None; ALPHABET_SIZE + 1];
        let mut path = Code::new();
        collect_codes(tree, &mut path, &mut codes);
        CodeTable { codes }
    }

    /// Code for `symbol`, if the tree has a leaf for it.
    pub fn get(&self, symbol: Symbol) -> Option<&Code> {
        self.codes.get(symbol as usize).and_then(Option::as_ref)
    }

    /// All `(symbol, code)` entries in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &Code)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(symbol, code)| code.as_ref().map(|c| (symbol as Symbol, c)))
    }

    pub fn len(&self) -> usize {
        self.codes.iter().filter(|code| code.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn collect_codes(node: &HuffmanNode, path: &mut Code, codes: &mut [Option<Code>]) {
    match node {
        HuffmanNode::Leaf { symbol, .. } => {
            if let Some(slot) = codes.get_mut(*symbol as usize) {
                *slot = Some(path.clone());
            }
        }
        HuffmanNode::Internal { left, right, .. } => {
            path.push(false);
            collect_codes(left, path, codes);
            path.pop();
            path.push(true);
            collect_codes(right, path, codes);
            path.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compression::huffman::{build_huffman_tree, FrequencyTable, PSEUDO_EOF};

    fn bits(code: &Code) -> String {
        code.iter().map(|b| if *b { '1' } else { '0' }).collect()
    }

    fn table_for(data: &[u8]) -> CodeTable {
        let tree = build_huffman_tree(&FrequencyTable::from_bytes(data)).unwrap();
        CodeTable::from_tree(&tree)
    }

    #[test]
    fn test_aab_codes() {
        let table = table_for(b"aab");
        assert_eq!(table.len(), 3);
        assert_eq!(bits(table.get(0x61).unwrap()), "0");
        assert_eq!(bits(table.get(0x62).unwrap()), "10");
        assert_eq!(bits(table.get(PSEUDO_EOF).unwrap()), "11");
        assert!(table.get(0x63).is_none());
    }

    #[test]
    fn test_eof_always_has_code() {
        for data in [&b""[..], &b"x"[..], &b"hello world"[..], &[0u8; 64][..]] {
            let table = table_for(data);
            let code = table.get(PSEUDO_EOF).expect("no EOF code");
            assert!(!code.is_empty(), "empty EOF code for {:?}", data);
        }
    }

    #[test]
    fn test_prefix_free() {
        let text = b"this is an example for huffman encoding, with a sentinel";
        let table = table_for(text);
        let entries: Vec<_> = table.iter().collect();
        for (i, (sym_a, a)) in entries.iter().enumerate() {
            for (sym_b, b) in entries.iter().skip(i + 1) {
                assert!(
                    !a.starts_with(b.as_bitslice()) && !b.starts_with(a.as_bitslice()),
                    "code for {} and {} share a prefix",
                    sym_a,
                    sym_b
                );
            }
        }
    }

    #[test]
    fn test_frequent_symbols_get_shorter_codes() {
        let mut data = vec![b'e'; 500];
        data.extend_from_slice(b"zq");
        let table = table_for(&data);
        let e = table.get(b'e' as Symbol).unwrap().len();
        let z = table.get(b'z' as Symbol).unwrap().len();
        assert!(e < z, "e got {} bits, z got {}", e, z);
    }

    #[test]
    fn test_single_leaf_gets_empty_code() {
        let table = CodeTable::from_tree(&HuffmanNode::leaf(PSEUDO_EOF, 1));
        assert_eq!(table.len(), 1);
        assert!(table.get(PSEUDO_EOF).unwrap().is_empty());
    }
}
