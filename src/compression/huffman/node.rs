use super::{Symbol, PSEUDO_EOF};

/// Represents a node in the Huffman tree.
///
/// Children are owned, and a node has either two children or none, so the
/// tree needs no back references.
#[derive(Debug, Clone)]
pub enum HuffmanNode {
    /// A leaf node contains a symbol and its weight.
    Leaf { symbol: Symbol, weight: u64 },
    /// An internal node with left and right children and combined weight.
    Internal {
        weight: u64,
        left: Box<HuffmanNode>,
        right: Box<HuffmanNode>,
    },
}

impl PartialEq for HuffmanNode {
    /// Structural equality. Weights are ignored since a tree read back from a
    /// header carries none.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Leaf { symbol: s1, .. }, Self::Leaf { symbol: s2, .. }) => s1 == s2,
            (
                Self::Internal {
                    left: left1,
                    right: right1,
                    ..
                },
                Self::Internal {
                    left: left2,
                    right: right2,
                    ..
                },
            ) => left1 == left2 && right1 == right2,
            _ => false,
        }
    }
}

impl Eq for HuffmanNode {}

impl HuffmanNode {
    pub fn leaf(symbol: Symbol, weight: u64) -> Self {
        HuffmanNode::Leaf { symbol, weight }
    }

    /// Joins two subtrees under a new internal node, `left` taking the 0 branch.
    pub fn merge(left: HuffmanNode, right: HuffmanNode) -> Self {
        HuffmanNode::Internal {
            weight: left.weight() + right.weight(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Returns the weight of the node.
    pub fn weight(&self) -> u64 {
        match self {
            HuffmanNode::Leaf { weight, .. } => *weight,
            HuffmanNode::Internal { weight, .. } => *weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffmanNode::Leaf { .. })
    }

    /// The leaf's symbol, `None` on internal nodes.
    pub fn symbol(&self) -> Option<Symbol> {
        match self {
            HuffmanNode::Leaf { symbol, .. } => Some(*symbol),
            HuffmanNode::Internal { .. } => None,
        }
    }

    /// Child on the branch selected by `bit` (`false` = left).
    pub fn child(&self, bit: bool) -> Option<&HuffmanNode> {
        match self {
            HuffmanNode::Leaf { .. } => None,
            HuffmanNode::Internal { left, right, .. } => Some(if bit { right } else { left }),
        }
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            HuffmanNode::Leaf { .. } => 1,
            HuffmanNode::Internal { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }

    pub fn internal_count(&self) -> usize {
        match self {
            HuffmanNode::Leaf { .. } => 0,
            HuffmanNode::Internal { left, right, .. } => {
                1 + left.internal_count() + right.internal_count()
            }
        }
    }

    /// Length of the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        match self {
            HuffmanNode::Leaf { .. } => 0,
            HuffmanNode::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    /// Whether some leaf carries the end-of-stream symbol.
    pub fn contains_eof(&self) -> bool {
        match self {
            HuffmanNode::Leaf { symbol, .. } => *symbol == PSEUDO_EOF,
            HuffmanNode::Internal { left, right, .. } => {
                left.contains_eof() || right.contains_eof()
            }
        }
    }
}
