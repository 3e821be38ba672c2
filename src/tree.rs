//! Prefix-code tree construction.
//!
//! # Tie-breaking
//!
//! Huffman's algorithm leaves the merge order unspecified when weights are
//! equal. Here every candidate carries an `order` key: leaves take the index
//! at which their symbol was first recorded in the [`FrequencyTable`], and
//! each internal node takes the next integer after all leaves, in creation
//! order. Candidates are removed by ascending `(weight, order)`, and the first
//! node removed becomes the left (`0`) child of the merged node.
//!
//! Because the key is total and depends only on the table, building twice
//! from the same table yields the same tree, which is what lets a decoder
//! rebuild the encoder's tree from the persisted frequencies alone.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::frequency::FrequencyTable;
use crate::symbol::Symbol;

/// Prefix-code tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node<S> {
    /// A symbol and its weight.
    Leaf {
        /// The coded symbol.
        symbol: S,
        /// Occurrence count.
        weight: u64,
    },
    /// Two children; `left` is reached with bit `0`, `right` with bit `1`.
    Internal {
        /// Sum of the children's weights.
        weight: u64,
        /// Child taken on a `0` bit.
        left: Box<Node<S>>,
        /// Child taken on a `1` bit.
        right: Box<Node<S>>,
    },
}

impl<S> Node<S> {
    /// Weight of the subtree rooted here.
    pub fn weight(&self) -> u64 {
        match self {
            Node::Leaf { weight, .. } => *weight,
            Node::Internal { weight, .. } => *weight,
        }
    }

    /// True for leaf nodes.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }
}

/// Heap entry. Ordered so that `BinaryHeap` pops the lowest `(weight, order)`.
struct Candidate<S> {
    weight: u64,
    order: usize,
    node: Node<S>,
}

impl<S> PartialEq for Candidate<S> {
    fn eq(&self, other: &Self) -> bool {
        self.weight == other.weight && self.order == other.order
    }
}

impl<S> Eq for Candidate<S> {}

impl<S> Ord for Candidate<S> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-priority queue
        (other.weight, other.order).cmp(&(self.weight, self.order))
    }
}

impl<S> PartialOrd for Candidate<S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A complete prefix-code tree over the symbols of one frequency table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixTree<S> {
    root: Node<S>,
    leaves: usize,
}

impl<S: Symbol> PrefixTree<S> {
    /// Build the canonical tree for `table`.
    ///
    /// Returns `None` for an empty table. A table with one symbol yields a
    /// single leaf. Runs in `O(k log k)` for `k` distinct symbols.
    pub fn build(table: &FrequencyTable<S>) -> Option<Self> {
        let leaves = table.len();
        let mut heap: BinaryHeap<Candidate<S>> = table
            .iter()
            .enumerate()
            .map(|(order, entry)| Candidate {
                weight: entry.count,
                order,
                node: Node::Leaf {
                    symbol: entry.symbol,
                    weight: entry.count,
                },
            })
            .collect();

        let mut next_order = leaves;
        while heap.len() > 1 {
            let (Some(left), Some(right)) = (heap.pop(), heap.pop()) else {
                break;
            };
            // Weights are bounded by the table total, which cannot overflow.
            let weight = left.weight + right.weight;
            heap.push(Candidate {
                weight,
                order: next_order,
                node: Node::Internal {
                    weight,
                    left: Box::new(left.node),
                    right: Box::new(right.node),
                },
            });
            next_order += 1;
        }

        let root = heap.pop()?.node;
        log::trace!(
            "built prefix tree: {} leaves, root weight {}",
            leaves,
            root.weight()
        );
        Some(Self { root, leaves })
    }
}

impl<S> PrefixTree<S> {
    /// Root node.
    pub fn root(&self) -> &Node<S> {
        &self.root
    }

    /// Number of leaves (distinct symbols).
    pub fn leaf_count(&self) -> usize {
        self.leaves
    }

    /// Number of internal nodes; always `leaf_count() - 1`.
    pub fn internal_count(&self) -> usize {
        self.leaves.saturating_sub(1)
    }

    /// True when the tree is a single leaf.
    pub fn is_degenerate(&self) -> bool {
        self.root.is_leaf()
    }

    /// Visit every leaf with its depth, left subtree first.
    pub fn for_each_leaf<F: FnMut(&S, u64, usize)>(&self, mut visit: F) {
        let mut stack = vec![(&self.root, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            match node {
                Node::Leaf { symbol, weight } => visit(symbol, *weight, depth),
                Node::Internal { left, right, .. } => {
                    stack.push((right.as_ref(), depth + 1));
                    stack.push((left.as_ref(), depth + 1));
                }
            }
        }
    }
}
