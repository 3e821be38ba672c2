//! Code table derivation.
//!
//! Codes are read off the tree by depth-first traversal: descending left
//! appends `0`, descending right appends `1`. A single-leaf tree has no
//! branch to take, so its one symbol gets the code `0`.

use std::collections::HashMap;
use std::fmt;

use crate::frequency::FrequencyTable;
use crate::symbol::Symbol;
use crate::tree::{Node, PrefixTree};

/// A non-empty codeword, most significant (first written) bit first.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Code {
    bits: Vec<bool>,
}

impl Code {
    /// Number of bits in the codeword.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Always false; codewords have at least one bit.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// The bits in write order.
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    /// True if `self` is a prefix of `other` (or equal to it).
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        other.bits.starts_with(&self.bits)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.bits {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Immutable mapping from symbol to codeword.
#[derive(Debug, Clone)]
pub struct CodeTable<S: Symbol> {
    codes: HashMap<S, Code>,
    /// Symbols in traversal order.
    order: Vec<S>,
}

impl<S: Symbol> CodeTable<S> {
    /// Derive the code table of `tree`.
    pub fn from_tree(tree: &PrefixTree<S>) -> Self {
        let mut table = Self {
            codes: HashMap::with_capacity(tree.leaf_count()),
            order: Vec::with_capacity(tree.leaf_count()),
        };
        match tree.root() {
            Node::Leaf { symbol, .. } => table.push(*symbol, vec![false]),
            root => table.descend(root, Vec::new()),
        }
        table
    }

    fn descend(&mut self, node: &Node<S>, prefix: Vec<bool>) {
        match node {
            Node::Leaf { symbol, .. } => self.push(*symbol, prefix),
            Node::Internal { left, right, .. } => {
                let mut left_prefix = prefix.clone();
                left_prefix.push(false);
                self.descend(left, left_prefix);

                let mut right_prefix = prefix;
                right_prefix.push(true);
                self.descend(right, right_prefix);
            }
        }
    }

    fn push(&mut self, symbol: S, bits: Vec<bool>) {
        self.order.push(symbol);
        self.codes.insert(symbol, Code { bits });
    }

    /// Codeword for `symbol`.
    pub fn get(&self, symbol: &S) -> Option<&Code> {
        self.codes.get(symbol)
    }

    /// Number of coded symbols.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True for the table of an empty source.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// `(symbol, code)` pairs in traversal order.
    pub fn iter(&self) -> impl Iterator<Item = (&S, &Code)> + '_ {
        self.order.iter().map(move |s| (s, &self.codes[s]))
    }

    /// Length of the longest codeword.
    pub fn max_len(&self) -> usize {
        self.codes.values().map(Code::len).max().unwrap_or(0)
    }

    /// True if no codeword is a prefix of another.
    pub fn is_prefix_free(&self) -> bool {
        let mut codes: Vec<&Code> = self.codes.values().collect();
        // After sorting, a prefix always sorts immediately before some code it prefixes.
        codes.sort_by(|a, b| a.bits.cmp(&b.bits));
        codes.windows(2).all(|w| !w[0].is_prefix_of(w[1]))
    }

    /// `sum(2^-len)` over all codewords.
    pub fn kraft_sum(&self) -> f64 {
        self.codes
            .values()
            .map(|c| 2f64.powi(-(c.len() as i32)))
            .sum()
    }

    /// Exact check that `sum(2^-len) == 1`, i.e. the code tree is complete.
    pub fn satisfies_kraft_equality(&self) -> bool {
        let max = self.max_len();
        if max == 0 {
            return false;
        }
        let mut per_len = vec![0u64; max + 1];
        for code in self.codes.values() {
            per_len[code.len()] += 1;
        }
        // Pair codes up level by level; a complete tree leaves exactly one root.
        let mut carry = 0u64;
        for len in (1..=max).rev() {
            let at_level = per_len[len] + carry;
            if at_level % 2 != 0 {
                return false;
            }
            carry = at_level / 2;
        }
        carry == 1
    }

    /// Total payload bits needed to code a source with these frequencies.
    ///
    /// Symbols of `frequencies` without a code are ignored.
    pub fn weighted_length(&self, frequencies: &FrequencyTable<S>) -> u64 {
        frequencies
            .iter()
            .filter_map(|e| self.get(&e.symbol).map(|c| e.count * c.len() as u64))
            .sum()
    }

    /// One `symbol:frequency:code` line per symbol, in traversal order.
    pub fn listing(&self, frequencies: &FrequencyTable<S>) -> Vec<String> {
        self.iter()
            .map(|(symbol, code)| {
                let count = frequencies.get(symbol).unwrap_or(0);
                format!("{symbol:?}:{count}:{code}")
            })
            .collect()
    }
}
