//! Symbol frequency accounting.
//!
//! A [`FrequencyTable`] remembers the order in which symbols were first seen.
//! That order is the secondary key the tree builder uses to break weight ties,
//! so two tables with the same entries in the same order always produce the
//! same code.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::symbol::Symbol;

/// One `(symbol, count)` pair. `count` is always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrequencyEntry<S> {
    /// The counted symbol.
    pub symbol: S,
    /// Number of occurrences.
    pub count: u64,
}

/// Occurrence counts in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable<S: Symbol> {
    entries: Vec<FrequencyEntry<S>>,
    index: HashMap<S, usize>,
    total: u64,
}

impl<S: Symbol> FrequencyTable<S> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
            total: 0,
        }
    }

    /// Count every symbol of `source`.
    pub fn from_symbols<I>(source: I) -> Self
    where
        I: IntoIterator<Item = S>,
    {
        let mut table = Self::new();
        for symbol in source {
            table.record(symbol);
        }
        table
    }

    /// Record one occurrence of `symbol`.
    pub fn record(&mut self, symbol: S) {
        match self.index.get(&symbol) {
            Some(&i) => self.entries[i].count += 1,
            None => {
                self.index.insert(symbol, self.entries.len());
                self.entries.push(FrequencyEntry { symbol, count: 1 });
            }
        }
        // One increment per symbol held in memory; saturates rather than wraps.
        self.total = self.total.saturating_add(1);
    }

    /// Append a new entry with an explicit count.
    ///
    /// # Errors
    /// Returns `Error::InvalidFrequency` if `count` is 0, the symbol is
    /// already present, or the table total would overflow.
    pub fn insert(&mut self, symbol: S, count: u64) -> Result<()> {
        let reject = |reason| Error::InvalidFrequency {
            symbol: format!("{symbol:?}"),
            reason,
        };
        if count == 0 {
            return Err(reject("count must be at least 1"));
        }
        if self.index.contains_key(&symbol) {
            return Err(reject("duplicate symbol"));
        }
        let total = self
            .total
            .checked_add(count)
            .ok_or_else(|| reject("total count overflows u64"))?;

        self.index.insert(symbol, self.entries.len());
        self.entries.push(FrequencyEntry { symbol, count });
        self.total = total;
        Ok(())
    }

    /// Count for `symbol`, if present.
    pub fn get(&self, symbol: &S) -> Option<u64> {
        self.index.get(symbol).map(|&i| self.entries[i].count)
    }

    /// Position of `symbol` in first-seen order.
    pub fn position(&self, symbol: &S) -> Option<usize> {
        self.index.get(symbol).copied()
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no symbol has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts, i.e. the source length.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &FrequencyEntry<S>> {
        self.entries.iter()
    }

    /// Entries in first-seen order, as a slice.
    pub fn entries(&self) -> &[FrequencyEntry<S>] {
        &self.entries
    }
}

impl<S: Symbol> Default for FrequencyTable<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Symbol> FromIterator<S> for FrequencyTable<S> {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_symbols(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_counts_in_first_seen_order() {
        let table = FrequencyTable::from_symbols(b"abracadabra".iter().copied());
        let entries: Vec<(u8, u64)> = table.iter().map(|e| (e.symbol, e.count)).collect();
        assert_eq!(
            entries,
            vec![(b'a', 5), (b'b', 2), (b'r', 2), (b'c', 1), (b'd', 1)]
        );
        assert_eq!(table.total(), 11);
        assert_eq!(table.get(&b'z'), None);
        assert_eq!(table.position(&b'r'), Some(2));
    }

    #[test]
    fn test_empty_source() {
        let table: FrequencyTable<u8> = FrequencyTable::from_symbols(Vec::new());
        assert!(table.is_empty());
        assert_eq!(table.total(), 0);
    }

    #[test]
    fn test_insert_rejects_bad_entries() {
        let mut table = FrequencyTable::new();
        table.insert('x', 3).unwrap();
        assert!(matches!(
            table.insert('y', 0),
            Err(Error::InvalidFrequency { .. })
        ));
        assert!(matches!(
            table.insert('x', 1),
            Err(Error::InvalidFrequency { .. })
        ));
        assert!(matches!(
            table.insert('z', u64::MAX),
            Err(Error::InvalidFrequency { .. })
        ));
        assert_eq!(table.len(), 1);
        assert_eq!(table.total(), 3);
    }

    proptest! {
        #[test]
        fn prop_counts_sum_to_length(input in prop::collection::vec(any::<u8>(), 0..200)) {
            let table: FrequencyTable<u8> = input.iter().copied().collect();
            prop_assert_eq!(table.total(), input.len() as u64);
            for entry in table.iter() {
                let expected = input.iter().filter(|&&b| b == entry.symbol).count() as u64;
                prop_assert_eq!(entry.count, expected);
            }
        }
    }
}
