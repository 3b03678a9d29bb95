//! Transposition tables for minimax values

use std::collections::HashMap;

use crate::{agent::minimax::Score, nim::heaps::Signature};

/// Position in the search tree: canonical heaps and the side to move
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchKey {
    /// Canonical heaps
    pub signature: Signature,

    /// Whether the maximizing player is to move
    pub maximizing: bool,
}

/// Interface of a transposition table
pub trait TranspositionTable {
    /// Lookup a position value if exists
    fn lookup_position(&self, position: &SearchKey) -> Option<Score>;

    /// Save position and its value
    fn insert_position(&mut self, position: SearchKey, value: Score);

    /// Forget all saved positions
    fn clear(&mut self);

    /// Prepare the table for positions with `heap_count` heaps. Returns `true` if saved
    /// positions were dropped.
    fn ensure_shape(&mut self, _heap_count: usize) -> bool {
        false
    }
}

/// Cache of minimax values, versioned by the number of heaps of the positions it stores.
///
/// Values stay valid for the whole process, but positions of different shape must not share
/// a table, see [`TranspositionTable::ensure_shape`].
#[derive(Debug, Clone, Default)]
pub struct MinimaxTable {
    values: HashMap<SearchKey, Score, ahash::RandomState>,
    heap_count: Option<usize>,
}

impl MinimaxTable {
    /// Create new empty transposition table.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get number of saved positions
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if table stores any position
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of heaps of the positions currently stored
    #[inline]
    pub const fn heap_count(&self) -> Option<usize> {
        self.heap_count
    }
}

impl TranspositionTable for MinimaxTable {
    #[inline]
    fn lookup_position(&self, position: &SearchKey) -> Option<Score> {
        self.values.get(position).copied()
    }

    #[inline]
    fn insert_position(&mut self, position: SearchKey, value: Score) {
        self.values.insert(position, value);
    }

    fn clear(&mut self) {
        self.values.clear();
        self.heap_count = None;
    }

    /// Bind the table to positions with `heap_count` heaps, clearing it if it was bound to a
    /// different shape.
    fn ensure_shape(&mut self, heap_count: usize) -> bool {
        match self.heap_count.replace(heap_count) {
            Some(previous) if previous != heap_count => {
                log::debug!(
                    "Game shape changed from {previous} to {heap_count} heaps, dropping {} cached values",
                    self.values.len()
                );
                self.values.clear();
                true
            }
            _ => false,
        }
    }
}

/// Dummy transposition table that does not store anythning
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NoTranspositionTable;

impl TranspositionTable for NoTranspositionTable {
    #[inline]
    fn lookup_position(&self, _position: &SearchKey) -> Option<Score> {
        None
    }

    #[inline]
    fn insert_position(&mut self, _position: SearchKey, _value: Score) {}

    #[inline]
    fn clear(&mut self) {}
}
