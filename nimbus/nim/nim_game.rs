//! Shared interface of Nim positions - every agent talks to positions only through it

use itertools::Itertools;

use crate::{
    nim::{
        heaps::Signature,
        moves::{InvalidMoveError, Move},
    },
    numeric::nimber::Nimber,
};

/// A Nim position: ordered heaps where heap index is the heap identity
pub trait NimGame: Sized + Clone {
    /// Heap values, one per heap
    fn heaps(&self) -> &[u32];

    /// Construct position from heap values
    fn from_heaps(heaps: Vec<u32>) -> Self;

    /// Number of heaps, including empty ones
    #[inline]
    fn heap_count(&self) -> usize {
        self.heaps().len()
    }

    /// Number of objects left on the table
    #[inline]
    fn total_objects(&self) -> u64 {
        self.heaps().iter().map(|&heap| u64::from(heap)).sum()
    }

    /// Every heap is empty - the player who made the last move won
    #[inline]
    fn is_terminal(&self) -> bool {
        self.heaps().iter().all(|&heap| heap == 0)
    }

    /// At most one heap holds more than one object
    #[inline]
    fn is_endgame(&self) -> bool {
        self.heaps().iter().filter(|&&heap| heap > 1).count() <= 1
    }

    /// XOR of all heap values
    #[inline]
    fn nim_sum(&self) -> Nimber {
        self.heaps().iter().copied().map(Nimber::new).sum()
    }

    /// Index of the biggest heap, lowest index wins ties
    fn biggest_heap_index(&self) -> Option<usize> {
        // max_by_key returns the last maximum
        self.heaps()
            .iter()
            .enumerate()
            .rev()
            .max_by_key(|(_, heap)| **heap)
            .map(|(idx, _)| idx)
    }

    /// Index of the smallest heap, lowest index wins ties
    fn smallest_heap_index(&self) -> Option<usize> {
        self.heaps()
            .iter()
            .enumerate()
            .min_by_key(|(_, heap)| **heap)
            .map(|(idx, _)| idx)
    }

    /// Permutation invariant identity of the position
    #[inline]
    fn signature(&self) -> Signature {
        Signature::new(self.heaps())
    }

    /// Copy of the position with heap at `heap` set to `value`.
    ///
    /// Does not check legality, callers must make sure that `heap` is in range.
    fn with_heap(&self, heap: usize, value: u32) -> Self {
        let mut heaps = self.heaps().to_vec();
        heaps[heap] = value;
        Self::from_heaps(heaps)
    }

    /// Validate a move and return the resulting position
    ///
    /// # Errors
    /// - When the move does not remove a positive number of objects from exactly one heap
    fn apply_move(&self, mov: &Move) -> Result<Self, InvalidMoveError> {
        let heaps = self.heaps();
        match mov {
            Move::Remove { heap, count } => {
                let available =
                    *heaps
                        .get(*heap)
                        .ok_or_else(|| InvalidMoveError::HeapOutOfRange {
                            heap: *heap,
                            heap_count: heaps.len(),
                        })?;
                if *count == 0 {
                    return Err(InvalidMoveError::ZeroRemoval { heap: *heap });
                }
                if *count > available {
                    return Err(InvalidMoveError::RemovalExceedsHeap {
                        heap: *heap,
                        count: *count,
                        available,
                    });
                }
                Ok(self.with_heap(*heap, available - count))
            }
            Move::Target(target) => {
                if target.len() != heaps.len() {
                    return Err(InvalidMoveError::ShapeMismatch {
                        expected: heaps.len(),
                        found: target.len(),
                    });
                }

                let mut changed = None;
                for (heap, (before, after)) in heaps.iter().zip(target).enumerate() {
                    if after > before {
                        return Err(InvalidMoveError::HeapIncreased { heap });
                    }
                    if after < before && changed.replace(heap).is_some() {
                        return Err(InvalidMoveError::MultipleHeapsChanged);
                    }
                }

                if changed.is_none() {
                    return Err(InvalidMoveError::NoChange);
                }
                Ok(Self::from_heaps(target.clone()))
            }
        }
    }

    /// All positions reachable in one move, one representative per [`Signature`].
    ///
    /// Positions are generated heap by heap, target value ascending, and the first
    /// position of every signature is kept.
    fn legal_successors(&self) -> Vec<Self> {
        self.heaps()
            .iter()
            .enumerate()
            .flat_map(|(heap, &objects)| (0..objects).map(move |target| (heap, target)))
            .map(|(heap, target)| self.with_heap(heap, target))
            .unique_by(Self::signature)
            .collect()
    }

    /// Sprague-Grundy value computed from the game tree, without using nim-sum.
    ///
    /// Exponential, only meant for small positions.
    fn grundy_value(&self) -> Nimber {
        Nimber::mex(
            self.legal_successors()
                .iter()
                .map(Self::grundy_value)
                .collect(),
        )
    }
}
