//! Moves in Nim and reasons they can be rejected

use std::fmt::Display;

use crate::display;

/// A single Nim move.
///
/// Both forms describe the same thing: exactly one heap loses a strictly positive number of
/// objects. Legality is checked against a concrete position in
/// [`NimGame::apply_move`](crate::nim::nim_game::NimGame::apply_move).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Move {
    /// Remove `count` objects from the heap at index `heap`
    Remove {
        /// Index of the heap to take from
        heap: usize,

        /// Number of objects to take
        count: u32,
    },

    /// Full configuration after the move
    Target(Vec<u32>),
}

impl Move {
    /// Construct a move that takes `count` objects from `heap`
    #[inline]
    pub const fn remove(heap: usize, count: u32) -> Self {
        Self::Remove { heap, count }
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Remove { heap, count } => write!(f, "take {count} from heap {heap}"),
            Self::Target(heaps) => {
                write!(f, "move to ")?;
                display::brackets(f, |f| display::commas(f, heaps))
            }
        }
    }
}

/// Reason why a move is illegal in a given position
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InvalidMoveError {
    /// Heap index does not exist
    HeapOutOfRange {
        /// Requested heap
        heap: usize,
        /// Number of heaps in the position
        heap_count: usize,
    },

    /// Move removes no objects
    ZeroRemoval {
        /// Requested heap
        heap: usize,
    },

    /// Move removes more objects than the heap holds
    RemovalExceedsHeap {
        /// Requested heap
        heap: usize,
        /// Objects requested
        count: u32,
        /// Objects available
        available: u32,
    },

    /// Target configuration has a different number of heaps
    ShapeMismatch {
        /// Number of heaps in the position
        expected: usize,
        /// Number of heaps in the target
        found: usize,
    },

    /// Target configuration grows a heap
    HeapIncreased {
        /// Offending heap
        heap: usize,
    },

    /// Target configuration decreases more than one heap
    MultipleHeapsChanged,

    /// Target configuration is identical to the position
    NoChange,
}

impl Display for InvalidMoveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HeapOutOfRange { heap, heap_count } => {
                write!(f, "heap {heap} does not exist, there are {heap_count} heaps")
            }
            Self::ZeroRemoval { heap } => {
                write!(f, "must remove at least one object from heap {heap}")
            }
            Self::RemovalExceedsHeap {
                heap,
                count,
                available,
            } => write!(
                f,
                "cannot remove {count} objects from heap {heap} holding {available}"
            ),
            Self::ShapeMismatch { expected, found } => {
                write!(f, "expected {expected} heaps in target, found {found}")
            }
            Self::HeapIncreased { heap } => write!(f, "heap {heap} cannot grow"),
            Self::MultipleHeapsChanged => write!(f, "cannot remove objects from different heaps"),
            Self::NoChange => write!(f, "target configuration is the current one"),
        }
    }
}

impl std::error::Error for InvalidMoveError {}
