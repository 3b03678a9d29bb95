//! Concrete heap configuration and its canonical signature

use std::fmt::Display;

use crate::{display, nim::nim_game::NimGame};

/// Ordered heap configuration, index is the heap identity
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Heaps {
    heaps: Vec<u32>,
}

impl Heaps {
    /// Create new position from heap values
    #[inline]
    pub const fn new(heaps: Vec<u32>) -> Self {
        Self { heaps }
    }

    /// Classic starting position with `rows` heaps holding 1, 3, 5, ... objects
    pub fn odd_rows(rows: u32) -> Self {
        Self::new((0..rows).map(|row| row * 2 + 1).collect())
    }

    /// Get number of objects in heap at `index`
    #[inline]
    pub fn heap(&self, index: usize) -> Option<u32> {
        self.heaps.get(index).copied()
    }

    /// Consume position and return heap values
    #[inline]
    pub fn into_inner(self) -> Vec<u32> {
        self.heaps
    }
}

impl NimGame for Heaps {
    #[inline]
    fn heaps(&self) -> &[u32] {
        &self.heaps
    }

    #[inline]
    fn from_heaps(heaps: Vec<u32>) -> Self {
        Self::new(heaps)
    }
}

impl From<Vec<u32>> for Heaps {
    fn from(heaps: Vec<u32>) -> Self {
        Self::new(heaps)
    }
}

impl Display for Heaps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        display::brackets(f, |f| display::commas(f, &self.heaps))
    }
}

/// Heap values sorted ascending.
///
/// Positions that differ only by heap order share a signature, so it is used as the key of
/// every cache and learned table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Signature(Box<[u32]>);

impl Signature {
    /// Compute signature of given heap values
    pub fn new(heaps: &[u32]) -> Self {
        let mut sorted: Box<[u32]> = heaps.into();
        sorted.sort_unstable();
        Self(sorted)
    }

    /// Sorted heap values
    #[inline]
    pub const fn as_slice(&self) -> &[u32] {
        &self.0
    }
}

impl Display for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        display::brackets(f, |f| display::commas(f, &self.0))
    }
}

#[cfg(any(test, feature = "quickcheck"))]
impl quickcheck::Arbitrary for Heaps {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        use quickcheck::Arbitrary;

        let heap_count = usize::arbitrary(g) % 4 + 1;
        Self::new(
            (0..heap_count)
                .map(|_| u32::arbitrary(g) % (g.size() as u32).clamp(1, 8))
                .collect(),
        )
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        use quickcheck::Arbitrary;

        Box::new(
            self.heaps
                .shrink()
                .filter(|heaps| !heaps.is_empty())
                .map(Self::new),
        )
    }
}
