//! Optimal play based on nim-sum.
//!
//! Moving to a position with zero nim-sum wins against any opponent.
//! See <https://en.wikipedia.org/wiki/Nim#Mathematical_theory>

use crate::{agent::Agent, nim::nim_game::NimGame};

/// Agent playing the closed-form optimal strategy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NimSumAgent;

impl NimSumAgent {
    /// Create new agent
    #[inline]
    pub const fn new() -> Self {
        Self
    }

    /// Heap and number of objects to take in endgame.
    ///
    /// Only the biggest heap can hold more than one object, so the move decides the parity of
    /// the single-object heaps left to the opponent: empty the biggest heap when the rest is
    /// even, otherwise leave one object in it.
    pub fn endgame_move<G>(game: &G) -> Option<(usize, u32)>
    where
        G: NimGame,
    {
        let biggest = game.biggest_heap_index()?;
        let biggest_value = game.heaps()[biggest];
        if biggest_value == 0 {
            return None;
        }

        let rest = game.total_objects() - u64::from(biggest_value);
        if rest % 2 == 0 || biggest_value == 1 {
            Some((biggest, biggest_value))
        } else {
            Some((biggest, biggest_value - 1))
        }
    }

    /// Heap and number of objects to take outside of endgame.
    ///
    /// With non-zero nim-sum `s` every heap `h` with `h ^ s < h` can be reduced to `h ^ s`,
    /// the heap where this removes the most objects is picked. With zero nim-sum the position
    /// is lost against a perfect opponent and one object is taken from the biggest heap to
    /// make the game last.
    pub fn nim_sum_move<G>(game: &G) -> Option<(usize, u32)>
    where
        G: NimGame,
    {
        let nim_sum = game.nim_sum().value();
        let biggest = game.biggest_heap_index()?;
        if game.heaps()[biggest] == 0 {
            return None;
        }

        if nim_sum == 0 {
            return Some((biggest, 1));
        }

        let (heap, difference) = game
            .heaps()
            .iter()
            .map(|&heap| i64::from(heap) - i64::from(heap ^ nim_sum))
            .enumerate()
            .rev()
            .max_by_key(|(_, difference)| *difference)?;
        Some((heap, difference as u32))
    }
}

impl<G> Agent<G> for NimSumAgent
where
    G: NimGame,
{
    fn name(&self) -> &'static str {
        "nim-sum"
    }

    fn best_move(&mut self, game: &G) -> Option<G> {
        let (heap, count) = if game.is_endgame() {
            Self::endgame_move(game)?
        } else {
            Self::nim_sum_move(game)?
        };
        Some(game.with_heap(heap, game.heaps()[heap] - count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nim::{heaps::Heaps, moves::Move};
    use itertools::Itertools;
    use quickcheck::QuickCheck;

    fn best(heaps: &[u32]) -> Option<Heaps> {
        NimSumAgent::new().best_move(&Heaps::new(heaps.to_vec()))
    }

    #[test]
    fn reduces_first_heap() {
        assert_eq!(best(&[3, 4, 5]), Some(Heaps::new(vec![1, 4, 5])));
        assert_eq!(
            NimSumAgent::nim_sum_move(&Heaps::new(vec![3, 4, 5])),
            Some((0, 2))
        );
    }

    #[test]
    fn lost_position_takes_one_from_biggest() {
        assert_eq!(best(&[2, 5, 7]), Some(Heaps::new(vec![2, 5, 6])));
        assert_eq!(best(&[3, 3, 2, 2]), Some(Heaps::new(vec![2, 3, 2, 2])));
    }

    #[test]
    fn endgame_parity() {
        assert_eq!(best(&[0, 0, 5]), Some(Heaps::new(vec![0, 0, 0])));
        assert_eq!(best(&[3, 1]), Some(Heaps::new(vec![1, 1])));
        assert_eq!(best(&[1, 3, 1]), Some(Heaps::new(vec![1, 0, 1])));
        assert_eq!(best(&[1, 1, 1]), Some(Heaps::new(vec![0, 1, 1])));
        assert_eq!(best(&[0, 0]), None);
    }

    #[test]
    fn winning_moves_zero_nim_sum() {
        let test = |heaps: Heaps| {
            if heaps.nim_sum().is_zero() {
                return;
            }
            let next = NimSumAgent::new().best_move(&heaps).unwrap();
            assert!(heaps.apply_move(&Move::Target(next.heaps().to_vec())).is_ok());
            assert!(next.nim_sum().is_zero(), "{heaps} -> {next}");
        };
        QuickCheck::new().quickcheck(test as fn(Heaps));
    }

    #[test]
    fn endgame_rule_wins_every_winning_endgame() {
        // Several single-object heaps next to one bigger heap
        for heaps in (0..5).map(|_| 0..=1u32).multi_cartesian_product() {
            for big in 0..6 {
                let mut heaps = heaps.clone();
                heaps.push(big);
                let heaps = Heaps::new(heaps);
                if heaps.nim_sum().is_zero() {
                    continue;
                }
                let next = NimSumAgent::new().best_move(&heaps).unwrap();
                assert!(next.nim_sum().is_zero(), "{heaps} -> {next}");
            }
        }
    }
}
