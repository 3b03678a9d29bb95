//! Exhaustive game-tree search with alpha-beta pruning and memoization.
//!
//! The cache is keyed by [`Signature`](crate::nim::heaps::Signature), so the explored space is
//! bounded by the number of distinct heap multisets reachable from the root. That is still too
//! large to be practical beyond roughly 15 heaps.

use crate::{
    agent::Agent,
    nim::nim_game::NimGame,
    transposition_table::{MinimaxTable, SearchKey, TranspositionTable},
};

/// Minimax value of a position from the maximizing player's point of view
#[repr(i8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Score {
    /// Maximizing player loses with perfect play
    Loss = -1,

    /// Neither player can force a win
    Draw = 0,

    /// Maximizing player wins with perfect play
    Win = 1,
}

impl Score {
    /// Numeric value, one of -1, 0, 1
    #[inline]
    pub const fn value(self) -> i8 {
        self as i8
    }
}

/// Agent searching the whole game tree
#[derive(Debug, Clone, Default)]
pub struct MinimaxAgent<TT = MinimaxTable> {
    transposition_table: TT,
}

impl MinimaxAgent {
    /// Create new agent with an empty cache
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<TT> MinimaxAgent<TT>
where
    TT: TranspositionTable,
{
    /// Create new agent using given transposition table
    #[inline]
    pub const fn with_transposition_table(transposition_table: TT) -> Self {
        Self {
            transposition_table,
        }
    }

    /// Get the underlying transposition table
    #[inline]
    pub const fn transposition_table(&self) -> &TT {
        &self.transposition_table
    }

    /// Drop every cached value
    #[inline]
    pub fn reset(&mut self) {
        self.transposition_table.clear();
    }

    /// Value of `game` when the maximizing player moves next iff `maximizing`.
    ///
    /// In a terminal position the player to move has already lost, since the opponent took the
    /// last object.
    pub fn minimax<G>(&mut self, game: &G, maximizing: bool) -> Score
    where
        G: NimGame,
    {
        self.transposition_table.ensure_shape(game.heap_count());
        self.search(game, maximizing)
    }

    fn search<G>(&mut self, game: &G, maximizing: bool) -> Score
    where
        G: NimGame,
    {
        let key = SearchKey {
            signature: game.signature(),
            maximizing,
        };
        if let Some(score) = self.transposition_table.lookup_position(&key) {
            return score;
        }

        let score = if game.is_terminal() {
            if maximizing { Score::Loss } else { Score::Win }
        } else {
            // Only the window bound moved by the current player changes, so the cut happens
            // once a child reaches the best value achievable
            let mut alpha = Score::Loss;
            let mut beta = Score::Win;
            for successor in game.legal_successors() {
                let score = self.search(&successor, !maximizing);
                if maximizing {
                    alpha = alpha.max(score);
                } else {
                    beta = beta.min(score);
                }
                if alpha >= beta {
                    break;
                }
            }
            if maximizing { alpha } else { beta }
        };

        self.transposition_table.insert_position(key, score);
        score
    }
}

impl<G, TT> Agent<G> for MinimaxAgent<TT>
where
    G: NimGame,
    TT: TranspositionTable,
{
    fn name(&self) -> &'static str {
        "minimax"
    }

    fn best_move(&mut self, game: &G) -> Option<G> {
        if game.is_terminal() {
            return None;
        }
        self.transposition_table.ensure_shape(game.heap_count());

        // Mover maximizes, so a positive value after the move is a win for the mover
        for successor in game.legal_successors() {
            if self.search(&successor, false).value() > 0 {
                return Some(successor);
            }
        }

        log::debug!("No winning move from {:?}, delaying", game.heaps());
        let biggest = game.biggest_heap_index()?;
        Some(game.with_heap(biggest, game.heaps()[biggest] - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{nim::heaps::Heaps, transposition_table::NoTranspositionTable};
    use itertools::Itertools;

    #[test]
    fn terminal_position_is_lost_for_player_to_move() {
        let mut agent = MinimaxAgent::new();
        let empty = Heaps::new(vec![0, 0, 0]);
        assert_eq!(agent.minimax(&empty, true), Score::Loss);
        assert_eq!(agent.minimax(&empty, false), Score::Win);
        assert_eq!(agent.best_move(&empty), None);
    }

    #[test]
    fn known_values() {
        let mut agent = MinimaxAgent::new();
        assert_eq!(agent.minimax(&Heaps::new(vec![3, 4, 5]), true), Score::Win);
        assert_eq!(agent.minimax(&Heaps::new(vec![1, 2, 3]), true), Score::Loss);
        assert_eq!(agent.minimax(&Heaps::new(vec![1, 2, 3]), false), Score::Win);
        assert_eq!(agent.minimax(&Heaps::new(vec![0, 0, 1]), true), Score::Win);
    }

    #[test]
    fn winning_move_zeroes_nim_sum() {
        let mut agent = MinimaxAgent::new();
        let next = agent.best_move(&Heaps::new(vec![3, 4, 5])).unwrap();
        assert!(next.nim_sum().is_zero());
        assert_eq!(next, Heaps::new(vec![1, 4, 5]));
    }

    #[test]
    fn lost_position_delays() {
        let mut agent = MinimaxAgent::new();
        assert_eq!(
            agent.best_move(&Heaps::new(vec![1, 2, 3])),
            Some(Heaps::new(vec![1, 2, 2]))
        );
    }

    #[test]
    fn cache_agrees_with_plain_search() {
        let mut cached = MinimaxAgent::new();
        let mut plain = MinimaxAgent::with_transposition_table(NoTranspositionTable);
        for heaps in (0..3).map(|_| 0..=3u32).multi_cartesian_product() {
            let heaps = Heaps::new(heaps);
            for maximizing in [true, false] {
                assert_eq!(
                    cached.minimax(&heaps, maximizing),
                    plain.minimax(&heaps, maximizing),
                    "{heaps}"
                );
            }
        }
        assert!(!cached.transposition_table().is_empty());
    }

    #[test]
    fn shape_change_and_reset_clear_cache() {
        let mut agent = MinimaxAgent::new();
        agent.minimax(&Heaps::new(vec![2, 3]), true);
        let two_heaps = agent.transposition_table().len();
        assert!(two_heaps > 0);

        agent.minimax(&Heaps::new(vec![1, 1, 1]), true);
        assert_eq!(agent.transposition_table().heap_count(), Some(3));
        assert!(agent.transposition_table().len() <= 4 * 2);

        agent.reset();
        assert!(agent.transposition_table().is_empty());
    }
}
