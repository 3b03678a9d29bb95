//! Uniformly random opponent

use rand::{Rng, rngs::StdRng, seq::IndexedRandom};

use crate::{agent::Agent, nim::nim_game::NimGame};

/// Agent picking a random non-empty heap and taking a random number of objects from it
#[derive(Debug, Clone)]
pub struct RandomAgent<R = StdRng> {
    rng: R,
}

impl<R> RandomAgent<R>
where
    R: Rng,
{
    /// Create new agent drawing moves from `rng`
    #[inline]
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<G, R> Agent<G> for RandomAgent<R>
where
    G: NimGame,
    R: Rng,
{
    fn name(&self) -> &'static str {
        "random"
    }

    fn best_move(&mut self, game: &G) -> Option<G> {
        let populated = game
            .heaps()
            .iter()
            .enumerate()
            .filter(|(_, heap)| **heap > 0)
            .map(|(idx, _)| idx)
            .collect::<Vec<_>>();
        let heap = *populated.choose(&mut self.rng)?;
        let objects = game.heaps()[heap];
        let to_take = self.rng.random_range(1..=objects);
        Some(game.with_heap(heap, objects - to_take))
    }
}
