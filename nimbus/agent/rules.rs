//! Parametric rule-based play.
//!
//! The game is split in three phases:
//! - opening: whole heaps are emptied until `k` heaps hold at most one object,
//! - midgame: the pair of heaps with the biggest (weighted) variance is made equal,
//! - endgame: a fixed fraction of the biggest heap is taken.
//!
//! Nim-sum is never consulted, how well a configuration plays is only known empirically.

use std::{fmt::Display, str::FromStr};

use itertools::Itertools;
use rand::{Rng, rngs::StdRng};

use crate::{
    agent::{Agent, ConfigError},
    nim::nim_game::NimGame,
};

/// Weight applied to pairwise heap variance in midgame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Strategy {
    /// Every pair has weight 1
    #[default]
    Unweighted,

    /// Smaller heap of the pair
    Min,

    /// Bigger heap of the pair
    Max,

    /// Sum of the pair
    Sum,
}

impl Strategy {
    /// Every strategy
    pub const ALL: [Self; 4] = [Self::Unweighted, Self::Min, Self::Max, Self::Sum];

    /// Weight of a pair of heap sizes
    pub fn weight(self, lhs: u32, rhs: u32) -> f64 {
        match self {
            Self::Unweighted => 1.0,
            Self::Min => f64::from(lhs.min(rhs)),
            Self::Max => f64::from(lhs.max(rhs)),
            Self::Sum => f64::from(lhs) + f64::from(rhs),
        }
    }
}

impl Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unweighted => write!(f, "none"),
            Self::Min => write!(f, "min"),
            Self::Max => write!(f, "max"),
            Self::Sum => write!(f, "sum"),
        }
    }
}

impl FromStr for Strategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::Unweighted),
            "min" => Ok(Self::Min),
            "max" => Ok(Self::Max),
            "sum" => Ok(Self::Sum),
            _ => Err(ConfigError::UnknownStrategy(s.to_owned())),
        }
    }
}

/// Parameters of [`RuleAgent`]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RulesConfig {
    /// Number of heaps with at most one object that ends the opening.
    /// `None` means one less than the number of heaps in the position.
    pub k: Option<usize>,

    /// Probability of emptying the biggest heap rather than the smallest one in opening
    pub alpha: f64,

    /// Fraction of the biggest heap taken in endgame
    pub endgame_nim: f64,

    /// Pairwise variance weighting in midgame
    pub strategy: Strategy,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            k: None,
            alpha: 0.9,
            endgame_nim: 0.6,
            strategy: Strategy::Unweighted,
        }
    }
}

impl RulesConfig {
    /// Create new validated configuration
    ///
    /// # Errors
    /// - When `alpha` is not in `[0, 1]` or `endgame_nim` is not in `(0, 1]`
    pub fn new(
        k: Option<usize>,
        alpha: f64,
        endgame_nim: f64,
        strategy: Strategy,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            k,
            alpha,
            endgame_nim,
            strategy,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that every parameter is in its domain
    ///
    /// # Errors
    /// - When `alpha` is not in `[0, 1]` or `endgame_nim` is not in `(0, 1]`
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(ConfigError::AlphaOutOfRange(self.alpha));
        }
        if !(self.endgame_nim > 0.0 && self.endgame_nim <= 1.0) {
            return Err(ConfigError::EndgameNimOutOfRange(self.endgame_nim));
        }
        Ok(())
    }
}

/// Phase of the game as seen by [`RuleAgent`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Emptying whole heaps
    Opening,

    /// Equalizing pairs of heaps
    Midgame,

    /// At most one heap holds more than one object
    Endgame,
}

/// Agent following [`RulesConfig`]
#[derive(Debug, Clone)]
pub struct RuleAgent<R = StdRng> {
    config: RulesConfig,
    rng: R,
}

impl<R> RuleAgent<R>
where
    R: Rng,
{
    /// Create new agent drawing opening coin flips from `rng`
    ///
    /// # Errors
    /// - When `config` is invalid
    pub fn new(config: RulesConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, rng })
    }

    /// Get the configuration
    #[inline]
    pub const fn config(&self) -> &RulesConfig {
        &self.config
    }

    /// Phase the agent plays `game` in
    pub fn phase<G>(&self, game: &G) -> Phase
    where
        G: NimGame,
    {
        if game.is_endgame() {
            return Phase::Endgame;
        }

        let k = self
            .config
            .k
            .unwrap_or_else(|| game.heap_count().saturating_sub(1));
        let nearly_empty = game.heaps().iter().filter(|&&heap| heap <= 1).count();
        if nearly_empty < k {
            Phase::Opening
        } else {
            Phase::Midgame
        }
    }

    fn opening<G>(&mut self, game: &G) -> Option<G>
    where
        G: NimGame,
    {
        let heap = if self.rng.random_bool(self.config.alpha) {
            game.biggest_heap_index()?
        } else {
            // Emptying an empty heap is not a move
            game.heaps()
                .iter()
                .enumerate()
                .filter(|(_, heap)| **heap > 0)
                .min_by_key(|(_, heap)| **heap)
                .map(|(idx, _)| idx)?
        };
        Some(game.with_heap(heap, 0))
    }

    /// Pair of heaps `(low, high)` as `(index, value)` with the biggest weighted variance
    fn max_variance_pair(
        heaps: &[u32],
        strategy: Strategy,
    ) -> Option<((usize, u32), (usize, u32))> {
        let populated = heaps
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, heap)| *heap > 0)
            .collect::<Vec<_>>();

        match populated.as_slice() {
            [] => None,
            [single] => {
                let empty = heaps.iter().position(|&heap| heap == 0)?;
                Some(((empty, 0), *single))
            }
            [first, second, ..] if populated.iter().map(|(_, heap)| heap).all_equal() => {
                Some((*first, *second))
            }
            _ => {
                let mut best: Option<(f64, (usize, u32), (usize, u32))> = None;
                for (lhs, rhs) in populated.iter().copied().tuple_combinations() {
                    let mean = (f64::from(lhs.1) + f64::from(rhs.1)) / 2.0;
                    let variance =
                        (f64::from(lhs.1) - mean).powi(2) + (f64::from(rhs.1) - mean).powi(2);
                    let weighted = strategy.weight(lhs.1, rhs.1) * variance;
                    if best.is_none_or(|(best, _, _)| weighted > best) {
                        best = Some((weighted, lhs, rhs));
                    }
                }
                best.map(|(_, lhs, rhs)| if lhs.1 <= rhs.1 { (lhs, rhs) } else { (rhs, lhs) })
            }
        }
    }

    fn midgame<G>(game: &G, strategy: Strategy) -> Option<G>
    where
        G: NimGame,
    {
        let ((_, low), (high_idx, high)) = Self::max_variance_pair(game.heaps(), strategy)?;
        // Never empty the bigger heap unless the smaller one is already empty
        Some(game.with_heap(high_idx, low.max(1).min(high - 1)))
    }

    fn endgame<G>(game: &G, endgame_nim: f64) -> Option<G>
    where
        G: NimGame,
    {
        let biggest = game.biggest_heap_index()?;
        let objects = game.heaps()[biggest];
        if objects == 0 {
            return None;
        }
        let to_take = ((endgame_nim * f64::from(objects)).ceil() as u32).clamp(1, objects);
        Some(game.with_heap(biggest, objects - to_take))
    }
}

impl<G, R> Agent<G> for RuleAgent<R>
where
    G: NimGame,
    R: Rng,
{
    fn name(&self) -> &'static str {
        "rules"
    }

    fn best_move(&mut self, game: &G) -> Option<G> {
        if game.is_terminal() {
            return None;
        }

        match self.phase(game) {
            Phase::Opening => self.opening(game),
            Phase::Midgame => Self::midgame(game, self.config.strategy)
                .or_else(|| Self::endgame(game, self.config.endgame_nim)),
            Phase::Endgame => Self::endgame(game, self.config.endgame_nim),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nim::{heaps::Heaps, moves::Move};
    use quickcheck::QuickCheck;
    use rand::SeedableRng;

    fn agent(config: RulesConfig) -> RuleAgent {
        RuleAgent::new(config, StdRng::seed_from_u64(0)).unwrap()
    }

    fn midgame_config(strategy: Strategy) -> RulesConfig {
        RulesConfig {
            k: Some(0),
            strategy,
            ..RulesConfig::default()
        }
    }

    fn best(agent: &mut RuleAgent, heaps: &[u32]) -> Option<Heaps> {
        agent.best_move(&Heaps::new(heaps.to_vec()))
    }

    #[test]
    fn invalid_config_is_rejected() {
        let err = RulesConfig::new(None, 1.5, 0.6, Strategy::Sum).unwrap_err();
        assert_eq!(err, ConfigError::AlphaOutOfRange(1.5));

        let err = RulesConfig::new(None, 0.5, 0.0, Strategy::Sum).unwrap_err();
        assert_eq!(err, ConfigError::EndgameNimOutOfRange(0.0));

        let config = RulesConfig {
            alpha: -0.1,
            ..RulesConfig::default()
        };
        assert!(RuleAgent::new(config, StdRng::seed_from_u64(0)).is_err());

        assert_eq!(
            "avg".parse::<Strategy>(),
            Err(ConfigError::UnknownStrategy("avg".to_owned()))
        );
        for strategy in Strategy::ALL {
            assert_eq!(strategy.to_string().parse::<Strategy>(), Ok(strategy));
        }
    }

    #[test]
    fn phases() {
        let agent = agent(RulesConfig::default());
        assert_eq!(agent.phase(&Heaps::new(vec![1, 3, 5, 7])), Phase::Opening);
        assert_eq!(agent.phase(&Heaps::new(vec![0, 1, 5, 7])), Phase::Opening);
        assert_eq!(agent.phase(&Heaps::new(vec![0, 1, 1, 5])), Phase::Endgame);

        let agent = agent_with_k(1);
        assert_eq!(agent.phase(&Heaps::new(vec![1, 3, 5, 7])), Phase::Midgame);
        assert_eq!(agent.phase(&Heaps::new(vec![2, 3, 5, 7])), Phase::Opening);
    }

    fn agent_with_k(k: usize) -> RuleAgent {
        agent(RulesConfig {
            k: Some(k),
            ..RulesConfig::default()
        })
    }

    #[test]
    fn opening_empties_extreme_heaps() {
        let mut biggest = agent(RulesConfig {
            alpha: 1.0,
            ..RulesConfig::default()
        });
        assert_eq!(
            best(&mut biggest, &[2, 7, 3, 7]),
            Some(Heaps::new(vec![2, 0, 3, 7]))
        );

        let mut smallest = agent(RulesConfig {
            alpha: 0.0,
            ..RulesConfig::default()
        });
        assert_eq!(
            best(&mut smallest, &[0, 7, 3, 4]),
            Some(Heaps::new(vec![0, 7, 0, 4]))
        );
    }

    #[test]
    fn midgame_equalizes_widest_pair() {
        let mut unweighted = agent(midgame_config(Strategy::Unweighted));
        assert_eq!(
            best(&mut unweighted, &[2, 3, 9, 10]),
            Some(Heaps::new(vec![2, 3, 9, 2]))
        );

        let mut min = agent(midgame_config(Strategy::Min));
        assert_eq!(
            best(&mut min, &[2, 3, 9, 10]),
            Some(Heaps::new(vec![2, 3, 9, 3]))
        );
    }

    #[test]
    fn midgame_degenerate_pairs() {
        let mut agent = agent(midgame_config(Strategy::Sum));
        assert_eq!(
            best(&mut agent, &[0, 4, 4, 4]),
            Some(Heaps::new(vec![0, 4, 3, 4]))
        );
        assert_eq!(
            RuleAgent::<StdRng>::max_variance_pair(&[0, 6, 0], Strategy::Unweighted),
            Some(((0, 0), (1, 6)))
        );
    }

    #[test]
    fn endgame_takes_fraction_of_biggest() {
        let mut agent = agent(RulesConfig {
            endgame_nim: 0.5,
            ..RulesConfig::default()
        });
        assert_eq!(best(&mut agent, &[0, 1, 5]), Some(Heaps::new(vec![0, 1, 2])));
        assert_eq!(best(&mut agent, &[1, 1]), Some(Heaps::new(vec![0, 1])));
        assert_eq!(best(&mut agent, &[0, 0]), None);
    }

    #[test]
    fn moves_are_legal() {
        let test = |heaps: Heaps, seed: u64| {
            for strategy in Strategy::ALL {
                let config = RulesConfig {
                    alpha: 0.5,
                    strategy,
                    ..RulesConfig::default()
                };
                let mut agent = RuleAgent::new(config, StdRng::seed_from_u64(seed)).unwrap();
                match agent.best_move(&heaps) {
                    Some(next) => {
                        assert!(heaps.apply_move(&Move::Target(next.into_inner())).is_ok());
                    }
                    None => assert!(heaps.is_terminal()),
                }
            }
        };
        QuickCheck::new().quickcheck(test as fn(Heaps, u64));
    }

    #[test]
    fn same_seed_same_moves() {
        let heaps = Heaps::new(vec![5, 6, 7, 8]);
        let config = RulesConfig {
            alpha: 0.5,
            ..RulesConfig::default()
        };
        let mut lhs = RuleAgent::new(config, StdRng::seed_from_u64(7)).unwrap();
        let mut rhs = RuleAgent::new(config, StdRng::seed_from_u64(7)).unwrap();
        for _ in 0..16 {
            assert_eq!(lhs.best_move(&heaps), rhs.best_move(&heaps));
        }
    }
}
