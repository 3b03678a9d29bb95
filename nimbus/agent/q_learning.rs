//! Tabular Q-learning trained by self-play.
//!
//! States and actions are both [`Signature`]s: an action is identified by the position it
//! leads to. Value propagates backward one half-move at a time, the previous move of a player
//! is updated once the opponent has answered it.

use std::{collections::HashMap, ops::RangeInclusive};

use rand::{Rng, rngs::StdRng, seq::IndexedRandom};

use crate::{
    agent::{Agent, ConfigError},
    arena::random_heaps,
    nim::{heaps::Signature, nim_game::NimGame},
};

/// Learning parameters of [`QLearningAgent`]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QLearningConfig {
    /// Step size of the bootstrapped update
    pub learning_rate: f64,

    /// Probability of a random move when exploring
    pub epsilon: f64,
}

impl Default for QLearningConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.5,
            epsilon: 0.2,
        }
    }
}

impl QLearningConfig {
    /// Create new validated configuration
    ///
    /// # Errors
    /// - When `learning_rate` is not in `(0, 1]` or `epsilon` is not in `[0, 1]`
    pub fn new(learning_rate: f64, epsilon: f64) -> Result<Self, ConfigError> {
        let config = Self {
            learning_rate,
            epsilon,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that every parameter is in its domain
    ///
    /// # Errors
    /// - When `learning_rate` is not in `(0, 1]` or `epsilon` is not in `[0, 1]`
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(ConfigError::LearningRateOutOfRange(self.learning_rate));
        }
        if !(0.0..=1.0).contains(&self.epsilon) {
            return Err(ConfigError::EpsilonOutOfRange(self.epsilon));
        }
        Ok(())
    }
}

/// Self-play episodes to train on
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrainingSchedule {
    iterations: usize,
    heap_count: usize,
    heap_values: RangeInclusive<u32>,
}

impl TrainingSchedule {
    /// Play `iterations` episodes, each starting from `heap_count` heaps with sizes drawn
    /// uniformly from `heap_values`
    ///
    /// # Errors
    /// - When there are no heaps or the range of heap sizes is empty
    pub fn new(
        iterations: usize,
        heap_count: usize,
        heap_values: RangeInclusive<u32>,
    ) -> Result<Self, ConfigError> {
        if heap_count == 0 {
            return Err(ConfigError::NoHeaps);
        }
        if heap_values.is_empty() {
            return Err(ConfigError::EmptyHeapRange {
                start: *heap_values.start(),
                end: *heap_values.end(),
            });
        }
        Ok(Self {
            iterations,
            heap_count,
            heap_values,
        })
    }

    /// Heap sizes up to the last row of the classic position with `heap_count` rows
    ///
    /// # Errors
    /// - When `heap_count` is zero
    pub fn for_heap_count(iterations: usize, heap_count: usize) -> Result<Self, ConfigError> {
        let biggest = (heap_count.saturating_sub(1) * 2 + 1) as u32;
        Self::new(iterations, heap_count, 1..=biggest)
    }

    /// Number of episodes
    #[inline]
    pub const fn iterations(&self) -> usize {
        self.iterations
    }

    /// Number of heaps in every episode
    #[inline]
    pub const fn heap_count(&self) -> usize {
        self.heap_count
    }

    /// Range of starting heap sizes
    #[inline]
    pub const fn heap_values(&self) -> &RangeInclusive<u32> {
        &self.heap_values
    }
}

/// Learned values of `(state, action)` pairs, absent pairs are worth 0
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QTable {
    values: HashMap<(Signature, Signature), f64, ahash::RandomState>,
}

impl QTable {
    /// Create new empty table
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of moving from `state` to `action`
    pub fn get(&self, state: Signature, action: Signature) -> f64 {
        self.values.get(&(state, action)).copied().unwrap_or(0.0)
    }

    /// Get number of observed transitions
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if any transition was observed
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over observed transitions
    pub fn iter(&self) -> impl Iterator<Item = (&(Signature, Signature), &f64)> {
        self.values.iter()
    }
}

/// Agent playing greedily with respect to its [`QTable`]
#[derive(Debug, Clone)]
pub struct QLearningAgent<R = StdRng> {
    table: QTable,
    config: QLearningConfig,
    rng: R,
}

/// Last move made by a player during an episode
struct LastMove<G> {
    state: G,
    action: G,
}

impl<R> QLearningAgent<R>
where
    R: Rng,
{
    /// Create new agent with an empty table, drawing exploration moves from `rng`
    ///
    /// # Errors
    /// - When `config` is invalid
    pub fn new(config: QLearningConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            table: QTable::new(),
            config,
            rng,
        })
    }

    /// Get the configuration
    #[inline]
    pub const fn config(&self) -> &QLearningConfig {
        &self.config
    }

    /// Get the learned table
    #[inline]
    pub const fn table(&self) -> &QTable {
        &self.table
    }

    /// Forget everything learned
    pub fn reset(&mut self) {
        self.table = QTable::new();
    }

    /// Learned value of moving from `state` to `action`, 0 if never observed
    pub fn get_value<G>(&self, state: &G, action: &G) -> f64
    where
        G: NimGame,
    {
        self.table.get(state.signature(), action.signature())
    }

    /// Update the value of moving from `old_state` to `new_state`.
    ///
    /// First observation of a transition stores `reward` as is. Later observations move the
    /// value towards `reward` plus the best value available from `next_action`, the position
    /// the player faces after the opponent's answer (`None` when the game ended).
    pub fn update<G>(&mut self, old_state: &G, new_state: &G, reward: f64, next_action: Option<&G>)
    where
        G: NimGame,
    {
        let key = (old_state.signature(), new_state.signature());
        let Some(&old_value) = self.table.values.get(&key) else {
            self.table.values.insert(key, reward);
            return;
        };

        let best_future = next_action.map_or(0.0, |next| {
            next.legal_successors()
                .iter()
                .map(|action| self.get_value(next, action))
                .reduce(f64::max)
                .unwrap_or(0.0)
        });
        let value =
            old_value + self.config.learning_rate * ((reward + best_future) - old_value);
        self.table.values.insert(key, value);
    }

    /// Choose the next position from `state`.
    ///
    /// When `explore` is set a uniformly random move is made with probability `epsilon`,
    /// otherwise the move with the highest value is made, first one on ties.
    pub fn select_move<G>(&mut self, state: &G, explore: bool) -> Option<G>
    where
        G: NimGame,
    {
        let successors = state.legal_successors();
        if explore && self.rng.random::<f64>() < self.config.epsilon {
            return successors.choose(&mut self.rng).cloned();
        }

        let mut best: Option<(f64, G)> = None;
        for successor in successors {
            let value = self.get_value(state, &successor);
            if best.as_ref().is_none_or(|(best, _)| value > *best) {
                best = Some((value, successor));
            }
        }
        best.map(|(_, successor)| successor)
    }

    /// Continue training with self-play episodes of `schedule`
    pub fn train(&mut self, schedule: &TrainingSchedule) {
        log::debug!(
            "Training on {} episodes with {} heaps of {:?} objects",
            schedule.iterations,
            schedule.heap_count,
            schedule.heap_values
        );

        let report_every = (schedule.iterations / 10).max(1);
        for episode in 0..schedule.iterations {
            let start = random_heaps(
                &mut self.rng,
                schedule.heap_count,
                schedule.heap_values.clone(),
            );
            self.play_episode(start);

            if (episode + 1) % report_every == 0 {
                log::debug!(
                    "Finished {}/{} episodes, {} transitions learned",
                    episode + 1,
                    schedule.iterations,
                    self.table.len()
                );
            }
        }
    }

    fn play_episode<G>(&mut self, mut game: G)
    where
        G: NimGame,
    {
        let mut last_moves: [Option<LastMove<G>>; 2] = [None, None];
        let mut turn = 0;

        while let Some(next) = self.select_move(&game, true) {
            let state = std::mem::replace(&mut game, next.clone());
            last_moves[turn] = Some(LastMove {
                state: state.clone(),
                action: next.clone(),
            });
            turn = 1 - turn;

            if game.is_terminal() {
                if let Some(loser) = &last_moves[turn] {
                    self.update(&loser.state, &loser.action, -1.0, None);
                }
                self.update(&state, &next, 1.0, None);
                break;
            }

            if let (Some(previous), Some(answer)) = (&last_moves[turn], &last_moves[1 - turn]) {
                self.update(&previous.state, &previous.action, 0.0, Some(&answer.action));
            }
        }
    }
}

impl<G, R> Agent<G> for QLearningAgent<R>
where
    G: NimGame,
    R: Rng,
{
    fn name(&self) -> &'static str {
        "q-learning"
    }

    fn best_move(&mut self, game: &G) -> Option<G> {
        self.select_move(game, false)
    }
}

/// Train a new agent with `config` on `schedule`.
///
/// The result depends only on the arguments and the state of `rng`.
///
/// # Errors
/// - When `config` is invalid
pub fn train<R>(
    schedule: &TrainingSchedule,
    config: QLearningConfig,
    rng: R,
) -> Result<QLearningAgent<R>, ConfigError>
where
    R: Rng,
{
    let mut agent = QLearningAgent::new(config, rng)?;
    agent.train(schedule);
    Ok(agent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nim::heaps::Heaps;
    use rand::SeedableRng;

    fn agent(epsilon: f64) -> QLearningAgent {
        QLearningAgent::new(
            QLearningConfig::new(0.5, epsilon).unwrap(),
            StdRng::seed_from_u64(0),
        )
        .unwrap()
    }

    fn heaps(heaps: &[u32]) -> Heaps {
        Heaps::new(heaps.to_vec())
    }

    #[test]
    fn invalid_config_is_rejected() {
        assert_eq!(
            QLearningConfig::new(0.0, 0.2),
            Err(ConfigError::LearningRateOutOfRange(0.0))
        );
        assert_eq!(
            QLearningConfig::new(0.5, 1.2),
            Err(ConfigError::EpsilonOutOfRange(1.2))
        );
        assert_eq!(TrainingSchedule::new(10, 0, 1..=3), Err(ConfigError::NoHeaps));
        assert_eq!(
            TrainingSchedule::new(10, 2, 4..=3),
            Err(ConfigError::EmptyHeapRange { start: 4, end: 3 })
        );
        assert_eq!(
            TrainingSchedule::for_heap_count(10, 4).unwrap().heap_values(),
            &(1..=7)
        );
    }

    #[test]
    fn first_update_stores_reward() {
        let mut agent = agent(0.2);
        let (state, action) = (heaps(&[1, 2]), heaps(&[1, 1]));
        assert_eq!(agent.get_value(&state, &action), 0.0);

        agent.update(&state, &action, 1.0, None);
        assert_eq!(agent.get_value(&state, &action), 1.0);

        agent.update(&state, &action, -1.0, None);
        assert_eq!(agent.get_value(&state, &action), 0.0);
    }

    #[test]
    fn update_bootstraps_from_next_position() {
        let mut agent = agent(0.2);
        let (state, action) = (heaps(&[2, 3]), heaps(&[2, 2]));
        let next = heaps(&[1, 2]);
        agent.update(&next, &heaps(&[1, 1]), 1.0, None);

        agent.update(&state, &action, 0.0, Some(&next));
        assert_eq!(agent.get_value(&state, &action), 0.0);

        // 0 + 0.5 * ((0 + 1) - 0)
        agent.update(&state, &action, 0.0, Some(&next));
        assert_eq!(agent.get_value(&state, &action), 0.5);
    }

    #[test]
    fn values_are_shared_between_permutations() {
        let mut agent = agent(0.2);
        agent.update(&heaps(&[3, 1]), &heaps(&[1, 1]), 1.0, None);
        assert_eq!(agent.get_value(&heaps(&[1, 3]), &heaps(&[1, 1])), 1.0);
        assert_eq!(agent.table().len(), 1);
    }

    #[test]
    fn exploitation_picks_best_then_first() {
        let mut agent = agent(1.0);
        let state = heaps(&[1, 3]);
        assert_eq!(agent.select_move(&state, false), Some(heaps(&[0, 3])));

        agent.update(&state, &heaps(&[1, 1]), 1.0, None);
        assert_eq!(agent.select_move(&state, false), Some(heaps(&[1, 1])));
        assert_eq!(agent.best_move(&state), Some(heaps(&[1, 1])));
        assert_eq!(agent.select_move(&heaps(&[0, 0]), true), None);
    }

    #[test]
    fn exploration_stays_legal() {
        let mut agent = agent(1.0);
        let state = heaps(&[2, 3, 4]);
        let successors = state.legal_successors();
        for _ in 0..32 {
            let next = agent.select_move(&state, true).unwrap();
            assert!(successors.contains(&next));
        }
    }

    #[test]
    fn training_is_reproducible() {
        let schedule = TrainingSchedule::new(200, 3, 1..=4).unwrap();
        let lhs = train(&schedule, QLearningConfig::default(), StdRng::seed_from_u64(11)).unwrap();
        let rhs = train(&schedule, QLearningConfig::default(), StdRng::seed_from_u64(11)).unwrap();
        assert!(!lhs.table().is_empty());
        assert_eq!(lhs.table(), rhs.table());
    }

    #[test]
    fn winning_moves_are_rewarded() {
        let schedule = TrainingSchedule::new(500, 1, 1..=3).unwrap();
        let mut agent =
            train(&schedule, QLearningConfig::default(), StdRng::seed_from_u64(5)).unwrap();
        for objects in 1..=3 {
            let game = heaps(&[objects]);
            assert_eq!(agent.best_move(&game), Some(heaps(&[0])));
            assert!(agent.get_value(&game, &heaps(&[0])) > 0.0);
        }
    }
}
