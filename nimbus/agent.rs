//! Decision agents sharing a single move-proposal contract

use std::{fmt::Display, str::FromStr};

use crate::nim::{
    heaps::Heaps,
    moves::{InvalidMoveError, Move},
    nim_game::NimGame,
    turn::GameTurnTracker,
};

pub mod minimax;
pub mod nim_sum;
pub mod q_learning;
pub mod random;
pub mod rules;

/// How [`Agent::propose_move`] treats the proposed move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mode {
    /// Return the resulting position, leave the match untouched
    #[default]
    Query,

    /// Play the move in the match and pass the turn
    Apply,
}

/// Strategy choosing a move in a Nim position
pub trait Agent<G = Heaps>
where
    G: NimGame,
{
    /// Human readable name of the agent
    fn name(&self) -> &'static str;

    /// Position the agent wants to move to, `None` if there are no moves left
    fn best_move(&mut self, game: &G) -> Option<G>;

    /// Propose a move in a live match.
    ///
    /// In [`Mode::Query`] the proposed position is returned and `tracker` is not modified. In
    /// [`Mode::Apply`] the move is played and `None` is returned.
    ///
    /// # Errors
    /// - When the agent proposes an illegal move
    fn propose_move(
        &mut self,
        tracker: &mut GameTurnTracker<G>,
        mode: Mode,
    ) -> Result<Option<G>, InvalidMoveError> {
        let Some(target) = self.best_move(tracker.game()) else {
            return Ok(None);
        };
        match mode {
            Mode::Query => Ok(Some(target)),
            Mode::Apply => {
                tracker.play(&Move::Target(target.heaps().to_vec()))?;
                Ok(None)
            }
        }
    }
}

impl<G, A> Agent<G> for Box<A>
where
    G: NimGame,
    A: Agent<G> + ?Sized,
{
    #[inline]
    fn name(&self) -> &'static str {
        (**self).name()
    }

    #[inline]
    fn best_move(&mut self, game: &G) -> Option<G> {
        (**self).best_move(game)
    }
}

/// Identifier of an agent implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AgentKind {
    /// [`nim_sum::NimSumAgent`]
    NimSum,

    /// [`minimax::MinimaxAgent`]
    Minimax,

    /// [`rules::RuleAgent`]
    Rules,

    /// [`q_learning::QLearningAgent`]
    QLearning,

    /// [`random::RandomAgent`]
    Random,
}

impl AgentKind {
    /// Every agent kind
    pub const ALL: [Self; 5] = [
        Self::NimSum,
        Self::Minimax,
        Self::Rules,
        Self::QLearning,
        Self::Random,
    ];

    /// Canonical identifier
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NimSum => "nim-sum",
            Self::Minimax => "minimax",
            Self::Rules => "rules",
            Self::QLearning => "q-learning",
            Self::Random => "random",
        }
    }
}

impl Display for AgentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AgentKind {
    type Err = UnsupportedAgentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nim-sum" | "nim_sum" | "omni" => Ok(Self::NimSum),
            "minimax" | "minmax" => Ok(Self::Minimax),
            "rules" => Ok(Self::Rules),
            "q-learning" | "q_learning" | "rl" => Ok(Self::QLearning),
            "random" => Ok(Self::Random),
            _ => Err(UnsupportedAgentError(s.to_owned())),
        }
    }
}

/// Requested agent identifier is not known
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnsupportedAgentError(pub String);

impl Display for UnsupportedAgentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unsupported agent '{}', expected one of: ", self.0)?;
        for (idx, kind) in AgentKind::ALL.iter().enumerate() {
            if idx != 0 {
                write!(f, ", ")?;
            }
            write!(f, "{kind}")?;
        }
        Ok(())
    }
}

impl std::error::Error for UnsupportedAgentError {}

/// Agent parameter outside of its domain, reported at construction
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Opening probability must be in `[0, 1]`
    AlphaOutOfRange(f64),

    /// Endgame fraction must be in `(0, 1]`
    EndgameNimOutOfRange(f64),

    /// Midgame strategy is not one of `none`, `min`, `max`, `sum`
    UnknownStrategy(String),

    /// Learning rate must be in `(0, 1]`
    LearningRateOutOfRange(f64),

    /// Exploration probability must be in `[0, 1]`
    EpsilonOutOfRange(f64),

    /// Training positions need at least one heap
    NoHeaps,

    /// Range of heap sizes used for training is empty
    EmptyHeapRange {
        /// Lower bound
        start: u32,
        /// Upper bound, inclusive
        end: u32,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlphaOutOfRange(alpha) => write!(f, "alpha must be in [0, 1], got {alpha}"),
            Self::EndgameNimOutOfRange(nim) => {
                write!(f, "endgame_nim must be in (0, 1], got {nim}")
            }
            Self::UnknownStrategy(strategy) => write!(
                f,
                "unknown strategy '{strategy}', expected one of: none, min, max, sum"
            ),
            Self::LearningRateOutOfRange(rate) => {
                write!(f, "learning_rate must be in (0, 1], got {rate}")
            }
            Self::EpsilonOutOfRange(epsilon) => {
                write!(f, "epsilon must be in [0, 1], got {epsilon}")
            }
            Self::NoHeaps => write!(f, "heap count must be positive"),
            Self::EmptyHeapRange { start, end } => {
                write!(f, "heap value range {start}..={end} is empty")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
