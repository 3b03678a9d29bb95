//! Turn tracking for a match in progress

use std::fmt::Display;

use crate::nim::{
    heaps::Heaps,
    moves::{InvalidMoveError, Move},
    nim_game::NimGame,
};

/// One of the two players of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Player {
    /// Player making the first move
    First,

    /// Player making the second move
    Second,
}

impl Player {
    /// Get the other player
    #[inline]
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }
}

impl Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::First => write!(f, "first"),
            Self::Second => write!(f, "second"),
        }
    }
}

/// Live position together with the player to move.
///
/// Positions themselves are never mutated, a played move replaces the tracked position and
/// flips the side to move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameTurnTracker<G = Heaps> {
    game: G,
    to_move: Player,
}

impl<G> GameTurnTracker<G>
where
    G: NimGame,
{
    /// Start tracking `game` with [`Player::First`] to move
    #[inline]
    pub const fn new(game: G) -> Self {
        Self::with_player(game, Player::First)
    }

    /// Start tracking `game` with `to_move` to move
    #[inline]
    pub const fn with_player(game: G, to_move: Player) -> Self {
        Self { game, to_move }
    }

    /// Current position
    #[inline]
    pub const fn game(&self) -> &G {
        &self.game
    }

    /// Player to make the next move
    #[inline]
    pub const fn to_move(&self) -> Player {
        self.to_move
    }

    /// Play a move for the player to move
    ///
    /// # Errors
    /// - When the move is illegal, the tracker is left untouched
    pub fn play(&mut self, mov: &Move) -> Result<(), InvalidMoveError> {
        self.game = self.game.apply_move(mov)?;
        self.to_move = self.to_move.opposite();
        Ok(())
    }

    /// Match is over when no objects are left
    #[inline]
    pub fn is_over(&self) -> bool {
        self.game.is_terminal()
    }

    /// Player that took the last object, if the match is over
    pub fn winner(&self) -> Option<Player> {
        self.is_over().then(|| self.to_move.opposite())
    }

    /// Stop tracking and return the position
    #[inline]
    pub fn into_game(self) -> G {
        self.game
    }
}
