//! Nim engine.
//!
//! Positions are [heap configurations](crate::nim::heaps::Heaps) consumed through the
//! [`NimGame`](crate::nim::nim_game::NimGame) interface. Four interchangeable
//! [agents](crate::agent) decide moves: closed-form [nim-sum](crate::agent::nim_sum) play,
//! memoized [minimax](crate::agent::minimax) search, a parametric
//! [rule-based](crate::agent::rules) heuristic and a tabular
//! [Q-learning](crate::agent::q_learning) agent trained by self-play.

#![warn(missing_docs)]

pub mod agent;
pub mod arena;
pub mod nim;
pub mod numeric;
pub mod transposition_table;

mod display;
