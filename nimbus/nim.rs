//! Heap configurations, moves and turn tracking

pub mod heaps;
pub mod moves;
pub mod nim_game;
pub mod turn;
