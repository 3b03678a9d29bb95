pub mod best_move;
pub mod common;
pub mod play;
pub mod q_learning;
pub mod rules;
