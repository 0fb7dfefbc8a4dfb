//! Headless play on top of the core: move search and a greedy autoplayer.
//!
//! Used by the `match3-sim` binary and by tests that need a session to make
//! progress without a human.

pub mod autoplay;
pub mod moves;

pub use autoplay::{AutoplayError, Autoplayer};
pub use moves::{has_possible_move, possible_moves, Candidate};
