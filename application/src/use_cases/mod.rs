//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod evaluate_round;
pub mod generate_artists;
pub mod generate_round;
pub mod iterate_round;
pub mod run_round;
pub mod save_song;
pub mod shared;

#[cfg(test)]
pub(crate) mod test_support;
