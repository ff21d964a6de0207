//! Songs
//!
//! - [`SongCandidate`]: one agent's generated output for a round
//! - [`BaseSong`]: the style and lyrics an iteration revises
//! - [`SongRequest`]: what the user asked for
//! - [`SongStatus`]: lifecycle of a saved song

mod candidate;
mod request;

pub use candidate::{BaseSong, SongCandidate, UNTITLED};
pub use request::{SongRequest, SongStatus};
