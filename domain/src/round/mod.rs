//! Generation rounds
//!
//! A [`GenerationRound`] is the result of fanning one request out to a fixed
//! set of agents. Every agent moves `waiting → generating → done | error`
//! exactly once; once the round settles each agent has exactly one of a
//! candidate or a failure.

mod entities;

pub use entities::{AgentFailure, AgentStatus, FailureKind, GenerationRound, Phase};
