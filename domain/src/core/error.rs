//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DomainError {
    #[error("Agent {0} is not part of this round")]
    UnknownAgent(String),

    #[error("Agent {0} has already settled in this round")]
    AgentAlreadySettled(String),

    #[error("Duplicate agent id: {0}")]
    DuplicateAgent(String),
}
