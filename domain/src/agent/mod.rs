//! Generation agents
//!
//! An [`Agent`] is one configured participant: an LLM identified by an opaque
//! model string plus a token budget. Agents are configured ahead of time and
//! never change during a session.

mod value_objects;

pub use value_objects::{Agent, AgentId, DEFAULT_MAX_TOKENS};
