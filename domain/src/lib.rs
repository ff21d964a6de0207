//! Domain layer for SongMaster
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Round
//!
//! A user's song request is fanned out to several generation [`Agent`]s in
//! parallel. Each agent produces one [`SongCandidate`]; the set of candidates
//! and per-agent outcomes forms a [`GenerationRound`].
//!
//! ## Evaluation
//!
//! A single orchestrator agent scores every candidate of a round and picks a
//! winner ([`EvaluationBundle`], [`WinnerSelection`]).
//!
//! ## Iteration
//!
//! The winning song can be revised: the orchestrator's critique becomes an
//! [`IterationContext`] which augments the generation prompt so that agents
//! make targeted edits to the base song instead of writing a new one.
//!
//! ## Response parsing
//!
//! Model completions are expected to be JSON but frequently arrive fenced,
//! truncated or malformed. [`parsing`] turns raw text into typed results and
//! applies an ordered recovery policy when the text does not parse.

pub mod agent;
pub mod artist;
pub mod config;
pub mod core;
pub mod evaluation;
pub mod iteration;
pub mod parsing;
pub mod prompt;
pub mod round;
pub mod session;
pub mod song;

// Re-export commonly used types
pub use agent::{Agent, AgentId};
pub use artist::ArtistProfile;
pub use config::{ConfigIssue, ConfigIssueCode, Severity};
pub use core::{error::DomainError, string::preview};
pub use evaluation::{
    EvaluationBundle, Evaluation, RecommendationBucket, Recommendations, Scores, WinnerAnalysis,
    WinnerSelection,
};
pub use iteration::{
    IterationContext, IterationFeedback, IterationPrompt, IterationState, IterationTitle,
};
pub use parsing::{
    ParseError, parse_artist_options, parse_candidate, parse_evaluation_bundle,
    strip_code_fences,
};
pub use prompt::{OrchestratorPrompt, PromptKey, SongPrompt, render_template};
pub use round::{AgentFailure, AgentStatus, FailureKind, GenerationRound, Phase};
pub use session::{Message, Role};
pub use song::{BaseSong, SongCandidate, SongRequest, SongStatus};
