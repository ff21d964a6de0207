//! Iteration on a winning song
//!
//! - [`IterationContext`]: the feedback package carried into the next round
//! - [`IterationPrompt`]: augments the generation prompt with that feedback
//! - [`IterationState`]: the preserved original title and iteration counter

mod context;
mod prompt;
mod state;

pub use context::{IterationContext, IterationFeedback};
pub use prompt::{IterationPrompt, NONE_PLACEHOLDER};
pub use state::{IterationState, IterationTitle};
