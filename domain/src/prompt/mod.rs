//! Prompt templates
//!
//! Templates are plain strings with `{placeholder}` markers. They can be
//! edited in the prompt store; the defaults here are used when the store is
//! unavailable or has no active entry for a key.

mod defaults;
mod orchestrator;
mod song;
mod template;

pub use defaults::{
    DEFAULT_ARTIST_GENERATION_PROMPT, DEFAULT_ORCHESTRATOR_PROMPT, DEFAULT_SONG_GENERATION_PROMPT,
};
pub use orchestrator::{DEFAULT_LYRICS_PREVIEW_CHARS, OrchestratorPrompt};
pub use song::SongPrompt;
pub use template::{PromptKey, render_template};
