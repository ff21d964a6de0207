//! Prompt template resolution
//!
//! [`PromptResolver`] reads templates from a [`PromptStore`](crate::ports::prompt_store::PromptStore)
//! through a [`PromptCache`], falling back to the built-in defaults when the
//! store is missing, empty for a key, or failing.

mod cache;
mod resolver;

pub use cache::PromptCache;
pub use resolver::{DEFAULT_PROMPT_TTL, PromptResolver};
