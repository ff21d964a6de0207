//! OpenRouter adapter
//!
//! Implements the [`LlmGateway`](songmaster_application::LlmGateway) port
//! against OpenRouter's OpenAI-compatible `chat/completions` endpoint.

mod gateway;
mod protocol;

pub use gateway::{OpenRouterConfig, OpenRouterGateway};
