//! LLM Gateway port
//!
//! Defines the interface for requesting completions from an LLM provider.
//! Completions are treated as untyped text; interpreting them is the job of
//! the domain's response parser.

use async_trait::async_trait;
use songmaster_domain::{Agent, Message};
use thiserror::Error;

/// Sampling temperature used when a request does not set one.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Non-2xx response from the provider
    #[error("{message}")]
    HttpStatus { status: u16, message: String },

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Provider returned an empty completion")]
    EmptyResponse,

    #[error("API key not configured (set {0})")]
    MissingApiKey(String),

    #[error("Timeout")]
    Timeout,
}

/// One completion call
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Opaque model identifier
    pub model: String,
    /// Ordered `system`/`user` messages
    pub messages: Vec<Message>,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Ask the provider for a JSON object response
    pub json_response: bool,
}

impl CompletionRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            max_tokens: songmaster_domain::agent::DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            json_response: true,
        }
    }

    /// A system prompt plus one user message, sized for `agent`.
    pub fn for_agent(agent: &Agent, system: impl Into<String>, user: impl Into<String>) -> Self {
        Self::new(
            agent.model.clone(),
            vec![Message::system(system), Message::user(user)],
        )
        .with_max_tokens(agent.max_tokens)
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn plain_text(mut self) -> Self {
        self.json_response = false;
        self
    }

    /// Total characters across all messages.
    pub fn prompt_chars(&self) -> usize {
        self.messages.iter().map(|m| m.content.chars().count()).sum()
    }
}

/// Gateway for LLM communication
///
/// This port defines how the application layer communicates with LLM providers.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Send one completion request and return the completion text.
    async fn complete(&self, request: CompletionRequest) -> Result<String, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use songmaster_domain::Role;

    #[test]
    fn test_for_agent_uses_agent_model_and_budget() {
        let agent = Agent::new("a", "Agent A", "openai/gpt-4o").with_max_tokens(1234);
        let request = CompletionRequest::for_agent(&agent, "sys", "user");
        assert_eq!(request.model, "openai/gpt-4o");
        assert_eq!(request.max_tokens, 1234);
        assert_eq!(request.messages[0].role, Role::System);
        assert_eq!(request.messages[1].content, "user");
        assert!(request.json_response);
        assert_eq!(request.prompt_chars(), 7);
    }

    #[test]
    fn test_http_status_displays_message() {
        let err = GatewayError::HttpStatus {
            status: 500,
            message: "OpenRouter error: 500".to_string(),
        };
        assert_eq!(err.to_string(), "OpenRouter error: 500");
    }
}
