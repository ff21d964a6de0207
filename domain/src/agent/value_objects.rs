//! Agent value objects

use serde::{Deserialize, Serialize};

/// Token budget used when an agent does not specify one.
pub const DEFAULT_MAX_TOKENS: u32 = 4000;

/// Stable identifier of an agent.
///
/// Used as the key for per-agent status, results and evaluations.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(String);

impl AgentId {
    /// Creates an AgentId from an existing string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AgentId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for AgentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One generation participant (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    /// Human-readable name shown in progress output
    pub name: String,
    /// Opaque model identifier passed to the completion endpoint
    pub model: String,
    /// Maximum completion tokens for this agent
    pub max_tokens: u32,
}

impl Agent {
    pub fn new(id: impl Into<AgentId>, name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            model: model.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// An agent whose id, name and model are all the model identifier.
    ///
    /// The HTTP API only sends `{agent_id, model_name}` pairs, so this is
    /// what ad-hoc agents look like.
    pub fn from_model(id: impl Into<AgentId>, model: impl Into<String>) -> Self {
        let model = model.into();
        Self::new(id, model.clone(), model)
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

impl std::fmt::Display for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_defaults() {
        let agent = Agent::new("claude", "Claude", "anthropic/claude-sonnet-4-5");
        assert_eq!(agent.id.as_str(), "claude");
        assert_eq!(agent.max_tokens, DEFAULT_MAX_TOKENS);
        assert_eq!(agent.to_string(), "Claude (anthropic/claude-sonnet-4-5)");
    }

    #[test]
    fn test_agent_id_serializes_as_plain_string() {
        let id = AgentId::new("gpt");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"gpt\"");

        let mut map = std::collections::BTreeMap::new();
        map.insert(id, 1);
        assert_eq!(serde_json::to_string(&map).unwrap(), r#"{"gpt":1}"#);
    }

    #[test]
    fn test_from_model() {
        let agent = Agent::from_model("a1", "x-ai/grok-4").with_max_tokens(2000);
        assert_eq!(agent.name, "x-ai/grok-4");
        assert_eq!(agent.max_tokens, 2000);
    }
}
