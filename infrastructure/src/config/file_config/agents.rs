//! Agent roster (`[[agents]]` and `[orchestrator]` sections)
//!
//! ```toml
//! [[agents]]
//! id = "claude"
//! name = "Claude"
//! model = "anthropic/claude-sonnet-4-5"
//!
//! [[agents]]
//! id = "gpt"
//! model = "openai/gpt-4o"
//! max_tokens = 6000
//!
//! [orchestrator]
//! model = "anthropic/claude-opus-4"
//! ```

use serde::{Deserialize, Serialize};
use songmaster_domain::Agent;

/// One generation agent entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAgentEntry {
    pub id: String,
    /// Display name; defaults to the id
    #[serde(default)]
    pub name: Option<String>,
    pub model: String,
    /// Overrides `[generation] max_tokens`
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

impl FileAgentEntry {
    pub fn new(id: &str, name: &str, model: &str) -> Self {
        Self {
            id: id.to_string(),
            name: Some(name.to_string()),
            model: model.to_string(),
            max_tokens: None,
        }
    }

    pub fn to_agent(&self, default_max_tokens: u32) -> Agent {
        let name = self.name.clone().unwrap_or_else(|| self.id.clone());
        Agent::new(self.id.as_str(), name, self.model.as_str())
            .with_max_tokens(self.max_tokens.unwrap_or(default_max_tokens))
    }
}

/// The default roster: three agents on different providers.
pub fn default_agents() -> Vec<FileAgentEntry> {
    vec![
        FileAgentEntry::new("claude", "Claude", "anthropic/claude-sonnet-4-5"),
        FileAgentEntry::new("gpt", "GPT", "openai/gpt-4o"),
        FileAgentEntry::new("gemini", "Gemini", "google/gemini-2.5-pro"),
    ]
}

/// The evaluating agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOrchestratorConfig {
    pub id: String,
    pub name: String,
    /// Falls back to `[provider] default_model`
    pub model: Option<String>,
    /// Falls back to `[generation] orchestrator_max_tokens`
    pub max_tokens: Option<u32>,
}

impl Default for FileOrchestratorConfig {
    fn default() -> Self {
        Self {
            id: "orchestrator".to_string(),
            name: "Orchestrator".to_string(),
            model: None,
            max_tokens: None,
        }
    }
}

impl FileOrchestratorConfig {
    pub fn to_agent(&self, default_model: &str, default_max_tokens: u32) -> Agent {
        let model = self
            .model
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(default_model);
        Agent::new(self.id.as_str(), self.name.as_str(), model)
            .with_max_tokens(self.max_tokens.unwrap_or(default_max_tokens))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_name_defaults_to_id() {
        let entry: FileAgentEntry = toml::from_str(
            r#"
id = "mistral"
model = "mistralai/mistral-large"
"#,
        )
        .unwrap();
        let agent = entry.to_agent(4000);
        assert_eq!(agent.name, "mistral");
        assert_eq!(agent.max_tokens, 4000);
    }

    #[test]
    fn test_entry_max_tokens_override() {
        let mut entry = FileAgentEntry::new("gpt", "GPT", "openai/gpt-4o");
        entry.max_tokens = Some(6000);
        assert_eq!(entry.to_agent(4000).max_tokens, 6000);
    }

    #[test]
    fn test_orchestrator_falls_back_to_default_model() {
        let agent = FileOrchestratorConfig::default().to_agent("anthropic/claude-sonnet-4-5", 8000);
        assert_eq!(agent.id.as_str(), "orchestrator");
        assert_eq!(agent.model, "anthropic/claude-sonnet-4-5");
        assert_eq!(agent.max_tokens, 8000);
    }
}
