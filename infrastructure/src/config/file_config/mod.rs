//! Raw TOML configuration data types
//!
//! These structs mirror the TOML file one section at a time. Every section
//! is `#[serde(default)]`, so a partial file only overrides what it names.

mod agents;
mod generation;
mod provider;
mod runtime;

pub use agents::{FileAgentEntry, FileOrchestratorConfig, default_agents};
pub use generation::FileGenerationConfig;
pub use provider::{DEFAULT_API_KEY_ENV, DEFAULT_BASE_URL, DEFAULT_MODEL, FileProviderConfig};
pub use runtime::{FileLibraryConfig, FileLoggingConfig, FilePromptsConfig, FileServerConfig};

use serde::{Deserialize, Serialize};
use songmaster_application::GenerationParams;
use songmaster_domain::{Agent, ConfigIssue, ConfigIssueCode};
use std::collections::HashSet;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub provider: FileProviderConfig,
    pub generation: FileGenerationConfig,
    /// Generation agents, in fan-out order
    pub agents: Vec<FileAgentEntry>,
    pub orchestrator: FileOrchestratorConfig,
    pub prompts: FilePromptsConfig,
    pub server: FileServerConfig,
    pub library: FileLibraryConfig,
    pub logging: FileLoggingConfig,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            provider: FileProviderConfig::default(),
            generation: FileGenerationConfig::default(),
            agents: default_agents(),
            orchestrator: FileOrchestratorConfig::default(),
            prompts: FilePromptsConfig::default(),
            server: FileServerConfig::default(),
            library: FileLibraryConfig::default(),
            logging: FileLoggingConfig::default(),
        }
    }
}

impl FileConfig {
    /// Configured generation agents with token budgets resolved.
    pub fn agents(&self) -> Vec<Agent> {
        self.agents
            .iter()
            .map(|entry| entry.to_agent(self.generation.max_tokens))
            .collect()
    }

    pub fn orchestrator(&self) -> Agent {
        self.orchestrator.to_agent(
            &self.provider.default_model,
            self.generation.orchestrator_max_tokens,
        )
    }

    pub fn generation_params(&self) -> GenerationParams {
        self.generation.to_params()
    }

    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.agents.is_empty() {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::NoAgents,
                "no [[agents]] configured; requests must name their own agents",
            ));
        }

        let mut seen = HashSet::new();
        for (index, entry) in self.agents.iter().enumerate() {
            if entry.id.trim().is_empty() {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::EmptyAgentId,
                    format!("agents[{}].id is empty", index),
                ));
            } else if !seen.insert(entry.id.as_str()) {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::DuplicateAgentId {
                        id: entry.id.clone(),
                    },
                    format!("agent id '{}' is configured more than once", entry.id),
                ));
            }

            if entry.model.trim().is_empty() {
                let field = format!("agents[{}].model", index);
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::EmptyModelName {
                        field: field.clone(),
                    },
                    format!("{} is empty", field),
                ));
            }

            if entry.max_tokens == Some(0) {
                let field = format!("agents[{}].max_tokens", index);
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::ZeroTokenBudget {
                        field: field.clone(),
                    },
                    format!("{} must be greater than 0", field),
                ));
            }
        }

        if self.provider.default_model.trim().is_empty() && self.orchestrator.model.is_none() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyModelName {
                    field: "provider.default_model".to_string(),
                },
                "provider.default_model is empty and [orchestrator] sets no model",
            ));
        }

        for (field, value) in [
            ("generation.max_tokens", Some(self.generation.max_tokens)),
            (
                "generation.orchestrator_max_tokens",
                Some(self.generation.orchestrator_max_tokens),
            ),
            ("orchestrator.max_tokens", self.orchestrator.max_tokens),
        ] {
            if value == Some(0) {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::ZeroTokenBudget {
                        field: field.to_string(),
                    },
                    format!("{} must be greater than 0", field),
                ));
            }
        }

        issues
    }
}
