//! Prompt store port
//!
//! Persistent, editable prompt templates keyed by name. Only the active
//! version of each key is visible through this port.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while reading or writing prompts
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PromptStoreError {
    #[error("Prompt store I/O error: {0}")]
    Io(String),

    #[error("Prompt store is malformed: {0}")]
    Malformed(String),

    #[error("Unknown prompt key: {0}")]
    UnknownKey(String),
}

/// One stored template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptEntry {
    pub key: String,
    pub content: String,
}

impl PromptEntry {
    pub fn new(key: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            content: content.into(),
        }
    }
}

#[async_trait]
pub trait PromptStore: Send + Sync {
    /// The active template for `key`, if one is stored.
    async fn get(&self, key: &str) -> Result<Option<String>, PromptStoreError>;

    /// Every stored template, ordered by key.
    async fn list(&self) -> Result<Vec<PromptEntry>, PromptStoreError>;

    /// Replace the template stored under `key`.
    async fn update(&self, key: &str, content: &str) -> Result<(), PromptStoreError>;
}
