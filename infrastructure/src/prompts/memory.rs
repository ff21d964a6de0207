use super::check_key;
use async_trait::async_trait;
use songmaster_application::{PromptEntry, PromptStore, PromptStoreError};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// Prompt store held in memory; used when no prompts file is configured.
#[derive(Default)]
pub struct InMemoryPromptStore {
    prompts: RwLock<BTreeMap<String, String>>,
}

impl InMemoryPromptStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PromptStore for InMemoryPromptStore {
    async fn get(&self, key: &str) -> Result<Option<String>, PromptStoreError> {
        Ok(self.prompts.read().await.get(key).cloned())
    }

    async fn list(&self) -> Result<Vec<PromptEntry>, PromptStoreError> {
        Ok(self
            .prompts
            .read()
            .await
            .iter()
            .map(|(key, content)| PromptEntry::new(key.as_str(), content.as_str()))
            .collect())
    }

    async fn update(&self, key: &str, content: &str) -> Result<(), PromptStoreError> {
        let key = check_key(key)?;
        self.prompts
            .write()
            .await
            .insert(key.as_str().to_string(), content.to_string());
        Ok(())
    }
}
