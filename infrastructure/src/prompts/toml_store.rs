//! TOML-file prompt store
//!
//! ```toml
//! [prompts]
//! song_generation = """
//! You are a professional songwriter.
//! ...
//! """
//! ```
//!
//! The file is re-read on every `get`; the application's prompt cache keeps
//! that off the hot path. Writes go to a sibling temp file first and are
//! renamed into place.

use super::check_key;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use songmaster_application::{PromptEntry, PromptStore, PromptStoreError};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Debug, Default, Serialize, Deserialize)]
struct PromptsFile {
    #[serde(default)]
    prompts: BTreeMap<String, String>,
}

pub struct TomlPromptStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl TomlPromptStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<PromptsFile, PromptStoreError> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(PromptsFile::default()),
            Err(e) => return Err(PromptStoreError::Io(e.to_string())),
        };
        toml::from_str(&text).map_err(|e| PromptStoreError::Malformed(e.to_string()))
    }

    async fn write(&self, file: &PromptsFile) -> Result<(), PromptStoreError> {
        let text =
            toml::to_string_pretty(file).map_err(|e| PromptStoreError::Malformed(e.to_string()))?;
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| PromptStoreError::Io(e.to_string()))?;
        }
        let tmp = self.path.with_extension("toml.tmp");
        tokio::fs::write(&tmp, text)
            .await
            .map_err(|e| PromptStoreError::Io(e.to_string()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| PromptStoreError::Io(e.to_string()))
    }
}

#[async_trait]
impl PromptStore for TomlPromptStore {
    async fn get(&self, key: &str) -> Result<Option<String>, PromptStoreError> {
        Ok(self.read().await?.prompts.remove(key))
    }

    async fn list(&self) -> Result<Vec<PromptEntry>, PromptStoreError> {
        Ok(self
            .read()
            .await?
            .prompts
            .into_iter()
            .map(|(key, content)| PromptEntry { key, content })
            .collect())
    }

    async fn update(&self, key: &str, content: &str) -> Result<(), PromptStoreError> {
        let key = check_key(key)?;
        let _guard = self.write_lock.lock().await;

        let mut file = self.read().await?;
        file.prompts
            .insert(key.as_str().to_string(), content.to_string());
        self.write(&file).await?;
        debug!(key = %key, path = %self.path.display(), "Prompt updated");
        Ok(())
    }
}
