//! Template lookup with cache and fallback

use super::cache::PromptCache;
use crate::ports::prompt_store::{PromptEntry, PromptStore, PromptStoreError};
use songmaster_domain::{PromptKey, render_template};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// How long a fetched template is reused before it is read again.
pub const DEFAULT_PROMPT_TTL: Duration = Duration::from_secs(300);

/// Resolves prompt templates for the use cases
pub struct PromptResolver {
    store: Option<Arc<dyn PromptStore>>,
    cache: PromptCache,
    ttl: Duration,
}

impl PromptResolver {
    pub fn new(store: Arc<dyn PromptStore>, ttl: Duration) -> Self {
        Self {
            store: Some(store),
            cache: PromptCache::new(),
            ttl,
        }
    }

    /// A resolver that always serves the built-in templates.
    pub fn defaults_only() -> Self {
        Self {
            store: None,
            cache: PromptCache::new(),
            ttl: DEFAULT_PROMPT_TTL,
        }
    }

    /// The active template for `key`.
    ///
    /// Store failures are logged and answered with the built-in template;
    /// they are not cached, so the store is asked again on the next call.
    pub async fn template(&self, key: PromptKey) -> String {
        let Some(store) = &self.store else {
            return key.default_template().to_string();
        };

        let fetched = self
            .cache
            .get_or_fetch(key.as_str(), self.ttl, || async {
                let stored = store.get(key.as_str()).await?;
                Ok::<_, PromptStoreError>(match stored {
                    Some(content) if !content.trim().is_empty() => content,
                    _ => {
                        debug!("No stored prompt for {}, using default", key);
                        key.default_template().to_string()
                    }
                })
            })
            .await;

        fetched.unwrap_or_else(|e| {
            warn!("Prompt store lookup for {} failed: {}", key, e);
            key.default_template().to_string()
        })
    }

    /// The active template for `key` with placeholders substituted.
    pub async fn render(&self, key: PromptKey, vars: &[(&str, &str)]) -> String {
        render_template(&self.template(key).await, vars)
    }

    /// Store a new template for `key` and drop its cached copy.
    pub async fn update(&self, key: PromptKey, content: &str) -> Result<(), PromptStoreError> {
        let store = self
            .store
            .as_ref()
            .ok_or_else(|| PromptStoreError::Io("no prompt store configured".to_string()))?;
        store.update(key.as_str(), content).await?;
        self.cache.invalidate(key.as_str());
        Ok(())
    }

    /// Every key with its active template, defaults included.
    pub async fn list(&self) -> Vec<PromptEntry> {
        let mut entries = Vec::with_capacity(PromptKey::ALL.len());
        for key in PromptKey::ALL {
            entries.push(PromptEntry::new(key.as_str(), self.template(key).await));
        }
        entries
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct MapStore {
        prompts: Mutex<HashMap<String, String>>,
        gets: AtomicUsize,
        failing: bool,
    }

    #[async_trait]
    impl PromptStore for MapStore {
        async fn get(&self, key: &str) -> Result<Option<String>, PromptStoreError> {
            self.gets.fetch_add(1, Ordering::SeqCst);
            if self.failing {
                return Err(PromptStoreError::Io("offline".to_string()));
            }
            Ok(self.prompts.lock().unwrap().get(key).cloned())
        }

        async fn list(&self) -> Result<Vec<PromptEntry>, PromptStoreError> {
            Ok(Vec::new())
        }

        async fn update(&self, key: &str, content: &str) -> Result<(), PromptStoreError> {
            self.prompts
                .lock()
                .unwrap()
                .insert(key.to_string(), content.to_string());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_missing_key_falls_back_to_default() {
        let resolver = PromptResolver::new(Arc::new(MapStore::default()), DEFAULT_PROMPT_TTL);
        let template = resolver.template(PromptKey::SongGeneration).await;
        assert_eq!(template, PromptKey::SongGeneration.default_template());
    }

    #[tokio::test]
    async fn test_stored_template_is_cached() {
        let store = Arc::new(MapStore::default());
        store.update("orchestrator", "custom judge").await.unwrap();
        let resolver = PromptResolver::new(store.clone(), DEFAULT_PROMPT_TTL);

        assert_eq!(resolver.template(PromptKey::Orchestrator).await, "custom judge");
        assert_eq!(resolver.template(PromptKey::Orchestrator).await, "custom judge");
        assert_eq!(store.gets.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_update_invalidates_cached_key() {
        let store = Arc::new(MapStore::default());
        let resolver = PromptResolver::new(store.clone(), DEFAULT_PROMPT_TTL);

        resolver.template(PromptKey::SongGeneration).await;
        resolver
            .update(PromptKey::SongGeneration, "Write about {song_description}")
            .await
            .unwrap();

        let rendered = resolver
            .render(PromptKey::SongGeneration, &[("song_description", "rain")])
            .await;
        assert_eq!(rendered, "Write about rain");
    }

    #[tokio::test]
    async fn test_store_failure_uses_default_and_retries() {
        let store = Arc::new(MapStore {
            failing: true,
            ..MapStore::default()
        });
        let resolver = PromptResolver::new(store.clone(), DEFAULT_PROMPT_TTL);

        let template = resolver.template(PromptKey::ArtistGeneration).await;
        assert_eq!(template, PromptKey::ArtistGeneration.default_template());
        resolver.template(PromptKey::ArtistGeneration).await;
        assert_eq!(store.gets.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_defaults_only_rejects_update() {
        let resolver = PromptResolver::defaults_only();
        assert!(resolver.update(PromptKey::Orchestrator, "x").await.is_err());
        assert_eq!(resolver.list().await.len(), 3);
    }
}
