//! Time-bounded template cache

use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

struct CachedPrompt {
    content: String,
    fetched_at: Instant,
}

/// Cache of template contents with per-lookup expiry
///
/// Entries are never evicted eagerly; a stale entry is simply refetched on
/// its next lookup.
#[derive(Default)]
pub struct PromptCache {
    entries: Mutex<HashMap<String, CachedPrompt>>,
}

impl PromptCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached value for `key` if it is younger than `ttl`,
    /// otherwise run `fetch` and cache its result.
    ///
    /// Fetch errors are returned as-is and leave the cache untouched.
    pub async fn get_or_fetch<F, Fut, E>(
        &self,
        key: &str,
        ttl: Duration,
        fetch: F,
    ) -> Result<String, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, E>>,
    {
        if let Some(content) = self.fresh(key, ttl) {
            return Ok(content);
        }

        let content = fetch().await?;
        self.lock().insert(
            key.to_string(),
            CachedPrompt {
                content: content.clone(),
                fetched_at: Instant::now(),
            },
        );
        Ok(content)
    }

    pub fn invalidate(&self, key: &str) {
        self.lock().remove(key);
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn fresh(&self, key: &str, ttl: Duration) -> Option<String> {
        self.lock()
            .get(key)
            .filter(|entry| entry.fetched_at.elapsed() < ttl)
            .map(|entry| entry.content.clone())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, CachedPrompt>> {
        // The map stays consistent even if a holder panicked.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const TTL: Duration = Duration::from_secs(300);

    async fn fetch_counted(
        cache: &PromptCache,
        key: &str,
        calls: &AtomicUsize,
        value: &str,
    ) -> String {
        cache
            .get_or_fetch(key, TTL, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, ()>(value.to_string())
            })
            .await
            .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_hit_within_ttl() {
        let cache = PromptCache::new();
        let calls = AtomicUsize::new(0);

        assert_eq!(fetch_counted(&cache, "k", &calls, "v1").await, "v1");
        tokio::time::advance(Duration::from_secs(299)).await;
        assert_eq!(fetch_counted(&cache, "k", &calls, "v2").await, "v1");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refetch_after_expiry() {
        let cache = PromptCache::new();
        let calls = AtomicUsize::new(0);

        fetch_counted(&cache, "k", &calls, "v1").await;
        tokio::time::advance(Duration::from_secs(301)).await;
        assert_eq!(fetch_counted(&cache, "k", &calls, "v2").await, "v2");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_invalidate_and_clear() {
        let cache = PromptCache::new();
        let calls = AtomicUsize::new(0);

        fetch_counted(&cache, "a", &calls, "1").await;
        fetch_counted(&cache, "b", &calls, "2").await;
        assert_eq!(cache.len(), 2);

        cache.invalidate("a");
        assert_eq!(fetch_counted(&cache, "a", &calls, "3").await, "3");

        cache.clear();
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_error_not_cached() {
        let cache = PromptCache::new();
        let result: Result<String, &str> = cache.get_or_fetch("k", TTL, || async { Err("down") }).await;
        assert_eq!(result, Err("down"));
        assert!(cache.is_empty());
    }
}
