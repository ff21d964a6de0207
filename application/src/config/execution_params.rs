//! Execution parameters for upstream calls.
//!
//! [`GenerationParams`] groups the static parameters every round uses:
//! sampling temperature, the orchestrator's token budget, the per-call
//! timeout and the lyrics preview length. Per-agent token budgets live on
//! the [`Agent`](songmaster_domain::Agent) itself.

use serde::{Deserialize, Serialize};
use songmaster_domain::prompt::DEFAULT_LYRICS_PREVIEW_CHARS;
use std::time::Duration;

/// Round execution parameters.
///
/// | Field | Used by |
/// |-------|---------|
/// | `temperature` | generation, evaluation, artist generation |
/// | `orchestrator_max_tokens` | evaluation |
/// | `request_timeout` | every upstream call |
/// | `lyrics_preview_chars` | evaluation prompt |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub temperature: f32,
    /// Completion budget for the single orchestrator call.
    pub orchestrator_max_tokens: u32,
    /// Upper bound on one upstream call; `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
    pub lyrics_preview_chars: usize,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            orchestrator_max_tokens: 8000,
            request_timeout: Some(Duration::from_secs(180)),
            lyrics_preview_chars: DEFAULT_LYRICS_PREVIEW_CHARS,
        }
    }
}

impl GenerationParams {
    // ==================== Builder Methods ====================

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_orchestrator_max_tokens(mut self, max: u32) -> Self {
        self.orchestrator_max_tokens = max;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_lyrics_preview_chars(mut self, chars: usize) -> Self {
        self.lyrics_preview_chars = chars;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = GenerationParams::default();
        assert_eq!(params.temperature, 0.7);
        assert_eq!(params.orchestrator_max_tokens, 8000);
        assert_eq!(params.request_timeout, Some(Duration::from_secs(180)));
        assert_eq!(params.lyrics_preview_chars, 500);
    }

    #[test]
    fn test_builder() {
        let params = GenerationParams::default()
            .with_temperature(0.2)
            .with_orchestrator_max_tokens(12000)
            .with_request_timeout(None);

        assert_eq!(params.temperature, 0.2);
        assert_eq!(params.orchestrator_max_tokens, 12000);
        assert!(params.request_timeout.is_none());
    }
}
