//! Generation settings (`[generation]` section)

use serde::{Deserialize, Serialize};
use songmaster_application::GenerationParams;
use songmaster_domain::agent::DEFAULT_MAX_TOKENS;
use songmaster_domain::prompt::DEFAULT_LYRICS_PREVIEW_CHARS;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGenerationConfig {
    /// Token budget for agents that do not set their own
    pub max_tokens: u32,
    pub temperature: f32,
    pub orchestrator_max_tokens: u32,
    /// Per-call timeout; `0` disables it
    pub request_timeout_secs: u64,
    pub lyrics_preview_chars: usize,
}

impl Default for FileGenerationConfig {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: 0.7,
            orchestrator_max_tokens: 8000,
            request_timeout_secs: 180,
            lyrics_preview_chars: DEFAULT_LYRICS_PREVIEW_CHARS,
        }
    }
}

impl FileGenerationConfig {
    pub fn to_params(&self) -> GenerationParams {
        let timeout = (self.request_timeout_secs > 0)
            .then(|| Duration::from_secs(self.request_timeout_secs));
        GenerationParams::default()
            .with_temperature(self.temperature)
            .with_orchestrator_max_tokens(self.orchestrator_max_tokens)
            .with_request_timeout(timeout)
            .with_lyrics_preview_chars(self.lyrics_preview_chars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_params() {
        let config = FileGenerationConfig {
            temperature: 0.9,
            request_timeout_secs: 30,
            ..Default::default()
        };
        let params = config.to_params();
        assert_eq!(params.temperature, 0.9);
        assert_eq!(params.request_timeout, Some(Duration::from_secs(30)));
        assert_eq!(params.orchestrator_max_tokens, 8000);
    }

    #[test]
    fn test_zero_timeout_disables() {
        let config = FileGenerationConfig {
            request_timeout_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.to_params().request_timeout, None);
    }
}
