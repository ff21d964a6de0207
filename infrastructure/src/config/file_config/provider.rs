//! Upstream provider settings (`[provider]` section)
//!
//! ```toml
//! [provider]
//! base_url = "https://openrouter.ai/api/v1"
//! api_key_env = "OPENROUTER_API_KEY"
//! default_model = "anthropic/claude-sonnet-4-5"
//! ```

use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_API_KEY_ENV: &str = "OPENROUTER_API_KEY";
pub const DEFAULT_MODEL: &str = "anthropic/claude-sonnet-4-5";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    pub base_url: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Inline API key; takes precedence over `api_key_env`
    pub api_key: Option<String>,
    /// `HTTP-Referer` attribution header
    pub referer: Option<String>,
    /// `X-Title` attribution header
    pub title: Option<String>,
    /// Model used by the orchestrator and artist generation when none is set
    pub default_model: String,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            api_key: None,
            referer: Some("https://songmaster.app".to_string()),
            title: Some("SongMaster".to_string()),
            default_model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl FileProviderConfig {
    /// The API key from the config file or the configured environment variable.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|k| !k.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FileProviderConfig::default();
        assert_eq!(config.base_url, "https://openrouter.ai/api/v1");
        assert_eq!(config.api_key_env, "OPENROUTER_API_KEY");
        assert_eq!(config.title.as_deref(), Some("SongMaster"));
    }

    #[test]
    fn test_inline_key_wins() {
        let config = FileProviderConfig {
            api_key: Some("sk-inline".to_string()),
            api_key_env: "SONGMASTER_TEST_UNSET_KEY_VAR".to_string(),
            ..Default::default()
        };
        assert_eq!(config.resolve_api_key().as_deref(), Some("sk-inline"));
    }

    #[test]
    fn test_blank_inline_key_falls_through() {
        let config = FileProviderConfig {
            api_key: Some("  ".to_string()),
            api_key_env: "SONGMASTER_TEST_UNSET_KEY_VAR".to_string(),
            ..Default::default()
        };
        assert!(config.resolve_api_key().is_none());
    }
}
