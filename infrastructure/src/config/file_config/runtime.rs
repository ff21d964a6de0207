//! Runtime surfaces: `[prompts]`, `[server]`, `[library]` and `[logging]`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Editable prompt templates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePromptsConfig {
    /// TOML file holding `[prompts]` overrides
    pub file: Option<PathBuf>,
    pub cache_ttl_secs: u64,
}

impl Default for FilePromptsConfig {
    fn default() -> Self {
        Self {
            file: None,
            cache_ttl_secs: 300,
        }
    }
}

impl FilePromptsConfig {
    /// Configured file, or `<config dir>/songmaster/prompts.toml`.
    pub fn resolved_path(&self) -> Option<PathBuf> {
        self.file
            .clone()
            .or_else(|| dirs::config_dir().map(|d| d.join("songmaster").join("prompts.toml")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServerConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for FileServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 3001,
        }
    }
}

impl FileServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

/// Saved-song storage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLibraryConfig {
    pub path: Option<PathBuf>,
}

impl FileLibraryConfig {
    /// Configured path, or `<data dir>/songmaster/library.json`.
    pub fn resolved_path(&self) -> Option<PathBuf> {
        self.path
            .clone()
            .or_else(|| dirs::data_dir().map(|d| d.join("songmaster").join("library.json")))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Diagnostic log file (in addition to stderr)
    pub file: Option<PathBuf>,
    /// JSONL record of every upstream completion
    pub exchange_log: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_address() {
        assert_eq!(FileServerConfig::default().address(), "127.0.0.1:3001");
    }

    #[test]
    fn test_library_explicit_path() {
        let config = FileLibraryConfig {
            path: Some(PathBuf::from("/tmp/songs.json")),
        };
        assert_eq!(
            config.resolved_path(),
            Some(PathBuf::from("/tmp/songs.json"))
        );
    }
}
