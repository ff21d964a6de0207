//! Configuration file loading for SongMaster
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `SONGMASTER_` environment variables (`SONGMASTER_SERVER__PORT=8080`)
//! 2. `--config <path>` specified file
//! 3. Project root: `./songmaster.toml` or `./.songmaster.toml`
//! 4. Global: `$XDG_CONFIG_HOME/songmaster/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    DEFAULT_API_KEY_ENV, DEFAULT_BASE_URL, DEFAULT_MODEL, FileAgentEntry, FileConfig,
    FileGenerationConfig, FileLibraryConfig, FileLoggingConfig, FileOrchestratorConfig,
    FilePromptsConfig, FileProviderConfig, FileServerConfig,
};
pub use loader::ConfigLoader;
