//! Infrastructure layer for SongMaster
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer.
//!
//! | Module | Port | Adapter |
//! |--------|------|---------|
//! | [`openrouter`] | `LlmGateway` | [`OpenRouterGateway`] |
//! | [`prompts`] | `PromptStore` | [`TomlPromptStore`], [`InMemoryPromptStore`] |
//! | [`library`] | `SongRepository` | [`JsonFileSongRepository`], [`InMemorySongRepository`] |
//! | [`logging`] | `ExchangeLogger` | [`JsonlExchangeLogger`] |
//!
//! [`config`] loads the TOML configuration that wires them together.

pub mod config;
pub mod library;
pub mod logging;
pub mod openrouter;
pub mod prompts;

pub use config::{ConfigLoader, FileConfig};
pub use library::{InMemorySongRepository, JsonFileSongRepository};
pub use logging::JsonlExchangeLogger;
pub use openrouter::{OpenRouterConfig, OpenRouterGateway};
pub use prompts::{InMemoryPromptStore, TomlPromptStore};
