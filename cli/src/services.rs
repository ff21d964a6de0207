//! Dependency injection: adapters built from the loaded configuration

use anyhow::Result;
use songmaster_application::{
    ExchangeLogger, GatewayError, NoExchangeLogger, PromptResolver, PromptStore, SongRepository,
};
use songmaster_infrastructure::config::FileConfig;
use songmaster_infrastructure::{
    InMemoryPromptStore, InMemorySongRepository, JsonFileSongRepository, JsonlExchangeLogger,
    OpenRouterConfig, OpenRouterGateway, TomlPromptStore,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub struct Services {
    pub prompts: Arc<PromptResolver>,
    pub library: Arc<dyn SongRepository>,
    pub logger: Arc<dyn ExchangeLogger>,
}

impl Services {
    /// Everything except the gateway, which needs an API key.
    pub fn build(config: &FileConfig) -> Self {
        let store: Arc<dyn PromptStore> = match config.prompts.resolved_path() {
            Some(path) => {
                debug!("Prompt store: {}", path.display());
                Arc::new(TomlPromptStore::new(path))
            }
            None => {
                warn!("No config directory available; prompt edits will not persist");
                Arc::new(InMemoryPromptStore::new())
            }
        };
        let prompts = Arc::new(PromptResolver::new(
            store,
            Duration::from_secs(config.prompts.cache_ttl_secs),
        ));

        let library: Arc<dyn SongRepository> = match config.library.resolved_path() {
            Some(path) => {
                debug!("Song library: {}", path.display());
                Arc::new(JsonFileSongRepository::new(path))
            }
            None => {
                warn!("No data directory available; saved songs will not persist");
                Arc::new(InMemorySongRepository::new())
            }
        };

        let logger: Arc<dyn ExchangeLogger> = match config
            .logging
            .exchange_log
            .as_ref()
            .and_then(JsonlExchangeLogger::new)
        {
            Some(logger) => {
                debug!("Exchange log: {}", logger.path().display());
                Arc::new(logger)
            }
            None => Arc::new(NoExchangeLogger),
        };

        Self {
            prompts,
            library,
            logger,
        }
    }
}

pub fn gateway(config: &FileConfig) -> Result<Arc<OpenRouterGateway>> {
    let provider = &config.provider;
    let api_key = provider
        .resolve_api_key()
        .ok_or_else(|| GatewayError::MissingApiKey(provider.api_key_env.clone()))?;

    Ok(Arc::new(OpenRouterGateway::new(
        OpenRouterConfig::new(provider.base_url.as_str(), api_key)
            .with_attribution(provider.referer.clone(), provider.title.clone()),
    )))
}
