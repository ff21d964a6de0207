//! Shared state of the HTTP API

use songmaster_application::{
    EvaluateRoundUseCase, ExchangeLogger, GenerateArtistsUseCase, GenerateRoundUseCase,
    GenerationParams, IterateRoundUseCase, LlmGateway, NoExchangeLogger, PromptResolver,
};
use songmaster_domain::Agent;
use std::sync::Arc;

/// Fallbacks for fields a request may leave out
#[derive(Debug, Clone)]
pub struct ApiDefaults {
    /// Token budget for agents sent without `max_tokens`
    pub max_tokens: u32,
    /// Orchestrator used by `/api/orchestrate`; `orchestrator_model_name` replaces its model
    pub orchestrator: Agent,
    /// Model for `/api/generate-artist` when `model_name` is absent
    pub artist_model: String,
}

/// Use cases behind the routes, built once at startup
pub struct AppState<G: LlmGateway + 'static> {
    pub(super) generate: GenerateRoundUseCase<G>,
    pub(super) iterate: IterateRoundUseCase<G>,
    pub(super) evaluate: EvaluateRoundUseCase<G>,
    pub(super) artists: GenerateArtistsUseCase<G>,
    pub(super) prompts: Arc<PromptResolver>,
    pub(super) defaults: ApiDefaults,
}

impl<G: LlmGateway + 'static> AppState<G> {
    pub fn new(
        gateway: Arc<G>,
        params: GenerationParams,
        prompts: Arc<PromptResolver>,
        defaults: ApiDefaults,
    ) -> Self {
        Self::with_logger(gateway, params, prompts, defaults, Arc::new(NoExchangeLogger))
    }

    pub fn with_logger(
        gateway: Arc<G>,
        params: GenerationParams,
        prompts: Arc<PromptResolver>,
        defaults: ApiDefaults,
        logger: Arc<dyn ExchangeLogger>,
    ) -> Self {
        Self {
            generate: GenerateRoundUseCase::new(Arc::clone(&gateway), params.clone())
                .with_logger(Arc::clone(&logger)),
            iterate: IterateRoundUseCase::new(Arc::clone(&gateway), params.clone())
                .with_logger(Arc::clone(&logger)),
            evaluate: EvaluateRoundUseCase::new(Arc::clone(&gateway), params.clone())
                .with_logger(Arc::clone(&logger)),
            artists: GenerateArtistsUseCase::new(gateway, params, Arc::clone(&prompts))
                .with_logger(logger),
            prompts,
            defaults,
        }
    }
}
