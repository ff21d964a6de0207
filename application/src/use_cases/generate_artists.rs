//! Generate Artists use case
//!
//! Turns a free-text idea into up to three fictional artist profiles.

use crate::config::GenerationParams;
use crate::ports::exchange_logger::{ExchangeLogger, NoExchangeLogger};
use crate::ports::llm_gateway::{CompletionRequest, LlmGateway};
use crate::prompts::PromptResolver;
use crate::use_cases::shared::{CallError, complete_cancellable, log_exchange};
use songmaster_domain::{Agent, ArtistProfile, ParseError, PromptKey, parse_artist_options};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(Error, Debug)]
pub enum GenerateArtistsError {
    #[error("Describe the artist you want first")]
    EmptyInput,

    #[error("Artist generation failed: {0}")]
    Call(#[from] CallError),

    #[error("Artist response could not be parsed: {0}")]
    Parse(#[from] ParseError),

    #[error("Model returned no artist options")]
    NoOptions,
}

pub struct GenerateArtistsUseCase<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    params: GenerationParams,
    prompts: Arc<PromptResolver>,
    logger: Arc<dyn ExchangeLogger>,
}

impl<G: LlmGateway + 'static> GenerateArtistsUseCase<G> {
    pub fn new(gateway: Arc<G>, params: GenerationParams, prompts: Arc<PromptResolver>) -> Self {
        Self {
            gateway,
            params,
            prompts,
            logger: Arc::new(NoExchangeLogger),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn ExchangeLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub async fn execute(
        &self,
        idea: &str,
        agent: &Agent,
    ) -> Result<Vec<ArtistProfile>, GenerateArtistsError> {
        let idea = idea.trim();
        if idea.is_empty() {
            return Err(GenerateArtistsError::EmptyInput);
        }

        let system_prompt = self.prompts.template(PromptKey::ArtistGeneration).await;
        let request = CompletionRequest::for_agent(agent, system_prompt, idea)
            .with_temperature(self.params.temperature);

        let started = Instant::now();
        let result = complete_cancellable(
            self.gateway.as_ref(),
            request.clone(),
            self.params.request_timeout,
            &CancellationToken::new(),
        )
        .await;
        log_exchange(
            self.logger.as_ref(),
            "artist_generation",
            &agent.id,
            &request,
            &result,
            started.elapsed(),
        );

        let options = parse_artist_options(&result?)?;
        if options.is_empty() {
            return Err(GenerateArtistsError::NoOptions);
        }
        info!("Generated {} artist options", options.len());
        Ok(options)
    }
}
