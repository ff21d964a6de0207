//! Iterate Round use case
//!
//! Revises a winning song: the orchestrator's critique and the song itself
//! are folded into the generation prompt, and the round is re-run against
//! the same agents. The iteration counter only moves when the round
//! produces at least one candidate.

use crate::config::GenerationParams;
use crate::ports::exchange_logger::ExchangeLogger;
use crate::ports::llm_gateway::LlmGateway;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::use_cases::generate_round::{
    GenerateRoundError, GenerateRoundInput, GenerateRoundUseCase,
};
use songmaster_domain::{
    Agent, ArtistProfile, GenerationRound, IterationContext, IterationPrompt, IterationState,
    SongPrompt,
};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(Error, Debug)]
pub enum IterateRoundError {
    #[error("Iteration #{number} failed: {source}")]
    Generation {
        number: u32,
        #[source]
        source: GenerateRoundError,
    },
}

/// Input for the IterateRound use case
#[derive(Debug, Clone)]
pub struct IterateRoundInput {
    /// Critique, original request and base song
    pub context: IterationContext,
    /// The same agents that produced the base song
    pub agents: Vec<Agent>,
    /// Song generation template, the same one fresh rounds use
    pub template: String,
    pub artist: Option<ArtistProfile>,
}

impl IterateRoundInput {
    pub fn new(context: IterationContext, agents: Vec<Agent>, template: impl Into<String>) -> Self {
        Self {
            context,
            agents,
            template: template.into(),
            artist: None,
        }
    }

    pub fn with_artist(mut self, artist: Option<ArtistProfile>) -> Self {
        self.artist = artist;
        self
    }

    /// The full system prompt for iteration `number`.
    pub fn prompt(&self, number: u32) -> String {
        let mut context = self.context.clone();
        context.iteration_number = number;
        let mut request = context.request();
        request.artist = self.artist.clone();
        let base = SongPrompt::render(&self.template, &request);
        IterationPrompt::build(&base, &context)
    }
}

/// Use case for running one iteration round
pub struct IterateRoundUseCase<G: LlmGateway + 'static> {
    generate: GenerateRoundUseCase<G>,
}

impl<G: LlmGateway + 'static> IterateRoundUseCase<G> {
    pub fn new(gateway: Arc<G>, params: GenerationParams) -> Self {
        Self {
            generate: GenerateRoundUseCase::new(gateway, params),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn ExchangeLogger>) -> Self {
        self.generate = self.generate.with_logger(logger);
        self
    }

    pub async fn execute(
        &self,
        state: &mut IterationState,
        input: IterateRoundInput,
    ) -> Result<GenerationRound, IterateRoundError> {
        self.execute_with_progress(state, input, &NoProgress, &CancellationToken::new())
            .await
    }

    /// Run iteration `state.next_number()`.
    ///
    /// On success the state records the iteration; on failure it is left
    /// untouched so a retry reuses the same number.
    pub async fn execute_with_progress(
        &self,
        state: &mut IterationState,
        input: IterateRoundInput,
        progress: &dyn ProgressNotifier,
        cancel: &CancellationToken,
    ) -> Result<GenerationRound, IterateRoundError> {
        let number = state.next_number();
        let title = state.next_title();
        info!(
            "Iteration #{} of {}",
            number,
            state.original_title().unwrap_or("untitled song")
        );

        let mut request = input.context.request();
        request.artist = input.artist.clone();
        let generate_input = GenerateRoundInput::new(request, input.agents.clone(), input.prompt(number))
            .with_round_number(number)
            .with_title(title);

        let round = self
            .generate
            .execute_with_progress(generate_input, progress, cancel)
            .await
            .map_err(|source| IterateRoundError::Generation { number, source })?;

        state.record_success();
        Ok(round)
    }
}
