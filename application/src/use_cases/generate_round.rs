//! Generate Round use case
//!
//! Fans one song request out to every selected agent in parallel and waits
//! until each agent has either produced a usable candidate or failed.
//! Failures are recorded per agent; one agent failing never cancels or
//! blocks the others.

use crate::config::GenerationParams;
use crate::ports::exchange_logger::{ExchangeLogger, NoExchangeLogger};
use crate::ports::llm_gateway::{CompletionRequest, LlmGateway};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::use_cases::shared::{CallError, complete_cancellable, log_exchange};
use songmaster_domain::{
    Agent, AgentFailure, AgentStatus, DomainError, FailureKind, GenerationRound,
    IterationTitle, Phase, SongCandidate, SongRequest, parse_candidate,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that end a generation round without any candidate
#[derive(Error, Debug)]
pub enum GenerateRoundError {
    #[error("No agents selected")]
    NoAgents,

    #[error("All {} agents failed", .failures.len())]
    AllAgentsFailed { failures: Vec<AgentFailure> },

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Input for the GenerateRound use case
#[derive(Debug, Clone)]
pub struct GenerateRoundInput {
    /// 0 for a fresh round, the iteration number otherwise
    pub round_number: u32,
    pub request: SongRequest,
    pub agents: Vec<Agent>,
    /// Fully rendered system prompt shared by every agent
    pub system_prompt: String,
    /// Title that replaces each model's own title (iteration rounds)
    pub title: Option<IterationTitle>,
}

impl GenerateRoundInput {
    pub fn new(request: SongRequest, agents: Vec<Agent>, system_prompt: impl Into<String>) -> Self {
        Self {
            round_number: 0,
            request,
            agents,
            system_prompt: system_prompt.into(),
            title: None,
        }
    }

    pub fn with_round_number(mut self, round_number: u32) -> Self {
        self.round_number = round_number;
        self
    }

    pub fn with_title(mut self, title: Option<IterationTitle>) -> Self {
        self.title = title;
        self
    }
}

/// What one generation task reports back
struct AgentOutcome {
    agent: Agent,
    request: CompletionRequest,
    result: Result<String, CallError>,
    elapsed: Duration,
}

/// Use case for running one round of parallel generation
pub struct GenerateRoundUseCase<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    params: GenerationParams,
    logger: Arc<dyn ExchangeLogger>,
}

impl<G: LlmGateway + 'static> GenerateRoundUseCase<G> {
    pub fn new(gateway: Arc<G>, params: GenerationParams) -> Self {
        Self {
            gateway,
            params,
            logger: Arc::new(NoExchangeLogger),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn ExchangeLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(
        &self,
        input: GenerateRoundInput,
    ) -> Result<GenerationRound, GenerateRoundError> {
        self.execute_with_progress(input, &NoProgress, &CancellationToken::new())
            .await
    }

    /// Execute the use case with progress callbacks and cancellation.
    ///
    /// Cancelling `cancel` settles every agent still waiting on the gateway
    /// as a `Cancelled` failure.
    pub async fn execute_with_progress(
        &self,
        input: GenerateRoundInput,
        progress: &dyn ProgressNotifier,
        cancel: &CancellationToken,
    ) -> Result<GenerationRound, GenerateRoundError> {
        if input.agents.is_empty() {
            return Err(GenerateRoundError::NoAgents);
        }

        let mut round = GenerationRound::new(input.round_number, input.agents.iter().map(|a| &a.id))?;
        let user_message = input.request.user_message();

        info!(
            "Round {}: generating with {} agents",
            input.round_number,
            input.agents.len()
        );
        debug!(
            system_chars = input.system_prompt.len(),
            user_chars = user_message.len(),
            "Generation prompt built"
        );
        progress.on_phase_start(&Phase::Generation, input.agents.len());

        let mut join_set = JoinSet::new();

        for agent in &input.agents {
            round.mark_generating(&agent.id)?;
            progress.on_agent_status(&Phase::Generation, &agent.id, AgentStatus::Generating);

            let gateway = Arc::clone(&self.gateway);
            let agent = agent.clone();
            let request =
                CompletionRequest::for_agent(&agent, input.system_prompt.clone(), user_message.clone())
                    .with_temperature(self.params.temperature);
            let timeout = self.params.request_timeout;
            let cancel = cancel.child_token();

            join_set.spawn(async move {
                let started = Instant::now();
                let result =
                    complete_cancellable(gateway.as_ref(), request.clone(), timeout, &cancel).await;
                AgentOutcome {
                    agent,
                    request,
                    result,
                    elapsed: started.elapsed(),
                }
            });
        }

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok(outcome) => self.settle(&mut round, outcome, input.title.as_ref(), progress)?,
                Err(e) => warn!("Generation task join error: {}", e),
            }
        }

        // Tasks that panicked or were aborted never reported back.
        for id in round.unsettled() {
            warn!("Agent {} ended without an outcome", id);
            round.record_failure(AgentFailure::new(
                id.clone(),
                FailureKind::Aborted,
                "Generation task ended without a result",
            ))?;
            progress.on_agent_status(&Phase::Generation, &id, AgentStatus::Error);
        }

        progress.on_phase_complete(&Phase::Generation);
        info!(
            "Round {} settled: {} completed, {} failed",
            input.round_number,
            round.completed_count(),
            round.failed_count()
        );

        if !round.has_successes() {
            return Err(GenerateRoundError::AllAgentsFailed {
                failures: round.failed_agents(),
            });
        }
        Ok(round)
    }

    /// Record one agent's outcome in the round.
    fn settle(
        &self,
        round: &mut GenerationRound,
        outcome: AgentOutcome,
        title: Option<&IterationTitle>,
        progress: &dyn ProgressNotifier,
    ) -> Result<(), DomainError> {
        let AgentOutcome {
            agent,
            request,
            result,
            elapsed,
        } = outcome;

        log_exchange(
            self.logger.as_ref(),
            "generation",
            &agent.id,
            &request,
            &result,
            elapsed,
        );

        match result
            .map_err(|e| (e.failure_kind(), e.to_string()))
            .and_then(|raw| Self::candidate_from(&raw, title))
        {
            Ok(candidate) => {
                info!("Agent {} produced \"{}\"", agent.id, candidate.name);
                round.record_success(&agent.id, candidate)?;
                progress.on_agent_status(&Phase::Generation, &agent.id, AgentStatus::Done);
            }
            Err((kind, error)) => {
                warn!("Agent {} failed ({:?}): {}", agent.id, kind, error);
                round.record_failure(AgentFailure::new(agent.id.clone(), kind, error))?;
                progress.on_agent_status(&Phase::Generation, &agent.id, AgentStatus::Error);
            }
        }
        Ok(())
    }

    /// Parse a completion into a usable candidate.
    fn candidate_from(
        raw: &str,
        title: Option<&IterationTitle>,
    ) -> Result<SongCandidate, (FailureKind, String)> {
        let candidate = parse_candidate(raw).map_err(|e| (FailureKind::Parse, e.to_string()))?;
        let candidate = match title {
            Some(title) => candidate.retitled(title),
            None => candidate,
        };
        if !candidate.is_complete() {
            return Err((
                FailureKind::Incomplete,
                format!("Missing required fields: {}", candidate.missing_fields().join(", ")),
            ));
        }
        Ok(candidate)
    }
}
