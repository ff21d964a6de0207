//! Run Round use case
//!
//! A full round: generation, then (when at least one candidate exists) the
//! orchestrator's evaluation. Templates are resolved through the
//! [`PromptResolver`] on every run so edits in the prompt store take effect
//! once the cache entry expires.

use crate::config::GenerationParams;
use crate::ports::exchange_logger::{ExchangeLogger, NoExchangeLogger};
use crate::ports::llm_gateway::LlmGateway;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::prompts::PromptResolver;
use crate::use_cases::evaluate_round::{
    EvaluateRoundInput, EvaluateRoundUseCase, RoundEvaluation,
};
use crate::use_cases::generate_round::{
    GenerateRoundError, GenerateRoundInput, GenerateRoundUseCase,
};
use crate::use_cases::iterate_round::{IterateRoundError, IterateRoundInput, IterateRoundUseCase};
use serde::Serialize;
use songmaster_domain::{
    Agent, AgentId, ArtistProfile, DomainError, GenerationRound, IterationContext,
    IterationFeedback, IterationState, PromptKey, SongCandidate, SongPrompt, SongRequest,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Result of one full round
///
/// The round always has at least one candidate. `evaluation` is `None`
/// when the orchestrator call failed; the reason is kept in
/// `evaluation_error`.
#[derive(Debug, Clone, Serialize)]
pub struct RoundOutcome {
    pub round: GenerationRound,
    pub evaluation: Option<RoundEvaluation>,
    pub evaluation_error: Option<String>,
}

impl RoundOutcome {
    /// The agent whose candidate currently wins, override included.
    pub fn winner_id(&self) -> Option<&AgentId> {
        self.evaluation
            .as_ref()
            .map(|e| e.winner.effective_winner())
    }

    pub fn winner(&self) -> Option<&SongCandidate> {
        self.winner_id().and_then(|id| self.round.candidate(id))
    }

    /// Replace the orchestrator's pick with the user's.
    pub fn override_winner(&mut self, agent_id: AgentId) -> Result<(), DomainError> {
        if self.round.candidate(&agent_id).is_none() {
            return Err(DomainError::UnknownAgent(agent_id.to_string()));
        }
        let evaluation = self
            .evaluation
            .as_mut()
            .ok_or_else(|| DomainError::UnknownAgent(agent_id.to_string()))?;
        evaluation.winner.set_override(agent_id);
        Ok(())
    }

    /// Context for revising the current winner.
    ///
    /// The iteration number is filled in when the iteration runs.
    pub fn iteration_context(&self, request: &SongRequest) -> Option<IterationContext> {
        let id = self.winner_id()?;
        let candidate = self.round.candidate(id)?;
        let feedback = self
            .evaluation
            .as_ref()
            .and_then(|e| e.bundle.evaluation(id))
            .map(IterationFeedback::from)
            .unwrap_or_default();
        Some(IterationContext::new(
            feedback,
            request,
            candidate.base_song(),
            0,
        ))
    }
}

/// Input for a fresh round
#[derive(Debug, Clone)]
pub struct RunRoundInput {
    pub request: SongRequest,
    pub agents: Vec<Agent>,
    pub orchestrator: Agent,
}

impl RunRoundInput {
    pub fn new(request: SongRequest, agents: Vec<Agent>, orchestrator: Agent) -> Self {
        Self {
            request,
            agents,
            orchestrator,
        }
    }
}

/// Input for an iteration round
#[derive(Debug, Clone)]
pub struct RunIterationInput {
    pub context: IterationContext,
    /// The agents that produced the base song
    pub agents: Vec<Agent>,
    pub orchestrator: Agent,
    pub artist: Option<ArtistProfile>,
}

impl RunIterationInput {
    pub fn new(context: IterationContext, agents: Vec<Agent>, orchestrator: Agent) -> Self {
        Self {
            context,
            agents,
            orchestrator,
            artist: None,
        }
    }

    pub fn with_artist(mut self, artist: Option<ArtistProfile>) -> Self {
        self.artist = artist;
        self
    }
}

/// Use case composing generation and evaluation
pub struct RunRoundUseCase<G: LlmGateway + 'static> {
    generate: GenerateRoundUseCase<G>,
    iterate: IterateRoundUseCase<G>,
    evaluate: EvaluateRoundUseCase<G>,
    prompts: Arc<PromptResolver>,
}

impl<G: LlmGateway + 'static> RunRoundUseCase<G> {
    pub fn new(gateway: Arc<G>, params: GenerationParams, prompts: Arc<PromptResolver>) -> Self {
        Self::with_logger(gateway, params, prompts, Arc::new(NoExchangeLogger))
    }

    pub fn with_logger(
        gateway: Arc<G>,
        params: GenerationParams,
        prompts: Arc<PromptResolver>,
        logger: Arc<dyn ExchangeLogger>,
    ) -> Self {
        Self {
            generate: GenerateRoundUseCase::new(Arc::clone(&gateway), params.clone())
                .with_logger(Arc::clone(&logger)),
            iterate: IterateRoundUseCase::new(Arc::clone(&gateway), params.clone())
                .with_logger(Arc::clone(&logger)),
            evaluate: EvaluateRoundUseCase::new(gateway, params).with_logger(logger),
            prompts,
        }
    }

    pub async fn execute(&self, input: RunRoundInput) -> Result<RoundOutcome, GenerateRoundError> {
        self.execute_with_progress(input, &NoProgress, &CancellationToken::new())
            .await
    }

    /// Run a fresh round.
    pub async fn execute_with_progress(
        &self,
        input: RunRoundInput,
        progress: &dyn ProgressNotifier,
        cancel: &CancellationToken,
    ) -> Result<RoundOutcome, GenerateRoundError> {
        let template = self.prompts.template(PromptKey::SongGeneration).await;
        let system_prompt = SongPrompt::render(&template, &input.request);

        let generate_input =
            GenerateRoundInput::new(input.request.clone(), input.agents, system_prompt);
        let round = self
            .generate
            .execute_with_progress(generate_input, progress, cancel)
            .await?;

        Ok(self
            .evaluate_round(round, &input.request, input.orchestrator, progress, cancel)
            .await)
    }

    /// Run the next iteration of a song.
    ///
    /// `state.next_number()` is the iteration attempted; it advances only on
    /// success.
    pub async fn iterate_with_progress(
        &self,
        state: &mut IterationState,
        input: RunIterationInput,
        progress: &dyn ProgressNotifier,
        cancel: &CancellationToken,
    ) -> Result<RoundOutcome, IterateRoundError> {
        let template = self.prompts.template(PromptKey::SongGeneration).await;
        let mut request = input.context.request();
        request.artist = input.artist.clone();

        let iterate_input = IterateRoundInput::new(input.context, input.agents, template)
            .with_artist(input.artist);
        let round = self
            .iterate
            .execute_with_progress(state, iterate_input, progress, cancel)
            .await?;

        Ok(self
            .evaluate_round(round, &request, input.orchestrator, progress, cancel)
            .await)
    }

    async fn evaluate_round(
        &self,
        round: GenerationRound,
        request: &SongRequest,
        orchestrator: Agent,
        progress: &dyn ProgressNotifier,
        cancel: &CancellationToken,
    ) -> RoundOutcome {
        let system_prompt = self.prompts.template(PromptKey::Orchestrator).await;
        let input = EvaluateRoundInput::new(
            request.clone(),
            round.results().clone(),
            orchestrator,
            system_prompt,
        );

        match self.evaluate.execute_with_progress(input, progress, cancel).await {
            Ok(evaluation) => RoundOutcome {
                round,
                evaluation: Some(evaluation),
                evaluation_error: None,
            },
            Err(e) => {
                info!("Round {} has no winner: {}", round.number, e);
                RoundOutcome {
                    round,
                    evaluation: None,
                    evaluation_error: Some(e.to_string()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::{MockGateway, Reply, agent, model_of, song_json};
    use serde_json::json;

    fn judge() -> Agent {
        Agent::new("judge", "Judge", model_of("judge"))
    }

    fn verdict() -> serde_json::Value {
        json!({
            "evaluations": {
                "a": {"scores": {"music_style": 7, "lyrics": 7, "originality": 7, "cohesion": 7}},
                "b": {"scores": {"music_style": 9, "lyrics": 9, "originality": 8, "cohesion": 9},
                      "strengths": ["memorable hook"],
                      "weaknesses": ["chorus repeats too much"],
                      "recommendations": {"quick_wins": ["vary the last chorus"]}},
                "c": {"scores": {"music_style": 6, "lyrics": 6, "originality": 6, "cohesion": 6}}
            },
            "winner_agent_id": "b",
            "winner_reason": "Best hook"
        })
    }

    fn use_case(gateway: MockGateway) -> (Arc<MockGateway>, RunRoundUseCase<MockGateway>) {
        let gateway = Arc::new(gateway);
        let use_case = RunRoundUseCase::new(
            Arc::clone(&gateway),
            GenerationParams::default(),
            Arc::new(PromptResolver::defaults_only()),
        );
        (gateway, use_case)
    }

    fn three_agents() -> MockGateway {
        MockGateway::new()
            .with(&model_of("a"), Reply::json(song_json("A")))
            .with(&model_of("b"), Reply::json(song_json("Rainfall")))
            .with(&model_of("c"), Reply::json(song_json("C")))
    }

    fn input() -> RunRoundInput {
        RunRoundInput::new(
            SongRequest::new("a song about rain", "dream pop"),
            vec![agent("a"), agent("b"), agent("c")],
            judge(),
        )
    }

    #[tokio::test]
    async fn test_full_round_picks_winner() {
        let (gateway, use_case) = use_case(three_agents().with(&model_of("judge"), Reply::json(verdict())));

        let outcome = use_case.execute(input()).await.unwrap();
        assert_eq!(outcome.round.completed_count(), 3);
        assert_eq!(outcome.round.failed_count(), 0);
        assert_eq!(outcome.winner_id(), Some(&AgentId::new("b")));
        assert_eq!(outcome.winner().unwrap().name, "Rainfall");
        assert_eq!(gateway.requests_for(&model_of("judge")).len(), 1);
    }

    #[tokio::test]
    async fn test_all_failed_never_calls_orchestrator() {
        let gateway = MockGateway::new()
            .with(&model_of("a"), Reply::http_500())
            .with(&model_of("b"), Reply::text("nope"))
            .with(&model_of("c"), Reply::http_500())
            .with(&model_of("judge"), Reply::json(verdict()));
        let (gateway, use_case) = use_case(gateway);

        let result = use_case.execute(input()).await;
        assert!(matches!(result, Err(GenerateRoundError::AllAgentsFailed { .. })));
        assert!(gateway.requests_for(&model_of("judge")).is_empty());
    }

    #[tokio::test]
    async fn test_orchestrator_failure_keeps_candidates() {
        let (_, use_case) = use_case(three_agents().with(&model_of("judge"), Reply::http_500()));

        let outcome = use_case.execute(input()).await.unwrap();
        assert_eq!(outcome.round.completed_count(), 3);
        assert!(outcome.evaluation.is_none());
        assert!(outcome.winner().is_none());
        assert!(outcome.evaluation_error.unwrap().contains("500"));
    }

    #[tokio::test]
    async fn test_override_winner() {
        let (_, use_case) = use_case(three_agents().with(&model_of("judge"), Reply::json(verdict())));
        let mut outcome = use_case.execute(input()).await.unwrap();

        outcome.override_winner(AgentId::new("c")).unwrap();
        assert_eq!(outcome.winner().unwrap().name, "C");
        assert!(outcome.override_winner(AgentId::new("zzz")).is_err());
    }

    #[tokio::test]
    async fn test_iterate_on_winner() {
        let (gateway, use_case) = use_case(three_agents().with(&model_of("judge"), Reply::json(verdict())));
        let request = SongRequest::new("a song about rain", "dream pop");

        let outcome = use_case.execute(input()).await.unwrap();
        let winner = outcome.winner().unwrap().clone();
        let context = outcome.iteration_context(&request).unwrap();
        assert_eq!(context.evaluation.weaknesses, vec!["chorus repeats too much"]);
        assert_eq!(context.base_song, winner.base_song());

        let mut state = IterationState::with_original_title(winner.name.clone());
        let next = use_case
            .iterate_with_progress(
                &mut state,
                RunIterationInput::new(context, vec![agent("a"), agent("b"), agent("c")], judge()),
                &NoProgress,
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(state.completed(), 1);
        assert_eq!(next.winner().unwrap().name, "Rainfall (Iteration #1)");

        let iteration_prompt = &gateway.requests_for(&model_of("a"))[1].messages[0].content;
        assert!(iteration_prompt.contains("vary the last chorus"));
        assert!(iteration_prompt.contains(&winner.lyrics));
        assert_eq!(gateway.requests_for(&model_of("judge")).len(), 2);
    }
}
