//! Evaluate Round use case
//!
//! One orchestrator call that scores every successful candidate of a round
//! and names a winner. There is no fan-out and no retry: a failed call
//! leaves the round without evaluations.

use crate::config::GenerationParams;
use crate::ports::exchange_logger::{ExchangeLogger, NoExchangeLogger};
use crate::ports::llm_gateway::{CompletionRequest, GatewayError, LlmGateway};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::use_cases::shared::{CallError, complete_cancellable, log_exchange};
use serde::Serialize;
use songmaster_domain::{
    Agent, AgentId, AgentStatus, EvaluationBundle, OrchestratorPrompt, ParseError, Phase,
    SongCandidate, SongRequest, WinnerSelection, parse_evaluation_bundle,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that leave a round without evaluations
#[derive(Error, Debug)]
pub enum EvaluateRoundError {
    #[error("No candidates to evaluate")]
    NoCandidates,

    #[error("Orchestrator call failed: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Orchestrator timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("Orchestrator call cancelled")]
    Cancelled,

    #[error("Orchestrator response could not be parsed: {0}")]
    Parse(#[from] ParseError),

    #[error("Orchestrator did not evaluate any candidate")]
    NoEvaluations,
}

impl From<CallError> for EvaluateRoundError {
    fn from(err: CallError) -> Self {
        match err {
            CallError::Gateway(e) => EvaluateRoundError::Gateway(e),
            CallError::TimedOut(limit) => EvaluateRoundError::Timeout(limit),
            CallError::Cancelled => EvaluateRoundError::Cancelled,
        }
    }
}

/// Input for the EvaluateRound use case
#[derive(Debug, Clone)]
pub struct EvaluateRoundInput {
    pub request: SongRequest,
    /// Successful candidates only
    pub candidates: BTreeMap<AgentId, SongCandidate>,
    pub orchestrator: Agent,
    /// Orchestrator system prompt (scoring rubric and output shape)
    pub system_prompt: String,
}

impl EvaluateRoundInput {
    pub fn new(
        request: SongRequest,
        candidates: BTreeMap<AgentId, SongCandidate>,
        orchestrator: Agent,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            request,
            candidates,
            orchestrator,
            system_prompt: system_prompt.into(),
        }
    }
}

/// The orchestrator's verdict for a round
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundEvaluation {
    pub bundle: EvaluationBundle,
    pub winner: WinnerSelection,
}

/// Use case for the single orchestrator call of a round
pub struct EvaluateRoundUseCase<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    params: GenerationParams,
    logger: Arc<dyn ExchangeLogger>,
}

impl<G: LlmGateway + 'static> EvaluateRoundUseCase<G> {
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

    pub async fn execute(
        &self,
        input: EvaluateRoundInput,
    ) -> Result<RoundEvaluation, EvaluateRoundError> {
        self.execute_with_progress(input, &NoProgress, &CancellationToken::new())
            .await
    }

    pub async fn execute_with_progress(
        &self,
        input: EvaluateRoundInput,
        progress: &dyn ProgressNotifier,
        cancel: &CancellationToken,
    ) -> Result<RoundEvaluation, EvaluateRoundError> {
        if input.candidates.is_empty() {
            return Err(EvaluateRoundError::NoCandidates);
        }

        let orchestrator_id = input.orchestrator.id.clone();
        progress.on_phase_start(&Phase::Evaluation, 1);
        progress.on_agent_status(&Phase::Evaluation, &orchestrator_id, AgentStatus::Generating);

        let result = self.evaluate(&input, cancel).await;

        let status = if result.is_ok() {
            AgentStatus::Done
        } else {
            AgentStatus::Error
        };
        progress.on_agent_status(&Phase::Evaluation, &orchestrator_id, status);
        progress.on_phase_complete(&Phase::Evaluation);

        match &result {
            Ok(evaluation) => info!(
                "Orchestrator {} picked {}",
                orchestrator_id, evaluation.winner.agent_id
            ),
            Err(e) => warn!("Evaluation failed: {}", e),
        }
        result
    }

    async fn evaluate(
        &self,
        input: &EvaluateRoundInput,
        cancel: &CancellationToken,
    ) -> Result<RoundEvaluation, EvaluateRoundError> {
        info!(
            "Evaluating {} candidates with {}",
            input.candidates.len(),
            input.orchestrator
        );

        let user_prompt = OrchestratorPrompt::build(
            &input.request,
            &input.candidates,
            self.params.lyrics_preview_chars,
        );
        debug!(chars = user_prompt.len(), "Orchestrator prompt built");

        let request = CompletionRequest::for_agent(
            &input.orchestrator,
            input.system_prompt.clone(),
            user_prompt,
        )
        .with_temperature(self.params.temperature);

        let started = Instant::now();
        let result = complete_cancellable(
            self.gateway.as_ref(),
            request.clone(),
            self.params.request_timeout,
            cancel,
        )
        .await;

        log_exchange(
            self.logger.as_ref(),
            "evaluation",
            &input.orchestrator.id,
            &request,
            &result,
            started.elapsed(),
        );

        let raw = result?;
        let bundle = parse_evaluation_bundle(&raw)?;
        if bundle.evaluations.is_empty() {
            return Err(EvaluateRoundError::NoEvaluations);
        }

        if let Some(named) = &bundle.winner_agent_id
            && !input.candidates.contains_key(named)
        {
            warn!(
                "Orchestrator named unknown winner {}, falling back to highest score",
                named
            );
        }

        let winner = bundle
            .select_winner(input.candidates.keys())
            .ok_or(EvaluateRoundError::NoEvaluations)?;

        Ok(RoundEvaluation { bundle, winner })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::{MockGateway, Reply, model_of};
    use serde_json::json;

    fn candidates(ids: &[&str]) -> BTreeMap<AgentId, SongCandidate> {
        ids.iter()
            .map(|id| {
                (
                    AgentId::new(*id),
                    SongCandidate::new(format!("Song {}", id), "pop", "la la la"),
                )
            })
            .collect()
    }

    fn orchestrator() -> Agent {
        Agent::new("judge", "Judge", model_of("judge")).with_max_tokens(8000)
    }

    fn input(ids: &[&str]) -> EvaluateRoundInput {
        EvaluateRoundInput::new(
            SongRequest::new("rain", "folk"),
            candidates(ids),
            orchestrator(),
            "rubric",
        )
    }

    fn verdict(winner: &str) -> serde_json::Value {
        json!({
            "evaluations": {
                "a": {"scores": {"music_style": 6, "lyrics": 6, "originality": 6, "cohesion": 6}},
                "b": {"scores": {"music_style": 9, "lyrics": 8, "originality": 9, "cohesion": 9},
                      "weaknesses": ["chorus repeats too much"]},
                "c": {"scores": {"music_style": 7, "lyrics": 7, "originality": 7, "cohesion": 7}}
            },
            "winner_agent_id": winner,
            "winner_reason": "Strongest hook"
        })
    }

    fn use_case(reply: Reply) -> (Arc<MockGateway>, EvaluateRoundUseCase<MockGateway>) {
        let gateway = Arc::new(MockGateway::new().with(&model_of("judge"), reply));
        let use_case = EvaluateRoundUseCase::new(Arc::clone(&gateway), GenerationParams::default());
        (gateway, use_case)
    }

    #[tokio::test]
    async fn test_named_winner() {
        let (gateway, use_case) = use_case(Reply::json(verdict("b")));
        let evaluation = use_case.execute(input(&["a", "b", "c"])).await.unwrap();

        assert_eq!(evaluation.winner.agent_id, AgentId::new("b"));
        assert_eq!(evaluation.winner.reason, "Strongest hook");
        assert_eq!(evaluation.bundle.evaluations.len(), 3);

        let requests = gateway.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].max_tokens, 8000);
        assert_eq!(requests[0].messages[0].content, "rubric");
        assert!(requests[0].messages[1].content.contains("[Agent: c]"));
    }

    #[tokio::test]
    async fn test_unknown_winner_falls_back_to_best_score() {
        let (_, use_case) = use_case(Reply::json(verdict("zzz")));
        let evaluation = use_case.execute(input(&["a", "b", "c"])).await.unwrap();
        assert_eq!(evaluation.winner.agent_id, AgentId::new("b"));
        assert!(evaluation.winner.reason.starts_with("Highest total score"));
    }

    #[tokio::test]
    async fn test_truncated_verdict_is_repaired() {
        let full = verdict("b").to_string();
        let cut = &full[..full.find("\"winner_agent_id\"").unwrap()];
        let (_, use_case) = use_case(Reply::text(format!("```json\n{}", cut)));

        let evaluation = use_case.execute(input(&["a", "b", "c"])).await.unwrap();
        assert_eq!(evaluation.bundle.winner_agent_id, None);
        assert_eq!(evaluation.winner.agent_id, AgentId::new("b"));
    }

    #[tokio::test]
    async fn test_unparseable_verdict() {
        let (_, use_case) = use_case(Reply::text("I liked them all!"));
        let result = use_case.execute(input(&["a", "b"])).await;
        assert!(matches!(result, Err(EvaluateRoundError::Parse(_))));
    }

    #[tokio::test]
    async fn test_transport_failure_has_no_winner() {
        let (_, use_case) = use_case(Reply::http_500());
        let result = use_case.execute(input(&["a", "b"])).await;
        assert!(matches!(result, Err(EvaluateRoundError::Gateway(_))));
    }

    #[tokio::test]
    async fn test_empty_evaluations_is_failure() {
        let (_, use_case) = use_case(Reply::json(json!({"evaluations": {}, "winner_agent_id": "a"})));
        let result = use_case.execute(input(&["a"])).await;
        assert!(matches!(result, Err(EvaluateRoundError::NoEvaluations)));
    }

    #[tokio::test]
    async fn test_no_candidates_skips_call() {
        let (gateway, use_case) = use_case(Reply::json(verdict("a")));
        let result = use_case.execute(input(&[])).await;
        assert!(matches!(result, Err(EvaluateRoundError::NoCandidates)));
        assert_eq!(gateway.request_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout() {
        let (_, use_case) = use_case(Reply::Hang);
        let result = use_case.execute(input(&["a"])).await;
        assert!(matches!(result, Err(EvaluateRoundError::Timeout(_))));
    }
}
