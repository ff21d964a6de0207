//! Route handlers

use super::dto::{
    GenerateArtistRequest, GenerateArtistResponse, GenerateRequest, GenerateResponse,
    OrchestrateRequest, OrchestrateResponse,
};
use super::error::ApiError;
use super::state::AppState;
use axum::extract::State;
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use serde_json::{Value, json};
use songmaster_application::{
    EvaluateRoundInput, GenerateRoundError, GenerateRoundInput, IterateRoundInput, LlmGateway,
};
use songmaster_domain::{Agent, IterationState, IterationTitle, PromptKey, SongPrompt};
use std::sync::Arc;
use tracing::info;

type SharedState<G> = State<Arc<AppState<G>>>;

pub fn api_router<G: LlmGateway + 'static>() -> Router<Arc<AppState<G>>> {
    Router::new()
        .route("/health", get(health))
        .route("/generate", post(generate::<G>))
        .route("/orchestrate", post(orchestrate::<G>))
        .route("/generate-artist", post(generate_artist::<G>))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// POST /api/generate - one generation round, fresh or iterating.
async fn generate<G: LlmGateway + 'static>(
    State(state): SharedState<G>,
    Json(body): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let agents: Vec<Agent> = body
        .agents
        .iter()
        .map(|a| a.to_agent(state.defaults.max_tokens))
        .collect();
    if agents.is_empty() {
        return Err(GenerateRoundError::NoAgents.into());
    }

    let template = state.prompts.template(PromptKey::SongGeneration).await;
    let round = match body.iteration() {
        Some(context) => {
            let mut iteration =
                IterationState::resume(body.original_title.clone(), body.iteration_number());
            let input = IterateRoundInput::new(context, agents, template)
                .with_artist(body.artist_context.clone());
            state.iterate.execute(&mut iteration, input).await?
        }
        None => {
            let request = body.song_request();
            let system_prompt = SongPrompt::render(&template, &request);
            let number = body.iteration_number.unwrap_or(0);
            let input = GenerateRoundInput::new(request, agents, system_prompt)
                .with_title(IterationTitle::for_round(body.original_title.as_deref(), number))
                .with_round_number(number);
            state.generate.execute(input).await?
        }
    };

    info!(
        song_id = body.song_id.as_deref().unwrap_or("-"),
        round = round.number,
        completed = round.completed_count(),
        failed = round.failed_count(),
        "Generation finished"
    );
    Ok(Json(GenerateResponse::from_round(body.song_id, &round)))
}

/// POST /api/orchestrate - score a set of candidates and pick a winner.
async fn orchestrate<G: LlmGateway + 'static>(
    State(state): SharedState<G>,
    Json(body): Json<OrchestrateRequest>,
) -> Result<Json<OrchestrateResponse>, ApiError> {
    let mut orchestrator = state.defaults.orchestrator.clone();
    if let Some(model) = body
        .orchestrator_model_name
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
    {
        orchestrator.model = model.to_string();
    }

    let system_prompt = state.prompts.template(PromptKey::Orchestrator).await;
    let input = EvaluateRoundInput::new(
        body.song_request(),
        body.songs,
        orchestrator,
        system_prompt,
    );
    let evaluation = state.evaluate.execute(input).await?;

    Ok(Json(OrchestrateResponse::from_evaluation(
        body.song_id,
        evaluation,
    )))
}

/// POST /api/generate-artist - up to three artist options for an idea.
async fn generate_artist<G: LlmGateway + 'static>(
    State(state): SharedState<G>,
    Json(body): Json<GenerateArtistRequest>,
) -> Result<Json<GenerateArtistResponse>, ApiError> {
    let model = body
        .model_name
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| state.defaults.artist_model.clone());
    let agent = Agent::from_model("artist", model);

    let options = state.artists.execute(&body.input, &agent).await?;
    Ok(Json(GenerateArtistResponse { options }))
}
