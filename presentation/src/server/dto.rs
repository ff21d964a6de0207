//! Request and response bodies of the HTTP API

use serde::{Deserialize, Serialize};
use songmaster_application::RoundEvaluation;
use songmaster_domain::{
    Agent, AgentFailure, AgentId, ArtistProfile, BaseSong, Evaluation, GenerationRound,
    IterationContext, IterationFeedback, SongCandidate, SongRequest, WinnerAnalysis,
};
use std::collections::BTreeMap;

/// One agent selected for a request
#[derive(Debug, Clone, Deserialize)]
pub struct AgentDto {
    pub agent_id: AgentId,
    pub model_name: String,
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

impl AgentDto {
    pub fn to_agent(&self, default_max_tokens: u32) -> Agent {
        Agent::from_model(self.agent_id.clone(), self.model_name.as_str())
            .with_max_tokens(self.max_tokens.unwrap_or(default_max_tokens))
    }
}

/// `POST /api/generate`
///
/// A request carrying `iteration_context` or `base_song` revises an existing
/// song instead of writing a new one. `original_title` with a positive
/// `iteration_number` retitles every candidate either way.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub song_id: Option<String>,
    pub agents: Vec<AgentDto>,
    pub user_request: String,
    #[serde(default)]
    pub user_style: String,
    #[serde(default)]
    pub artist_context: Option<ArtistProfile>,
    #[serde(default)]
    pub custom_instructions: Option<String>,
    #[serde(default)]
    pub iteration_context: Option<IterationContext>,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub iteration_number: Option<u32>,
    #[serde(default)]
    pub base_song: Option<BaseSong>,
}

impl GenerateRequest {
    pub fn song_request(&self) -> SongRequest {
        SongRequest {
            description: self.user_request.clone(),
            style: self.user_style.clone(),
            artist: self.artist_context.clone(),
            custom_instructions: self.custom_instructions.clone(),
        }
    }

    pub fn is_iteration(&self) -> bool {
        self.iteration_context.is_some() || self.base_song.is_some()
    }

    /// The iteration context to revise from, with request-level fields
    /// taking precedence over the embedded context.
    pub fn iteration(&self) -> Option<IterationContext> {
        if !self.is_iteration() {
            return None;
        }
        let request = self.song_request();
        let mut context = self.iteration_context.clone().unwrap_or_else(|| {
            IterationContext::new(IterationFeedback::default(), &request, BaseSong::default(), 0)
        });
        if let Some(base_song) = &self.base_song {
            context.base_song = base_song.clone();
        }
        if let Some(instructions) = request.instructions() {
            context.custom_instructions = Some(instructions.to_string());
        }
        Some(context)
    }

    /// Iteration number to attempt: explicit field, then the context's, then 1.
    pub fn iteration_number(&self) -> u32 {
        self.iteration_number
            .or_else(|| {
                self.iteration_context
                    .as_ref()
                    .map(|c| c.iteration_number)
            })
            .filter(|n| *n > 0)
            .unwrap_or(1)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedAgentDto {
    pub agent_id: AgentId,
    pub error: String,
}

pub fn failed_agents(failures: &[AgentFailure]) -> Vec<FailedAgentDto> {
    failures
        .iter()
        .map(|f| FailedAgentDto {
            agent_id: f.agent_id.clone(),
            error: f.error.clone(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub song_id: Option<String>,
    pub results: BTreeMap<AgentId, SongCandidate>,
    pub completed_count: usize,
    pub failed_count: usize,
    pub failed_agents: Vec<FailedAgentDto>,
}

impl GenerateResponse {
    pub fn from_round(song_id: Option<String>, round: &GenerationRound) -> Self {
        Self {
            song_id,
            results: round.results().clone(),
            completed_count: round.completed_count(),
            failed_count: round.failed_count(),
            failed_agents: failed_agents(&round.failed_agents()),
        }
    }
}

/// `POST /api/orchestrate`
#[derive(Debug, Clone, Deserialize)]
pub struct OrchestrateRequest {
    #[serde(default)]
    pub song_id: Option<String>,
    pub user_request: String,
    #[serde(default)]
    pub user_style: String,
    pub songs: BTreeMap<AgentId, SongCandidate>,
    #[serde(default)]
    pub orchestrator_model_name: Option<String>,
}

impl OrchestrateRequest {
    pub fn song_request(&self) -> SongRequest {
        SongRequest::new(self.user_request.as_str(), self.user_style.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrchestrateResponse {
    pub song_id: Option<String>,
    pub evaluations: BTreeMap<AgentId, Evaluation>,
    pub winner_agent_id: AgentId,
    pub winner_reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner_analysis: Option<WinnerAnalysis>,
}

impl OrchestrateResponse {
    pub fn from_evaluation(song_id: Option<String>, evaluation: RoundEvaluation) -> Self {
        Self {
            song_id,
            evaluations: evaluation.bundle.evaluations,
            winner_agent_id: evaluation.winner.agent_id,
            winner_reason: evaluation.winner.reason,
            winner_analysis: evaluation.winner.analysis,
        }
    }
}

/// `POST /api/generate-artist`
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateArtistRequest {
    pub input: String,
    #[serde(default)]
    pub model_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateArtistResponse {
    pub options: Vec<ArtistProfile>,
}
