//! Save Song use case
//!
//! Persists the winning candidate of a round (the user's override when one
//! is set) to the song library.

use crate::ports::song_repository::{RepositoryError, SavedSong, SongRepository};
use crate::use_cases::run_round::RoundOutcome;
use songmaster_domain::AgentId;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum SaveSongError {
    #[error("Round has no winner to save")]
    NoWinner,

    #[error("Winner {0} has no candidate in this round")]
    MissingCandidate(AgentId),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Input for the SaveSong use case
#[derive(Debug, Clone, Default)]
pub struct SaveSongInput {
    /// Successful iterations behind the winning song
    pub iteration_count: u32,
    /// Title preserved across those iterations
    pub original_title: Option<String>,
    pub artist_id: Option<String>,
}

pub struct SaveSongUseCase {
    repository: Arc<dyn SongRepository>,
}

impl SaveSongUseCase {
    pub fn new(repository: Arc<dyn SongRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(
        &self,
        outcome: &RoundOutcome,
        input: SaveSongInput,
    ) -> Result<SavedSong, SaveSongError> {
        let evaluation = outcome.evaluation.as_ref().ok_or(SaveSongError::NoWinner)?;
        let winner_id = evaluation.winner.effective_winner();
        let candidate = outcome
            .round
            .candidate(winner_id)
            .ok_or_else(|| SaveSongError::MissingCandidate(winner_id.clone()))?;

        let mut song = SavedSong::from_candidate(candidate, input.iteration_count);
        song.winner_agent_id = Some(winner_id.clone());
        song.winner_reason = Some(evaluation.winner.reason.clone()).filter(|r| !r.is_empty());
        song.original_title = input.original_title;
        song.artist_id = input.artist_id;

        let saved = self.repository.save(song).await?;
        info!("Saved \"{}\" as {}", saved.name, saved.id);
        Ok(saved)
    }
}
