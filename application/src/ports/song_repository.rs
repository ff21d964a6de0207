//! Song repository port
//!
//! Persistence for winning songs the user chose to keep.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use songmaster_domain::{AgentId, SongCandidate, SongStatus};
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Library I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Library file is malformed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A song persisted to the library
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedSong {
    pub id: Uuid,
    /// Display title, including any `(Iteration #n)` suffix
    pub name: String,
    /// Title the song's iterations are named after, when it has been iterated
    #[serde(default)]
    pub original_title: Option<String>,
    pub lyrics: String,
    pub style_description: String,
    pub status: SongStatus,
    /// Number of successful iteration rounds behind this version
    pub iteration_count: u32,
    pub winner_agent_id: Option<AgentId>,
    pub winner_reason: Option<String>,
    pub artist_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl SavedSong {
    /// A freshly saved copy of `candidate`.
    pub fn from_candidate(candidate: &SongCandidate, iteration_count: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: candidate.name.clone(),
            original_title: None,
            lyrics: candidate.lyrics.clone(),
            style_description: candidate.style.clone(),
            status: SongStatus::Saved,
            iteration_count,
            winner_agent_id: None,
            winner_reason: None,
            artist_id: None,
            created_at: Utc::now(),
        }
    }

    /// The title further iterations of this song are named after.
    pub fn base_title(&self) -> &str {
        self.original_title.as_deref().unwrap_or(&self.name)
    }
}

#[async_trait]
pub trait SongRepository: Send + Sync {
    async fn save(&self, song: SavedSong) -> Result<SavedSong, RepositoryError>;

    async fn get(&self, id: Uuid) -> Result<Option<SavedSong>, RepositoryError>;

    /// Every saved song, newest first.
    async fn list(&self) -> Result<Vec<SavedSong>, RepositoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use songmaster_domain::IterationState;

    #[test]
    fn test_base_title_prefers_original() {
        let mut song =
            SavedSong::from_candidate(&SongCandidate::new("Rain (Iteration #1)", "pop", "la"), 1);
        assert_eq!(song.base_title(), "Rain (Iteration #1)");

        song.original_title = Some("Rain".to_string());
        let state = IterationState::resume(Some(song.base_title().to_string()), 2);
        assert_eq!(
            state.next_title().map(|t| t.display()).as_deref(),
            Some("Rain (Iteration #2)")
        );
    }

    #[test]
    fn test_original_title_defaults_when_missing() {
        let json = serde_json::json!({
            "id": Uuid::new_v4(),
            "name": "Harbor",
            "lyrics": "la",
            "style_description": "indie",
            "status": "saved",
            "iteration_count": 0,
            "winner_agent_id": null,
            "winner_reason": null,
            "artist_id": null,
            "created_at": "2026-01-01T00:00:00Z"
        });
        let song: SavedSong = serde_json::from_value(json).unwrap();
        assert_eq!(song.original_title, None);
        assert_eq!(song.base_title(), "Harbor");
    }
}
