//! Song request value objects

use crate::artist::ArtistProfile;
use serde::{Deserialize, Serialize};

/// What the user asked for in a round
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongRequest {
    /// Free-text song description
    pub description: String,
    /// Free-text style description
    pub style: String,
    /// Artist the song is written for, if any
    #[serde(default)]
    pub artist: Option<ArtistProfile>,
    /// Extra instructions appended to the user message
    #[serde(default)]
    pub custom_instructions: Option<String>,
}

impl SongRequest {
    pub fn new(description: impl Into<String>, style: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            style: style.into(),
            artist: None,
            custom_instructions: None,
        }
    }

    pub fn with_artist(mut self, artist: ArtistProfile) -> Self {
        self.artist = Some(artist);
        self
    }

    pub fn with_custom_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.custom_instructions = Some(instructions.into());
        self
    }

    /// Custom instructions, ignoring blank strings.
    pub fn instructions(&self) -> Option<&str> {
        self.custom_instructions
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// The user message of a generation call: the song description,
    /// suffixed with custom instructions when present.
    pub fn user_message(&self) -> String {
        match self.instructions() {
            Some(extra) => format!("{}\n\nAdditional instructions: {}", self.description, extra),
            None => self.description.clone(),
        }
    }
}

/// Lifecycle of a saved song
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SongStatus {
    Draft,
    Iterating,
    Saved,
    Completed,
}

impl SongStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SongStatus::Draft => "draft",
            SongStatus::Iterating => "iterating",
            SongStatus::Saved => "saved",
            SongStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for SongStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
