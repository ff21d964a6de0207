//! Song candidate value objects

use crate::iteration::IterationTitle;
use serde::{Deserialize, Serialize};

/// Title used when a model omits the `name` field.
pub const UNTITLED: &str = "Untitled";

/// One agent's generated song specification (Value Object)
///
/// Superseded, never mutated, by the next iteration round.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongCandidate {
    /// Song title (kept under 50 characters by prompt convention)
    pub name: String,
    /// Free-text music style description
    #[serde(alias = "style_description", default)]
    pub style: String,
    /// Lyrics, possibly containing section markers such as `[Chorus]`
    #[serde(default)]
    pub lyrics: String,
}

impl SongCandidate {
    pub fn new(
        name: impl Into<String>,
        style: impl Into<String>,
        lyrics: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            style: style.into(),
            lyrics: lyrics.into(),
        }
    }

    /// A candidate is usable only with a non-blank title and non-blank lyrics.
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && !self.lyrics.trim().is_empty()
    }

    /// Names of the required fields that are blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.lyrics.trim().is_empty() {
            missing.push("lyrics");
        }
        missing
    }

    /// Replace the model's own title with the established iteration title.
    pub fn retitled(mut self, title: &IterationTitle) -> Self {
        self.name = title.display();
        self
    }

    /// The part of this candidate an iteration revises.
    pub fn base_song(&self) -> BaseSong {
        BaseSong {
            style: self.style.clone(),
            lyrics: self.lyrics.clone(),
        }
    }
}

/// The literal content an iteration round starts from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseSong {
    #[serde(alias = "style_description", default)]
    pub style: String,
    #[serde(default)]
    pub lyrics: String,
}

impl BaseSong {
    pub fn new(style: impl Into<String>, lyrics: impl Into<String>) -> Self {
        Self {
            style: style.into(),
            lyrics: lyrics.into(),
        }
    }
}
