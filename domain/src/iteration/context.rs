//! Iteration context value objects

use crate::evaluation::{Evaluation, Recommendations, Scores};
use crate::song::{BaseSong, SongRequest};
use serde::{Deserialize, Serialize};

/// The critique an iteration must act on
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IterationFeedback {
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub recommendations: Recommendations,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scores: Option<Scores>,
}

impl From<&Evaluation> for IterationFeedback {
    fn from(evaluation: &Evaluation) -> Self {
        Self {
            strengths: evaluation.strengths.clone(),
            weaknesses: evaluation.weaknesses.clone(),
            recommendations: evaluation.recommendations.clone(),
            scores: (!evaluation.scores.is_empty()).then(|| evaluation.scores.clone()),
        }
    }
}

/// Feedback package carried from one round to the next (Value Object)
///
/// Consumed once to build the next round's prompts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IterationContext {
    pub evaluation: IterationFeedback,
    pub original_request: String,
    pub original_style: String,
    #[serde(default)]
    pub custom_instructions: Option<String>,
    /// The song being revised
    #[serde(default)]
    pub base_song: BaseSong,
    /// Sequence number of the iteration this context produces (1-based)
    #[serde(default)]
    pub iteration_number: u32,
}

impl IterationContext {
    pub fn new(
        feedback: IterationFeedback,
        request: &SongRequest,
        base_song: BaseSong,
        iteration_number: u32,
    ) -> Self {
        Self {
            evaluation: feedback,
            original_request: request.description.clone(),
            original_style: request.style.clone(),
            custom_instructions: request.custom_instructions.clone(),
            base_song,
            iteration_number,
        }
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

    /// The request this iteration revises, carrying the iteration's own
    /// custom instructions.
    pub fn request(&self) -> SongRequest {
        SongRequest {
            description: self.original_request.clone(),
            style: self.original_style.clone(),
            artist: None,
            custom_instructions: self.custom_instructions.clone(),
        }
    }
}
