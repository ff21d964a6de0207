//! Orchestrator user prompt

use crate::agent::AgentId;
use crate::core::string::preview;
use crate::song::{SongCandidate, SongRequest};
use std::collections::BTreeMap;

/// Characters of lyrics shown to the orchestrator per candidate.
pub const DEFAULT_LYRICS_PREVIEW_CHARS: usize = 500;

/// Builds the user message of the orchestrator call
pub struct OrchestratorPrompt;

impl OrchestratorPrompt {
    /// Embed every candidate (title, style, lyrics preview) below the
    /// original request.
    pub fn build(
        request: &SongRequest,
        candidates: &BTreeMap<AgentId, SongCandidate>,
        lyrics_preview_chars: usize,
    ) -> String {
        let mut prompt = format!(
            "# User Request\nSong Description: {}\nDesired Style: {}\n\n# Songs to Evaluate\n\n",
            request.description, request.style
        );

        let songs: Vec<String> = candidates
            .iter()
            .map(|(id, song)| {
                format!(
                    "[Agent: {}]\nName: {}\nStyle: {}\nLyrics: {}",
                    id,
                    song.name,
                    song.style,
                    preview(&song.lyrics, lyrics_preview_chars)
                )
            })
            .collect();
        prompt.push_str(&songs.join("\n\n---\n\n"));

        prompt.push_str(
            "\n\nEvaluate every song above using the agent ids shown as keys, then pick the winner.",
        );
        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_embeds_all_candidates() {
        let mut candidates = BTreeMap::new();
        candidates.insert(AgentId::new("a"), SongCandidate::new("First", "pop", "la la"));
        candidates.insert(AgentId::new("b"), SongCandidate::new("Second", "rock", "yeah"));

        let prompt = OrchestratorPrompt::build(&SongRequest::new("rain", "folk"), &candidates, 500);
        assert!(prompt.contains("[Agent: a]\nName: First"));
        assert!(prompt.contains("[Agent: b]\nName: Second"));
        assert!(prompt.contains("Song Description: rain"));
        assert_eq!(prompt.matches("\n---\n").count(), 1);
    }

    #[test]
    fn test_long_lyrics_truncated_with_ellipsis() {
        let lyrics = "x".repeat(600);
        let mut candidates = BTreeMap::new();
        candidates.insert(AgentId::new("a"), SongCandidate::new("Long", "pop", lyrics));

        let prompt = OrchestratorPrompt::build(&SongRequest::new("r", "s"), &candidates, 500);
        let expected = format!("Lyrics: {}...", "x".repeat(500));
        assert!(prompt.contains(&expected));
        assert!(!prompt.contains(&"x".repeat(501)));
    }
}
