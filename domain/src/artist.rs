//! Artist profiles
//!
//! An artist profile gives generation agents a consistent voice to write for.
//! Profiles live in the persistent store; the core only renders them into
//! prompt context.

use serde::{Deserialize, Serialize};

/// Context line used when no artist is attached to a request.
pub const NO_ARTIST_CONTEXT: &str = "Create an original artist style";

/// A fictional artist or band (Value Object)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistProfile {
    pub name: String,
    #[serde(default)]
    pub style_description: String,
    #[serde(default)]
    pub special_characteristics: String,
}

impl ArtistProfile {
    pub fn new(
        name: impl Into<String>,
        style_description: impl Into<String>,
        special_characteristics: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            style_description: style_description.into(),
            special_characteristics: special_characteristics.into(),
        }
    }

    /// Render the profile as prompt context.
    pub fn context_text(&self) -> String {
        format!(
            "Artist: {}\nStyle: {}\nCharacteristics: {}",
            self.name, self.style_description, self.special_characteristics
        )
    }

    /// Render an optional profile, falling back to [`NO_ARTIST_CONTEXT`].
    pub fn context_or_default(artist: Option<&ArtistProfile>) -> String {
        artist
            .map(ArtistProfile::context_text)
            .unwrap_or_else(|| NO_ARTIST_CONTEXT.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_text() {
        let artist = ArtistProfile::new("Neon Tide", "synthwave", "analog warmth");
        assert_eq!(
            artist.context_text(),
            "Artist: Neon Tide\nStyle: synthwave\nCharacteristics: analog warmth"
        );
    }

    #[test]
    fn test_missing_artist_uses_default() {
        assert_eq!(ArtistProfile::context_or_default(None), NO_ARTIST_CONTEXT);
    }
}
