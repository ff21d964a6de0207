//! Template keys and placeholder substitution

use super::defaults::{
    DEFAULT_ARTIST_GENERATION_PROMPT, DEFAULT_ORCHESTRATOR_PROMPT, DEFAULT_SONG_GENERATION_PROMPT,
};

/// Keys of editable prompt templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptKey {
    SongGeneration,
    Orchestrator,
    ArtistGeneration,
}

impl PromptKey {
    pub const ALL: [PromptKey; 3] = [
        PromptKey::SongGeneration,
        PromptKey::Orchestrator,
        PromptKey::ArtistGeneration,
    ];

    /// Key under which the template is stored.
    pub fn as_str(&self) -> &'static str {
        match self {
            PromptKey::SongGeneration => "song_generation",
            PromptKey::Orchestrator => "orchestrator",
            PromptKey::ArtistGeneration => "artist_generation",
        }
    }

    /// Built-in template used when the store has nothing for this key.
    pub fn default_template(&self) -> &'static str {
        match self {
            PromptKey::SongGeneration => DEFAULT_SONG_GENERATION_PROMPT,
            PromptKey::Orchestrator => DEFAULT_ORCHESTRATOR_PROMPT,
            PromptKey::ArtistGeneration => DEFAULT_ARTIST_GENERATION_PROMPT,
        }
    }
}

impl std::fmt::Display for PromptKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PromptKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PromptKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| format!("unknown prompt key: {}", s))
    }
}

/// Replace every `{name}` in `template` with its value.
///
/// Placeholders without a value are left untouched, as are literal braces
/// (JSON examples in templates).
pub fn render_template(template: &str, vars: &[(&str, &str)]) -> String {
    vars.iter().fold(template.to_string(), |acc, (name, value)| {
        acc.replace(&format!("{{{}}}", name), value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_replaces_all_occurrences() {
        let out = render_template("{a} and {a} and {b}", &[("a", "x"), ("b", "y")]);
        assert_eq!(out, "x and x and y");
    }

    #[test]
    fn test_render_leaves_unknown_and_json_braces() {
        let out = render_template(r#"{"name": "{title}"} {missing}"#, &[("title", "Song")]);
        assert_eq!(out, r#"{"name": "Song"} {missing}"#);
    }

    #[test]
    fn test_prompt_key_roundtrip() {
        for key in PromptKey::ALL {
            assert_eq!(key.as_str().parse::<PromptKey>().unwrap(), key);
        }
        assert!("nope".parse::<PromptKey>().is_err());
    }
}
