//! Iteration title and counter

use serde::{Deserialize, Serialize};

/// Display title of an iteration round's candidates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IterationTitle {
    pub original_title: String,
    pub iteration_number: u32,
}

impl IterationTitle {
    pub fn new(original_title: impl Into<String>, iteration_number: u32) -> Self {
        Self {
            original_title: original_title.into(),
            iteration_number,
        }
    }

    /// Title only applies to actual iterations with a known original title.
    pub fn for_round(original_title: Option<&str>, iteration_number: u32) -> Option<Self> {
        match original_title.map(str::trim) {
            Some(title) if !title.is_empty() && iteration_number > 0 => {
                Some(Self::new(title, iteration_number))
            }
            _ => None,
        }
    }

    /// `"<original title> (Iteration #<n>)"`
    pub fn display(&self) -> String {
        format!(
            "{} (Iteration #{})",
            self.original_title, self.iteration_number
        )
    }
}

/// Counter and preserved title across iterations of one song (Entity)
///
/// The counter moves only when an iteration round succeeds, so a failed
/// attempt is retried under the same number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IterationState {
    original_title: Option<String>,
    completed: u32,
}

impl IterationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// State for a song whose first round produced `original_title`.
    pub fn with_original_title(original_title: impl Into<String>) -> Self {
        Self {
            original_title: Some(original_title.into()),
            completed: 0,
        }
    }

    /// State restored from a client that tracks the counter itself.
    ///
    /// `next_number` is the iteration the client is asking for.
    pub fn resume(original_title: Option<String>, next_number: u32) -> Self {
        Self {
            original_title: original_title.filter(|t| !t.trim().is_empty()),
            completed: next_number.saturating_sub(1),
        }
    }

    /// Set the original title if none has been established yet.
    ///
    /// Returns the established title, which never changes afterwards.
    pub fn establish_title(&mut self, title: &str) -> &str {
        self.original_title.get_or_insert_with(|| title.to_string())
    }

    pub fn original_title(&self) -> Option<&str> {
        self.original_title.as_deref()
    }

    /// Number of successful iteration rounds so far.
    pub fn completed(&self) -> u32 {
        self.completed
    }

    /// Sequence number of the next iteration attempt.
    pub fn next_number(&self) -> u32 {
        self.completed + 1
    }

    /// Title for the next iteration's candidates.
    pub fn next_title(&self) -> Option<IterationTitle> {
        IterationTitle::for_round(self.original_title(), self.next_number())
    }

    /// Record that iteration `next_number()` succeeded.
    pub fn record_success(&mut self) {
        self.completed += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resume_from_client_counter() {
        let state = IterationState::resume(Some("Rain".to_string()), 3);
        assert_eq!(state.completed(), 2);
        assert_eq!(state.next_title().unwrap().display(), "Rain (Iteration #3)");

        let state = IterationState::resume(Some("  ".to_string()), 0);
        assert_eq!(state.original_title(), None);
        assert_eq!(state.next_number(), 1);
    }

    #[test]
    fn test_display_title() {
        let title = IterationTitle::new("Midnight Drive", 3);
        assert_eq!(title.display(), "Midnight Drive (Iteration #3)");
    }

    #[test]
    fn test_for_round_requires_title_and_positive_number() {
        assert!(IterationTitle::for_round(Some("A"), 0).is_none());
        assert!(IterationTitle::for_round(None, 2).is_none());
        assert!(IterationTitle::for_round(Some("  "), 2).is_none());
        assert_eq!(
            IterationTitle::for_round(Some("A"), 2),
            Some(IterationTitle::new("A", 2))
        );
    }

    #[test]
    fn test_counter_moves_only_on_success() {
        let mut state = IterationState::with_original_title("Midnight Drive");
        assert_eq!(state.next_number(), 1);

        // A failed attempt leaves the number unchanged.
        assert_eq!(state.next_number(), 1);

        state.record_success();
        assert_eq!(state.completed(), 1);
        assert_eq!(
            state.next_title().unwrap().display(),
            "Midnight Drive (Iteration #2)"
        );
    }

    #[test]
    fn test_establish_title_is_sticky() {
        let mut state = IterationState::new();
        assert_eq!(state.establish_title("First"), "First");
        assert_eq!(state.establish_title("First (Iteration #1)"), "First");
    }
}
