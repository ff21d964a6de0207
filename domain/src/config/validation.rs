//! Structured configuration issues.
//!
//! Config loaders report problems (empty identifiers, duplicate agents, zero
//! token budgets) as [`ConfigIssue`]s instead of failing on the first one, so
//! the caller can print every problem at once and decide whether to start.

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// An agent entry has an empty `id`.
    EmptyAgentId,
    /// Two agent entries share the same `id`.
    DuplicateAgentId { id: String },
    /// A model identifier is empty.
    EmptyModelName { field: String },
    /// A token budget is zero.
    ZeroTokenBudget { field: String },
    /// No generation agents are configured.
    NoAgents,
}

/// A detected issue in the configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}
