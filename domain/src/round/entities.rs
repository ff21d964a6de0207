//! Round entities

use crate::agent::AgentId;
use crate::core::error::DomainError;
use crate::song::SongCandidate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Parallel generation by all selected agents
    Generation,
    /// Single orchestrator call scoring the candidates
    Evaluation,
}

impl Phase {
    pub fn display_name(&self) -> &str {
        match self {
            Phase::Generation => "Generation",
            Phase::Evaluation => "Evaluation",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Per-agent status within a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    Waiting,
    Generating,
    Done,
    Error,
}

impl AgentStatus {
    pub fn is_settled(&self) -> bool {
        matches!(self, AgentStatus::Done | AgentStatus::Error)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentStatus::Waiting => "waiting",
            AgentStatus::Generating => "generating",
            AgentStatus::Done => "done",
            AgentStatus::Error => "error",
        }
    }
}

impl std::fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why an agent failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The upstream call failed outright (network, non-success status)
    Transport,
    /// The completion was not JSON and could not be repaired
    Parse,
    /// The completion parsed but lacked a title or lyrics
    Incomplete,
    /// The upstream call did not answer in time
    Timeout,
    /// The round was cancelled before the agent answered
    Cancelled,
    /// The agent's task ended without reporting an outcome
    Aborted,
}

/// A recorded per-agent failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentFailure {
    pub agent_id: AgentId,
    pub kind: FailureKind,
    pub error: String,
}

impl AgentFailure {
    pub fn new(agent_id: AgentId, kind: FailureKind, error: impl Into<String>) -> Self {
        Self {
            agent_id,
            kind,
            error: error.into(),
        }
    }
}

/// The set of candidates produced by one fan-out (Entity)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRound {
    /// 0 for the initial round, incremented per iteration
    pub number: u32,
    statuses: BTreeMap<AgentId, AgentStatus>,
    results: BTreeMap<AgentId, SongCandidate>,
    failures: BTreeMap<AgentId, AgentFailure>,
}

impl GenerationRound {
    /// Create a round with every agent `waiting`.
    ///
    /// Fails if the same agent id appears twice.
    pub fn new<'a>(
        number: u32,
        agents: impl IntoIterator<Item = &'a AgentId>,
    ) -> Result<Self, DomainError> {
        let mut statuses = BTreeMap::new();
        for id in agents {
            if statuses.insert(id.clone(), AgentStatus::Waiting).is_some() {
                return Err(DomainError::DuplicateAgent(id.to_string()));
            }
        }
        Ok(Self {
            number,
            statuses,
            results: BTreeMap::new(),
            failures: BTreeMap::new(),
        })
    }

    pub fn status(&self, id: &AgentId) -> Option<AgentStatus> {
        self.statuses.get(id).copied()
    }

    pub fn statuses(&self) -> &BTreeMap<AgentId, AgentStatus> {
        &self.statuses
    }

    /// Move an agent from `waiting` to `generating`.
    pub fn mark_generating(&mut self, id: &AgentId) -> Result<(), DomainError> {
        let status = self.unsettled_status_mut(id)?;
        *status = AgentStatus::Generating;
        Ok(())
    }

    /// Settle an agent as `done` with its candidate.
    pub fn record_success(
        &mut self,
        id: &AgentId,
        candidate: SongCandidate,
    ) -> Result<(), DomainError> {
        let status = self.unsettled_status_mut(id)?;
        *status = AgentStatus::Done;
        self.results.insert(id.clone(), candidate);
        Ok(())
    }

    /// Settle an agent as `error` with the failure reason.
    pub fn record_failure(&mut self, failure: AgentFailure) -> Result<(), DomainError> {
        let id = failure.agent_id.clone();
        let status = self.unsettled_status_mut(&id)?;
        *status = AgentStatus::Error;
        self.failures.insert(id, failure);
        Ok(())
    }

    fn unsettled_status_mut(&mut self, id: &AgentId) -> Result<&mut AgentStatus, DomainError> {
        let status = self
            .statuses
            .get_mut(id)
            .ok_or_else(|| DomainError::UnknownAgent(id.to_string()))?;
        if status.is_settled() {
            return Err(DomainError::AgentAlreadySettled(id.to_string()));
        }
        Ok(status)
    }

    /// Agents that have not reached `done` or `error`.
    pub fn unsettled(&self) -> Vec<AgentId> {
        self.statuses
            .iter()
            .filter(|(_, status)| !status.is_settled())
            .map(|(id, _)| id.clone())
            .collect()
    }

    pub fn is_settled(&self) -> bool {
        self.statuses.values().all(AgentStatus::is_settled)
    }

    pub fn results(&self) -> &BTreeMap<AgentId, SongCandidate> {
        &self.results
    }

    pub fn candidate(&self, id: &AgentId) -> Option<&SongCandidate> {
        self.results.get(id)
    }

    /// Failures in agent id order.
    pub fn failed_agents(&self) -> Vec<AgentFailure> {
        self.failures.values().cloned().collect()
    }

    pub fn failure(&self, id: &AgentId) -> Option<&AgentFailure> {
        self.failures.get(id)
    }

    pub fn agent_count(&self) -> usize {
        self.statuses.len()
    }

    pub fn completed_count(&self) -> usize {
        self.results.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failures.len()
    }

    pub fn has_successes(&self) -> bool {
        !self.results.is_empty()
    }
}
