//! Progress notification port
//!
//! Defines the interface for reporting progress while a round runs.

use songmaster_domain::{AgentId, AgentStatus, Phase};

/// Callback for progress updates during a round
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console, web UI, etc.)
pub trait ProgressNotifier: Send + Sync {
    /// Called when a phase starts
    fn on_phase_start(&self, phase: &Phase, total_tasks: usize);

    /// Called whenever an agent changes status within a phase
    fn on_agent_status(&self, phase: &Phase, agent: &AgentId, status: AgentStatus);

    /// Called when a phase completes
    fn on_phase_complete(&self, phase: &Phase);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_phase_start(&self, _phase: &Phase, _total_tasks: usize) {}
    fn on_agent_status(&self, _phase: &Phase, _agent: &AgentId, _status: AgentStatus) {}
    fn on_phase_complete(&self, _phase: &Phase) {}
}
