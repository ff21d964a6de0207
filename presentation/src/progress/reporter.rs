//! Progress reporting for round execution

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use songmaster_application::ProgressNotifier;
use songmaster_domain::{AgentId, AgentStatus, Phase};
use std::sync::Mutex;

/// Reports progress during a round with progress bars
pub struct ProgressReporter {
    multi: MultiProgress,
    phase_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            phase_bar: Mutex::new(None),
        }
    }

    fn phase_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn phase_display_name(phase: &Phase) -> &'static str {
        match phase {
            Phase::Generation => "Generating songs",
            Phase::Evaluation => "Orchestrator judging",
        }
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        let guard = self.phase_bar.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(pb) = guard.as_ref() {
            f(pb);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_phase_start(&self, phase: &Phase, total_tasks: usize) {
        let pb = self.multi.add(ProgressBar::new(total_tasks as u64));
        pb.set_style(Self::phase_style());
        pb.set_prefix(Self::phase_display_name(phase));
        pb.set_message("Starting...");
        pb.enable_steady_tick(std::time::Duration::from_millis(120));

        *self.phase_bar.lock().unwrap_or_else(|e| e.into_inner()) = Some(pb);
    }

    fn on_agent_status(&self, _phase: &Phase, agent: &AgentId, status: AgentStatus) {
        self.with_bar(|pb| match status {
            AgentStatus::Waiting => {}
            AgentStatus::Generating => pb.set_message(format!("{} {}", "..".dimmed(), agent)),
            AgentStatus::Done => {
                pb.set_message(format!("{} {}", "v".green(), agent));
                pb.inc(1);
            }
            AgentStatus::Error => {
                pb.set_message(format!("{} {}", "x".red(), agent));
                pb.inc(1);
            }
        });
    }

    fn on_phase_complete(&self, phase: &Phase) {
        let taken = self
            .phase_bar
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(pb) = taken {
            pb.finish_with_message(format!("{} complete!", phase.display_name().green()));
        }
    }
}

/// Simple line-based progress for non-interactive output
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_phase_start(&self, phase: &Phase, total_tasks: usize) {
        eprintln!(
            "{} {} ({} tasks)",
            "->".cyan(),
            ProgressReporter::phase_display_name(phase).bold(),
            total_tasks
        );
    }

    fn on_agent_status(&self, _phase: &Phase, agent: &AgentId, status: AgentStatus) {
        match status {
            AgentStatus::Done => eprintln!("  {} {}", "v".green(), agent),
            AgentStatus::Error => eprintln!("  {} {} (failed)", "x".red(), agent),
            AgentStatus::Waiting | AgentStatus::Generating => {}
        }
    }

    fn on_phase_complete(&self, _phase: &Phase) {
        eprintln!();
    }
}
