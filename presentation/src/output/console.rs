//! Console output formatter for round results

use colored::Colorize;
use songmaster_application::{RoundOutcome, SavedSong};
use songmaster_domain::{ArtistProfile, Evaluation, Scores};

/// Formats rounds, artists and library entries for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Every candidate with its scores, the failures and the winner
    pub fn format(outcome: &RoundOutcome) -> String {
        let mut output = String::new();
        let round = &outcome.round;

        let title = if round.number == 0 {
            "SongMaster Round".to_string()
        } else {
            format!("SongMaster Iteration #{}", round.number)
        };
        output.push_str(&Self::header(&title));
        output.push('\n');

        output.push_str(&format!(
            "{} {} of {} agents produced a song\n",
            "Agents:".cyan().bold(),
            round.completed_count(),
            round.agent_count()
        ));

        output.push_str(&Self::section_header("Candidates"));
        let winner = outcome.winner_id();
        for (agent_id, candidate) in round.results() {
            let marker = if Some(agent_id) == winner { " *" } else { "" };
            output.push_str(&format!(
                "\n{}\n{} {}\n",
                format!("── {} ({}){} ──", candidate.name, agent_id, marker)
                    .yellow()
                    .bold(),
                "Style:".dimmed(),
                candidate.style
            ));
            if let Some(evaluation) = outcome
                .evaluation
                .as_ref()
                .and_then(|e| e.bundle.evaluation(agent_id))
            {
                output.push_str(&format!("{}\n", Self::scores_line(&evaluation.scores)));
            }
            output.push('\n');
            output.push_str(&Self::indent(&candidate.lyrics, "  "));
            output.push('\n');
        }

        let failures = round.failed_agents();
        if !failures.is_empty() {
            output.push_str(&Self::section_header("Failed Agents"));
            for failure in &failures {
                output.push_str(&format!(
                    "  {} {}: {}\n",
                    "x".red(),
                    failure.agent_id.to_string().red().bold(),
                    failure.error
                ));
            }
        }

        output.push_str(&Self::section_header("Verdict"));
        match (&outcome.evaluation, winner.and_then(|id| round.candidate(id))) {
            (Some(evaluation), Some(song)) => {
                let selection = &evaluation.winner;
                output.push_str(&format!(
                    "\n{} {} ({})\n",
                    "Winner:".green().bold(),
                    song.name.bold(),
                    selection.effective_winner()
                ));
                if selection.is_overridden() {
                    output.push_str(&format!(
                        "{}\n",
                        format!("Overrides the orchestrator's pick ({})", selection.agent_id)
                            .dimmed()
                    ));
                }
                output.push_str(&format!("{} {}\n", "Reason:".cyan().bold(), selection.reason));
                if let Some(feedback) = evaluation.bundle.evaluation(selection.effective_winner()) {
                    output.push_str(&Self::feedback(feedback));
                }
            }
            _ => {
                let reason = outcome
                    .evaluation_error
                    .as_deref()
                    .unwrap_or("no winner was selected");
                output.push_str(&format!(
                    "\n{} {}\n",
                    "Evaluation failed:".red().bold(),
                    reason
                ));
            }
        }

        output.push_str(&Self::footer());
        output
    }

    /// Format as JSON
    pub fn format_json(outcome: &RoundOutcome) -> String {
        serde_json::to_string_pretty(outcome).unwrap_or_else(|_| "{}".to_string())
    }

    /// The winning song only (concise output)
    pub fn format_winner_only(outcome: &RoundOutcome) -> String {
        let Some(song) = outcome.winner() else {
            return format!(
                "{} {}\n",
                "No winner:".red().bold(),
                outcome
                    .evaluation_error
                    .as_deref()
                    .unwrap_or("evaluation did not complete")
            );
        };
        format!(
            "{}\n{} {}\n\n{}\n",
            song.name.cyan().bold(),
            "Style:".dimmed(),
            song.style,
            song.lyrics
        )
    }

    pub fn format_artists(options: &[ArtistProfile]) -> String {
        let mut output = Self::section_header("Artist Options");
        for (i, artist) in options.iter().enumerate() {
            output.push_str(&format!(
                "\n{} {}\n{} {}\n{} {}\n",
                format!("{}.", i + 1).dimmed(),
                artist.name.yellow().bold(),
                "Style:".cyan(),
                artist.style_description,
                "Characteristics:".cyan(),
                artist.special_characteristics
            ));
        }
        output
    }

    pub fn format_library(songs: &[SavedSong]) -> String {
        if songs.is_empty() {
            return format!("{}\n", "The library is empty.".dimmed());
        }
        let mut output = Self::section_header("Library");
        for song in songs {
            let iterations = match song.iteration_count {
                0 => String::new(),
                n => format!(" [{} iteration{}]", n, if n == 1 { "" } else { "s" }),
            };
            output.push_str(&format!(
                "  {} {}{} {}\n",
                song.id.to_string().dimmed(),
                song.name.bold(),
                iterations,
                song.created_at.format("%Y-%m-%d %H:%M").to_string().dimmed()
            ));
        }
        output
    }

    fn scores_line(scores: &Scores) -> String {
        let parts: Vec<String> = scores
            .labelled()
            .map(|(label, score)| format!("{} {:.1}", label, score))
            .collect();
        format!(
            "{} {}  {}",
            "Scores:".dimmed(),
            parts.join(" · "),
            format!("total {:.2}", scores.total()).bold()
        )
    }

    fn feedback(evaluation: &Evaluation) -> String {
        let mut output = String::new();
        let lists = [
            ("Strengths:".green().bold(), &evaluation.strengths),
            ("Weaknesses:".yellow().bold(), &evaluation.weaknesses),
        ];
        for (label, items) in lists {
            if !items.is_empty() {
                output.push_str(&format!("\n{}\n", label));
                for item in items {
                    output.push_str(&format!("  * {}\n", item));
                }
            }
        }
        for (bucket, items) in evaluation.recommendations.buckets() {
            if !items.is_empty() {
                output.push_str(&format!("\n{}\n", format!("{}:", bucket.label()).cyan()));
                for item in items {
                    output.push_str(&format!("  * {}\n", item));
                }
            }
        }
        output
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
