//! JSON-lines command scripts.
//!
//! One [`Command`] per line; blank lines and lines starting with `//` are
//! skipped. A rejected or unparseable command is logged and the script
//! carries on, the same way a UI would surface the error and keep running.

use std::io::BufRead;

use anyhow::Context;
use tasktrack_core::command::{Command, CommandOutcome};
use tasktrack_core::Tracker;

/// Counts of what happened while running a script.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScriptSummary {
    pub applied: usize,
    pub rejected: usize,
    pub malformed: usize,
}

/// Apply every command in `input` to `tracker`.
///
/// Only I/O failures abort the run.
pub fn run_script(tracker: &mut Tracker, input: impl BufRead) -> anyhow::Result<ScriptSummary> {
    let mut summary = ScriptSummary::default();

    for (index, line) in input.lines().enumerate() {
        let line_no = index + 1;
        let line = line.with_context(|| format!("failed to read script line {line_no}"))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with("//") {
            continue;
        }

        let command: Command = match serde_json::from_str(trimmed) {
            Ok(command) => command,
            Err(e) => {
                tracing::warn!(line = line_no, error = %e, "Skipping malformed command");
                summary.malformed += 1;
                continue;
            }
        };

        let kind = command.name();
        match tracker.apply(command) {
            Ok(outcome) => {
                summary.applied += 1;
                match &outcome {
                    CommandOutcome::Category(c) => {
                        let similar = tracker.similar_category_colors(&c.color, Some(&c.id));
                        if !similar.is_empty() {
                            tracing::warn!(
                                category = %c.name,
                                color = %c.color,
                                similar = ?similar,
                                "Category color is close to existing colors",
                            );
                        }
                    }
                    CommandOutcome::Task(t) => {
                        tracing::info!(line = line_no, task_id = %t.id, "Task created");
                    }
                    CommandOutcome::Unit => {
                        tracing::debug!(line = line_no, command = kind, "Command applied");
                    }
                }
            }
            Err(_) => summary.rejected += 1,
        }
    }

    Ok(summary)
}
