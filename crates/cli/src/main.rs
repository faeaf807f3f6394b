//! `tasktrack` -- replay tracker commands and print the resulting state.
//!
//! Reads JSON-lines commands (see `tasktrack_core::command`) from a script
//! file or stdin, applies them to an in-memory tracker, and writes a JSON
//! snapshot (categories, ordered tasks, board, 7-day stats, totals) to
//! stdout. Nothing is persisted.
//!
//! # Environment variables
//!
//! | Variable                    | Default | Description                          |
//! |-----------------------------|---------|--------------------------------------|
//! | `TASKTRACK_SEED`            | `true`  | Start from the demo data set         |
//! | `TASKTRACK_COLOR_THRESHOLD` | `50`    | Color similarity warning distance    |
//! | `TASKTRACK_SCRIPT`          | --      | Script path; stdin when unset        |
//! | `RUST_LOG`                  | `tasktrack_cli=info,tasktrack_core=info` | Log filter |

use std::fs::File;
use std::io::{self, BufReader, Write};

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tasktrack_core::seed::seed_demo;
use tasktrack_core::Tracker;

mod config;
mod script;

use config::RunnerConfig;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout carries only the snapshot.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tasktrack_cli=info,tasktrack_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = RunnerConfig::from_env();
    tracing::info!(
        seed = config.seed,
        color_threshold = config.color_threshold,
        script = ?config.script,
        "Starting tasktrack",
    );

    let mut tracker = Tracker::default().with_similarity_threshold(config.color_threshold);
    if config.seed {
        seed_demo(&mut tracker).context("failed to seed demo data")?;
    }

    let summary = match &config.script {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open script {}", path.display()))?;
            script::run_script(&mut tracker, BufReader::new(file))?
        }
        None => script::run_script(&mut tracker, io::stdin().lock())?,
    };
    tracing::info!(
        applied = summary.applied,
        rejected = summary.rejected,
        malformed = summary.malformed,
        "Script finished",
    );

    let snapshot = tracker.snapshot();
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &snapshot).context("failed to write snapshot")?;
    writeln!(stdout)?;

    Ok(())
}
