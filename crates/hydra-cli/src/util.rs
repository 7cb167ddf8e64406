//! Utility functions for CLI operations.

use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use dialoguer::{Confirm, theme::ColorfulTheme};
use tracing::debug;

use hydra_store::{DailyRecordStore, MemoryStore, RecordStore, SqliteStore, SystemClock, Tracker};

use crate::cli::Cli;
use crate::config::{Config, resolve_db_path};

/// Record store as used by every command.
pub type Records = DailyRecordStore<Box<dyn RecordStore>, SystemClock>;

/// Tracking session as used by every command.
pub type Session = Tracker<Box<dyn RecordStore>, SystemClock>;

/// Open the record store selected by `--ephemeral`, `--db` or the config.
pub fn open_records(cli: &Cli, config: &Config, clock: SystemClock) -> Result<Arc<Records>> {
    let store: Box<dyn RecordStore> = if cli.ephemeral {
        debug!("Using in-memory store");
        Box::new(MemoryStore::new())
    } else {
        let path = resolve_db_path(cli, config);
        let store = SqliteStore::open(&path)
            .with_context(|| format!("Failed to open database at {}", path.display()))?;
        Box::new(store)
    };
    Ok(Arc::new(DailyRecordStore::new(store, clock)))
}

/// Ask before a destructive action.
///
/// Returns `true` without asking when `assume_yes` is set. Outside a
/// terminal there is nobody to ask, so `--yes` is required.
pub fn confirm(prompt: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }

    if !io::stdin().is_terminal() || !io::stderr().is_terminal() {
        bail!("Refusing to continue without confirmation. Re-run with --yes.");
    }

    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()
        .context("Failed to read confirmation")
}

/// Write output to file or stdout.
pub fn write_output(output: Option<&PathBuf>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write to {}", path.display()))?;
        }
        None => {
            print!("{}", content);
            io::stdout().flush()?;
        }
    }
    Ok(())
}
