//! Command-line daily water and calorie tracker.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `status` | Show today's progress toward both goals |
//! | `water` | Add glasses of water, or reset the count |
//! | `calories` | Add calories, or reset the count |
//! | `goals` | Show or change daily goals |
//! | `cleanup` | Delete records past the retention period |
//! | `watch` | Stay running and reset counters when the day's record expires |
//! | `config` | Manage CLI configuration |
//! | `completions` | Generate shell completions |
//!
//! # Configuration
//!
//! Settings live in `~/.config/hydratrack/config.toml` (or platform
//! equivalent, or the file named by `HYDRA_CONFIG`): `db_path`, `no_color`,
//! `format`, `watch_interval_minutes` and `retention_days`.
//!
//! # Environment Variables
//!
//! - `HYDRA_DB`: Database file (overridden by `--db`)
//! - `HYDRA_CONFIG`: Config file location
//! - `NO_COLOR`: Disable colored output when set
//! - `RUST_LOG`: Log filter when neither `--verbose` nor `--quiet` is given
//!
//! # Examples
//!
//! ```bash
//! hydra water add 2
//! hydra calories add 450
//! hydra goals set --water 10
//! hydra status --json
//! ```

mod cli;
mod commands;
mod config;
mod format;
mod style;
mod util;

use std::io;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use hydra_store::{SystemClock, Tracker};
use hydra_types::IntakeKind;

use cli::{CaloriesAction, Cli, Commands, GoalsAction, WaterAction};
use commands::{
    cmd_add_intake, cmd_cleanup, cmd_config, cmd_goals_set, cmd_goals_show, cmd_reset_intake,
    cmd_status, cmd_watch,
};
use config::{Config, resolve_format, resolve_interval, resolve_retention};
use format::FormatOptions;
use util::{Session, open_records};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Handle completions command early (before tracing init)
    if let Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "hydra", &mut io::stdout());
        return Ok(());
    }

    let filter = if cli.quiet {
        EnvFilter::new("error")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    // The local offset can only be read while single-threaded
    let clock = SystemClock::local();
    tracing::debug!("Local offset {}", clock.offset());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    runtime.block_on(run(cli, clock))
}

fn open_session(cli: &Cli, config: &Config, clock: SystemClock) -> Result<Session> {
    let records = open_records(cli, config, clock)?;
    Ok(Tracker::open_with(records, resolve_retention(None, config)))
}

async fn run(cli: Cli, clock: SystemClock) -> Result<()> {
    let config = Config::load();
    let opts = FormatOptions::new(cli.no_color || config.no_color).with_compact(cli.compact);
    let output = cli.output.as_ref();
    let format = resolve_format(cli.json, None, &config);

    match &cli.command {
        Commands::Status {
            brief,
            format: status_format,
        } => {
            let format = resolve_format(cli.json, *status_format, &config);
            let session = open_session(&cli, &config, clock)?;
            cmd_status(&session, format, *brief, output, &opts)
        }
        Commands::Water { action } => {
            let session = open_session(&cli, &config, clock)?;
            match action {
                WaterAction::Add { count } => {
                    cmd_add_intake(&session, IntakeKind::Water, *count, format, output, &opts)
                }
                WaterAction::Reset => {
                    cmd_reset_intake(&session, IntakeKind::Water, cli.yes, format, output, &opts)
                }
            }
        }
        Commands::Calories { action } => {
            let session = open_session(&cli, &config, clock)?;
            match action {
                CaloriesAction::Add { kcal } => {
                    cmd_add_intake(&session, IntakeKind::Calories, *kcal, format, output, &opts)
                }
                CaloriesAction::Reset => cmd_reset_intake(
                    &session,
                    IntakeKind::Calories,
                    cli.yes,
                    format,
                    output,
                    &opts,
                ),
            }
        }
        Commands::Goals { action } => {
            let records = open_records(&cli, &config, clock)?;
            match action {
                GoalsAction::Show => cmd_goals_show(&records, format, output, &opts),
                GoalsAction::Set { water, calories } => {
                    cmd_goals_set(&records, *water, *calories, format, output, &opts)
                }
            }
        }
        Commands::Cleanup { days } => {
            let records = open_records(&cli, &config, clock)?;
            let retention_days = resolve_retention(*days, &config);
            cmd_cleanup(&records, retention_days, format, output, &opts)
        }
        Commands::Watch { interval } => {
            let session = Arc::new(open_session(&cli, &config, clock)?);
            let interval_minutes = resolve_interval(*interval, &config);
            cmd_watch(session, interval_minutes, cli.quiet, &opts).await
        }
        Commands::Config { action } => cmd_config(action, format, output, &opts),
        Commands::Completions { .. } => Ok(()),
    }
}
