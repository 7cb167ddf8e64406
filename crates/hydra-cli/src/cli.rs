//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Output format for commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    /// Parse a format name from the config file.
    pub fn from_config(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

#[derive(Parser)]
#[command(name = "hydra")]
#[command(author, version, about = "Track daily water and calorie intake", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output as JSON (shorthand for --format json)
    #[arg(long, global = true)]
    pub json: bool,

    /// Output compact JSON (no pretty-printing)
    #[arg(long, global = true)]
    pub compact: bool,

    /// Disable colored output (any non-empty NO_COLOR also disables it)
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub no_color: bool,

    /// Database file, or set HYDRA_DB
    #[arg(long, global = true, env = "HYDRA_DB")]
    pub db: Option<PathBuf>,

    /// Keep everything in memory for this run only (ignores --db)
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// Do not ask for confirmation
    #[arg(short, long, global = true)]
    pub yes: bool,

    /// Write output to file instead of stdout
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show today's progress toward both goals
    Status {
        /// Single-line output for scripting
        #[arg(long)]
        brief: bool,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Log or reset glasses of water
    Water {
        #[command(subcommand)]
        action: WaterAction,
    },

    /// Log or reset calories
    Calories {
        #[command(subcommand)]
        action: CaloriesAction,
    },

    /// Show or change daily goals
    Goals {
        #[command(subcommand)]
        action: GoalsAction,
    },

    /// Delete records older than the retention period
    Cleanup {
        /// Retention period in days (default: config or 7)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        days: Option<u32>,
    },

    /// Keep running and reset counters when today's record expires
    Watch {
        /// Minutes between expiry checks (default: config or 60)
        #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
        interval: Option<u64>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Water subcommands
#[derive(Subcommand)]
pub enum WaterAction {
    /// Add glasses of water
    Add {
        /// Number of glasses (1-20)
        #[arg(default_value = "1", value_parser = clap::value_parser!(u32).range(1..=20))]
        count: u32,
    },

    /// Reset today's water count to zero
    Reset,
}

/// Calorie subcommands
#[derive(Subcommand)]
pub enum CaloriesAction {
    /// Add calories from a meal or snack
    Add {
        /// Kilocalories (1-5000)
        #[arg(value_parser = clap::value_parser!(u32).range(1..=5000))]
        kcal: u32,
    },

    /// Reset today's calorie count to zero
    Reset,
}

/// Goal subcommands
#[derive(Subcommand)]
pub enum GoalsAction {
    /// Show current goals
    Show,

    /// Change one or both goals
    Set {
        /// Daily water goal in glasses (1-20)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=20))]
        water: Option<u32>,

        /// Daily calorie goal in kcal (1000-5000)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1000..=5000))]
        calories: Option<u32>,
    },
}

/// Configuration subcommands
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init,
}
