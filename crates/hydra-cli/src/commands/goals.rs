//! Goal settings commands.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use hydra_types::GoalSettings;

use crate::cli::OutputFormat;
use crate::format::{FormatOptions, format_goals_text};
use crate::style;
use crate::util::{Records, write_output};

pub fn cmd_goals_show(
    records: &Records,
    format: OutputFormat,
    output: Option<&PathBuf>,
    opts: &FormatOptions,
) -> Result<()> {
    let goals = records.get_goals();
    let content = match format {
        OutputFormat::Json => opts.as_json(&goals)?,
        OutputFormat::Text => format_goals_text(&goals),
    };
    write_output(output, &content)
}

/// Update the given goals, keeping the others as they are.
pub fn cmd_goals_set(
    records: &Records,
    water: Option<u32>,
    calories: Option<u32>,
    format: OutputFormat,
    output: Option<&PathBuf>,
    opts: &FormatOptions,
) -> Result<()> {
    if water.is_none() && calories.is_none() {
        bail!("Nothing to change. Pass --water and/or --calories.");
    }

    let current = records.get_goals();
    let goals = GoalSettings::new(
        water.unwrap_or(current.water_goal),
        calories.unwrap_or(current.calorie_goal),
    );
    records.set_goals(goals).context("Failed to save goals")?;

    let content = match format {
        OutputFormat::Json => opts.as_json(&goals)?,
        OutputFormat::Text => {
            style::format_success("Goals updated", opts.no_color)
                + "\n"
                + &format_goals_text(&goals)
        }
    };
    write_output(output, &content)
}
