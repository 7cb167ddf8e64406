//! Water and calorie logging.

use std::path::PathBuf;

use anyhow::{Context, Result};
use hydra_types::IntakeKind;

use crate::cli::OutputFormat;
use crate::format::{FormatOptions, format_intake_update, format_snapshot_json};
use crate::style;
use crate::util::{Session, confirm, write_output};

/// Add to one counter and report the new total.
pub fn cmd_add_intake(
    session: &Session,
    kind: IntakeKind,
    amount: u32,
    format: OutputFormat,
    output: Option<&PathBuf>,
    opts: &FormatOptions,
) -> Result<()> {
    session
        .add_intake(kind, amount)
        .with_context(|| format!("Failed to save {} intake", kind))?;
    report(session, kind, format, output, opts)
}

/// Reset one counter after confirmation.
pub fn cmd_reset_intake(
    session: &Session,
    kind: IntakeKind,
    assume_yes: bool,
    format: OutputFormat,
    output: Option<&PathBuf>,
    opts: &FormatOptions,
) -> Result<()> {
    let prompt = format!("Reset today's {} intake to 0?", kind);
    if !confirm(&prompt, assume_yes)? {
        eprintln!("{}", style::format_info("Nothing changed", opts.no_color));
        return Ok(());
    }

    session
        .reset_intake(kind)
        .with_context(|| format!("Failed to save {} intake", kind))?;
    report(session, kind, format, output, opts)
}

fn report(
    session: &Session,
    kind: IntakeKind,
    format: OutputFormat,
    output: Option<&PathBuf>,
    opts: &FormatOptions,
) -> Result<()> {
    let snapshot = session.snapshot();
    let content = match format {
        OutputFormat::Json => format_snapshot_json(&snapshot, opts)?,
        OutputFormat::Text => format_intake_update(kind, &snapshot, opts),
    };
    write_output(output, &content)
}
