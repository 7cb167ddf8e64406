//! Status command implementation.

use std::path::PathBuf;

use anyhow::Result;

use crate::cli::OutputFormat;
use crate::format::{
    FormatOptions, format_snapshot_brief, format_snapshot_json, format_snapshot_text,
};
use crate::util::{Session, write_output};

pub fn cmd_status(
    session: &Session,
    format: OutputFormat,
    brief: bool,
    output: Option<&PathBuf>,
    opts: &FormatOptions,
) -> Result<()> {
    let snapshot = session.snapshot();

    let content = match format {
        OutputFormat::Json => format_snapshot_json(&snapshot, opts)?,
        OutputFormat::Text if brief => format_snapshot_brief(&snapshot),
        OutputFormat::Text => format_snapshot_text(&snapshot, opts),
    };

    write_output(output, &content)
}
