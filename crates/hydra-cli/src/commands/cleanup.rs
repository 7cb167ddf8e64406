//! Cleanup command implementation.

use std::path::PathBuf;

use anyhow::Result;

use crate::cli::OutputFormat;
use crate::format::{FormatOptions, format_sweep_json, format_sweep_text};
use crate::util::{Records, write_output};

pub fn cmd_cleanup(
    records: &Records,
    retention_days: u32,
    format: OutputFormat,
    output: Option<&PathBuf>,
    opts: &FormatOptions,
) -> Result<()> {
    let report = records.cleanup_stale_with(records.now(), retention_days);

    let content = match format {
        OutputFormat::Json => format_sweep_json(&report, retention_days, opts)?,
        OutputFormat::Text => format_sweep_text(&report, retention_days, opts),
    };
    write_output(output, &content)
}
