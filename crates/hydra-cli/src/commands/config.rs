//! Config command implementation.

use std::path::PathBuf;

use anyhow::Result;

use crate::cli::{ConfigAction, OutputFormat};
use crate::config::Config;
use crate::format::FormatOptions;
use crate::style;
use crate::util::write_output;

pub fn cmd_config(
    action: &ConfigAction,
    format: OutputFormat,
    output: Option<&PathBuf>,
    opts: &FormatOptions,
) -> Result<()> {
    match action {
        ConfigAction::Path => write_output(output, &format!("{}\n", Config::path().display())),
        ConfigAction::Show => {
            let config = Config::load();
            let content = match format {
                OutputFormat::Json => opts.as_json(&config)?,
                OutputFormat::Text => toml::to_string_pretty(&config)?,
            };
            write_output(output, &content)
        }
        ConfigAction::Init => {
            let path = Config::path();
            if path.exists() {
                eprintln!(
                    "{}",
                    style::format_warning(
                        &format!("Config already exists at {}", path.display()),
                        opts.no_color
                    )
                );
                return Ok(());
            }
            Config::with_defaults().save_to(&path)?;
            let message = format!("Wrote {}", path.display());
            write_output(
                output,
                &(style::format_success(&message, opts.no_color) + "\n"),
            )
        }
    }
}
