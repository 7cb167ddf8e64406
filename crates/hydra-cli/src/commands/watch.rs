//! Watch command implementation.

use std::sync::Arc;

use anyhow::{Context, Result};
use hydra_store::{WatchOptions, start_expiry_watch_with};

use crate::format::{FormatOptions, format_snapshot_text};
use crate::style;
use crate::util::Session;

/// Keep the session open and zero the counters whenever today's record
/// expires, until Ctrl-C.
pub async fn cmd_watch(
    session: Arc<Session>,
    interval_minutes: u64,
    quiet: bool,
    opts: &FormatOptions,
) -> Result<()> {
    if !quiet {
        print!("{}", format_snapshot_text(&session.snapshot(), opts));
        eprintln!(
            "{}",
            style::format_info(
                &format!(
                    "Checking for expiry every {} min. Press Ctrl-C to stop.",
                    interval_minutes
                ),
                opts.no_color
            )
        );
    }

    let options = WatchOptions::builder()
        .interval_minutes(interval_minutes)
        .build();

    let on_expire = {
        let session = Arc::clone(&session);
        let no_color = opts.no_color;
        move || {
            session.reset_expired();
            println!(
                "{}",
                style::format_warning("24 hours passed, daily totals reset to 0", no_color)
            );
        }
    };

    let handle = start_expiry_watch_with(Arc::clone(session.records()), options, on_expire)
        .context("Failed to start expiry watch")?;

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;

    eprintln!("\nShutting down...");
    handle.cancel();
    Ok(())
}
