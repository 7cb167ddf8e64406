//! Output formatting utilities for text and JSON output.

use anyhow::Result;
use serde::Serialize;

use hydra_store::SweepReport;
use hydra_types::{GoalSettings, IntakeKind, Progress, Snapshot, iso_date};

use crate::style;

/// Formatting options for output.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatOptions {
    /// Disable colored output.
    pub no_color: bool,
    /// Use compact JSON output (no pretty-printing).
    pub compact: bool,
}

impl FormatOptions {
    pub fn new(no_color: bool) -> Self {
        Self {
            no_color,
            compact: false,
        }
    }

    /// Create with compact JSON option.
    pub fn with_compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }

    /// Serialize value to JSON string, respecting compact option.
    pub fn as_json<T: Serialize>(&self, value: &T) -> Result<String> {
        let json = if self.compact {
            serde_json::to_string(value)?
        } else {
            serde_json::to_string_pretty(value)?
        };
        Ok(json + "\n")
    }
}

fn label(kind: IntakeKind) -> &'static str {
    match kind {
        IntakeKind::Water => "Water",
        IntakeKind::Calories => "Calories",
    }
}

/// `3 / 8 glasses`
fn format_amount(kind: IntakeKind, progress: &Progress) -> String {
    format!("{} / {} {}", progress.current, progress.goal, kind.unit())
}

/// One progress line: label, bar, amount and percentage.
pub fn format_progress_line(kind: IntakeKind, progress: &Progress, opts: &FormatOptions) -> String {
    let mut line = format!(
        "  {:<9} {} {} ({})",
        label(kind),
        style::progress_bar(
            progress.display_percentage,
            progress.goal_met,
            opts.no_color
        ),
        format_amount(kind, progress),
        style::format_percentage(progress.percentage, progress.goal_met, opts.no_color),
    );
    if progress.goal_met {
        line.push_str("  goal reached");
    }
    line
}

/// Format the full snapshot as text
pub fn format_snapshot_text(snapshot: &Snapshot, opts: &FormatOptions) -> String {
    let title = format!("Today ({})", iso_date(snapshot.date));
    let mut out = style::format_title(&title, opts.no_color);
    out.push('\n');
    for kind in [IntakeKind::Water, IntakeKind::Calories] {
        out.push_str(&format_progress_line(kind, snapshot.progress(kind), opts));
        out.push('\n');
    }
    out
}

/// Format the snapshot as a single line: `water/goal calories/goal`
pub fn format_snapshot_brief(snapshot: &Snapshot) -> String {
    format!(
        "{}/{} {}/{}\n",
        snapshot.water.current,
        snapshot.water.goal,
        snapshot.calories.current,
        snapshot.calories.goal
    )
}

/// Format the snapshot as JSON
pub fn format_snapshot_json(snapshot: &Snapshot, opts: &FormatOptions) -> Result<String> {
    opts.as_json(snapshot)
}

/// Confirmation after an intake change.
pub fn format_intake_update(kind: IntakeKind, snapshot: &Snapshot, opts: &FormatOptions) -> String {
    let progress = snapshot.progress(kind);
    let message = format!(
        "{}: {} ({})",
        label(kind),
        format_amount(kind, progress),
        style::format_percentage(progress.percentage, progress.goal_met, opts.no_color)
    );
    let mut out = style::format_success(&message, opts.no_color);
    out.push('\n');
    if progress.goal_met {
        let cheer = format!("{} goal reached for today", label(kind));
        out.push_str(&style::format_info(&cheer, opts.no_color));
        out.push('\n');
    }
    out
}

/// Format goal settings as text
pub fn format_goals_text(goals: &GoalSettings) -> String {
    format!(
        "Water goal:    {} {}\nCalorie goal:  {} {}\n",
        goals.water_goal,
        IntakeKind::Water.unit(),
        goals.calorie_goal,
        IntakeKind::Calories.unit()
    )
}

#[derive(Serialize)]
struct SweepJson {
    scanned: usize,
    removed: usize,
    retention_days: u32,
}

/// Format a sweep report as text
pub fn format_sweep_text(
    report: &SweepReport,
    retention_days: u32,
    opts: &FormatOptions,
) -> String {
    let message = format!(
        "Scanned {} daily records, removed {} older than {} days",
        report.scanned, report.removed, retention_days
    );
    style::format_success(&message, opts.no_color) + "\n"
}

/// Format a sweep report as JSON
pub fn format_sweep_json(
    report: &SweepReport,
    retention_days: u32,
    opts: &FormatOptions,
) -> Result<String> {
    opts.as_json(&SweepJson {
        scanned: report.scanned,
        removed: report.removed,
        retention_days,
    })
}
