//! Visual styling utilities for the CLI.
//!
//! Status prefixes and progress bars. Every helper takes `no_color` and
//! falls back to plain ASCII-safe output when it is set.

use owo_colors::OwoColorize;

/// Width of a progress bar, in cells.
pub const BAR_WIDTH: usize = 20;

// ============================================================================
// Progress Bars
// ============================================================================

/// Number of filled cells for a clamped percentage.
pub fn filled_cells(display_percentage: f64, width: usize) -> usize {
    let fraction = (display_percentage / 100.0).clamp(0.0, 1.0);
    // Truncation keeps the bar from looking full before the goal is met
    ((fraction * width as f64) as usize).min(width)
}

/// Render a progress bar from a percentage already clamped to 100.
///
/// Blue while in progress, green once the goal is met.
pub fn progress_bar(display_percentage: f64, goal_met: bool, no_color: bool) -> String {
    let filled = filled_cells(display_percentage, BAR_WIDTH);
    let (full, empty) = if no_color { ("#", "-") } else { ("█", "░") };
    let bar = format!(
        "{}{}",
        full.repeat(filled),
        empty.repeat(BAR_WIDTH - filled)
    );

    if no_color {
        format!("[{}]", bar)
    } else if goal_met {
        format!("[{}]", bar.green())
    } else {
        format!("[{}]", bar.blue())
    }
}

/// Format a percentage, highlighted once the goal is met.
pub fn format_percentage(percentage: f64, goal_met: bool, no_color: bool) -> String {
    let text = format!("{:.0}%", percentage.round());
    if no_color {
        text
    } else if goal_met {
        format!("{}", text.green().bold())
    } else {
        text
    }
}

// ============================================================================
// Messages
// ============================================================================

/// Format a success message.
pub fn format_success(message: &str, no_color: bool) -> String {
    if no_color {
        format!("[OK] {}", message)
    } else {
        format!("{} {}", "[OK]".green(), message)
    }
}

/// Format an info message.
pub fn format_info(message: &str, no_color: bool) -> String {
    if no_color {
        format!("[--] {}", message)
    } else {
        format!("{} {}", "[--]".cyan(), message)
    }
}

/// Format a warning message.
pub fn format_warning(message: &str, no_color: bool) -> String {
    if no_color {
        format!("[!!] {}", message)
    } else {
        format!("{} {}", "[!!]".yellow(), message)
    }
}

/// Format a section title.
pub fn format_title(title: &str, no_color: bool) -> String {
    if no_color {
        title.to_string()
    } else {
        format!("{}", title.bold())
    }
}
