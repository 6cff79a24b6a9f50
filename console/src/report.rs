//! Statistics report rendering.
//!
//! Turns an [`EngagementSnapshot`] into the plain-text report printed by
//! the console. Rendering is pure string building, so the exact output is
//! unit-testable without a terminal.
//!
//! # Layout
//!
//! ```text
//! Engagement Statistics
//! =====================
//! Total visits:   2
//! Total clicks:   3
//! Engagement:     150.0%
//! Last click:     facebook (2025-06-01 12:00:00 UTC)
//!
//! Clicks by platform:
//!   facebook      2
//!   instagram     1
//!
//! Recent events:
//!   2025-06-01 12:00:00 UTC  facebook    12s on page
//! ```

use engage_tracker::EngagementSnapshot;

/// Report heading.
const HEADING: &str = "Engagement Statistics";

/// Label column width for the summary lines.
const LABEL_WIDTH: usize = 15;

/// Platform column width in the per-platform and event listings.
const PLATFORM_WIDTH: usize = 12;

/// Timestamp format used throughout the report.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Renders a snapshot as the full statistics report.
#[must_use]
pub fn render_snapshot(snapshot: &EngagementSnapshot) -> String {
    let mut out = String::new();

    out.push_str(HEADING);
    out.push('\n');
    out.push_str(&"=".repeat(HEADING.len()));
    out.push('\n');

    summary_line(&mut out, "Total visits:", &snapshot.visit_count.to_string());
    summary_line(&mut out, "Total clicks:", &snapshot.total_clicks.to_string());
    summary_line(&mut out, "Engagement:", &format_ratio(snapshot.engagement_ratio));

    let last_click = match &snapshot.last_click {
        Some(click) => format!(
            "{} ({})",
            click.platform,
            click.timestamp.format(TIMESTAMP_FORMAT)
        ),
        None => "none recorded".to_string(),
    };
    summary_line(&mut out, "Last click:", &last_click);

    out.push('\n');
    out.push_str("Clicks by platform:\n");
    if snapshot.clicks_by_platform.is_empty() {
        out.push_str("  none recorded\n");
    } else {
        for (platform, count) in &snapshot.clicks_by_platform {
            out.push_str(&format!(
                "  {platform:<width$}  {count}\n",
                width = PLATFORM_WIDTH
            ));
        }
    }

    out.push('\n');
    out.push_str("Recent events:\n");
    if snapshot.recent_events.is_empty() {
        out.push_str("  none recorded\n");
    } else {
        for event in &snapshot.recent_events {
            out.push_str(&format!(
                "  {}  {:<width$}  {}s on page\n",
                event.timestamp.format(TIMESTAMP_FORMAT),
                event.platform,
                event.seconds_on_page,
                width = PLATFORM_WIDTH
            ));
        }
    }

    out
}

/// Formats the engagement ratio as a percentage with one decimal.
#[must_use]
pub fn format_ratio(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

fn summary_line(out: &mut String, label: &str, value: &str) {
    out.push_str(&format!("{label:<width$} {value}\n", width = LABEL_WIDTH));
}
