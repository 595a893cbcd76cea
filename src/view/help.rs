//! Help screen listing the key bindings.
//!
//! Full screen, scrolled with the same keys as the detail view. Closed by
//! h, ? or Esc.

use super::status_bar;
use super::styles::SECTION_HEADER;
use crate::state::AppState;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const HELP_TEXT: &[&str] = &[
    "SIFT - Interactive Log Viewer",
    "",
    "NAVIGATION:",
    "  ↑/↓, k/j        Navigate up/down through log lines",
    "  ←/→             Scroll selected line horizontally",
    "  Ctrl+←/→        Fast horizontal scroll (5 characters)",
    "  PgUp/PgDn       Page up/down through logs",
    "  Home            Jump to first line",
    "  End             Jump to last line (loads entire file if needed)",
    "  Space/Enter     Open pretty-print view for selected line",
    "",
    "FILTERING:",
    "  f               Add a new jq filter",
    "  F               Open filter management",
    "    ↑/↓           Navigate between filters",
    "    Space/Enter   Toggle filter on/off",
    "    e             Edit filter expression",
    "    d/x           Delete filter",
    "    F/Esc         Exit management",
    "",
    "VIEW TRANSFORMATIONS:",
    "  v/V             Enter view mode to transform display",
    "                  (jq expression applied to each line)",
    "",
    "TAIL MODE:",
    "  t               Toggle tail mode (jump to bottom on new lines)",
    "                  Shows T=on/T=off in status bar",
    "",
    "OTHER:",
    "  h/?             Show/hide this help screen",
    "  q/Ctrl+C        Quit application",
    "  Esc             Close help/pretty-print view or quit",
    "",
    "COMMAND LINE:",
    "  -f <filter>     Apply jq filter on startup (repeatable)",
    "  -V <view>       Apply view transformation on startup",
    "  -t              Start with tail mode enabled",
    "  --config <path> Read settings from another config file",
    "  --theme <name>  Syntax highlighting theme for the detail view",
    "",
    "Press 'h' or 'Esc' to close this help screen",
];

/// Content rows of the help screen.
pub fn help_lines() -> Vec<Line<'static>> {
    HELP_TEXT
        .iter()
        .map(|&text| {
            if text.ends_with(':') && !text.starts_with(' ') {
                Line::from(Span::styled(text, SECTION_HEADER))
            } else {
                Line::from(text)
            }
        })
        .collect()
}

/// Status text for the help screen.
pub fn status_text(file: &str, scroll: usize, total_rows: usize, page: usize) -> String {
    let position = if total_rows > page {
        format!(" ({}/{})", scroll + 1, total_rows - page + 1)
    } else {
        String::new()
    };
    format!("{file} | Help Screen{position} | h/ESC=Close")
}

/// Render the help screen.
pub fn render(frame: &mut Frame, content: Rect, status: Rect, state: &AppState) {
    let rows = help_lines();
    let page = usize::from(content.height);
    let scroll = state
        .view()
        .overlay_scroll()
        .min(rows.len().saturating_sub(page));

    let total = rows.len();
    let shown: Vec<Line> = rows.into_iter().skip(scroll).take(page).collect();
    frame.render_widget(Paragraph::new(shown), content);
    status_bar::render_text(
        frame,
        status,
        &status_text(&state.source_name(), scroll, total, page),
    );
}

#[cfg(test)]
#[path = "help_tests.rs"]
mod tests;
