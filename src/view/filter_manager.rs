//! Full-screen list of filters with their enabled flags.

use super::helpers::fit_with_ellipsis;
use super::status_bar;
use super::styles::{EDIT_FILTER_BAR, SELECTED_ROW};
use crate::state::{AppState, FilterEngine, Mode};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub const EMPTY_MESSAGE: &str = "No filters defined.";

pub const HEADER: &str =
    "Filter Management (ENTER/SPACE to toggle, e to edit, d/x to delete, ESC to exit):";

/// Text of one filter row, cut to fit `width` columns.
pub fn row_text(expression: &str, enabled: bool, selected: bool, width: usize) -> String {
    let prefix = if selected { "> " } else { "  " };
    let mark = if enabled { "[✓]" } else { "[ ]" };
    let row = format!("{prefix}{mark} {expression}");
    fit_with_ellipsis(&row, width.saturating_sub(2)).into_owned()
}

/// Status text while browsing the filter list.
pub fn status_text(filters: &FilterEngine) -> String {
    if filters.is_empty() {
        "Filter Management | No filters defined | F/ESC=exit to main view".to_string()
    } else {
        format!(
            "Filter Management | {}/{} filters enabled | ENTER/SPACE=toggle | e=edit | d/x=delete | F/ESC=exit",
            filters.enabled_count(),
            filters.len(),
        )
    }
}

/// Render the filter list, with the edit bar when a filter is being edited.
pub fn render(frame: &mut Frame, content: Rect, status: Rect, state: &AppState) {
    let filters = state.filters();
    let cursor = match state.mode() {
        Mode::FilterManage { cursor } => Some(*cursor),
        Mode::FilterEdit { index, .. } => Some(*index),
        _ => None,
    };

    let rows: Vec<Line> = if filters.is_empty() {
        vec![Line::from(EMPTY_MESSAGE)]
    } else {
        let width = usize::from(content.width);
        let mut rows = vec![Line::from(HEADER), Line::default()];
        rows.extend(filters.filters().iter().enumerate().map(|(i, filter)| {
            let selected = cursor == Some(i);
            let style = if selected { SELECTED_ROW } else { Style::default() };
            Line::from(Span::styled(
                row_text(filter.source(), filter.is_enabled(), selected, width),
                style,
            ))
        }));
        rows
    };
    frame.render_widget(Paragraph::new(rows), content);

    match state.mode() {
        Mode::FilterEdit { input, .. } => {
            status_bar::render_entry(frame, status, "Edit Filter: ", input, EDIT_FILTER_BAR);
        }
        _ => status_bar::render_text(frame, status, &status_text(filters)),
    }
}
