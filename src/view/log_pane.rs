//! The main line list.
//!
//! One row per visible line starting at the view's `top`. The selected row
//! is the only one that scrolls horizontally.

use super::constants::{INVALID_SUFFIX, TRUNCATION_MIN_WIDTH};
use super::helpers::{fit_with_ellipsis, single_row, skip_columns};
use super::styles::{INVALID_ROW, MUTED_TEXT, SELECTED_ROW};
use crate::model::LogLine;
use crate::state::{AppState, LINE_GUTTER};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Shown when lines are loaded but every one is filtered out.
pub const ALL_FILTERED_MESSAGE: &str = "All lines filtered out by active filters";

/// Text of one list row, without styling.
///
/// `width` is the terminal width. `h_offset` is applied only when
/// `selected` is set.
pub fn row_text(
    display: &str,
    is_valid: bool,
    selected: bool,
    h_offset: usize,
    width: usize,
) -> String {
    let mut text = single_row(display).into_owned();
    if selected && h_offset > 0 {
        text = skip_columns(&text, h_offset).to_string();
    }

    let max_width = width.saturating_sub(LINE_GUTTER);
    if width > TRUNCATION_MIN_WIDTH && max_width > 3 {
        text = fit_with_ellipsis(&text, max_width).into_owned();
    }

    let prefix = if selected { "> " } else { "  " };
    let suffix = if is_valid { "" } else { INVALID_SUFFIX };
    format!("{prefix}{text}{suffix}")
}

fn row_style(line: &LogLine, selected: bool) -> Style {
    if selected {
        SELECTED_ROW
    } else if !line.is_valid() {
        INVALID_ROW
    } else {
        Style::default()
    }
}

/// Render the list rows into `area`.
pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let visible = state.visible();
    if visible.is_empty() {
        if !state.store().is_empty() {
            let message = Paragraph::new(Line::from(Span::styled(ALL_FILTERED_MESSAGE, MUTED_TEXT)));
            frame.render_widget(message, area);
        }
        return;
    }

    let view = state.view();
    let width = usize::from(area.width);
    let rows: Vec<Line> = visible
        .iter()
        .enumerate()
        .skip(view.top())
        .take(usize::from(area.height))
        .filter_map(|(index, &number)| {
            let line = state.line(number)?;
            let selected = index == view.selected();
            let text = row_text(
                &state.display_text(line),
                line.is_valid(),
                selected,
                view.h_offset(),
                width,
            );
            Some(Line::from(Span::styled(text, row_style(line, selected))))
        })
        .collect();

    frame.render_widget(Paragraph::new(rows), area);
}
