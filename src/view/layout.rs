//! Screen layout: one content area above a one-row status bar.
//!
//! The active mode decides what fills the content area and which status
//! bar is drawn.

use super::constants::STATUS_BAR_HEIGHT;
use super::highlighter::JsonHighlighter;
use super::styles::{FILTER_BAR, VIEW_BAR};
use super::{detail, filter_manager, help, log_pane, status_bar};
use crate::state::{AppState, Mode};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    Frame,
};

/// Split `area` into the content area and the status row.
pub fn split(area: Rect) -> (Rect, Rect) {
    let [content, status] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(STATUS_BAR_HEIGHT)]).areas(area);
    (content, status)
}

/// Draw the whole screen for the current mode.
pub fn render_layout(frame: &mut Frame, state: &AppState, highlighter: &JsonHighlighter) {
    let (content, status) = split(frame.area());

    match state.mode() {
        Mode::Help => help::render(frame, content, status, state),
        Mode::Detail { line } => match state.line(*line) {
            Some(line) => detail::render(frame, content, status, state, line, highlighter),
            None => status_bar::render_normal(frame, status, state),
        },
        Mode::FilterManage { .. } | Mode::FilterEdit { .. } => {
            filter_manager::render(frame, content, status, state);
        }
        Mode::FilterEntry(input) => {
            log_pane::render(frame, content, state);
            status_bar::render_entry(frame, status, "Filter: ", input, FILTER_BAR);
        }
        Mode::ViewEntry(input) => {
            log_pane::render(frame, content, state);
            status_bar::render_entry(frame, status, "View: ", input, VIEW_BAR);
        }
        Mode::Normal => {
            log_pane::render(frame, content, state);
            status_bar::render_normal(frame, status, state);
        }
    }
}

/// Rows of content in the active overlay, or 0 outside overlays.
///
/// Bounds overlay scrolling, so it must agree with what the renderers draw
/// at the current terminal width.
pub fn overlay_content_lines(state: &AppState, highlighter: &JsonHighlighter) -> usize {
    match state.mode() {
        Mode::Help => help::help_lines().len(),
        Mode::Detail { line } => {
            let width = state
                .view()
                .viewport()
                .map_or(0, |v| usize::from(v.width));
            state
                .line(*line)
                .map_or(0, |line| detail::detail_lines(line, width, highlighter).len())
        }
        _ => 0,
    }
}

#[cfg(test)]
#[path = "layout_tests.rs"]
mod tests;
