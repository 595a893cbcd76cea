//! Full-screen view of one line.
//!
//! Valid lines are pretty-printed with two-space indentation and
//! highlighted. Invalid lines show their raw text. Either way the content
//! is wrapped to the terminal width minus a margin.

use super::constants::DETAIL_MARGIN;
use super::helpers::{format_count, wrap_to_width};
use super::highlighter::{JsonHighlighter, StyledSegment};
use super::status_bar;
use crate::model::LogLine;
use crate::state::AppState;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use serde_json::Value;

/// Heading above the raw text of an invalid line.
pub const INVALID_HEADING: &str = "Invalid JSON:";

/// Wrapped content rows for `line` at terminal width `width`.
pub fn detail_lines(
    line: &LogLine,
    width: usize,
    highlighter: &JsonHighlighter,
) -> Vec<Line<'static>> {
    let wrap_width = width.saturating_sub(DETAIL_MARGIN);

    let Some(value) = line.json() else {
        let mut rows = vec![Line::from(INVALID_HEADING)];
        rows.extend(
            wrap_to_width(line.raw(), wrap_width)
                .into_iter()
                .map(Line::from),
        );
        return rows;
    };

    let pretty = match serde_json::to_string_pretty(&sorted_keys(value)) {
        Ok(pretty) => pretty,
        Err(e) => return vec![Line::from(format!("Error formatting JSON: {e}"))],
    };

    highlighter
        .highlight(&pretty)
        .into_iter()
        .flat_map(|segments| wrap_segments(&segments, wrap_width))
        .collect()
}

/// Copy of `value` with every object's keys in ascending order.
fn sorted_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.clone(), sorted_keys(v)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(sorted_keys).collect()),
        other => other.clone(),
    }
}

/// Wrap one highlighted source line, keeping each segment's style.
fn wrap_segments(segments: &[StyledSegment], width: usize) -> Vec<Line<'static>> {
    let plain: String = segments.iter().map(|(_, text)| text.as_str()).collect();

    let mut rows = Vec::new();
    let mut start = 0;
    for piece in wrap_to_width(&plain, width) {
        let end = start + piece.len();
        rows.push(slice_segments(segments, start, end));
        start = end;
    }
    rows
}

/// The byte range `start..end` of the concatenated segments, as one line.
fn slice_segments(segments: &[StyledSegment], start: usize, end: usize) -> Line<'static> {
    let mut spans = Vec::new();
    let mut offset = 0;
    for (style, text) in segments {
        let seg_start = offset;
        let seg_end = offset + text.len();
        offset = seg_end;

        let from = start.max(seg_start);
        let to = end.min(seg_end);
        if from < to {
            spans.push(Span::styled(
                text[from - seg_start..to - seg_start].to_string(),
                *style,
            ));
        }
    }
    Line::from(spans)
}

/// Status text for the detail view.
///
/// `first_row` and `total_rows` appear only when the content scrolls.
pub fn status_text(line: &LogLine, first_row: usize, total_rows: usize, page: usize) -> String {
    let position = if total_rows > page {
        format!(" | {}/{}", format_count(first_row + 1), format_count(total_rows))
    } else {
        String::new()
    };
    format!(
        "Pretty Print - Line {}{position} | ↑/↓/PgUp/PgDn to scroll | ENTER/SPACE/ESC to return | q to quit",
        format_count(line.number().get()),
    )
}

/// Render the detail view of `line` over the whole screen.
pub fn render(
    frame: &mut Frame,
    content: Rect,
    status: Rect,
    state: &AppState,
    line: &LogLine,
    highlighter: &JsonHighlighter,
) {
    let rows = detail_lines(line, usize::from(frame.area().width), highlighter);
    let page = usize::from(content.height);
    let scroll = state
        .view()
        .overlay_scroll()
        .min(rows.len().saturating_sub(page));

    let total = rows.len();
    let shown: Vec<Line> = rows.into_iter().skip(scroll).take(page).collect();
    frame.render_widget(Paragraph::new(shown), content);
    status_bar::render_text(frame, status, &status_text(line, scroll, total, page));
}
