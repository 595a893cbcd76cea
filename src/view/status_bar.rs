//! The bottom row: status text, the busy spinner and text entry bars.

use super::constants::SPINNER_WIDTH;
use super::helpers::format_count;
use super::styles::{EntryBarStyle, STATUS_BAR};
use crate::state::{AppState, TextInput};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// First frame of the spinner: the braille block U+2840..=U+28FF.
const SPINNER_BASE: u32 = 0x2840;
const SPINNER_FRAMES: u32 = 192;

/// Spinner glyph for a tick count.
pub fn spinner_char(frame: usize) -> char {
    let step = u32::try_from(frame % SPINNER_FRAMES as usize).unwrap_or(0);
    char::from_u32(SPINNER_BASE + step).unwrap_or('⡀')
}

/// The `/<total>` part of the line counter.
///
/// Exact once the whole file is loaded; before that an estimate (`~N`) when
/// it exceeds what is loaded, else a lower bound (`N+`).
pub fn total_indicator(state: &AppState) -> String {
    let loaded = state.store().len();
    if state.is_fully_loaded() {
        format_count(state.filters().visible_len())
    } else if state.estimated_total() > loaded {
        format!("~{}", format_count(state.estimated_total()))
    } else {
        format!("{}+", format_count(loaded))
    }
}

/// Status text for the main list.
pub fn normal_status_text(state: &AppState) -> String {
    let current = state
        .view()
        .selected_line(state.visible())
        .map_or(0, |n| n.get());
    let tail = if state.is_tail_follow() { "on" } else { "off" };
    format!(
        "{} | Line {}/{} | h=Help | T={tail}",
        state.source_name(),
        format_count(current),
        total_indicator(state),
    )
}

/// Render `text` as a status bar.
pub fn render_text(frame: &mut Frame, area: Rect, text: &str) {
    frame.render_widget(Paragraph::new(text.to_string()).style(STATUS_BAR), area);
}

/// Render the main list status bar, with the spinner while reading to end.
pub fn render_normal(frame: &mut Frame, area: Rect, state: &AppState) {
    let text = normal_status_text(state);
    if !state.is_loading_to_end() {
        render_text(frame, area, &text);
        return;
    }

    let [main, spinner] =
        Layout::horizontal([Constraint::Min(0), Constraint::Length(SPINNER_WIDTH)]).areas(area);
    render_text(frame, main, &text);
    let glyph = Paragraph::new(spinner_char(state.spinner_frame()).to_string())
        .style(STATUS_BAR)
        .alignment(Alignment::Right);
    frame.render_widget(glyph, spinner);
}

/// Render `prefix` and the input text with a block cursor.
pub fn render_entry(
    frame: &mut Frame,
    area: Rect,
    prefix: &str,
    input: &TextInput,
    style: EntryBarStyle,
) {
    frame.render_widget(
        Paragraph::new(entry_line(prefix, input, style)).style(style.base),
        area,
    );
}

fn entry_line(prefix: &str, input: &TextInput, style: EntryBarStyle) -> Line<'static> {
    let text = input.text();
    let split = text
        .char_indices()
        .nth(input.cursor())
        .map_or(text.len(), |(idx, _)| idx);
    let (before, rest) = text.split_at(split);
    let mut rest_chars = rest.chars();
    let under_cursor = rest_chars.next().unwrap_or(' ');

    Line::from(vec![
        Span::styled(format!("{prefix}{before}"), style.base),
        Span::styled(under_cursor.to_string(), style.cursor),
        Span::styled(rest_chars.as_str().to_string(), style.base),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::styles::FILTER_BAR;

    #[test]
    fn spinner_cycles_through_braille_block() {
        assert_eq!(spinner_char(0), '\u{2840}');
        assert_eq!(spinner_char(191), '\u{28FF}');
        assert_eq!(spinner_char(192), '\u{2840}');
    }

    #[test]
    fn cursor_at_end_is_a_blank_cell() {
        let mut input = TextInput::new();
        input.insert('a');
        let line = entry_line("Filter: ", &input, FILTER_BAR);

        let parts: Vec<&str> = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(parts, vec!["Filter: a", " ", ""]);
        assert_eq!(line.spans[1].style, FILTER_BAR.cursor);
    }

    #[test]
    fn cursor_in_middle_highlights_that_character() {
        let mut input = TextInput::with_text(".lévél");
        input.move_home();
        input.move_right();
        input.move_right();
        let line = entry_line("View: ", &input, FILTER_BAR);

        let parts: Vec<&str> = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(parts, vec!["View: .l", "é", "vél"]);
    }
}
