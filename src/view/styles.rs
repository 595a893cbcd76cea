//! Shared styling constants.
//!
//! Each entry bar has a base style and an inverted cursor style built from
//! the same two colors.

use ratatui::style::{Color, Modifier, Style};

const SELECTED_BG: Color = Color::Rgb(0x00, 0x44, 0x99);
const STATUS_BG: Color = Color::Rgb(0x00, 0x66, 0xCC);
const INVALID_FG: Color = Color::Rgb(0x66, 0x66, 0x66);
const FILTER_BG: Color = Color::Rgb(0xFF, 0xD7, 0x00);
const VIEW_BG: Color = Color::Rgb(0x99, 0x66, 0xCC);
const EDIT_FILTER_BG: Color = Color::Rgb(0xFF, 0x66, 0x00);

/// The selected list row and the filter manager cursor row.
pub const SELECTED_ROW: Style = Style::new().fg(Color::White).bg(SELECTED_BG);

/// Rows whose raw text is not valid JSON.
pub const INVALID_ROW: Style = Style::new().fg(INVALID_FG);

/// Normal, filter manager, detail and help status bars.
pub const STATUS_BAR: Style = Style::new().fg(Color::White).bg(STATUS_BG);

/// Muted text for hints and placeholder messages.
pub const MUTED_TEXT: Style = Style::new().fg(Color::DarkGray);

/// Section headings in the help screen.
pub const SECTION_HEADER: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);

/// Colors of a text entry bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryBarStyle {
    pub base: Style,
    pub cursor: Style,
}

impl EntryBarStyle {
    const fn new(fg: Color, bg: Color) -> Self {
        Self {
            base: Style::new().fg(fg).bg(bg),
            cursor: Style::new().fg(bg).bg(fg),
        }
    }
}

/// `Filter: ` bar.
pub const FILTER_BAR: EntryBarStyle = EntryBarStyle::new(Color::Black, FILTER_BG);

/// `View: ` bar.
pub const VIEW_BAR: EntryBarStyle = EntryBarStyle::new(Color::White, VIEW_BG);

/// `Edit Filter: ` bar.
pub const EDIT_FILTER_BAR: EntryBarStyle = EntryBarStyle::new(Color::White, EDIT_FILTER_BG);
