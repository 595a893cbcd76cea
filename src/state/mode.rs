//! UI modes.
//!
//! Exactly one mode is active. Each variant carries only the state that mode
//! owns, so leaving a mode drops its payload with it.

use crate::model::LineNumber;
use crate::state::text_input::TextInput;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Mode {
    /// Browsing the line list.
    #[default]
    Normal,
    /// Typing a new filter expression.
    FilterEntry(TextInput),
    /// Browsing the filter list; `cursor` indexes it.
    FilterManage { cursor: usize },
    /// Editing the filter at `index`, opened from the filter list.
    FilterEdit { index: usize, input: TextInput },
    /// Typing the view transform expression.
    ViewEntry(TextInput),
    /// Expanded view of a single line.
    Detail { line: LineNumber },
    /// Key binding reference.
    Help,
}

impl Mode {
    /// Modes that draw an overlay with its own vertical scroll.
    pub fn has_overlay(&self) -> bool {
        matches!(self, Mode::Detail { .. } | Mode::Help)
    }

    /// The text editor, for modes that have one.
    pub fn input(&self) -> Option<&TextInput> {
        match self {
            Mode::FilterEntry(input) | Mode::ViewEntry(input) => Some(input),
            Mode::FilterEdit { input, .. } => Some(input),
            _ => None,
        }
    }

    pub fn input_mut(&mut self) -> Option<&mut TextInput> {
        match self {
            Mode::FilterEntry(input) | Mode::ViewEntry(input) => Some(input),
            Mode::FilterEdit { input, .. } => Some(input),
            _ => None,
        }
    }

    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Mode::Normal => "normal",
            Mode::FilterEntry(_) => "filter-entry",
            Mode::FilterManage { .. } => "filter-manage",
            Mode::FilterEdit { .. } => "filter-edit",
            Mode::ViewEntry(_) => "view-entry",
            Mode::Detail { .. } => "detail",
            Mode::Help => "help",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_normal() {
        assert_eq!(Mode::default(), Mode::Normal);
    }

    #[test]
    fn only_detail_and_help_have_overlays() {
        assert!(Mode::Help.has_overlay());
        assert!(Mode::Detail {
            line: LineNumber::FIRST
        }
        .has_overlay());
        assert!(!Mode::Normal.has_overlay());
        assert!(!Mode::FilterManage { cursor: 0 }.has_overlay());
    }

    #[test]
    fn input_is_exposed_for_text_modes_only() {
        let mut mode = Mode::FilterEdit {
            index: 2,
            input: TextInput::with_text(".a"),
        };
        assert_eq!(mode.input().map(TextInput::text), Some(".a"));
        if let Some(input) = mode.input_mut() {
            input.insert('b');
        }
        assert_eq!(mode.input().map(TextInput::text), Some(".ab"));

        assert!(Mode::Help.input().is_none());
        assert!(Mode::ViewEntry(TextInput::new()).input().is_some());
    }
}
