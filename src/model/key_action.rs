//! Domain-level keyboard actions independent of key bindings.

/// Normal-mode actions that can be mapped to configurable key bindings.
///
/// These represent user intent, not specific keys. The mapping from
/// crossterm::event::KeyEvent to KeyAction is handled by KeyBindings.
/// Text-entry and filter-management modes read keys directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    // Vertical navigation
    /// Move selection up one line. Default: k/↑
    ScrollUp,
    /// Move selection down one line, possibly requesting more lines. Default: j/↓
    ScrollDown,
    /// Move selection up one page. Default: Page Up
    PageUp,
    /// Move selection down one page. Default: Page Down
    PageDown,
    /// Jump to the first line. Default: Home
    ScrollToTop,
    /// Jump to the last line, reading the rest of the file first. Default: End
    ScrollToBottom,

    // Horizontal scroll of the selected line
    /// Default: ←
    ScrollLeft,
    /// Default: →
    ScrollRight,
    /// Scroll left by several columns. Default: Ctrl+←
    FastScrollLeft,
    /// Scroll right by several columns. Default: Ctrl+→
    FastScrollRight,

    // Overlays and modes
    /// Open the detail view of the selected line. Default: Enter/Space
    OpenDetail,
    /// Start typing a new filter expression. Default: f
    AddFilter,
    /// Open the filter management list. Default: F
    ManageFilters,
    /// Start editing the view transform. Default: v/V
    EditView,
    /// Toggle tail-follow. Default: t
    ToggleTail,
    /// Toggle the help screen. Default: h/?
    Help,

    // Application
    /// Close the current overlay, or quit from the main list. Default: Esc
    Back,
    /// Exit the application. Default: q/Ctrl+c
    Quit,
}

impl KeyAction {
    /// Whether the action moves the selection vertically.
    pub fn is_vertical_move(self) -> bool {
        matches!(
            self,
            KeyAction::ScrollUp
                | KeyAction::ScrollDown
                | KeyAction::PageUp
                | KeyAction::PageDown
                | KeyAction::ScrollToTop
                | KeyAction::ScrollToBottom
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertical_moves_are_classified() {
        assert!(KeyAction::ScrollDown.is_vertical_move());
        assert!(KeyAction::PageUp.is_vertical_move());
        assert!(KeyAction::ScrollToBottom.is_vertical_move());
    }

    #[test]
    fn horizontal_and_mode_actions_are_not_vertical() {
        assert!(!KeyAction::ScrollLeft.is_vertical_move());
        assert!(!KeyAction::FastScrollRight.is_vertical_move());
        assert!(!KeyAction::ToggleTail.is_vertical_move());
        assert!(!KeyAction::Quit.is_vertical_move());
    }
}
