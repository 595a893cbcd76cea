//! Selection and scroll offsets over the visible sequence.
//!
//! `ViewState` knows nothing about lines themselves, only the length of the
//! visible sequence (and, for re-anchoring, its line numbers). The list
//! window is the terminal height minus the status line.
//!
//! # Invariants
//!
//! After every operation that takes the visible length:
//!
//! - `selected < len` when `len > 0`, and `selected == 0` otherwise
//! - `top <= selected < top + list_height`

use crate::model::LineNumber;

/// Terminal dimensions as last reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    selected: usize,
    top: usize,
    h_offset: usize,
    overlay_scroll: usize,
    viewport: Option<Viewport>,
    pending_jump_to_bottom: bool,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the selected entry in the visible sequence.
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Index of the first visible entry in the list window.
    pub fn top(&self) -> usize {
        self.top
    }

    /// Horizontal scroll of the selected line, in columns.
    pub fn h_offset(&self) -> usize {
        self.h_offset
    }

    /// Vertical scroll of the detail or help overlay.
    pub fn overlay_scroll(&self) -> usize {
        self.overlay_scroll
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    pub fn has_pending_jump(&self) -> bool {
        self.pending_jump_to_bottom
    }

    /// Rows available to the list (terminal height minus the status line).
    ///
    /// At least 1, also before the size is known.
    pub fn list_height(&self) -> usize {
        self.viewport
            .map(|v| usize::from(v.height).saturating_sub(1))
            .unwrap_or(1)
            .max(1)
    }

    /// Line number of the selected entry, if any.
    pub fn selected_line(&self, visible: &[LineNumber]) -> Option<LineNumber> {
        visible.get(self.selected).copied()
    }

    /// Record a new terminal size and run a deferred jump to bottom.
    pub fn resize(&mut self, width: u16, height: u16, len: usize) {
        self.viewport = Some(Viewport { width, height });
        if self.pending_jump_to_bottom {
            self.pending_jump_to_bottom = false;
            self.to_bottom(len);
        } else {
            self.clamp(len);
        }
    }

    /// Move the selection by `delta` entries, saturating at both ends.
    pub fn move_by(&mut self, delta: isize, len: usize) {
        self.selected = self.selected.saturating_add_signed(delta);
        self.h_offset = 0;
        self.clamp(len);
    }

    pub fn page_down(&mut self, len: usize) {
        let page = isize::try_from(self.list_height()).unwrap_or(isize::MAX);
        self.move_by(page, len);
    }

    pub fn page_up(&mut self, len: usize) {
        let page = isize::try_from(self.list_height()).unwrap_or(isize::MAX);
        self.move_by(-page, len);
    }

    pub fn to_top(&mut self) {
        self.selected = 0;
        self.top = 0;
        self.h_offset = 0;
    }

    /// Select the last entry with the list window filled from the bottom.
    pub fn to_bottom(&mut self, len: usize) {
        self.selected = len.saturating_sub(1);
        self.top = len.saturating_sub(self.list_height());
        self.h_offset = 0;
    }

    /// Jump to the bottom now, or as soon as the terminal size is known.
    pub fn request_jump_to_bottom(&mut self, len: usize) {
        if self.viewport.is_some() {
            self.to_bottom(len);
        } else {
            self.pending_jump_to_bottom = true;
        }
    }

    /// Relocate the selection after the visible sequence changed shape.
    ///
    /// Selects the entry carrying `target`; if it is gone, the nearest
    /// preceding survivor; if none precede it, index 0.
    pub fn reanchor(&mut self, visible: &[LineNumber], target: Option<LineNumber>) {
        self.selected = match target {
            Some(target) => match visible.binary_search(&target) {
                Ok(index) => index,
                Err(insert_at) => insert_at.saturating_sub(1),
            },
            None => 0,
        };
        self.clamp(visible.len());
    }

    /// Scroll the selected line horizontally, keeping `0 <= h_offset <= max`.
    pub fn scroll_horizontal(&mut self, delta: isize, max: usize) {
        self.h_offset = self.h_offset.saturating_add_signed(delta).min(max);
    }

    pub fn reset_h_offset(&mut self) {
        self.h_offset = 0;
    }

    /// Scroll an overlay whose content is `content_lines` tall.
    pub fn scroll_overlay(&mut self, delta: isize, content_lines: usize) {
        let max = content_lines.saturating_sub(self.list_height());
        self.overlay_scroll = self.overlay_scroll.saturating_add_signed(delta).min(max);
    }

    pub fn reset_overlay_scroll(&mut self) {
        self.overlay_scroll = 0;
    }

    /// Re-establish the invariants for a visible sequence of `len` entries.
    pub fn clamp(&mut self, len: usize) {
        self.selected = self.selected.min(len.saturating_sub(1));
        let height = self.list_height();
        if self.selected < self.top {
            self.top = self.selected;
        } else if self.selected >= self.top + height {
            self.top = self.selected + 1 - height;
        }
    }
}

#[cfg(test)]
#[path = "view_state_tests.rs"]
mod tests;
