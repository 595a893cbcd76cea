//! Single-line text editor shared by the filter and view entry modes.
//!
//! The cursor is a character index (not a byte index) so multi-byte input
//! edits correctly. All editing operations are pure state updates.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Editable text plus cursor position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    text: String,
    /// Cursor position in characters, `0..=char_count`.
    cursor: usize,
}

/// What a key press meant to the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    /// The text or cursor changed (or the key was ignored); keep editing.
    Editing,
    /// Enter: commit the text.
    Submit,
    /// Esc: abandon the edit.
    Cancel,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefilled editor with the cursor at the end.
    pub fn with_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.chars().count();
        Self { text, cursor }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Byte offset of character index `index` (or the end of the text).
    fn byte_index(&self, index: usize) -> usize {
        self.text
            .char_indices()
            .nth(index)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    pub fn insert(&mut self, ch: char) {
        let at = self.byte_index(self.cursor);
        self.text.insert(at, ch);
        self.cursor += 1;
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_count());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.char_count();
    }

    /// Delete the character before the cursor.
    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let at = self.byte_index(self.cursor - 1);
        self.text.remove(at);
        self.cursor -= 1;
    }

    /// Delete the character under the cursor.
    pub fn delete(&mut self) {
        if self.cursor >= self.char_count() {
            return;
        }
        let at = self.byte_index(self.cursor);
        self.text.remove(at);
    }

    /// Delete the word before the cursor, along with any spaces between the
    /// word and the cursor.
    pub fn delete_word_before(&mut self) {
        let chars: Vec<char> = self.text.chars().collect();
        let mut start = self.cursor;
        while start > 0 && chars[start - 1] == ' ' {
            start -= 1;
        }
        while start > 0 && chars[start - 1] != ' ' {
            start -= 1;
        }
        let from = self.byte_index(start);
        let to = self.byte_index(self.cursor);
        self.text.replace_range(from..to, "");
        self.cursor = start;
    }

    /// Delete from the cursor to the end of the text.
    pub fn delete_to_end(&mut self) {
        let at = self.byte_index(self.cursor);
        self.text.truncate(at);
    }

    /// Apply one key press.
    ///
    /// | Key | Effect |
    /// |---|---|
    /// | printable | insert at cursor |
    /// | ← / → | move cursor |
    /// | Home, Ctrl+A / End, Ctrl+E | jump to start / end |
    /// | Backspace | delete before cursor |
    /// | Delete, Ctrl+D | delete under cursor |
    /// | Ctrl+W | delete word before cursor |
    /// | Ctrl+K | delete to end |
    /// | Enter / Esc | submit / cancel |
    pub fn handle_key(&mut self, key: KeyEvent) -> InputOutcome {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Enter => return InputOutcome::Submit,
            KeyCode::Esc => return InputOutcome::Cancel,
            KeyCode::Left => self.move_left(),
            KeyCode::Right => self.move_right(),
            KeyCode::Home => self.move_home(),
            KeyCode::End => self.move_end(),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Char('a') if ctrl => self.move_home(),
            KeyCode::Char('e') if ctrl => self.move_end(),
            KeyCode::Char('d') if ctrl => self.delete(),
            KeyCode::Char('w') if ctrl => self.delete_word_before(),
            KeyCode::Char('k') if ctrl => self.delete_to_end(),
            KeyCode::Char(ch) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
                self.insert(ch)
            }
            _ => {}
        }
        InputOutcome::Editing
    }
}
