//! Single-line text input state

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Editable line with a cursor, optionally masked for secrets
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    buffer: String,
    /// Byte offset into `buffer`, always on a char boundary
    cursor: usize,
    masked: bool,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// An input whose rendered value hides the characters
    pub fn masked() -> Self {
        Self {
            masked: true,
            ..Self::default()
        }
    }

    pub fn with_value(value: &str) -> Self {
        Self {
            buffer: value.to_string(),
            cursor: value.len(),
            masked: false,
        }
    }

    pub fn value(&self) -> &str {
        &self.buffer
    }

    pub fn is_masked(&self) -> bool {
        self.masked
    }

    /// Value as it should be drawn
    pub fn display(&self) -> String {
        if self.masked {
            "•".repeat(self.buffer.chars().count())
        } else {
            self.buffer.clone()
        }
    }

    /// Cursor position in characters, for placing the terminal cursor
    pub fn cursor_column(&self) -> usize {
        self.buffer[..self.cursor].chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.trim().is_empty()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }

    pub fn insert(&mut self, c: char) {
        self.buffer.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn backspace(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.buffer.remove(prev);
            self.cursor = prev;
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.buffer.len() {
            self.buffer.remove(self.cursor);
        }
    }

    pub fn move_left(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.cursor = prev;
        }
    }

    pub fn move_right(&mut self) {
        if let Some(c) = self.buffer[self.cursor..].chars().next() {
            self.cursor += c.len_utf8();
        }
    }

    /// Apply an editing key. Returns false if the key is not an editing key.
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('u') if ctrl => self.clear(),
            KeyCode::Char(_) if ctrl => return false,
            KeyCode::Char(c) => self.insert(c),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => self.move_left(),
            KeyCode::Right => self.move_right(),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.buffer.len(),
            _ => return false,
        }
        true
    }

    fn prev_boundary(&self) -> Option<usize> {
        self.buffer[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(idx, _)| idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_insert_and_backspace() {
        let mut input = TextInput::new();
        for c in "héllo".chars() {
            input.handle_key(&key(KeyCode::Char(c)));
        }
        assert_eq!(input.value(), "héllo");
        assert_eq!(input.cursor_column(), 5);

        input.handle_key(&key(KeyCode::Left));
        input.handle_key(&key(KeyCode::Left));
        input.handle_key(&key(KeyCode::Left));
        input.handle_key(&key(KeyCode::Backspace));
        assert_eq!(input.value(), "hllo");
        assert_eq!(input.cursor_column(), 1);
    }

    #[test]
    fn test_home_end_delete() {
        let mut input = TextInput::with_value("abc");
        input.handle_key(&key(KeyCode::Home));
        input.handle_key(&key(KeyCode::Delete));
        assert_eq!(input.value(), "bc");
        input.handle_key(&key(KeyCode::End));
        input.handle_key(&key(KeyCode::Char('d')));
        assert_eq!(input.value(), "bcd");
    }

    #[test]
    fn test_ctrl_u_clears() {
        let mut input = TextInput::with_value("secret");
        assert!(input.handle_key(&KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL)));
        assert!(input.value().is_empty());
        assert!(!input.handle_key(&KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL)));
    }

    #[test]
    fn test_masked_display() {
        let mut input = TextInput::masked();
        input.insert('a');
        input.insert('b');
        assert_eq!(input.display(), "••");
        assert_eq!(input.value(), "ab");
    }

    #[test]
    fn test_whitespace_counts_as_empty() {
        assert!(TextInput::with_value("   ").is_empty());
        assert!(!TextInput::with_value(" x ").is_empty());
    }

    #[test]
    fn test_non_editing_key_is_rejected() {
        let mut input = TextInput::new();
        assert!(!input.handle_key(&key(KeyCode::Enter)));
        assert!(!input.handle_key(&key(KeyCode::Esc)));
    }
}
