/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// A single editable text buffer with a character-based cursor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    value: String,
    cursor: usize,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contents and move the cursor to the end
    pub fn set(&mut self, value: &str) {
        self.value = value.to_string();
        self.cursor = self.value.chars().count();
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Take the contents, leaving the buffer empty
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.value)
    }

    pub fn insert(&mut self, c: char) {
        let byte_pos = char_to_byte_index(&self.value, self.cursor);
        self.value.insert(byte_pos, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let byte_pos = char_to_byte_index(&self.value, self.cursor);
            self.value.remove(byte_pos);
        }
    }

    pub fn delete(&mut self) {
        let char_count = self.value.chars().count();
        if self.cursor < char_count {
            let byte_pos = char_to_byte_index(&self.value, self.cursor);
            self.value.remove(byte_pos);
        }
    }

    pub fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn right(&mut self) {
        let char_count = self.value.chars().count();
        self.cursor = (self.cursor + 1).min(char_count);
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.value.chars().count();
    }

    /// Cursor position as (line, column), both zero based, for multi-line buffers
    pub fn line_col(&self) -> (usize, usize) {
        let before: String = self.value.chars().take(self.cursor).collect();
        let line = before.matches('\n').count();
        let col = before.rsplit('\n').next().map(|l| l.chars().count()).unwrap_or(0);
        (line, col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_backspace_multibyte() {
        let mut input = TextInput::new();
        for c in "héllo".chars() {
            input.insert(c);
        }
        input.left();
        input.left();
        input.backspace();
        assert_eq!(input.value(), "hélo");
        assert_eq!(input.cursor(), 2);
    }

    #[test]
    fn test_delete_at_cursor() {
        let mut input = TextInput::new();
        input.set("abc");
        input.home();
        input.delete();
        assert_eq!(input.value(), "bc");
        input.end();
        input.delete();
        assert_eq!(input.value(), "bc");
    }

    #[test]
    fn test_take_empties_buffer() {
        let mut input = TextInput::new();
        input.set("question");
        assert_eq!(input.take(), "question");
        assert!(input.is_blank());
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn test_line_col() {
        let mut input = TextInput::new();
        input.set("ab\ncde");
        assert_eq!(input.line_col(), (1, 3));
        input.home();
        assert_eq!(input.line_col(), (0, 0));
    }
}
