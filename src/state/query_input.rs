//! Single-line query editor.
//!
//! The cursor is a char index (not a byte index) so multi-byte input edits
//! correctly. Length is bounded in chars.

// ===== QueryInput =====

/// Editable query text with a cursor and a char limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryInput {
    text: String,
    cursor: usize,
    char_limit: usize,
}

impl QueryInput {
    /// Empty input accepting at most `char_limit` chars.
    pub fn new(char_limit: usize) -> Self {
        Self {
            text: String::new(),
            cursor: 0,
            char_limit,
        }
    }

    /// Current text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Cursor position in chars.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Maximum length in chars.
    pub fn char_limit(&self) -> usize {
        self.char_limit
    }

    /// Current length in chars.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Whether no text has been entered.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map(|(offset, _)| offset)
            .unwrap_or(self.text.len())
    }

    /// Insert `ch` at the cursor. Returns false when the limit is reached.
    pub fn insert(&mut self, ch: char) -> bool {
        if self.char_count() >= self.char_limit {
            return false;
        }
        let at = self.byte_offset(self.cursor);
        self.text.insert(at, ch);
        self.cursor += 1;
        true
    }

    /// Delete the char before the cursor.
    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let at = self.byte_offset(self.cursor - 1);
        self.text.remove(at);
        self.cursor -= 1;
    }

    /// Delete the char under the cursor.
    pub fn delete(&mut self) {
        if self.cursor >= self.char_count() {
            return;
        }
        let at = self.byte_offset(self.cursor);
        self.text.remove(at);
    }

    /// Cursor one char left.
    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Cursor one char right.
    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_count());
    }

    /// Cursor to the start.
    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    /// Cursor past the last char.
    pub fn move_end(&mut self) {
        self.cursor = self.char_count();
    }

    /// Remove everything before the cursor.
    pub fn clear_to_start(&mut self) {
        let at = self.byte_offset(self.cursor);
        self.text.replace_range(..at, "");
        self.cursor = 0;
    }

    /// Remove everything from the cursor on.
    pub fn clear_to_end(&mut self) {
        let at = self.byte_offset(self.cursor);
        self.text.truncate(at);
    }

    /// Remove the word before the cursor, plus any spaces between it and the
    /// cursor.
    pub fn delete_word(&mut self) {
        let chars: Vec<char> = self.text.chars().collect();
        let mut start = self.cursor;
        while start > 0 && chars[start - 1].is_whitespace() {
            start -= 1;
        }
        while start > 0 && !chars[start - 1].is_whitespace() {
            start -= 1;
        }
        let from = self.byte_offset(start);
        let to = self.byte_offset(self.cursor);
        self.text.replace_range(from..to, "");
        self.cursor = start;
    }
}

// ===== SubmittedQuery =====

/// Query text accepted for search. Never empty or whitespace-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedQuery(String);

impl SubmittedQuery {
    /// Returns `None` if `raw` is empty after trimming.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// The trimmed query.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
