use ratatui::text::Span;

/// Single line text input with a cursor.
///
/// The cursor is a byte offset into `value`, always on a char boundary.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct QueryInput {
    value: String,
    cursor: usize,
}

impl QueryInput {
    pub fn new(value: &str) -> Self {
        Self {
            value: value.to_string(),
            cursor: value.len(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Replace the content, moving the cursor to the end
    pub fn set(&mut self, value: &str) {
        self.value = value.to_string();
        self.cursor = self.value.len();
    }

    /// Display width of the text before the cursor
    pub fn cursor_offset(&self) -> u16 {
        Span::raw(&self.value[..self.cursor]).width() as u16
    }

    pub fn insert(&mut self, c: char) {
        self.value.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn insert_str(&mut self, s: &str) {
        // pasted newlines would end up in the query
        let s: String = s.chars().filter(|c| !c.is_control()).collect();
        self.value.insert_str(self.cursor, &s);
        self.cursor += s.len();
    }

    fn prev_boundary(&self) -> Option<usize> {
        self.value[..self.cursor].char_indices().next_back().map(|(i, _)| i)
    }

    fn next_boundary(&self) -> Option<usize> {
        self.value[self.cursor..]
            .chars()
            .next()
            .map(|c| self.cursor + c.len_utf8())
    }

    /// Delete the char before the cursor
    pub fn delete_backward(&mut self) -> Option<char> {
        let pos = self.prev_boundary()?;
        self.cursor = pos;
        Some(self.value.remove(pos))
    }

    /// Delete the char under the cursor
    pub fn delete_forward(&mut self) -> Option<char> {
        if self.cursor >= self.value.len() {
            return None;
        }
        Some(self.value.remove(self.cursor))
    }

    /// Unix word rubout: delete back to the previous whitespace
    pub fn delete_backward_to_whitespace(&mut self) -> String {
        let before = &self.value[..self.cursor];
        let trimmed = before.trim_end();
        let start = trimmed.rfind(char::is_whitespace).map_or(0, |i| i + 1);
        let deleted: String = self.value.drain(start..self.cursor).collect();
        self.cursor = start;
        deleted
    }

    pub fn delete_to_beginning(&mut self) -> String {
        let deleted: String = self.value.drain(..self.cursor).collect();
        self.cursor = 0;
        deleted
    }

    pub fn move_left(&mut self) {
        if let Some(pos) = self.prev_boundary() {
            self.cursor = pos;
        }
    }

    pub fn move_right(&mut self) {
        if let Some(pos) = self.next_boundary() {
            self.cursor = pos;
        }
    }

    pub fn move_to_start(&mut self) {
        self.cursor = 0;
    }

    pub fn move_to_end(&mut self) {
        self.cursor = self.value.len();
    }
}
