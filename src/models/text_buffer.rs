//! Shared editing surface.
//!
//! Every open document is presented through this one buffer: switching tabs
//! writes the live rope back into the outgoing document and loads the next
//! document's rope here. Cursor positions are 0-based `(row, col)` with the
//! column counted in chars.

use ropey::Rope;

const MAX_HISTORY: usize = 256;

#[derive(Clone)]
struct Snapshot {
    rope: Rope,
    cursor: (usize, usize),
}

#[derive(Clone)]
pub struct TextBuffer {
    rope: Rope,
    cursor: (usize, usize),
    anchor: Option<(usize, usize)>,
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::from_rope(Rope::new())
    }

    pub fn from_text(text: &str) -> Self {
        Self::from_rope(Rope::from_str(text))
    }

    fn from_rope(rope: Rope) -> Self {
        Self {
            rope,
            cursor: (0, 0),
            anchor: None,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    /// Replaces the whole content. History and selection do not carry over.
    pub fn load(&mut self, rope: Rope, cursor: (usize, usize)) {
        self.rope = rope;
        self.anchor = None;
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.cursor = self.clamp(cursor);
    }

    pub fn rope(&self) -> &Rope {
        &self.rope
    }

    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    pub fn len_lines(&self) -> usize {
        self.rope.len_lines()
    }

    pub fn cursor(&self) -> (usize, usize) {
        self.cursor
    }

    pub fn set_cursor(&mut self, row: usize, col: usize) {
        self.cursor = self.clamp((row, col));
        self.anchor = None;
    }

    /// Length of `row` in chars, line terminator excluded.
    pub fn line_len(&self, row: usize) -> usize {
        if row >= self.rope.len_lines() {
            return 0;
        }
        let line = self.rope.line(row);
        let mut len = line.len_chars();
        if len > 0 && line.char(len - 1) == '\n' {
            len -= 1;
            if len > 0 && line.char(len - 1) == '\r' {
                len -= 1;
            }
        }
        len
    }

    pub fn line_text(&self, row: usize) -> Option<String> {
        if row >= self.rope.len_lines() {
            return None;
        }
        let start = self.rope.line_to_char(row);
        Some(self.rope.slice(start..start + self.line_len(row)).to_string())
    }

    fn clamp(&self, (row, col): (usize, usize)) -> (usize, usize) {
        let last_row = self.rope.len_lines().saturating_sub(1);
        let row = row.min(last_row);
        (row, col.min(self.line_len(row)))
    }

    pub fn pos_to_char(&self, pos: (usize, usize)) -> usize {
        let (row, col) = self.clamp(pos);
        self.rope.line_to_char(row) + col
    }

    pub fn char_to_pos(&self, idx: usize) -> (usize, usize) {
        let idx = idx.min(self.rope.len_chars());
        let row = self.rope.char_to_line(idx);
        (row, idx - self.rope.line_to_char(row))
    }

    fn end_pos(&self) -> (usize, usize) {
        let last_row = self.rope.len_lines().saturating_sub(1);
        (last_row, self.line_len(last_row))
    }

    // Selection

    pub fn selection_range(&self) -> Option<(usize, usize)> {
        let anchor = self.anchor?;
        let a = self.pos_to_char(anchor);
        let b = self.pos_to_char(self.cursor);
        (a != b).then(|| (a.min(b), a.max(b)))
    }

    pub fn has_selection(&self) -> bool {
        self.selection_range().is_some()
    }

    pub fn selected_text(&self) -> Option<String> {
        let (start, end) = self.selection_range()?;
        Some(self.rope.slice(start..end).to_string())
    }

    pub fn select_all(&mut self) {
        self.anchor = Some((0, 0));
        self.cursor = self.end_pos();
    }

    pub fn clear_selection(&mut self) {
        self.anchor = None;
    }

    /// Selects `row` together with its line break (when it has one).
    pub fn select_line(&mut self, row: usize) {
        let last_row = self.rope.len_lines().saturating_sub(1);
        let row = row.min(last_row);
        self.anchor = Some((row, 0));
        self.cursor = if row < last_row {
            (row + 1, 0)
        } else {
            (row, self.line_len(row))
        };
    }

    // Cursor movement. `select` extends the selection from the current anchor.

    fn move_to(&mut self, pos: (usize, usize), select: bool) {
        if select {
            if self.anchor.is_none() {
                self.anchor = Some(self.cursor);
            }
        } else {
            self.anchor = None;
        }
        self.cursor = self.clamp(pos);
    }

    pub fn move_left(&mut self, select: bool) {
        let idx = self.pos_to_char(self.cursor);
        let pos = self.char_to_pos(idx.saturating_sub(1));
        self.move_to(pos, select);
    }

    pub fn move_right(&mut self, select: bool) {
        let (row, col) = self.cursor;
        let pos = if col < self.line_len(row) {
            (row, col + 1)
        } else if row + 1 < self.rope.len_lines() {
            (row + 1, 0)
        } else {
            (row, col)
        };
        self.move_to(pos, select);
    }

    pub fn move_up(&mut self, select: bool) {
        let (row, col) = self.cursor;
        let pos = if row == 0 { (0, 0) } else { (row - 1, col) };
        self.move_to(pos, select);
    }

    pub fn move_down(&mut self, select: bool) {
        let (row, col) = self.cursor;
        let pos = if row + 1 < self.rope.len_lines() {
            (row + 1, col)
        } else {
            (row, self.line_len(row))
        };
        self.move_to(pos, select);
    }

    pub fn move_line_start(&mut self, select: bool) {
        self.move_to((self.cursor.0, 0), select);
    }

    pub fn move_line_end(&mut self, select: bool) {
        let row = self.cursor.0;
        self.move_to((row, self.line_len(row)), select);
    }

    pub fn move_file_start(&mut self, select: bool) {
        self.move_to((0, 0), select);
    }

    pub fn move_file_end(&mut self, select: bool) {
        self.move_to(self.end_pos(), select);
    }

    // Editing

    fn checkpoint(&mut self) {
        self.undo_stack.push(Snapshot {
            rope: self.rope.clone(),
            cursor: self.cursor,
        });
        if self.undo_stack.len() > MAX_HISTORY {
            self.undo_stack.remove(0);
        }
        self.redo_stack.clear();
    }

    fn remove_selection(&mut self) -> bool {
        let Some((start, end)) = self.selection_range() else {
            self.anchor = None;
            return false;
        };
        self.rope.remove(start..end);
        self.anchor = None;
        self.cursor = self.char_to_pos(start);
        true
    }

    pub fn insert_str(&mut self, text: &str) {
        if text.is_empty() && !self.has_selection() {
            return;
        }
        self.checkpoint();
        self.remove_selection();
        let idx = self.pos_to_char(self.cursor);
        self.rope.insert(idx, text);
        self.cursor = self.char_to_pos(idx + text.chars().count());
    }

    pub fn insert_char(&mut self, ch: char) {
        let mut buf = [0u8; 4];
        self.insert_str(ch.encode_utf8(&mut buf));
    }

    pub fn insert_newline(&mut self) {
        self.insert_char('\n');
    }

    pub fn delete_selection(&mut self) -> bool {
        if !self.has_selection() {
            return false;
        }
        self.checkpoint();
        self.remove_selection()
    }

    pub fn backspace(&mut self) -> bool {
        if self.delete_selection() {
            return true;
        }
        let idx = self.pos_to_char(self.cursor);
        if idx == 0 {
            return false;
        }
        self.checkpoint();
        self.rope.remove(idx - 1..idx);
        self.cursor = self.char_to_pos(idx - 1);
        true
    }

    pub fn delete_forward(&mut self) -> bool {
        if self.delete_selection() {
            return true;
        }
        let idx = self.pos_to_char(self.cursor);
        if idx >= self.rope.len_chars() {
            return false;
        }
        self.checkpoint();
        self.rope.remove(idx..idx + 1);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo(&mut self) -> bool {
        let Some(prev) = self.undo_stack.pop() else {
            return false;
        };
        self.redo_stack.push(Snapshot {
            rope: std::mem::replace(&mut self.rope, prev.rope),
            cursor: self.cursor,
        });
        self.anchor = None;
        self.cursor = self.clamp(prev.cursor);
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(next) = self.redo_stack.pop() else {
            return false;
        };
        self.undo_stack.push(Snapshot {
            rope: std::mem::replace(&mut self.rope, next.rope),
            cursor: self.cursor,
        });
        self.anchor = None;
        self.cursor = self.clamp(next.cursor);
        true
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/text_buffer.rs"]
mod tests;
