use ropey::Rope;
use std::cmp;
use unicode_segmentation::UnicodeSegmentation;

use crate::width;

/// Editable text buffer backing the full-screen editor.
///
/// Tracks a line/column cursor, a scrolling viewport, and a single-slot
/// kill buffer fed by the cut bindings and drained by paste.
#[derive(Clone)]
pub struct Buffer {
    rope: Rope,
    cursor_line: usize,
    cursor_col: usize, // char offset within the line, newline excluded
    viewport_offset: usize,
    viewport_height: usize,
    kill_buffer: String,
    modified: bool,
    tab_size: usize,
    use_spaces: bool,
}

impl Buffer {
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            cursor_line: 0,
            cursor_col: 0,
            viewport_offset: 0,
            viewport_height: 24, // updated on every draw
            kill_buffer: String::new(),
            modified: false,
            tab_size: 4,
            use_spaces: true,
        }
    }

    pub fn set_tab_config(&mut self, tab_size: usize, use_spaces: bool) {
        self.tab_size = tab_size;
        self.use_spaces = use_spaces;
    }

    pub fn content(&self) -> String {
        self.rope.to_string()
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    pub fn cursor(&self) -> (usize, usize) {
        (self.cursor_line, self.cursor_col)
    }

    /// Display column of the cursor, accounting for wide characters.
    pub fn cursor_display_col(&self) -> usize {
        width::char_index_to_col(&self.line_text(self.cursor_line), self.cursor_col)
    }

    pub fn killed_text(&self) -> &str {
        &self.kill_buffer
    }

    pub fn set_viewport_height(&mut self, height: usize) {
        self.viewport_height = height.max(1);
        self.adjust_viewport();
    }

    pub fn viewport_offset(&self) -> usize {
        self.viewport_offset
    }

    pub fn viewport_lines(&self) -> Vec<String> {
        let end_line = cmp::min(
            self.viewport_offset + self.viewport_height,
            self.rope.len_lines(),
        );
        (self.viewport_offset..end_line)
            .map(|i| self.line_text(i))
            .collect()
    }

    /// Line content without its trailing newline.
    fn line_text(&self, line: usize) -> String {
        match self.rope.get_line(line) {
            Some(slice) => {
                let mut text = slice.to_string();
                if text.ends_with('\n') {
                    text.pop();
                }
                text
            }
            None => String::new(),
        }
    }

    /// Char length of a line, newline excluded.
    fn line_len(&self, line: usize) -> usize {
        match self.rope.get_line(line) {
            Some(slice) => {
                let len = slice.len_chars();
                if len > 0 && slice.char(len - 1) == '\n' {
                    len - 1
                } else {
                    len
                }
            }
            None => 0,
        }
    }

    fn char_idx(&self) -> usize {
        self.rope.line_to_char(self.cursor_line) + self.cursor_col
    }

    fn set_cursor_from_char_idx(&mut self, idx: usize) {
        let idx = idx.min(self.rope.len_chars());
        self.cursor_line = self.rope.char_to_line(idx);
        self.cursor_col = idx - self.rope.line_to_char(self.cursor_line);
        self.adjust_viewport();
    }

    pub fn insert_char(&mut self, c: char) {
        self.rope.insert_char(self.char_idx(), c);
        self.cursor_col += 1;
        self.modified = true;
    }

    pub fn insert_newline(&mut self) {
        self.rope.insert_char(self.char_idx(), '\n');
        self.cursor_line += 1;
        self.cursor_col = 0;
        self.modified = true;
        self.adjust_viewport();
    }

    pub fn insert_tab(&mut self) {
        if self.use_spaces {
            for _ in 0..self.tab_size {
                self.insert_char(' ');
            }
        } else {
            self.insert_char('\t');
        }
    }

    pub fn delete_backward(&mut self) {
        if self.cursor_col > 0 {
            let idx = self.char_idx();
            self.rope.remove(idx - 1..idx);
            self.cursor_col -= 1;
            self.modified = true;
        } else if self.cursor_line > 0 {
            let idx = self.char_idx();
            self.cursor_line -= 1;
            self.cursor_col = self.line_len(self.cursor_line);
            self.rope.remove(idx - 1..idx);
            self.modified = true;
            self.adjust_viewport();
        }
    }

    pub fn delete_forward(&mut self) {
        let idx = self.char_idx();
        if idx < self.rope.len_chars() {
            self.rope.remove(idx..idx + 1);
            self.modified = true;
        }
    }

    pub fn move_up(&mut self) {
        if self.cursor_line > 0 {
            self.cursor_line -= 1;
            self.clamp_col();
            self.adjust_viewport();
        }
    }

    pub fn move_down(&mut self) {
        if self.cursor_line + 1 < self.rope.len_lines() {
            self.cursor_line += 1;
            self.clamp_col();
            self.adjust_viewport();
        }
    }

    pub fn move_left(&mut self) {
        if self.cursor_col > 0 {
            self.cursor_col -= 1;
        } else if self.cursor_line > 0 {
            self.cursor_line -= 1;
            self.cursor_col = self.line_len(self.cursor_line);
            self.adjust_viewport();
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor_col < self.line_len(self.cursor_line) {
            self.cursor_col += 1;
        } else if self.cursor_line + 1 < self.rope.len_lines() {
            self.cursor_line += 1;
            self.cursor_col = 0;
            self.adjust_viewport();
        }
    }

    pub fn move_to_line_start(&mut self) {
        self.cursor_col = 0;
    }

    pub fn move_to_line_end(&mut self) {
        self.cursor_col = self.line_len(self.cursor_line);
    }

    pub fn page_up(&mut self) {
        self.cursor_line = self.cursor_line.saturating_sub(self.viewport_height);
        self.viewport_offset = self.viewport_offset.saturating_sub(self.viewport_height);
        self.clamp_col();
        self.adjust_viewport();
    }

    pub fn page_down(&mut self) {
        let max_line = self.rope.len_lines().saturating_sub(1);
        self.cursor_line = cmp::min(self.cursor_line + self.viewport_height, max_line);
        self.clamp_col();
        self.adjust_viewport();
    }

    /// Move to the end of the current or next word.
    pub fn move_word_forward(&mut self) {
        let line = self.line_text(self.cursor_line);
        let line_chars = line.chars().count();
        if self.cursor_col >= line_chars {
            if self.cursor_line + 1 < self.rope.len_lines() {
                self.cursor_line += 1;
                self.cursor_col = 0;
                self.adjust_viewport();
            }
            return;
        }

        let byte = char_to_byte(&line, self.cursor_col);
        for (start, word) in line.split_word_bound_indices() {
            let end = start + word.len();
            if end <= byte || word.chars().all(char::is_whitespace) {
                continue;
            }
            self.cursor_col = byte_to_char(&line, end);
            return;
        }
        self.cursor_col = line_chars;
    }

    /// Move to the start of the previous word.
    pub fn move_word_backward(&mut self) {
        if self.cursor_col == 0 {
            if self.cursor_line > 0 {
                self.cursor_line -= 1;
                self.cursor_col = self.line_len(self.cursor_line);
                self.adjust_viewport();
            }
            return;
        }

        let line = self.line_text(self.cursor_line);
        self.cursor_col = word_start_before(&line, self.cursor_col);
    }

    /// Cut from the cursor to the end of the line; at the end of a line the
    /// newline itself is cut, joining the next line.
    pub fn kill_to_line_end(&mut self) {
        let idx = self.char_idx();
        let line_end = self.rope.line_to_char(self.cursor_line) + self.line_len(self.cursor_line);
        if idx < line_end {
            self.kill_buffer = self.rope.slice(idx..line_end).to_string();
            self.rope.remove(idx..line_end);
            self.modified = true;
        } else if idx < self.rope.len_chars() {
            self.kill_buffer = "\n".to_string();
            self.rope.remove(idx..idx + 1);
            self.modified = true;
        }
    }

    /// Cut from the start of the line to the cursor.
    pub fn kill_to_line_start(&mut self) {
        let line_start = self.rope.line_to_char(self.cursor_line);
        let idx = self.char_idx();
        if idx > line_start {
            self.kill_buffer = self.rope.slice(line_start..idx).to_string();
            self.rope.remove(line_start..idx);
            self.cursor_col = 0;
            self.modified = true;
        }
    }

    /// Cut the word before the cursor.
    pub fn kill_word_backward(&mut self) {
        if self.cursor_col == 0 {
            return;
        }

        let line = self.line_text(self.cursor_line);
        let target_col = word_start_before(&line, self.cursor_col);
        let line_start = self.rope.line_to_char(self.cursor_line);
        let start = line_start + target_col;
        let end = line_start + self.cursor_col;

        self.kill_buffer = self.rope.slice(start..end).to_string();
        self.rope.remove(start..end);
        self.cursor_col = target_col;
        self.modified = true;
    }

    /// Paste the most recently cut text at the cursor.
    pub fn yank(&mut self) {
        if self.kill_buffer.is_empty() {
            return;
        }
        let idx = self.char_idx();
        let text = self.kill_buffer.clone();
        self.rope.insert(idx, &text);
        self.modified = true;
        self.set_cursor_from_char_idx(idx + text.chars().count());
    }

    fn clamp_col(&mut self) {
        self.cursor_col = cmp::min(self.cursor_col, self.line_len(self.cursor_line));
    }

    fn adjust_viewport(&mut self) {
        if self.cursor_line < self.viewport_offset {
            self.viewport_offset = self.cursor_line;
        } else if self.cursor_line >= self.viewport_offset + self.viewport_height {
            self.viewport_offset = self.cursor_line + 1 - self.viewport_height;
        }
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::from_text("")
    }
}

/// Char offset of the start of the last word beginning before `cursor_col`.
fn word_start_before(line: &str, cursor_col: usize) -> usize {
    let byte = char_to_byte(line, cursor_col);
    let mut target = 0;
    for (start, word) in line.split_word_bound_indices() {
        if start >= byte {
            break;
        }
        if !word.chars().all(char::is_whitespace) {
            target = start;
        }
    }
    byte_to_char(line, target)
}

fn char_to_byte(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

fn byte_to_char(text: &str, byte_index: usize) -> usize {
    text[..byte_index].chars().count()
}
