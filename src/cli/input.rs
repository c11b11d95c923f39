use unicode_width::UnicodeWidthChar;

/// Single-line editor. The cursor counts chars, not bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct InputBuffer {
    text: String,
    cursor: usize,
}

impl InputBuffer {
    pub(crate) fn text(&self) -> &str {
        &self.text
    }

    pub(crate) fn cursor(&self) -> usize {
        self.cursor
    }

    pub(crate) fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub(crate) fn insert(&mut self, ch: char) {
        let at = self.byte_index(self.cursor);
        self.text.insert(at, ch);
        self.cursor += 1;
    }

    pub(crate) fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_index(self.cursor);
        self.text.remove(at);
    }

    pub(crate) fn delete(&mut self) {
        if self.cursor >= self.char_len() {
            return;
        }
        let at = self.byte_index(self.cursor);
        self.text.remove(at);
    }

    pub(crate) fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub(crate) fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_len());
    }

    pub(crate) fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub(crate) fn move_end(&mut self) {
        self.cursor = self.char_len();
    }

    pub(crate) fn set(&mut self, text: &str) {
        self.text = text.to_string();
        self.cursor = self.char_len();
    }

    pub(crate) fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.text)
    }

    /// The slice of text that fits in `columns` terminal columns with the
    /// cursor still on screen, plus the cursor's column inside that slice.
    pub(crate) fn window(&self, columns: usize) -> (String, usize) {
        let columns = columns.max(1);
        let before: Vec<char> = self.text.chars().take(self.cursor).collect();

        let mut start = before.len();
        let mut cursor_column = 0;
        while start > 0 {
            let width = before[start - 1].width().unwrap_or(0);
            if cursor_column + width + 1 > columns {
                break;
            }
            start -= 1;
            cursor_column += width;
        }

        let mut shown = String::new();
        let mut used = 0;
        for ch in self.text.chars().skip(start) {
            let width = ch.width().unwrap_or(0);
            if used + width > columns {
                break;
            }
            shown.push(ch);
            used += width;
        }

        (shown, cursor_column)
    }

    fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map_or(self.text.len(), |(idx, _)| idx)
    }
}

/// Recall of submitted lines. Up walks back, Down walks forward and finally
/// restores whatever was being typed before recall started.
#[derive(Debug, Clone, Default)]
pub(crate) struct InputHistory {
    entries: Vec<String>,
    position: Option<usize>,
    draft: String,
}

impl InputHistory {
    pub(crate) fn push(&mut self, line: &str) {
        if self.entries.last().map(String::as_str) != Some(line) {
            self.entries.push(line.to_string());
        }
        self.reset();
    }

    pub(crate) fn reset(&mut self) {
        self.position = None;
        self.draft.clear();
    }

    pub(crate) fn previous(&mut self, current: &str) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }

        let next = match self.position {
            None => {
                self.draft = current.to_string();
                self.entries.len() - 1
            }
            Some(0) => 0,
            Some(idx) => idx - 1,
        };
        self.position = Some(next);
        self.entries.get(next).map(String::as_str)
    }

    pub(crate) fn next(&mut self) -> Option<&str> {
        let idx = self.position?;
        if idx + 1 < self.entries.len() {
            self.position = Some(idx + 1);
            self.entries.get(idx + 1).map(String::as_str)
        } else {
            self.position = None;
            Some(self.draft.as_str())
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
