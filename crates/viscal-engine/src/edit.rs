//! Summary editing.

use crate::calendar::{CalendarId, EventId};
use crate::command::Key;

/// A growable text buffer with a cursor. The cursor is a byte offset that always
/// sits on a char boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditBuffer {
    text: String,
    cursor: usize,
}

impl EditBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer holding `text` with the cursor at the end.
    pub fn with_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.len();
        Self { text, cursor }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn set(&mut self, text: impl Into<String>) {
        *self = Self::with_text(text);
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    pub fn insert(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    fn prev_boundary(&self) -> Option<usize> {
        self.text[..self.cursor].char_indices().next_back().map(|(i, _)| i)
    }

    /// Delete the char before the cursor.
    pub fn backspace(&mut self) -> bool {
        match self.prev_boundary() {
            Some(i) => {
                self.text.remove(i);
                self.cursor = i;
                true
            }
            None => false,
        }
    }

    /// Delete back to the start of the previous word, along with any whitespace
    /// between it and the cursor.
    pub fn pop_word(&mut self) -> bool {
        let before = &self.text[..self.cursor];
        let trimmed = before.trim_end();
        let start = trimmed
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace())
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        if start == self.cursor {
            return false;
        }
        self.text.replace_range(start..self.cursor, "");
        self.cursor = start;
        true
    }

    pub fn left(&mut self) -> bool {
        match self.prev_boundary() {
            Some(i) => {
                self.cursor = i;
                true
            }
            None => false,
        }
    }

    pub fn right(&mut self) -> bool {
        match self.text[self.cursor..].chars().next() {
            Some(c) => {
                self.cursor += c.len_utf8();
                true
            }
            None => false,
        }
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

/// How a keystroke affected an edit session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// Still editing; `true` if the buffer or its cursor changed.
    Continue(bool),
    Commit,
    Cancel,
}

/// An in-progress edit of one event's summary.
#[derive(Debug, Clone)]
pub struct EditSession {
    pub event: EventId,
    /// The event was created for this edit; cancelling deletes it.
    pub inserting: bool,
    /// Calendar the event belonged to when editing began.
    pub origin: CalendarId,
    pub buffer: EditBuffer,
}

impl EditSession {
    pub fn new(event: EventId, origin: CalendarId, inserting: bool, buffer: EditBuffer) -> Self {
        Self {
            event,
            inserting,
            origin,
            buffer,
        }
    }

    pub fn feed(&mut self, key: Key) -> EditOutcome {
        let changed = match key {
            Key::Escape => return EditOutcome::Cancel,
            Key::Enter => return EditOutcome::Commit,
            Key::Backspace => self.buffer.backspace(),
            Key::Ctrl('w') => self.buffer.pop_word(),
            Key::Left => self.buffer.left(),
            Key::Right => self.buffer.right(),
            Key::Char(c) if !c.is_control() => {
                self.buffer.insert(c);
                true
            }
            _ => false,
        };
        EditOutcome::Continue(changed)
    }
}
