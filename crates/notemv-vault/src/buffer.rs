//! Editor buffers and the single-document workspace.

use crate::host::{Editor, Position, Workspace};

/// A line-oriented text buffer with a cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineBuffer {
    lines: Vec<String>,
    cursor: usize,
    modified: bool,
}

impl LineBuffer {
    /// Build a buffer from text. The cursor starts on line 0.
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text.split('\n').map(str::to_string).collect(),
            cursor: 0,
            modified: false,
        }
    }

    /// Move the cursor, clamped to the last line.
    pub fn set_cursor_line(&mut self, line: usize) {
        self.cursor = line.min(self.lines.len().saturating_sub(1));
    }

    /// Whole buffer as text, lines joined with `\n`.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Whether any edit happened since the buffer was loaded.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Byte offset of `pos` in [`LineBuffer::text`], clamped to the buffer.
    fn offset(&self, pos: Position) -> usize {
        let Some(line) = self.lines.get(pos.line) else {
            return self.lines.iter().map(|l| l.len() + 1).sum::<usize>().saturating_sub(1);
        };
        let before: usize = self.lines[..pos.line].iter().map(|l| l.len() + 1).sum();
        let within = line
            .char_indices()
            .nth(pos.ch)
            .map_or(line.len(), |(idx, _)| idx);
        before + within
    }
}

impl Editor for LineBuffer {
    fn line(&self, n: usize) -> Option<String> {
        self.lines.get(n).cloned()
    }

    fn cursor_line(&self) -> usize {
        self.cursor
    }

    fn replace_range(&mut self, text: &str, from: Position, to: Position) {
        let (start, end) = (self.offset(from), self.offset(to));
        let (start, end) = (start.min(end), start.max(end));
        let mut whole = self.text();
        whole.replace_range(start..end, text);
        self.lines = whole.split('\n').map(str::to_string).collect();
        self.cursor = self.cursor.min(self.lines.len().saturating_sub(1));
        self.modified = true;
    }
}

/// A workspace with at most one open document.
#[derive(Debug, Clone, Default)]
pub struct OpenNote {
    path: Option<String>,
    buffer: LineBuffer,
}

impl OpenNote {
    /// A workspace showing `path` with `content` in its editor.
    pub fn open(path: &str, content: &str) -> Self {
        Self {
            path: Some(path.to_string()),
            buffer: LineBuffer::from_text(content),
        }
    }

    /// A workspace with nothing open.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn buffer(&self) -> &LineBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut LineBuffer {
        &mut self.buffer
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }
}

impl Workspace for OpenNote {
    type Editor = LineBuffer;

    fn active_file(&self) -> Option<String> {
        self.path.clone()
    }

    fn active_editor(&mut self) -> Option<&mut LineBuffer> {
        if self.path.is_some() {
            Some(&mut self.buffer)
        } else {
            None
        }
    }

    fn file_renamed(&mut self, from: &str, to: &str) {
        if self.path.as_deref() == Some(from) {
            self.path = Some(to.to_string());
        }
    }
}
