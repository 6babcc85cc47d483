// Buffer contract consumed by the expansion engine
// Positions are 0-based (line, column) with columns counted in characters.
//
// TextBuffer is the in-memory implementation used by the CLI and tests.
// The real editor widget implements the same trait on the host side.

use serde::{Deserialize, Serialize};

use crate::expansion::EditEvent;

/// A caret position inside a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    /// 0-based line index
    pub line: usize,
    /// 0-based column, in characters
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Position right after `text` when it is inserted at `self`
    pub fn after_text(self, text: &str) -> Self {
        let mut lines = text.split('\n');
        let first = lines.next().unwrap_or_default();
        match lines.last() {
            None => Self::new(self.line, self.column + first.chars().count()),
            Some(last) => Self::new(
                self.line + text.matches('\n').count(),
                last.chars().count(),
            ),
        }
    }
}

/// A half-open range `[start, end)` in a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Empty range at `position`
    pub fn caret(position: Position) -> Self {
        Self::new(position, position)
    }

    /// Range on a single line
    pub fn on_line(line: usize, start_column: usize, end_column: usize) -> Self {
        Self::new(Position::new(line, start_column), Position::new(line, end_column))
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Capabilities the engine needs from the host text buffer
pub trait Buffer {
    /// Line content from column 0 up to (excluding) `position.column`
    fn line_prefix(&self, position: Position) -> String;

    /// Text covered by `range`
    fn value_at(&self, range: Range) -> String;

    /// Replace `range` with `text` as a single undoable edit
    fn replace(&mut self, range: Range, text: &str);

    /// Current caret position
    fn caret(&self) -> Position;

    /// Move the caret
    fn set_caret(&mut self, position: Position);

    /// Scroll so `position` is visible when it lies outside the viewport
    fn reveal_if_outside(&mut self, position: Position);
}

/// One undo step recorded by TextBuffer
#[derive(Debug, Clone, PartialEq, Eq)]
struct UndoStep {
    /// Range covered by the inserted text after the edit
    inserted: Range,
    /// Text that was removed by the edit
    removed: String,
    /// Caret before the edit
    caret_before: Position,
}

/// Default number of visible lines for a TextBuffer viewport
pub const DEFAULT_VIEWPORT_LINES: usize = 40;

/// In-memory line buffer with caret, viewport and undo stack
#[derive(Debug, Clone)]
pub struct TextBuffer {
    lines: Vec<String>,
    caret: Position,
    viewport_top: usize,
    viewport_lines: usize,
    undo_stack: Vec<UndoStep>,
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new("")
    }
}

impl TextBuffer {
    /// Create a buffer with the given content and the caret at the start
    pub fn new(content: &str) -> Self {
        Self {
            lines: content.split('\n').map(str::to_string).collect(),
            caret: Position::default(),
            viewport_top: 0,
            viewport_lines: DEFAULT_VIEWPORT_LINES,
            undo_stack: Vec::new(),
        }
    }

    /// Set the viewport height in lines
    pub fn with_viewport_lines(mut self, lines: usize) -> Self {
        self.viewport_lines = lines.max(1);
        self
    }

    /// Whole buffer content
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Content of a single line, if it exists
    pub fn line(&self, line: usize) -> Option<&str> {
        self.lines.get(line).map(String::as_str)
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// First visible line
    pub fn viewport_top(&self) -> usize {
        self.viewport_top
    }

    /// Number of recorded undo steps
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Type a single character at the caret, as a keystroke would
    ///
    /// Returns the edit event the host editor would deliver for it.
    pub fn type_char(&mut self, ch: char) -> EditEvent {
        let at = self.caret;
        let text = ch.to_string();
        self.replace(Range::caret(at), &text);
        self.caret = at.after_text(&text);
        EditEvent::insertion(at, text)
    }

    /// Type every character of `text` in order, feeding each event to `on_event`
    pub fn type_str<F>(&mut self, text: &str, mut on_event: F)
    where
        F: FnMut(&mut Self, EditEvent),
    {
        for ch in text.chars() {
            let event = self.type_char(ch);
            on_event(self, event);
        }
    }

    /// Revert the most recent edit
    ///
    /// Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(step) = self.undo_stack.pop() else {
            return false;
        };
        self.splice(step.inserted, &step.removed);
        self.caret = step.caret_before;
        true
    }

    /// Clamp a position to existing content
    fn clamp(&self, position: Position) -> Position {
        let line = position.line.min(self.lines.len().saturating_sub(1));
        let len = self.lines[line].chars().count();
        Position::new(line, position.column.min(len))
    }

    /// Byte offset of a character column within a line
    fn byte_offset(line: &str, column: usize) -> usize {
        line.char_indices()
            .nth(column)
            .map(|(idx, _)| idx)
            .unwrap_or(line.len())
    }

    /// Replace `range` with `text` without recording an undo step
    /// Returns the removed text
    fn splice(&mut self, range: Range, text: &str) -> String {
        let start = self.clamp(range.start);
        let end = self.clamp(range.end).max(start);
        let removed = self.value_at(Range::new(start, end));

        let start_line = &self.lines[start.line];
        let end_line = &self.lines[end.line];
        let head = &start_line[..Self::byte_offset(start_line, start.column)];
        let tail = &end_line[Self::byte_offset(end_line, end.column)..];
        let joined = format!("{}{}{}", head, text, tail);

        let replacement: Vec<String> = joined.split('\n').map(str::to_string).collect();
        self.lines.splice(start.line..=end.line, replacement);
        removed
    }
}

impl Buffer for TextBuffer {
    fn line_prefix(&self, position: Position) -> String {
        let position = self.clamp(position);
        self.lines[position.line]
            .chars()
            .take(position.column)
            .collect()
    }

    fn value_at(&self, range: Range) -> String {
        let start = self.clamp(range.start);
        let end = self.clamp(range.end).max(start);

        if start.line == end.line {
            return self.lines[start.line]
                .chars()
                .skip(start.column)
                .take(end.column - start.column)
                .collect();
        }

        let mut parts: Vec<String> = Vec::with_capacity(end.line - start.line + 1);
        parts.push(self.lines[start.line].chars().skip(start.column).collect());
        for line in &self.lines[start.line + 1..end.line] {
            parts.push(line.clone());
        }
        parts.push(self.lines[end.line].chars().take(end.column).collect());
        parts.join("\n")
    }

    fn replace(&mut self, range: Range, text: &str) {
        let start = self.clamp(range.start);
        let caret_before = self.caret;
        let removed = self.splice(range, text);
        self.undo_stack.push(UndoStep {
            inserted: Range::new(start, start.after_text(text)),
            removed,
            caret_before,
        });
    }

    fn caret(&self) -> Position {
        self.caret
    }

    fn set_caret(&mut self, position: Position) {
        self.caret = self.clamp(position);
    }

    fn reveal_if_outside(&mut self, position: Position) {
        let bottom = self.viewport_top + self.viewport_lines;
        if position.line < self.viewport_top || position.line >= bottom {
            // Center the line like the editor's reveal-in-center
            self.viewport_top = position.line.saturating_sub(self.viewport_lines / 2);
        }
    }
}

#[cfg(test)]
#[path = "buffer_test.rs"]
mod tests;
