// Expansion executor - replaces a matched trigger with its template
// and places the caret at the template's caret marker (or after the text)

use crate::buffer::{Buffer, Position, Range};

/// Reserved token marking where the caret lands after expansion
pub const CARET_MARKER: &str = "$CURSOR$";

/// Offset of the caret marker relative to the template start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaretOffset {
    /// Lines below the template's first line
    pub line: usize,
    /// Column within the marker's line, in characters
    pub column: usize,
}

/// A template with its caret marker removed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTemplate {
    /// Text to insert
    pub text: String,
    /// Where the marker was, if the template had one
    pub caret: Option<CaretOffset>,
}

impl ParsedTemplate {
    /// Split the template at the first caret marker
    pub fn parse(template: &str) -> Self {
        let Some(marker_at) = template.find(CARET_MARKER) else {
            return Self {
                text: template.to_string(),
                caret: None,
            };
        };

        let before = &template[..marker_at];
        let after = &template[marker_at + CARET_MARKER.len()..];
        let line = before.matches('\n').count();
        let column = before
            .rsplit('\n')
            .next()
            .map(|last| last.chars().count())
            .unwrap_or(0);

        Self {
            text: format!("{}{}", before, after),
            caret: Some(CaretOffset { line, column }),
        }
    }

    /// Final caret position when the text is inserted at `start`
    pub fn caret_after_insert(&self, start: Position) -> Position {
        match self.caret {
            // Columns on later lines are absolute, like the editor reports them
            Some(offset) if offset.line == 0 => {
                Position::new(start.line, start.column + offset.column)
            }
            Some(offset) => Position::new(start.line + offset.line, offset.column),
            None => start.after_text(&self.text),
        }
    }
}

/// Replace `span` with `template` in one edit and move the caret
///
/// Returns the final caret position.
pub fn expand<B>(buffer: &mut B, span: Range, template: &str) -> Position
where
    B: Buffer + ?Sized,
{
    let parsed = ParsedTemplate::parse(template);
    buffer.replace(span, &parsed.text);

    let caret = parsed.caret_after_insert(span.start);
    buffer.set_caret(caret);
    buffer.reveal_if_outside(caret);

    crate::debug!(
        "Expanded {} chars at {}:{}, caret -> {}:{}",
        parsed.text.chars().count(),
        span.start.line,
        span.start.column,
        caret.line,
        caret.column
    );
    caret
}

#[cfg(test)]
#[path = "executor_test.rs"]
mod tests;
