// Trigger detector - decides whether an edit just completed a known trigger
//
// Only a plain single-character insertion can complete a trigger. Two rules:
// - bare trigger: the line up to the caret is exactly the typed character
// - word + space: the non-whitespace run before a typed space is a trigger

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::buffer::{Buffer, Position, Range};
use crate::snippets::ActiveDictionary;

/// Trailing run of non-whitespace characters
static TRAILING_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\S+)$").expect("trailing word pattern is valid"));

/// One mutation of the host buffer, as delivered by the editor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditEvent {
    /// Inserted text
    pub text: String,
    /// Range the insertion replaced (empty for plain typing)
    pub range: Range,
    /// Number of characters removed by the edit
    pub range_length: usize,
    /// Whole-content replacement (programmatic set)
    #[serde(default)]
    pub is_flush: bool,
    #[serde(default)]
    pub is_undoing: bool,
    #[serde(default)]
    pub is_redoing: bool,
    /// Number of contiguous ranges touched by this edit
    #[serde(default = "default_change_count")]
    pub change_count: usize,
}

fn default_change_count() -> usize {
    1
}

impl EditEvent {
    /// Plain insertion of `text` at `at`
    pub fn insertion(at: Position, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            range: Range::caret(at),
            range_length: 0,
            is_flush: false,
            is_undoing: false,
            is_redoing: false,
            change_count: 1,
        }
    }

    /// True for undo/redo/flush edits
    pub fn is_batch(&self) -> bool {
        self.is_flush || self.is_undoing || self.is_redoing
    }
}

/// Classification of an edit event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditClass {
    /// Only a preview refresh follows
    NonCandidate,
    /// Single typed character; `caret` is the position after it
    Candidate { typed: char, caret: Position },
}

/// A confirmed trigger match, ready for the executor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpansionRequest {
    /// The matched trigger (without the terminating space)
    pub trigger: String,
    /// Span to replace, including the terminating space for word triggers
    pub span: Range,
    /// Template resolved for the trigger
    pub template: String,
}

/// Classify an edit as a trigger candidate or not
pub fn classify(event: &EditEvent) -> EditClass {
    if event.is_batch() || event.change_count != 1 || event.range_length != 0 {
        return EditClass::NonCandidate;
    }

    let mut chars = event.text.chars();
    match (chars.next(), chars.next()) {
        (Some(typed), None) => EditClass::Candidate {
            typed,
            caret: Position::new(event.range.start.line, event.range.start.column + 1),
        },
        _ => EditClass::NonCandidate,
    }
}

/// Check whether the edit completed a trigger of `dictionary`
///
/// Returns None for non-candidates, an empty dictionary, or no match.
pub fn detect<B>(
    event: &EditEvent,
    buffer: &B,
    dictionary: &ActiveDictionary<'_>,
) -> Option<ExpansionRequest>
where
    B: Buffer + ?Sized,
{
    let EditClass::Candidate { typed, caret } = classify(event) else {
        return None;
    };
    if dictionary.is_empty() {
        return None;
    }

    let prefix = buffer.line_prefix(caret);
    let (trigger, keyword_length) = match_trigger(typed, &prefix, dictionary)?;
    let template = dictionary.get(&trigger)?.to_string();

    let span = Range::on_line(caret.line, caret.column - keyword_length, caret.column);
    crate::debug!(
        "Trigger '{}' completed at {}:{}",
        trigger,
        caret.line,
        caret.column
    );
    Some(ExpansionRequest {
        trigger,
        span,
        template,
    })
}

/// Apply the bare-trigger and word-plus-space rules to the line prefix
/// Returns the trigger and the number of characters it occupies
fn match_trigger(
    typed: char,
    prefix: &str,
    dictionary: &ActiveDictionary<'_>,
) -> Option<(String, usize)> {
    let typed_key = typed.to_string();

    // Bare trigger only at the very start of the line
    if prefix == typed_key && dictionary.contains(&typed_key) {
        return Some((typed_key, 1));
    }

    if typed != ' ' {
        return None;
    }

    let before_space = prefix.strip_suffix(' ')?;
    let word = TRAILING_WORD.captures(before_space)?.get(1)?.as_str();
    if dictionary.contains(word) {
        return Some((word.to_string(), word.chars().count() + 1));
    }
    None
}

#[cfg(test)]
#[path = "detector_test.rs"]
mod tests;
