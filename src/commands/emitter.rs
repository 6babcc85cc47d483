//! Console event emitter implementation.
//!
//! Provides ConsoleEventEmitter which writes notices to the terminal for the
//! CLI management surface. Change events are only logged.

use std::io::Write;

use crate::events::snippet_events::{self, SnippetsChangedPayload};
use crate::events::{NoticeLevel, NoticePayload, SnippetEventEmitter};

/// Terminal-based event emitter for the `polyglot` binary.
#[derive(Debug, Default)]
pub struct ConsoleEventEmitter {
    /// Suppress info/success notices
    quiet: bool,
}

impl ConsoleEventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only print warnings and errors
    pub fn quiet() -> Self {
        Self { quiet: true }
    }
}

impl SnippetEventEmitter for ConsoleEventEmitter {
    fn emit_snippets_changed(&self, payload: SnippetsChangedPayload) {
        crate::debug!(
            "Event '{}': {} {:?}",
            snippet_events::SNIPPETS_CHANGED,
            payload.action,
            payload.snippet_id
        );
    }

    fn emit_notice(&self, payload: NoticePayload) {
        let result = match payload.level {
            NoticeLevel::Warn | NoticeLevel::Error => {
                writeln!(std::io::stderr(), "[{}] {}", payload.level, payload.message)
            }
            _ if self.quiet => Ok(()),
            _ => writeln!(std::io::stdout(), "[{}] {}", payload.level, payload.message),
        };
        if let Err(e) = result {
            crate::warn!("Failed to emit event '{}': {}", snippet_events::NOTICE, e);
        }
    }
}
