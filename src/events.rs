// Snippet events for the management UI
// Defines event payloads and the emission trait for testability

use serde::Serialize;

/// Snippet-related event names
pub mod snippet_events {
    pub const SNIPPETS_CHANGED: &str = "snippets_changed";
    pub const NOTICE: &str = "notice";

    /// Payload for snippets_changed event
    #[derive(Debug, Clone, serde::Serialize, PartialEq)]
    #[serde(rename_all = "camelCase")]
    pub struct SnippetsChangedPayload {
        /// Type of mutation: "add", "update", "delete", "toggle" or "import"
        pub action: String,
        /// ID of the affected snippet (None for batch imports)
        pub snippet_id: Option<String>,
    }
}

/// Severity of a user-visible notice
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Success,
    Warn,
    Error,
}

impl std::fmt::Display for NoticeLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            NoticeLevel::Info => "info",
            NoticeLevel::Success => "success",
            NoticeLevel::Warn => "warn",
            NoticeLevel::Error => "error",
        };
        write!(f, "{}", s)
    }
}

/// Payload for notice event (command output line plus transient toast)
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NoticePayload {
    pub level: NoticeLevel,
    pub message: String,
    /// ISO 8601 timestamp of the notice
    pub timestamp: String,
}

impl NoticePayload {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: current_timestamp(),
        }
    }
}

/// Trait for emitting snippet events
/// Allows mocking in tests while the host wires a real UI channel
pub trait SnippetEventEmitter: Send + Sync {
    /// Emit snippets_changed event
    fn emit_snippets_changed(&self, payload: snippet_events::SnippetsChangedPayload);

    /// Emit notice event
    fn emit_notice(&self, payload: NoticePayload);
}

/// Get the current timestamp in ISO 8601 format
pub fn current_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

#[cfg(test)]
#[path = "events_test.rs"]
pub(crate) mod tests;
