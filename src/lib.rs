// Polyglot playground engine: live snippet expansion and the snippet store

// Enable coverage attribute on nightly for explicit exclusions
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod buffer;
pub mod commands;
pub mod config;
pub mod context;
pub mod events;
pub mod expansion;
pub mod loader;
pub mod preview;
pub mod snippets;

// Re-export log macros for use throughout the crate
pub use log::{debug, error, info, trace, warn};

pub use buffer::{Buffer, Position, Range, TextBuffer};
pub use config::{ConfigError, Settings};
pub use context::{EditorPane, Pane, PlaygroundContext};
pub use events::{NoticeLevel, NoticePayload, SnippetEventEmitter};
pub use expansion::{EditEvent, CARET_MARKER};
pub use loader::{LibraryHandle, LibraryLoader, LibrarySource, LoaderError};
pub use preview::{DebouncedPreview, Debouncer, NoPreview, PreviewScheduler};
pub use snippets::{BuiltinPresets, ImportSummary, Snippet, SnippetError, SnippetStore};
