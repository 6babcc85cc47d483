//! Management commands for the snippet UI.
//!
//! - `snippets`: store operations that report notices and change events
//! - `emitter`: console-backed event emitter used by the CLI

mod emitter;
pub mod snippets;

pub use emitter::ConsoleEventEmitter;
pub use snippets::{
    add_snippet, delete_snippet, export_snippets, grouped_by_language, import_snippets,
    list_snippets, open_manager, save_snippet_form, to_user_error, toggle_snippet,
    update_snippet, SnippetForm,
};
