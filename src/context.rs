// Application context for the playground editor
//
// Owns the editor panes together with the snippet store, built-in presets,
// preview scheduler and event emitter. Edits are routed through `on_edit`;
// management operations go through the context so they report to its emitter.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::buffer::{Buffer, Position, TextBuffer};
use crate::commands::{self, SnippetForm};
use crate::events::SnippetEventEmitter;
use crate::expansion::{detect, expand, EditEvent, ExpansionRequest};
use crate::preview::PreviewScheduler;
use crate::snippets::{
    BuiltinPresets, ImportSummary, Snippet, SnippetPatch, SnippetStore, TemplateResolver,
};

/// Editor panes of the playground
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pane {
    Markup,
    Style,
    Script,
}

impl Pane {
    /// Language a freshly created pane starts with
    pub fn default_language(&self) -> &'static str {
        match self {
            Pane::Markup => "html",
            Pane::Style => "css",
            Pane::Script => "javascript",
        }
    }
}

impl fmt::Display for Pane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pane::Markup => write!(f, "markup"),
            Pane::Style => write!(f, "style"),
            Pane::Script => write!(f, "script"),
        }
    }
}

/// A buffer bound to the language currently selected for it
#[derive(Debug, Clone)]
pub struct EditorPane<B> {
    pub buffer: B,
    pub language: String,
}

/// Explicit context replacing the playground's global editor state
pub struct PlaygroundContext<B: Buffer> {
    panes: HashMap<Pane, EditorPane<B>>,
    store: SnippetStore,
    presets: Arc<BuiltinPresets>,
    preview: Arc<dyn PreviewScheduler>,
    emitter: Arc<dyn SnippetEventEmitter>,
}

impl<B: Buffer> PlaygroundContext<B> {
    pub fn new(
        store: SnippetStore,
        presets: Arc<BuiltinPresets>,
        preview: Arc<dyn PreviewScheduler>,
        emitter: Arc<dyn SnippetEventEmitter>,
    ) -> Self {
        Self {
            panes: HashMap::new(),
            store,
            presets,
            preview,
            emitter,
        }
    }

    /// Attach a buffer to `pane` using the pane's default language
    pub fn add_pane(&mut self, pane: Pane, buffer: B) {
        self.panes.insert(
            pane,
            EditorPane {
                buffer,
                language: pane.default_language().to_string(),
            },
        );
    }

    /// Switch the language of a pane
    ///
    /// Returns false when the pane does not exist.
    pub fn set_language(&mut self, pane: Pane, language: &str) -> bool {
        match self.panes.get_mut(&pane) {
            Some(editor) => {
                crate::info!("{} pane language: {} -> {}", pane, editor.language, language);
                editor.language = language.to_string();
                true
            }
            None => false,
        }
    }

    pub fn pane(&self, pane: Pane) -> Option<&EditorPane<B>> {
        self.panes.get(&pane)
    }

    pub fn pane_mut(&mut self, pane: Pane) -> Option<&mut EditorPane<B>> {
        self.panes.get_mut(&pane)
    }

    pub fn store(&self) -> &SnippetStore {
        &self.store
    }

    /// Mutable store access for the management surface
    pub fn store_mut(&mut self) -> &mut SnippetStore {
        &mut self.store
    }

    pub fn presets(&self) -> &BuiltinPresets {
        &self.presets
    }

    /// Reload the store and list every snippet
    pub fn open_manager(&mut self) -> Result<Vec<Snippet>, String> {
        commands::open_manager(&mut self.store, self.emitter.as_ref())
    }

    pub fn add_snippet(
        &mut self,
        trigger: &str,
        template: &str,
        language: &str,
    ) -> Result<Snippet, String> {
        commands::add_snippet(
            &mut self.store,
            self.emitter.as_ref(),
            trigger,
            template,
            language,
        )
    }

    pub fn update_snippet(&mut self, id: &str, patch: SnippetPatch) -> Result<Snippet, String> {
        commands::update_snippet(&mut self.store, self.emitter.as_ref(), id, patch)
    }

    /// Create or update from the editor form
    pub fn save_snippet_form(&mut self, form: SnippetForm) -> Result<Snippet, String> {
        commands::save_snippet_form(&mut self.store, self.emitter.as_ref(), form)
    }

    pub fn delete_snippet(&mut self, id: &str) -> Result<(), String> {
        commands::delete_snippet(&mut self.store, self.emitter.as_ref(), id)
    }

    pub fn toggle_snippet(&mut self, id: &str) -> Result<Snippet, String> {
        commands::toggle_snippet(&mut self.store, self.emitter.as_ref(), id)
    }

    pub fn export_snippets(&self) -> Result<Option<String>, String> {
        commands::export_snippets(&self.store, self.emitter.as_ref())
    }

    pub fn import_snippets(&mut self, raw: &str) -> Result<ImportSummary, String> {
        commands::import_snippets(&mut self.store, self.emitter.as_ref(), raw)
    }

    /// Handle one edit of `pane`'s buffer
    ///
    /// Expands a completed trigger if there is one, then always requests a
    /// preview refresh. Returns the caret after an expansion.
    pub fn on_edit(&mut self, pane: Pane, event: &EditEvent) -> Option<Position> {
        let caret = self.try_expand(pane, event);
        self.preview.schedule_refresh();
        caret
    }

    fn try_expand(&mut self, pane: Pane, event: &EditEvent) -> Option<Position> {
        let editor = self.panes.get_mut(&pane)?;

        let request: ExpansionRequest = {
            let dictionary =
                TemplateResolver::new(&self.presets, &self.store).resolve(&editor.language);
            detect(event, &editor.buffer, &dictionary)?
        };

        crate::info!(
            "Expanding '{}' in {} pane ({})",
            request.trigger,
            pane,
            editor.language
        );
        Some(expand(&mut editor.buffer, request.span, &request.template))
    }
}

impl PlaygroundContext<TextBuffer> {
    /// Type `text` into `pane` one keystroke at a time
    ///
    /// Returns the caret after the last expansion, if any happened.
    pub fn type_text(&mut self, pane: Pane, text: &str) -> Option<Position> {
        let mut last = None;
        for ch in text.chars() {
            let event = self.pane_mut(pane)?.buffer.type_char(ch);
            if let Some(caret) = self.on_edit(pane, &event) {
                last = Some(caret);
            }
        }
        last
    }
}

#[cfg(test)]
#[path = "context_test.rs"]
mod tests;
