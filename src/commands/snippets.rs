// Snippet management commands
// Wraps SnippetStore for the management UI: every outcome is reported as a
// notice and every mutation emits snippets_changed so listings re-render.

use serde::Deserialize;

use crate::events::snippet_events::SnippetsChangedPayload;
use crate::events::{NoticeLevel, NoticePayload, SnippetEventEmitter};
use crate::snippets::{ImportSummary, Snippet, SnippetError, SnippetPatch, SnippetStore};

/// Map SnippetError to user-friendly error messages
pub fn to_user_error(error: &SnippetError) -> String {
    match error {
        SnippetError::Validation(_) => "Snippet data incomplete.".to_string(),
        SnippetError::Collision { trigger, language } => {
            format!("Trigger '{}' already exists for {}.", trigger, language)
        }
        SnippetError::NotFound(id) => format!("Snippet with ID '{}' not found.", id),
        SnippetError::Persistence(msg) => {
            format!("Error saving snippets. Storage might be full. ({})", msg)
        }
        SnippetError::ImportParse(msg) => format!("Import error: {}", msg),
        SnippetError::Load(msg) => format!("Error loading snippets: {}", msg),
    }
}

/// Notice level for an error; unsaved changes are only a warning
fn error_level(error: &SnippetError) -> NoticeLevel {
    match error {
        SnippetError::Persistence(_) => NoticeLevel::Warn,
        _ => NoticeLevel::Error,
    }
}

fn notify(emitter: &dyn SnippetEventEmitter, level: NoticeLevel, message: impl Into<String>) {
    emitter.emit_notice(NoticePayload::new(level, message));
}

fn changed(emitter: &dyn SnippetEventEmitter, action: &str, snippet_id: Option<&str>) {
    emitter.emit_snippets_changed(SnippetsChangedPayload {
        action: action.to_string(),
        snippet_id: snippet_id.map(str::to_string),
    });
}

/// Report a failed store call and turn it into the command error
///
/// A persistence failure still changed the in-memory list, so listings are
/// refreshed for it.
fn fail(
    emitter: &dyn SnippetEventEmitter,
    error: SnippetError,
    action: &str,
    snippet_id: Option<&str>,
) -> String {
    let message = to_user_error(&error);
    if matches!(error, SnippetError::Persistence(_)) {
        changed(emitter, action, snippet_id);
    }
    notify(emitter, error_level(&error), message.clone());
    crate::warn!("Snippet {} failed: {}", action, error);
    message
}

/// Fields submitted by the snippet editor form
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SnippetForm {
    /// Present when editing an existing snippet
    #[serde(default)]
    pub id: Option<String>,
    pub trigger: String,
    pub template: String,
    pub language: String,
}

/// Reload the durable record (picking up external edits) and list snippets
pub fn open_manager(
    store: &mut SnippetStore,
    emitter: &dyn SnippetEventEmitter,
) -> Result<Vec<Snippet>, String> {
    if let Err(e) = store.load() {
        return Err(fail(emitter, e, "load", None));
    }
    Ok(list_snippets(store))
}

/// List every snippet, enabled or not
pub fn list_snippets(store: &SnippetStore) -> Vec<Snippet> {
    store.list_all().into_iter().cloned().collect()
}

/// Snippets grouped by language, in order of first appearance
pub fn grouped_by_language(store: &SnippetStore) -> Vec<(String, Vec<Snippet>)> {
    let mut groups: Vec<(String, Vec<Snippet>)> = Vec::new();
    for snippet in store.list_all() {
        match groups.iter_mut().find(|(language, _)| *language == snippet.language) {
            Some((_, members)) => members.push(snippet.clone()),
            None => groups.push((snippet.language.clone(), vec![snippet.clone()])),
        }
    }
    groups
}

/// Add a new snippet
pub fn add_snippet(
    store: &mut SnippetStore,
    emitter: &dyn SnippetEventEmitter,
    trigger: &str,
    template: &str,
    language: &str,
) -> Result<Snippet, String> {
    let snippet = store
        .add(trigger, template, language)
        .map_err(|e| fail(emitter, e, "add", None))?;

    changed(emitter, "add", Some(&snippet.id));
    notify(
        emitter,
        NoticeLevel::Success,
        format!("Snippet '{}' for {} added.", snippet.trigger, snippet.language),
    );
    Ok(snippet)
}

/// Update an existing snippet
pub fn update_snippet(
    store: &mut SnippetStore,
    emitter: &dyn SnippetEventEmitter,
    id: &str,
    patch: SnippetPatch,
) -> Result<Snippet, String> {
    let snippet = store
        .update(id, patch)
        .map_err(|e| fail(emitter, e, "update", Some(id)))?;

    changed(emitter, "update", Some(id));
    notify(
        emitter,
        NoticeLevel::Success,
        format!("Snippet '{}' updated.", snippet.trigger),
    );
    Ok(snippet)
}

/// Create or update from the editor form, depending on whether it carries an id
pub fn save_snippet_form(
    store: &mut SnippetStore,
    emitter: &dyn SnippetEventEmitter,
    form: SnippetForm,
) -> Result<Snippet, String> {
    match form.id.as_deref().filter(|id| !id.is_empty()) {
        Some(id) => update_snippet(
            store,
            emitter,
            id,
            SnippetPatch {
                trigger: Some(form.trigger),
                template: Some(form.template),
                language: Some(form.language),
                is_enabled: None,
            },
        ),
        None => add_snippet(store, emitter, &form.trigger, &form.template, &form.language),
    }
}

/// Delete a snippet
pub fn delete_snippet(
    store: &mut SnippetStore,
    emitter: &dyn SnippetEventEmitter,
    id: &str,
) -> Result<(), String> {
    store
        .delete(id)
        .map_err(|e| fail(emitter, e, "delete", Some(id)))?;

    changed(emitter, "delete", Some(id));
    notify(emitter, NoticeLevel::Success, "Snippet deleted.");
    Ok(())
}

/// Enable or disable a snippet
pub fn toggle_snippet(
    store: &mut SnippetStore,
    emitter: &dyn SnippetEventEmitter,
    id: &str,
) -> Result<Snippet, String> {
    let snippet = store
        .toggle_enabled(id)
        .map_err(|e| fail(emitter, e, "toggle", Some(id)))?;

    changed(emitter, "toggle", Some(id));
    let state = if snippet.is_enabled { "enabled" } else { "disabled" };
    notify(
        emitter,
        NoticeLevel::Info,
        format!("Snippet '{}' {}.", snippet.trigger, state),
    );
    Ok(snippet)
}

/// Export user snippets as a JSON artifact
///
/// Returns None (with an info notice) when there is nothing to export.
pub fn export_snippets(
    store: &SnippetStore,
    emitter: &dyn SnippetEventEmitter,
) -> Result<Option<String>, String> {
    match store.export() {
        Ok(Some(json)) => {
            notify(emitter, NoticeLevel::Success, "User snippets exported.");
            Ok(Some(json))
        }
        Ok(None) => {
            notify(emitter, NoticeLevel::Info, "No user snippets to export.");
            Ok(None)
        }
        Err(e) => Err(fail(emitter, e, "export", None)),
    }
}

/// Notice text for one element skipped by an import
fn skip_message(reason: &SnippetError) -> String {
    match reason {
        SnippetError::Collision { trigger, language } => {
            format!("Skipped importing '{}' for {} (trigger taken).", trigger, language)
        }
        SnippetError::Validation(_) => "Skipped invalid snippet object.".to_string(),
        other => to_user_error(other),
    }
}

/// Import snippets from a JSON artifact
pub fn import_snippets(
    store: &mut SnippetStore,
    emitter: &dyn SnippetEventEmitter,
    raw: &str,
) -> Result<ImportSummary, String> {
    let summary = store
        .import(raw)
        .map_err(|e| fail(emitter, e, "import", None))?;

    if summary.imported > 0 {
        changed(emitter, "import", None);
    }
    for reason in &summary.skip_reasons {
        notify(emitter, NoticeLevel::Warn, skip_message(reason));
    }
    if let Some(error) = &summary.save_error {
        notify(emitter, NoticeLevel::Warn, to_user_error(error));
    }
    let level = if summary.skipped > 0 {
        NoticeLevel::Warn
    } else {
        NoticeLevel::Info
    };
    notify(
        emitter,
        level,
        format!(
            "{} snippets imported. {} skipped.",
            summary.imported, summary.skipped
        ),
    );
    Ok(summary)
}

#[cfg(test)]
#[path = "snippets_test.rs"]
mod tests;
