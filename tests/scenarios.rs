// End-to-end expansion and snippet store behavior through the public API

use std::sync::{Arc, Mutex};

use polyglot_lib::events::snippet_events::SnippetsChangedPayload;
use polyglot_lib::snippets::JsonFileBackend;
use polyglot_lib::{
    BuiltinPresets, EditEvent, NoPreview, NoticePayload, Pane, PlaygroundContext, Position,
    SnippetError, SnippetEventEmitter, SnippetStore, TextBuffer,
};
use tempfile::TempDir;

#[derive(Default)]
struct RecordingEmitter {
    notices: Mutex<Vec<NoticePayload>>,
}

impl SnippetEventEmitter for RecordingEmitter {
    fn emit_snippets_changed(&self, _payload: SnippetsChangedPayload) {}

    fn emit_notice(&self, payload: NoticePayload) {
        self.notices.lock().unwrap().push(payload);
    }
}

fn playground(store: SnippetStore) -> PlaygroundContext<TextBuffer> {
    let mut context = PlaygroundContext::new(
        store,
        BuiltinPresets::shared(),
        Arc::new(NoPreview),
        Arc::new(RecordingEmitter::default()),
    );
    context.add_pane(Pane::Script, TextBuffer::default());
    context
}

/// Store with "foo" for css added, as the later scenarios start from
fn store_with_foo(dir: &TempDir) -> SnippetStore {
    let mut store = SnippetStore::with_file(dir.path().join("snippets.json"));
    store.load().unwrap();
    store.add("foo", "FOO_BODY", "css").unwrap();
    store
}

#[test]
fn scenario_log_trigger_expands_between_parentheses() {
    let mut context = playground(SnippetStore::in_memory());
    context.type_text(Pane::Script, "lo");

    let editor = context.pane_mut(Pane::Script).unwrap();
    let g = editor.buffer.type_char('g');
    assert_eq!(context.on_edit(Pane::Script, &g), None);

    let editor = context.pane_mut(Pane::Script).unwrap();
    let space = editor.buffer.type_char(' ');
    let caret = context.on_edit(Pane::Script, &space);

    let buffer = &context.pane(Pane::Script).unwrap().buffer;
    assert_eq!(buffer.text(), "console.log();");
    assert_eq!(caret, Some(Position::new(0, 12)));
}

#[test]
fn scenario_add_lists_one_record() {
    let dir = TempDir::new().unwrap();
    let store = store_with_foo(&dir);

    let all = store.list_all();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].trigger, "foo");
}

#[test]
fn scenario_case_insensitive_collision_is_rejected() {
    let dir = TempDir::new().unwrap();
    let mut store = store_with_foo(&dir);

    let result = store.add("FOO", "X", "css");

    assert!(matches!(result, Err(SnippetError::Collision { .. })));
    assert_eq!(store.len(), 1);
}

#[test]
fn scenario_import_skips_colliding_element() {
    let dir = TempDir::new().unwrap();
    let mut store = store_with_foo(&dir);

    let summary = store
        .import(
            r#"[{"trigger":"foo","template":"X","language":"css"},
                {"trigger":"bar","template":"Y","language":"css"}]"#,
        )
        .unwrap();

    assert_eq!((summary.imported, summary.skipped), (1, 1));
    assert_eq!(store.len(), 2);
    let foo = store.list_all().into_iter().find(|s| s.trigger == "foo").unwrap();
    assert_eq!(foo.template, "FOO_BODY");
}

#[test]
fn mutations_survive_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("snippets.json");
    {
        let mut store = SnippetStore::with_file(path.clone());
        store.add("foo", "FOO_BODY", "css").unwrap();
        store.add("bar", "BAR_BODY", "css").unwrap();
    }

    let mut reopened = SnippetStore::new(JsonFileBackend::new(path));
    reopened.load().unwrap();

    let triggers: Vec<&str> = reopened
        .list_all()
        .into_iter()
        .map(|s| s.trigger.as_str())
        .collect();
    assert_eq!(triggers, vec!["foo", "bar"]);
}

#[test]
fn export_then_import_into_empty_store_recreates_catalogue() {
    let dir = TempDir::new().unwrap();
    let source = store_with_foo(&dir);
    let exported = source.export().unwrap().unwrap();

    let mut target = SnippetStore::in_memory();
    let summary = target.import(&exported).unwrap();

    assert_eq!((summary.imported, summary.skipped), (1, 0));
    let copy = target.list_all()[0];
    assert_eq!(
        (copy.trigger.as_str(), copy.template.as_str(), copy.language.as_str()),
        ("foo", "FOO_BODY", "css")
    );
    assert_ne!(copy.id, source.list_all()[0].id);
}

#[test]
fn non_candidate_edits_never_modify_the_buffer() {
    let mut context = playground(SnippetStore::in_memory());
    context.type_text(Pane::Script, "log");

    let mut paste = EditEvent::insertion(Position::new(0, 3), " ");
    paste.change_count = 2;
    let editor = context.pane_mut(Pane::Script).unwrap();
    editor.buffer.type_char(' ');

    assert_eq!(context.on_edit(Pane::Script, &paste), None);
    assert_eq!(context.pane(Pane::Script).unwrap().buffer.text(), "log ");
}

#[test]
fn user_snippet_expands_after_store_update() {
    let mut context = playground(SnippetStore::in_memory());
    context
        .add_snippet("hw", "print(\"hello $CURSOR$\")", "javascript")
        .unwrap();

    let caret = context.type_text(Pane::Script, "x = hw ");

    assert_eq!(
        context.pane(Pane::Script).unwrap().buffer.text(),
        "x = print(\"hello \")"
    );
    assert_eq!(caret, Some(Position::new(0, 17)));
}
