mod support;

use sceneboard::application::EditSession;
use sceneboard::application::transfer::{export_dialogs, import_dialogs};
use sceneboard::domain::{EventDraft, Speaker};
use sceneboard::error::{Error, ImportError};
use sceneboard::port::outbound::store::EventStore;

#[tokio::test]
async fn authored_events_survive_export_and_import() {
    let (_src_dir, source) = support::temp_store();
    let event = source.create(EventDraft::named("Battle")).await.unwrap();
    let mut session = EditSession::open(&source, event.id()).await.unwrap();
    session.set_text(0, "Ready?").unwrap();
    session.set_image(0, "./img/hero.png").unwrap();
    let i = session.add_dialog(None).unwrap();
    session.set_text(i, "\"Always\" \\o/ ✨").unwrap();
    session.set_speaker(i, Speaker::Right).unwrap();
    session.save(&source).await.unwrap();

    let module = export_dialogs(&source).await.unwrap();
    assert!(module.starts_with("export const dialogs = {"));
    assert!(module.trim_end().ends_with("};"));

    let (_dst_dir, target) = support::temp_store();
    let report = import_dialogs(&target, &module).await.unwrap();
    assert_eq!(report.len(), 1);
    assert_eq!(report.imported[0].id, *event.id());

    let copied = target.get(event.id()).await.unwrap().unwrap();
    let original = source.get(event.id()).await.unwrap().unwrap();
    assert_eq!(copied.dialogs(), original.dialogs());
    assert_eq!(copied.name(), format!("Imported: {}", event.id()));
}

#[tokio::test]
async fn hand_written_module_with_comments_imports() {
    let (_dir, store) = support::temp_store();
    let source = "// scenes for chapter 1\nexport const dialogs = {\n  'ch1-open': [\n    { text: 'Morning!', speaker: 'left', },\n    /* reply */ { speaker: \"right\", text: \"...\" },\n  ],\n};\n";

    let report = import_dialogs(&store, source).await.unwrap();
    assert_eq!(report.imported[0].key, "ch1-open");
    assert_eq!(report.imported[0].dialogs, 2);

    let events = store.list().await.unwrap();
    assert_eq!(events[0].dialogs()[1].speaker, Speaker::Right);
    assert!(events[0].dialogs()[0].image_path.is_empty());
}

#[tokio::test]
async fn schema_errors_name_the_field_and_write_nothing() {
    let (_dir, store) = support::temp_store();
    let source = "export const dialogs = { intro: [{ text: \"Hi\", speaker: \"up\" }] };";

    let err = import_dialogs(&store, source).await.unwrap_err();
    match err {
        Error::Import(ImportError::Schema { path, .. }) => {
            assert_eq!(path, "dialogs[\"intro\"][0].speaker");
        }
        other => panic!("Expected schema error, got {other}"),
    }
    assert!(store.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn code_is_never_evaluated() {
    let (_dir, store) = support::temp_store();
    let source = "export const dialogs = { intro: [{ text: foo(), speaker: \"left\" }] };";

    let err = import_dialogs(&store, source).await.unwrap_err();
    assert!(matches!(err, Error::Import(ImportError::Syntax { line: 1, .. })));
}
