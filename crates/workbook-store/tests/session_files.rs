//! Session round trips through real files

use pretty_assertions::assert_eq;
use std::sync::Arc;
use workbook_model::{Document, UlidGenerator};
use workbook_store::{DocumentStore, FileStore, Session, StoreError, WorkbookConfig};
use workbook_test_utils::{scenario_import, scenario_local};

async fn open(store: &FileStore) -> Session {
    Session::open(Arc::new(store.clone()), Box::new(UlidGenerator))
        .await
        .unwrap()
}

#[tokio::test]
async fn document_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let store = WorkbookConfig::default().with_data_dir(dir.path()).file_store();

    let mut session = open(&store).await;
    session.replace_document(scenario_local());
    session.flush().await.unwrap();
    drop(session);

    let reopened = open(&store).await;
    assert_eq!(reopened.document(), &scenario_local());
}

#[tokio::test]
async fn last_of_many_saves_wins() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path(), "slot");
    let mut session = open(&store).await;

    for n in 0..10 {
        session.update(|doc| doc.phase4.intro_text = format!("draft {n}"));
    }
    session.flush().await.unwrap();

    let saved = store.load().await.unwrap().unwrap();
    assert!(saved.contains("draft 9"));
    assert_eq!(open(&store).await.document().phase4.intro_text, "draft 9");
}

#[tokio::test]
async fn export_then_import_between_members() {
    let dir = tempfile::tempdir().unwrap();

    // Luis exports from his copy.
    let luis_store = FileStore::new(dir.path().join("luis"), "workbook");
    let mut luis = open(&luis_store).await;
    luis.replace_document(scenario_import());
    assert!(luis.sign_in("m2"));
    let exported = luis.export_to(dir.path().join("outbox")).await.unwrap();
    assert!(exported.ends_with("aporte_Luis.json"));

    // Ana merges it into hers.
    let ana_store = FileStore::new(dir.path().join("ana"), "workbook");
    let mut ana = open(&ana_store).await;
    ana.replace_document(scenario_local());
    let report = ana.import_file(&exported).await.unwrap();
    ana.flush().await.unwrap();

    assert_eq!(report.source_team, "Imported");
    let names: Vec<&str> = ana.document().phase3.dishes.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["Cream Soup", "Salad"]);
    assert_eq!(open(&ana_store).await.document().members.len(), 2);
}

#[tokio::test]
async fn missing_import_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = open(&FileStore::new(dir.path(), "workbook")).await;

    let err = session.import_file(dir.path().join("nope.json")).await.unwrap_err();
    assert!(matches!(err, StoreError::Io { .. }));
    assert!(err.to_string().contains("nope.json"));
}

#[tokio::test]
async fn invalid_import_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    tokio::fs::write(&path, b"{\"members\": []}").await.unwrap();

    let mut session = open(&FileStore::new(dir.path(), "workbook")).await;
    session.replace_document(scenario_local());
    let err = session.import_file(&path).await.unwrap_err();

    assert!(err.is_rejected_import());
    assert_eq!(session.document(), &scenario_local());
}

#[tokio::test]
async fn corrupt_slot_starts_fresh() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path(), "workbook");
    store.save("not json at all".to_string()).await.unwrap();

    let session = open(&store).await;
    assert_ne!(session.document(), &Document::new(""));
    assert!(session.document().members.is_empty());
}

#[tokio::test]
async fn non_utf8_slot_starts_fresh() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path(), "workbook");
    std::fs::write(store.path(), [0xff, 0xfe, b'{']).unwrap();

    let session = open(&store).await;
    assert!(session.document().members.is_empty());
    assert_eq!(session.document().id.len(), 26);
}
