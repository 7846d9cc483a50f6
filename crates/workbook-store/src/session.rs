//! Working session
//!
//! Owns the single working document. Every mutation replaces the document
//! and enqueues a save; imports go through the merge engine and either apply
//! completely or not at all.

use crate::error::StoreError;
use crate::store::DocumentStore;
use crate::writer::Persister;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use workbook_merge::{merge_raw, MergeError, MergeReport};
use workbook_model::{
    hydrate_or_default, now_millis, Document, IdGenerator, Member, ModelError, TeamSetup,
};

/// File name for exporting a snapshot on behalf of `member`
///
/// `aporte_<name>.json`, or `aporte_equipo.json` without a signed-in member.
#[must_use]
pub fn export_file_name(member: Option<&Member>) -> String {
    let name = member
        .map(|m| m.name.trim())
        .filter(|name| !name.is_empty())
        .unwrap_or("equipo");
    let safe: String = name
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!("aporte_{safe}.json")
}

/// The member's working copy of the project
#[derive(Debug)]
pub struct Session {
    document: Document,
    current_member: Option<String>,
    ids: Box<dyn IdGenerator>,
    persister: Persister,
    pretty_export: bool,
}

impl Session {
    /// Restore the persisted document, or start a fresh one
    ///
    /// A corrupt or unrecognizable slot is logged and replaced by a fresh
    /// document; it is not an error.
    ///
    /// # Errors
    /// [`StoreError::Io`] when the slot exists but cannot be read.
    pub async fn open(
        store: Arc<dyn DocumentStore>,
        ids: Box<dyn IdGenerator>,
    ) -> Result<Self, StoreError> {
        let stored = store.load().await?;
        let fresh = Document::create(ids.as_ref(), now_millis());
        let document = hydrate_or_default(stored.as_deref(), fresh);
        tracing::info!(id = %document.id, members = document.members.len(), "opened workbook");

        Ok(Self {
            document,
            current_member: None,
            ids,
            persister: Persister::spawn(store),
            pretty_export: true,
        })
    }

    /// Indent exported snapshots or not
    #[inline]
    #[must_use]
    pub fn with_pretty_export(mut self, pretty: bool) -> Self {
        self.pretty_export = pretty;
        self
    }

    /// Current document
    #[inline]
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Replace the document and enqueue a save
    pub fn replace_document(&mut self, document: Document) {
        self.document = document;
        match self.document.to_json() {
            Ok(json) => self.persister.save(json),
            Err(err) => tracing::error!(error = %err, "could not serialize document; not saved"),
        }
    }

    /// Apply an edit to a copy of the document, then replace it
    pub fn update(&mut self, edit: impl FnOnce(&mut Document)) {
        let mut next = self.document.clone();
        edit(&mut next);
        self.replace_document(next);
    }

    /// Member acting in this session
    #[must_use]
    pub fn current_member(&self) -> Option<&Member> {
        self.current_member
            .as_deref()
            .and_then(|id| self.document.member(id))
    }

    /// Act as the member with `id`; returns false when no such member exists
    pub fn sign_in(&mut self, id: &str) -> bool {
        let known = self.document.member(id).is_some();
        if known {
            self.current_member = Some(id.to_string());
        }
        known
    }

    /// Merge an imported snapshot
    ///
    /// On success the merged document replaces the current one.
    ///
    /// # Errors
    /// Any [`MergeError`]; the current document is then unchanged.
    pub fn merge_import_bytes(&mut self, bytes: &[u8]) -> Result<MergeReport, MergeError> {
        let outcome = merge_raw(&self.document, bytes)?;
        tracing::info!(summary = %outcome.report.summary(), "merged import");
        self.replace_document(outcome.document);
        Ok(outcome.report)
    }

    /// Read an exported file and merge it
    ///
    /// # Errors
    /// [`StoreError::Io`] when the file cannot be read,
    /// [`StoreError::Import`] when its contents are rejected.
    pub async fn import_file(&mut self, path: impl AsRef<Path>) -> Result<MergeReport, StoreError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| StoreError::io_error(path, e))?;
        Ok(self.merge_import_bytes(&bytes)?)
    }

    /// Serialize the document for exchange
    ///
    /// # Errors
    /// [`StoreError::Serialize`] when serialization fails.
    pub fn export_json(&self) -> Result<String, StoreError> {
        let json = if self.pretty_export {
            self.document.to_json_pretty()?
        } else {
            self.document.to_json()?
        };
        Ok(json)
    }

    /// Write the exchange snapshot into `dir`, named after the current member
    ///
    /// # Errors
    /// [`StoreError::Io`] when the file cannot be written.
    pub async fn export_to(&self, dir: impl AsRef<Path>) -> Result<PathBuf, StoreError> {
        let dir = dir.as_ref();
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| StoreError::io_error(dir, e))?;

        let path = dir.join(export_file_name(self.current_member()));
        tokio::fs::write(&path, self.export_json()?)
            .await
            .map_err(|e| StoreError::io_error(&path, e))?;

        tracing::info!(path = %path.display(), "exported snapshot");
        Ok(path)
    }

    /// Replace the document with the demo project and act as its first member
    pub fn load_demo(&mut self) {
        let demo = Document::sample(self.ids.as_ref(), now_millis());
        self.current_member = demo.members.first().map(|m| m.id.clone());
        self.replace_document(demo);
    }

    /// Start over with an empty project
    pub fn reset(&mut self) {
        self.current_member = None;
        self.replace_document(Document::create(self.ids.as_ref(), now_millis()));
    }

    /// Complete team setup and act as the first member
    ///
    /// # Errors
    /// [`ModelError::EmptyTeam`] when no member has a name.
    pub fn finish_setup(&mut self, setup: &TeamSetup) -> Result<(), ModelError> {
        let document = setup.apply(&self.document, self.ids.as_ref())?;
        self.current_member = document.members.first().map(|m| m.id.clone());
        self.replace_document(document);
        Ok(())
    }

    /// Wait for every save enqueued so far
    ///
    /// # Errors
    /// [`StoreError::Task`] when the background writer has stopped.
    pub async fn flush(&self) -> Result<(), StoreError> {
        self.persister.flush().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, MockDocumentStore};
    use pretty_assertions::assert_eq;
    use workbook_model::{MemberDraft, Role, UlidGenerator};
    use workbook_test_utils::{member, scenario_import, scenario_local};

    async fn session_with(document: &Document) -> (Session, MemoryStore) {
        let store = MemoryStore::with_contents(document.to_json().unwrap());
        let session = Session::open(Arc::new(store.clone()), Box::new(UlidGenerator))
            .await
            .unwrap();
        (session, store)
    }

    #[test]
    fn export_names() {
        assert_eq!(export_file_name(None), "aporte_equipo.json");
        let ana = member("m1", "Ana", Role::Coordinator);
        assert_eq!(export_file_name(Some(&ana)), "aporte_Ana.json");
        let odd = member("m2", "a/b", Role::Resources);
        assert_eq!(export_file_name(Some(&odd)), "aporte_a_b.json");
        let blank = member("m3", "  ", Role::Resources);
        assert_eq!(export_file_name(Some(&blank)), "aporte_equipo.json");
    }

    #[tokio::test]
    async fn open_restores_persisted_document() {
        let (session, _) = session_with(&scenario_local()).await;
        assert_eq!(session.document(), &scenario_local());
    }

    #[tokio::test]
    async fn open_falls_back_on_corrupt_slot() {
        let store = MemoryStore::with_contents("{ truncated");
        let session = Session::open(Arc::new(store), Box::new(UlidGenerator))
            .await
            .unwrap();
        assert!(session.document().members.is_empty());
        assert_eq!(session.document().id.len(), 26);
    }

    #[tokio::test]
    async fn open_propagates_read_failure() {
        let mut mock = MockDocumentStore::new();
        mock.expect_load().returning(|| {
            Err(StoreError::io_error(
                "slot.json",
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            ))
        });
        let result = Session::open(Arc::new(mock), Box::new(UlidGenerator)).await;
        assert!(matches!(result, Err(StoreError::Io { .. })));
    }

    #[tokio::test]
    async fn merge_import_persists_merged_document() {
        let (mut session, store) = session_with(&scenario_local()).await;
        let bytes = scenario_import().to_json().unwrap();

        let report = session.merge_import_bytes(bytes.as_bytes()).unwrap();
        assert_eq!(report.source_team, "Imported");
        session.flush().await.unwrap();

        let saved = store.contents().unwrap();
        assert!(saved.contains("Luis"));
        assert!(saved.contains("Cream Soup"));
        assert_eq!(session.document().members.len(), 2);
    }

    #[tokio::test]
    async fn rejected_import_changes_nothing() {
        let (mut session, store) = session_with(&scenario_local()).await;
        let before = session.document().fingerprint();

        assert!(session.merge_import_bytes(b"{\"phase3\": {}}").is_err());
        session.flush().await.unwrap();

        assert_eq!(session.document().fingerprint(), before);
        assert_eq!(store.save_count(), 0);
    }

    #[tokio::test]
    async fn demo_signs_in_first_member() {
        let (mut session, _) = session_with(&Document::new("p")).await;
        session.load_demo();
        assert_eq!(session.current_member().map(|m| m.id.as_str()), Some("m1"));
        assert_ne!(session.document().id, "p");
    }

    #[tokio::test]
    async fn finish_setup_requires_a_member() {
        let (mut session, _) = session_with(&Document::new("p")).await;
        let mut setup = TeamSetup::from_document(session.document());
        assert!(matches!(session.finish_setup(&setup), Err(ModelError::EmptyTeam)));

        setup.members = vec![MemberDraft::new(Role::Coordinator, "Ana")];
        session.finish_setup(&setup).unwrap();
        assert_eq!(session.current_member().map(|m| m.name.as_str()), Some("Ana"));
    }

    #[tokio::test]
    async fn sign_in_unknown_member_fails() {
        let (mut session, _) = session_with(&scenario_local()).await;
        assert!(!session.sign_in("nobody"));
        assert!(session.sign_in("m1"));
        assert_eq!(session.current_member().map(|m| m.name.as_str()), Some("Ana"));
    }

    #[tokio::test]
    async fn update_saves_edited_copy() {
        let (mut session, store) = session_with(&scenario_local()).await;
        session.update(|doc| doc.phase1.justification = "because".to_string());
        session.flush().await.unwrap();

        assert_eq!(session.document().phase1.justification, "because");
        assert!(store.contents().unwrap().contains("because"));
    }

    #[tokio::test]
    async fn reset_starts_fresh() {
        let (mut session, _) = session_with(&scenario_local()).await;
        session.sign_in("m1");
        session.reset();
        assert!(session.document().members.is_empty());
        assert!(session.current_member().is_none());
    }
}
