//! Background persistence
//!
//! Saves are fire-and-forget: callers enqueue the serialized document and
//! return immediately. One writer task drains the queue, so the store sees
//! saves in the order they were requested.

use crate::error::StoreError;
use crate::store::DocumentStore;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

enum WriteCommand {
    Save(String),
    Flush(oneshot::Sender<()>),
}

/// Handle to the writer task
#[derive(Debug, Clone)]
pub struct Persister {
    sender: mpsc::UnboundedSender<WriteCommand>,
}

impl Persister {
    /// Spawn the writer task on the current runtime
    #[must_use]
    pub fn spawn(store: Arc<dyn DocumentStore>) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        tokio::spawn(writer_task(store, receiver));
        Self { sender }
    }

    /// Enqueue a save; failures are logged by the writer, never returned
    pub fn save(&self, contents: String) {
        if self.sender.send(WriteCommand::Save(contents)).is_err() {
            tracing::error!("persistence task is gone; change not saved");
        }
    }

    /// Wait until every save enqueued so far has completed
    ///
    /// # Errors
    /// [`StoreError::Task`] when the writer task has stopped.
    pub async fn flush(&self) -> Result<(), StoreError> {
        let (done, wait) = oneshot::channel();
        self.sender
            .send(WriteCommand::Flush(done))
            .map_err(|_| StoreError::Task("writer stopped".to_string()))?;
        wait.await
            .map_err(|_| StoreError::Task("writer dropped flush".to_string()))
    }
}

async fn writer_task(store: Arc<dyn DocumentStore>, mut receiver: mpsc::UnboundedReceiver<WriteCommand>) {
    while let Some(command) = receiver.recv().await {
        match command {
            WriteCommand::Save(contents) => {
                if let Err(err) = store.save(contents).await {
                    tracing::warn!(error = %err, "failed to persist document");
                }
            }
            WriteCommand::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    tracing::debug!("persistence task finished");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, MockDocumentStore};
    use mockall::Sequence;

    #[tokio::test]
    async fn saves_apply_in_order() {
        let mut mock = MockDocumentStore::new();
        let mut seq = Sequence::new();
        for expected in ["one", "two", "three"] {
            mock.expect_save()
                .withf(move |contents| contents == expected)
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_| Ok(()));
        }

        let persister = Persister::spawn(Arc::new(mock));
        persister.save("one".to_string());
        persister.save("two".to_string());
        persister.save("three".to_string());
        persister.flush().await.unwrap();
    }

    #[tokio::test]
    async fn failed_save_does_not_stop_writer() {
        let mut mock = MockDocumentStore::new();
        let mut seq = Sequence::new();
        mock.expect_save()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(StoreError::Task("disk full".to_string())));
        mock.expect_save()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        let persister = Persister::spawn(Arc::new(mock));
        persister.save("a".to_string());
        persister.save("b".to_string());
        persister.flush().await.unwrap();
    }

    #[tokio::test]
    async fn flush_waits_for_last_save() {
        let store = MemoryStore::new();
        let persister = Persister::spawn(Arc::new(store.clone()));

        for n in 0..20 {
            persister.save(format!("v{n}"));
        }
        persister.flush().await.unwrap();

        assert_eq!(store.contents().as_deref(), Some("v19"));
        assert_eq!(store.save_count(), 20);
    }
}
