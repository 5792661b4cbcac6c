//! Fire-and-forget writes.
//!
//! Each call spawns the write on the runtime and hands back the optimistic
//! value immediately. Failures never reach the caller; they are published on
//! the [`ErrorEmitter`] as [`PermissionErrorEvent`]s.

use serde_json::Value;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::debug;

use super::error_emitter::{ErrorEmitter, PermissionErrorEvent, StoreOperation};
use super::traits::{CollectionRef, DocumentData, DocumentRef, DocumentStore, StoreError, WriteBatch, WriteOperation};

/// Optimistic result of a write that may still be in flight
#[derive(Debug)]
pub struct PendingWrite<T> {
    pub value: T,
    completion: JoinHandle<bool>,
}

impl<T> PendingWrite<T> {
    /// Wait for the write to land; `false` if it failed
    pub async fn wait(self) -> (T, bool) {
        let succeeded = self.completion.await.unwrap_or(false);
        (self.value, succeeded)
    }

    /// Keep the optimistic value and let the write finish on its own
    pub fn detach(self) -> T {
        self.value
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> PendingWrite<U> {
        PendingWrite {
            value: f(self.value),
            completion: self.completion,
        }
    }
}

#[derive(Clone)]
pub struct NonBlockingWriter {
    store: Arc<dyn DocumentStore>,
    emitter: ErrorEmitter,
}

impl NonBlockingWriter {
    pub fn new(store: Arc<dyn DocumentStore>, emitter: ErrorEmitter) -> Self {
        Self { store, emitter }
    }

    /// Create a document under a freshly generated id
    pub fn add_document_non_blocking(&self, collection: &CollectionRef, mut data: DocumentData) -> PendingWrite<DocumentRef> {
        let doc = collection.new_doc();
        data.insert("id".to_string(), Value::String(doc.id().to_string()));
        let mut batch = WriteBatch::new();
        batch.set(doc.clone(), data.clone());
        let completion = self.spawn(batch, doc.path(), StoreOperation::Create, Some(Value::Object(data)));
        PendingWrite { value: doc, completion }
    }

    pub fn set_document_non_blocking(&self, doc: &DocumentRef, data: DocumentData, merge: bool) -> PendingWrite<DocumentRef> {
        let mut batch = WriteBatch::new();
        if merge {
            batch.set_merge(doc.clone(), data.clone());
        } else {
            batch.set(doc.clone(), data.clone());
        }
        let completion = self.spawn(batch, doc.path(), StoreOperation::Write, Some(Value::Object(data)));
        PendingWrite {
            value: doc.clone(),
            completion,
        }
    }

    pub fn update_document_non_blocking(&self, doc: &DocumentRef, data: DocumentData) -> PendingWrite<DocumentRef> {
        let mut batch = WriteBatch::new();
        batch.update(doc.clone(), data.clone());
        let completion = self.spawn(batch, doc.path(), StoreOperation::Update, Some(Value::Object(data)));
        PendingWrite {
            value: doc.clone(),
            completion,
        }
    }

    pub fn delete_document_non_blocking(&self, doc: &DocumentRef) -> PendingWrite<DocumentRef> {
        let mut batch = WriteBatch::new();
        batch.delete(doc.clone());
        let completion = self.spawn(batch, doc.path(), StoreOperation::Delete, None);
        PendingWrite {
            value: doc.clone(),
            completion,
        }
    }

    /// Commit a whole batch in the background; the value is the number of
    /// operations submitted
    pub fn commit_batch_non_blocking(&self, batch: WriteBatch) -> PendingWrite<usize> {
        let count = batch.len();
        let path = batch
            .operations()
            .first()
            .map(|operation| operation.doc().path())
            .unwrap_or_default();
        let resource = batch_resource_data(&batch);
        let completion = self.spawn(batch, path, StoreOperation::Write, resource);
        PendingWrite { value: count, completion }
    }

    fn spawn(
        &self,
        batch: WriteBatch,
        path: String,
        operation: StoreOperation,
        resource: Option<Value>,
    ) -> JoinHandle<bool> {
        let store = self.store.clone();
        let emitter = self.emitter.clone();
        tokio::spawn(async move {
            match store.commit(batch).await {
                Ok(()) => {
                    debug!("Background {} on {} committed", operation, path);
                    true
                }
                Err(err) => {
                    let event_path = match &err {
                        StoreError::PermissionDenied { path } | StoreError::NotFound { path } => path.clone(),
                        _ => path,
                    };
                    let mut event = PermissionErrorEvent::new(event_path, operation, err.to_string());
                    if let Some(resource) = resource {
                        event = event.with_resource_data(resource);
                    }
                    emitter.emit(event);
                    false
                }
            }
        })
    }
}

fn batch_resource_data(batch: &WriteBatch) -> Option<Value> {
    let writes: Vec<Value> = batch
        .operations()
        .iter()
        .filter_map(|operation| match operation {
            WriteOperation::Set { data, .. } | WriteOperation::Update { data, .. } => Some(Value::Object(data.clone())),
            WriteOperation::Increment { field, delta, .. } => {
                let mut data = DocumentData::new();
                data.insert(field.clone(), Value::from(*delta));
                Some(Value::Object(data))
            }
            WriteOperation::Delete { .. } => None,
        })
        .collect();
    if writes.is_empty() {
        None
    } else {
        Some(Value::Array(writes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sqlite::{DbConnection, SqliteDocumentStore};
    use crate::storage::traits::{collections, to_document_data};
    use crate::storage::user_scope::UserScope;
    use serde_json::json;

    async fn setup_writer(uid: &str) -> (Arc<dyn DocumentStore>, NonBlockingWriter, ErrorEmitter) {
        let connection = DbConnection::init_test().await.expect("Failed to create test database");
        let root: Arc<dyn DocumentStore> = Arc::new(SqliteDocumentStore::new(connection));
        let emitter = ErrorEmitter::new();
        let writer = NonBlockingWriter::new(UserScope::shared(root.clone(), uid), emitter.clone());
        (root, writer, emitter)
    }

    #[tokio::test]
    async fn test_add_returns_id_before_write_and_lands() {
        let (root, writer, _) = setup_writer("u1").await;
        let col = CollectionRef::for_user("u1", collections::TRANSACTIONS);

        let pending = writer.add_document_non_blocking(&col, to_document_data(&json!({"name": "Rent"})).unwrap());
        let doc = pending.value.clone();
        let (_, ok) = pending.wait().await;

        assert!(ok);
        let stored = root.get(&doc).await.unwrap().unwrap();
        assert_eq!(stored.data.get("id"), Some(&json!(doc.id())));
    }

    #[tokio::test]
    async fn test_denied_write_is_emitted_not_returned() {
        let (root, writer, emitter) = setup_writer("u1").await;
        let mut receiver = emitter.subscribe();
        let foreign = CollectionRef::for_user("u2", collections::BUDGETS).doc("b1");

        let pending = writer.set_document_non_blocking(&foreign, to_document_data(&json!({"amount": 5.0})).unwrap(), false);
        let (_, ok) = pending.wait().await;

        assert!(!ok);
        let event = receiver.recv().await.unwrap();
        assert_eq!(event.path, "users/u2/budgets/b1");
        assert_eq!(event.operation, StoreOperation::Write);
        assert_eq!(event.request_resource_data, Some(json!({"amount": 5.0})));
        assert!(root.get(&foreign).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_of_missing_document_emits_update_event() {
        let (_, writer, emitter) = setup_writer("u1").await;
        let mut receiver = emitter.subscribe();
        let doc = CollectionRef::for_user("u1", collections::SAVINGS_GOALS).doc("nope");

        let (_, ok) = writer
            .update_document_non_blocking(&doc, to_document_data(&json!({"currentAmount": 1.0})).unwrap())
            .wait()
            .await;

        assert!(!ok);
        assert_eq!(receiver.recv().await.unwrap().operation, StoreOperation::Update);
    }

    #[tokio::test]
    async fn test_commit_batch_and_delete() {
        let (root, writer, _) = setup_writer("u1").await;
        let col = CollectionRef::for_user("u1", collections::BUDGETS);
        let mut batch = WriteBatch::new();
        batch
            .set(col.doc("a"), DocumentData::new())
            .set(col.doc("b"), DocumentData::new());

        let (count, ok) = writer.commit_batch_non_blocking(batch).wait().await;
        assert_eq!(count, 2);
        assert!(ok);

        let (_, ok) = writer.delete_document_non_blocking(&col.doc("a")).wait().await;
        assert!(ok);
        assert_eq!(root.list(&col).await.unwrap().len(), 1);
    }
}
