use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use super::traits::{
    collections, CollectionRef, Document, DocumentData, DocumentRef, DocumentStore, StoreError, WriteBatch,
};

/// Store handle that may only touch `users/{uid}` and the documents below it
///
/// Any other path fails with [`StoreError::PermissionDenied`] before the
/// inner store is reached.
#[derive(Clone)]
pub struct UserScope {
    inner: Arc<dyn DocumentStore>,
    uid: String,
}

impl UserScope {
    pub fn new(inner: Arc<dyn DocumentStore>, uid: impl Into<String>) -> Self {
        Self { inner, uid: uid.into() }
    }

    /// Shorthand for services that pass stores around as trait objects
    pub fn shared(inner: Arc<dyn DocumentStore>, uid: &str) -> Arc<dyn DocumentStore> {
        Arc::new(Self::new(inner, uid))
    }

    fn allows(&self, path: &str) -> bool {
        let root = format!("{}/{}", collections::USERS, self.uid);
        !self.uid.is_empty() && (path == root || path.starts_with(&format!("{}/", root)))
    }

    fn check(&self, path: String) -> Result<(), StoreError> {
        if self.allows(&path) {
            Ok(())
        } else {
            Err(StoreError::PermissionDenied { path })
        }
    }
}

#[async_trait]
impl DocumentStore for UserScope {
    async fn get(&self, doc: &DocumentRef) -> Result<Option<Document>, StoreError> {
        self.check(doc.path())?;
        self.inner.get(doc).await
    }

    async fn list(&self, collection: &CollectionRef) -> Result<Vec<Document>, StoreError> {
        self.check(collection.path().to_string())?;
        self.inner.list(collection).await
    }

    async fn query_eq(
        &self,
        collection: &CollectionRef,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>, StoreError> {
        self.check(collection.path().to_string())?;
        self.inner.query_eq(collection, field, value).await
    }

    async fn add(&self, collection: &CollectionRef, data: DocumentData) -> Result<DocumentRef, StoreError> {
        self.check(collection.path().to_string())?;
        self.inner.add(collection, data).await
    }

    async fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        for operation in batch.operations() {
            self.check(operation.doc().path())?;
        }
        self.inner.commit(batch).await
    }
}
