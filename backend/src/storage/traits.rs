//! # Storage Traits
//!
//! Path types, batch type and the [`DocumentStore`] trait that lets the domain
//! layer work against any document backend.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Field map of a single document
pub type DocumentData = Map<String, Value>;

/// Names of the per-user subcollections
pub mod collections {
    pub const USERS: &str = "users";
    pub const TRANSACTIONS: &str = "transactions";
    pub const BUDGETS: &str = "budgets";
    pub const SAVINGS_GOALS: &str = "savingsGoals";
    pub const SAVINGS_TRANSACTIONS: &str = "savingsTransactions";
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Missing or insufficient permissions for {path}")]
    PermissionDenied { path: String },
    #[error("No document to update: {path}")]
    NotFound { path: String },
    #[error("Field {field} of {path} would not be a finite number")]
    OutOfRange { path: String, field: String },
    #[error("Document serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Document store backend error: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(value: sqlx::Error) -> Self {
        Self::Backend(value.to_string())
    }
}

/// Reference to a collection such as `users/abc/budgets`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionRef {
    path: String,
}

impl CollectionRef {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into().trim_matches('/').to_string(),
        }
    }

    /// Subcollection `name` of the user document `users/{uid}`
    pub fn for_user(uid: &str, name: &str) -> Self {
        Self::new(format!("{}/{}/{}", collections::USERS, uid, name))
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn doc(&self, id: impl Into<String>) -> DocumentRef {
        DocumentRef {
            collection: self.clone(),
            id: id.into(),
        }
    }

    /// Reference to a new document with a generated id
    pub fn new_doc(&self) -> DocumentRef {
        self.doc(uuid::Uuid::new_v4().to_string())
    }
}

impl fmt::Display for CollectionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

/// Reference to a single document
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentRef {
    collection: CollectionRef,
    id: String,
}

impl DocumentRef {
    /// The profile document `users/{uid}`
    pub fn user(uid: &str) -> Self {
        CollectionRef::new(collections::USERS).doc(uid)
    }

    pub fn collection(&self) -> &CollectionRef {
        &self.collection
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn path(&self) -> String {
        format!("{}/{}", self.collection.path, self.id)
    }
}

impl fmt::Display for DocumentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection.path, self.id)
    }
}

/// A stored document
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub reference: DocumentRef,
    pub data: DocumentData,
}

impl Document {
    /// Deserialize into a model; the document id always wins over any `id`
    /// field stored in the data
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, StoreError> {
        let mut data = self.data.clone();
        data.insert("id".to_string(), Value::String(self.reference.id().to_string()));
        Ok(serde_json::from_value(Value::Object(data))?)
    }
}

/// Serialize a model into a document field map
pub fn to_document_data<T: Serialize>(value: &T) -> Result<DocumentData, StoreError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::Backend(format!(
            "documents must serialize to JSON objects, got {}",
            other
        ))),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WriteOperation {
    /// Create or overwrite; with `merge` only the given fields are replaced
    Set {
        doc: DocumentRef,
        data: DocumentData,
        merge: bool,
    },
    /// Merge fields into an existing document; fails if it does not exist
    Update { doc: DocumentRef, data: DocumentData },
    /// Remove a document; missing documents are ignored
    Delete { doc: DocumentRef },
    /// Add `delta` to a numeric field of an existing document, reading the
    /// current value inside the committing transaction. A missing field
    /// counts as zero.
    Increment { doc: DocumentRef, field: String, delta: f64 },
}

impl WriteOperation {
    pub fn doc(&self) -> &DocumentRef {
        match self {
            WriteOperation::Set { doc, .. }
            | WriteOperation::Update { doc, .. }
            | WriteOperation::Delete { doc }
            | WriteOperation::Increment { doc, .. } => doc,
        }
    }
}

/// Writes committed to the store as one all-or-nothing unit
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteBatch {
    operations: Vec<WriteOperation>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, doc: DocumentRef, data: DocumentData) -> &mut Self {
        self.operations.push(WriteOperation::Set { doc, data, merge: false });
        self
    }

    pub fn set_merge(&mut self, doc: DocumentRef, data: DocumentData) -> &mut Self {
        self.operations.push(WriteOperation::Set { doc, data, merge: true });
        self
    }

    pub fn update(&mut self, doc: DocumentRef, data: DocumentData) -> &mut Self {
        self.operations.push(WriteOperation::Update { doc, data });
        self
    }

    pub fn delete(&mut self, doc: DocumentRef) -> &mut Self {
        self.operations.push(WriteOperation::Delete { doc });
        self
    }

    pub fn increment(&mut self, doc: DocumentRef, field: impl Into<String>, delta: f64) -> &mut Self {
        self.operations.push(WriteOperation::Increment {
            doc,
            field: field.into(),
            delta,
        });
        self
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn operations(&self) -> &[WriteOperation] {
        &self.operations
    }

    pub fn into_operations(self) -> Vec<WriteOperation> {
        self.operations
    }
}

/// Trait defining the interface for document storage operations
///
/// Only [`DocumentStore::get`], [`DocumentStore::list`] and
/// [`DocumentStore::commit`] are required; single writes default to a batch
/// of one.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Retrieve one document
    async fn get(&self, doc: &DocumentRef) -> Result<Option<Document>, StoreError>;

    /// All documents of a collection in insertion order
    async fn list(&self, collection: &CollectionRef) -> Result<Vec<Document>, StoreError>;

    /// Documents whose `field` equals `value`
    async fn query_eq(
        &self,
        collection: &CollectionRef,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>, StoreError> {
        let documents = self.list(collection).await?;
        Ok(documents
            .into_iter()
            .filter(|document| document.data.get(field) == Some(value))
            .collect())
    }

    /// Create a document with a generated id, also stored in its `id` field
    async fn add(&self, collection: &CollectionRef, mut data: DocumentData) -> Result<DocumentRef, StoreError> {
        let doc = collection.new_doc();
        data.insert("id".to_string(), Value::String(doc.id().to_string()));
        self.set(&doc, data, false).await?;
        Ok(doc)
    }

    async fn set(&self, doc: &DocumentRef, data: DocumentData, merge: bool) -> Result<(), StoreError> {
        let mut batch = WriteBatch::new();
        if merge {
            batch.set_merge(doc.clone(), data);
        } else {
            batch.set(doc.clone(), data);
        }
        self.commit(batch).await
    }

    async fn update(&self, doc: &DocumentRef, data: DocumentData) -> Result<(), StoreError> {
        let mut batch = WriteBatch::new();
        batch.update(doc.clone(), data);
        self.commit(batch).await
    }

    async fn delete(&self, doc: &DocumentRef) -> Result<(), StoreError> {
        let mut batch = WriteBatch::new();
        batch.delete(doc.clone());
        self.commit(batch).await
    }

    /// Apply every operation of the batch, or none of them
    async fn commit(&self, batch: WriteBatch) -> Result<(), StoreError>;
}
