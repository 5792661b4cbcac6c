//! Document store over a single `documents` table.
//!
//! Each row holds one document: its collection path, its id and the JSON
//! field map. Listing follows rowid, which upserts keep stable, so documents
//! come back in the order they were first written.

use async_trait::async_trait;
use serde_json::{Number, Value};
use sqlx::{Row, Sqlite, Transaction as SqlTransaction};
use tracing::debug;

use super::connection::DbConnection;
use crate::storage::traits::{
    CollectionRef, Document, DocumentData, DocumentRef, DocumentStore, StoreError, WriteBatch, WriteOperation,
};

#[derive(Clone)]
pub struct SqliteDocumentStore {
    connection: DbConnection,
}

impl SqliteDocumentStore {
    pub fn new(connection: DbConnection) -> Self {
        Self { connection }
    }

    fn parse_data(doc: &DocumentRef, raw: &str) -> Result<DocumentData, StoreError> {
        match serde_json::from_str::<Value>(raw)? {
            Value::Object(map) => Ok(map),
            _ => Err(StoreError::Backend(format!("document {} is not a JSON object", doc))),
        }
    }

    async fn read_in_tx(
        tx: &mut SqlTransaction<'static, Sqlite>,
        doc: &DocumentRef,
    ) -> Result<Option<DocumentData>, StoreError> {
        let row = sqlx::query("SELECT data FROM documents WHERE collection_path = ? AND doc_id = ?")
            .bind(doc.collection().path())
            .bind(doc.id())
            .fetch_optional(&mut **tx)
            .await?;

        match row {
            Some(row) => {
                let raw: String = row.get("data");
                Ok(Some(Self::parse_data(doc, &raw)?))
            }
            None => Ok(None),
        }
    }

    async fn upsert_in_tx(
        tx: &mut SqlTransaction<'static, Sqlite>,
        doc: &DocumentRef,
        data: &DocumentData,
        now: &str,
    ) -> Result<(), StoreError> {
        let raw = serde_json::to_string(data)?;
        sqlx::query(
            r#"
            INSERT INTO documents (collection_path, doc_id, data, create_time, update_time)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(collection_path, doc_id)
            DO UPDATE SET data = excluded.data, update_time = excluded.update_time
            "#,
        )
        .bind(doc.collection().path())
        .bind(doc.id())
        .bind(raw)
        .bind(now)
        .bind(now)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    async fn apply(
        tx: &mut SqlTransaction<'static, Sqlite>,
        operation: WriteOperation,
        now: &str,
    ) -> Result<(), StoreError> {
        match operation {
            WriteOperation::Set { doc, data, merge: false } => Self::upsert_in_tx(tx, &doc, &data, now).await,
            WriteOperation::Set { doc, data, merge: true } => {
                let mut merged = Self::read_in_tx(tx, &doc).await?.unwrap_or_default();
                merged.extend(data);
                Self::upsert_in_tx(tx, &doc, &merged, now).await
            }
            WriteOperation::Update { doc, data } => {
                let mut merged = Self::read_in_tx(tx, &doc)
                    .await?
                    .ok_or_else(|| StoreError::NotFound { path: doc.path() })?;
                merged.extend(data);
                Self::upsert_in_tx(tx, &doc, &merged, now).await
            }
            WriteOperation::Increment { doc, field, delta } => {
                let mut current = Self::read_in_tx(tx, &doc)
                    .await?
                    .ok_or_else(|| StoreError::NotFound { path: doc.path() })?;
                let base = match current.get(&field) {
                    None | Some(Value::Null) => 0.0,
                    Some(value) => value.as_f64().ok_or_else(|| {
                        StoreError::Backend(format!("field {} of {} is not a number", field, doc))
                    })?,
                };
                let total = Number::from_f64(base + delta).ok_or_else(|| StoreError::OutOfRange {
                    path: doc.path(),
                    field: field.clone(),
                })?;
                current.insert(field, Value::Number(total));
                Self::upsert_in_tx(tx, &doc, &current, now).await
            }
            WriteOperation::Delete { doc } => {
                sqlx::query("DELETE FROM documents WHERE collection_path = ? AND doc_id = ?")
                    .bind(doc.collection().path())
                    .bind(doc.id())
                    .execute(&mut **tx)
                    .await?;
                Ok(())
            }
        }
    }
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn get(&self, doc: &DocumentRef) -> Result<Option<Document>, StoreError> {
        let row = sqlx::query("SELECT data FROM documents WHERE collection_path = ? AND doc_id = ?")
            .bind(doc.collection().path())
            .bind(doc.id())
            .fetch_optional(self.connection.pool())
            .await?;

        match row {
            Some(row) => {
                let raw: String = row.get("data");
                Ok(Some(Document {
                    reference: doc.clone(),
                    data: Self::parse_data(doc, &raw)?,
                }))
            }
            None => Ok(None),
        }
    }

    async fn list(&self, collection: &CollectionRef) -> Result<Vec<Document>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT doc_id, data
            FROM documents
            WHERE collection_path = ?
            ORDER BY ROWID ASC
            "#,
        )
        .bind(collection.path())
        .fetch_all(self.connection.pool())
        .await?;

        rows.iter()
            .map(|row| {
                let reference = collection.doc(row.get::<String, _>("doc_id"));
                let raw: String = row.get("data");
                let data = Self::parse_data(&reference, &raw)?;
                Ok(Document { reference, data })
            })
            .collect()
    }

    async fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        if batch.is_empty() {
            return Ok(());
        }
        debug!("Committing batch of {} operations", batch.len());

        let now = chrono::Utc::now().to_rfc3339();
        let mut tx = self.connection.pool().begin().await?;
        for operation in batch.into_operations() {
            // An early return drops `tx`, which rolls the batch back
            Self::apply(&mut tx, operation, &now).await?;
        }
        tx.commit().await?;
        Ok(())
    }
}
