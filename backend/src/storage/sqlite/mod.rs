//! SQLite implementation of the document store.

pub mod connection;
pub mod document_store;

pub use connection::DbConnection;
pub use document_store::SqliteDocumentStore;
