//! # Storage Module
//!
//! Document-store adapter for the budgeting application.
//!
//! Every piece of user data lives in a per-user document hierarchy:
//!
//! ```text
//! users/{uid}                          profile
//! users/{uid}/transactions/{id}
//! users/{uid}/budgets/{id}
//! users/{uid}/savingsGoals/{id}
//! users/{uid}/savingsTransactions/{id}
//! ```
//!
//! ## Key Responsibilities
//!
//! - **Store Abstraction**: [`DocumentStore`] hides the concrete backend
//! - **Batch Commits**: [`WriteBatch`] applies a set of writes all-or-nothing
//! - **Ownership**: [`UserScope`] rejects paths outside the caller's subtree
//! - **Non-blocking Writes**: [`NonBlockingWriter`] issues fire-and-forget
//!   writes and reports failures on the [`ErrorEmitter`] instead of the caller
//!
//! ## Current Implementation
//!
//! - **Primary Storage**: SQLite through SQLx, documents kept as JSON text

pub mod error_emitter;
pub mod non_blocking;
pub mod sqlite;
pub mod traits;
pub mod user_scope;

pub use error_emitter::{spawn_global_listener, ErrorEmitter, PermissionErrorEvent, StoreOperation};
pub use non_blocking::{NonBlockingWriter, PendingWrite};
pub use sqlite::{DbConnection, SqliteDocumentStore};
pub use traits::{
    collections, to_document_data, CollectionRef, Document, DocumentData, DocumentRef, DocumentStore,
    StoreError, WriteBatch, WriteOperation,
};
pub use user_scope::UserScope;
