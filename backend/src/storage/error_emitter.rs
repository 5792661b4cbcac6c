//! Broadcast channel for store failures that happen after the caller has
//! already returned.

use serde::Serialize;
use serde_json::Value;
use std::fmt;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{error, warn};

use super::traits::collections;

const CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreOperation {
    Get,
    List,
    Create,
    Update,
    Delete,
    Write,
}

impl fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StoreOperation::Get => "get",
            StoreOperation::List => "list",
            StoreOperation::Create => "create",
            StoreOperation::Update => "update",
            StoreOperation::Delete => "delete",
            StoreOperation::Write => "write",
        };
        f.write_str(name)
    }
}

/// A rejected or failed store operation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionErrorEvent {
    pub path: String,
    pub operation: StoreOperation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_resource_data: Option<Value>,
    pub message: String,
}

impl PermissionErrorEvent {
    pub fn new(path: impl Into<String>, operation: StoreOperation, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            operation,
            request_resource_data: None,
            message: message.into(),
        }
    }

    pub fn with_resource_data(mut self, data: Value) -> Self {
        self.request_resource_data = Some(data);
        self
    }

    /// Whether the failed path lies inside `users/{uid}`
    pub fn belongs_to(&self, uid: &str) -> bool {
        let root = format!("{}/{}", collections::USERS, uid);
        self.path == root || self.path.starts_with(&format!("{}/", root))
    }
}

#[derive(Clone)]
pub struct ErrorEmitter {
    sender: broadcast::Sender<PermissionErrorEvent>,
}

impl Default for ErrorEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorEmitter {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Publish an event; having no subscribers is fine
    pub fn emit(&self, event: PermissionErrorEvent) {
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PermissionErrorEvent> {
        self.sender.subscribe()
    }
}

/// Log every emitted event until the emitter is dropped
pub fn spawn_global_listener(emitter: &ErrorEmitter) -> JoinHandle<()> {
    let mut receiver = emitter.subscribe();
    tokio::spawn(async move {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    error!(
                        "Store {} on {} failed: {}",
                        event.operation, event.path, event.message
                    );
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("Permission error listener skipped {} events", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}
