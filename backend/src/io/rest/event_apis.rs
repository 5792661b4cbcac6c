//! # REST API for Store Failure Events
//!
//! Server-sent events carrying the store failures of the signed-in user's
//! non-blocking writes. The browser shows each one as a notice.

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
    Router,
};
use futures::stream::{self, Stream, StreamExt};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{info, warn};

use crate::io::rest::session::CurrentUser;
use crate::storage::PermissionErrorEvent;
use crate::AppState;
use shared::PermissionErrorNotice;

pub const PERMISSION_ERROR_EVENT: &str = "permission-error";

pub fn router() -> Router<AppState> {
    Router::new().route("/permission-errors", get(permission_errors))
}

pub fn to_notice(event: PermissionErrorEvent) -> PermissionErrorNotice {
    PermissionErrorNotice {
        path: event.path,
        operation: event.operation.to_string(),
        request_resource_data: event.request_resource_data,
        message: event.message,
    }
}

/// Events from `receiver` whose path lies under `users/{uid}`; ends when the
/// emitter is gone
pub fn user_events(
    receiver: broadcast::Receiver<PermissionErrorEvent>,
    uid: String,
) -> impl Stream<Item = PermissionErrorEvent> {
    stream::unfold((receiver, uid), |(mut receiver, uid)| async move {
        loop {
            match receiver.recv().await {
                Ok(event) if event.belongs_to(&uid) => return Some((event, (receiver, uid))),
                Ok(_) => continue,
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Event stream for {} skipped {} events", uid, skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    })
}

pub async fn permission_errors(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    info!("GET /api/events/permission-errors - user: {}", current.uid());

    let events = user_events(state.emitter.subscribe(), current.user.uid).map(|event| {
        Event::default()
            .event(PERMISSION_ERROR_EVENT)
            .json_data(to_notice(event))
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}
