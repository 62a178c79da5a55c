/**
 * Realtime Subscription Handlers
 *
 * Server-Sent Events endpoint plus the room-control endpoints.
 *
 * # Protocol
 *
 * - `GET /api/realtime[?boards=a,b]` opens the stream. The first event is
 *   `connection:ready` carrying the connection id; the optional `boards`
 *   parameter joins those rooms immediately.
 * - `POST /api/realtime/{connection_id}/boards/{board_id}` joins a room
 *   (idempotent).
 * - `DELETE /api/realtime/{connection_id}/boards/{board_id}` leaves a room
 *   (no-op for non-members).
 *
 * Dropping the stream leaves every room the connection belonged to.
 */
use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
};
use futures_util::stream::{self, Stream, StreamExt};
use tokio_stream::wrappers::UnboundedReceiverStream;
use uuid::Uuid;

use crate::realtime::rooms::{ConnectionId, RoomRegistry};

/// Leaves all rooms when the SSE stream is dropped.
struct ConnectionGuard {
    registry: RoomRegistry,
    id: ConnectionId,
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.registry.disconnect(self.id);
    }
}

/// GET /api/realtime - open an event stream.
pub async fn subscribe(
    State(registry): State<RoomRegistry>,
    Query(params): Query<HashMap<String, String>>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let (connection_id, events) = registry.connect();

    if let Some(boards) = params.get("boards") {
        for board_id in boards.split(',').filter_map(|s| Uuid::parse_str(s.trim()).ok()) {
            registry.join(connection_id, board_id);
        }
    }

    tracing::info!("realtime connection {} opened", connection_id);

    let ready = stream::once(async move {
        Ok(Event::default()
            .event("connection:ready")
            .data(serde_json::json!({ "connection_id": connection_id }).to_string()))
    });

    let guard = ConnectionGuard {
        registry,
        id: connection_id,
    };
    // The guard rides inside the closure so dropping the stream disconnects.
    let updates = UnboundedReceiverStream::new(events).map(move |event| {
        let _keep_alive = &guard;
        Ok(Event::default()
            .event(event.kind.as_str())
            .data(event.data.to_string()))
    });

    Sse::new(ready.chain(updates)).keep_alive(KeepAlive::default())
}

/// POST /api/realtime/{connection_id}/boards/{board_id} - join a room.
pub async fn join_board(
    State(registry): State<RoomRegistry>,
    Path((connection_id, board_id)): Path<(Uuid, Uuid)>,
) -> StatusCode {
    if !registry.is_connected(connection_id) {
        return StatusCode::NOT_FOUND;
    }
    registry.join(connection_id, board_id);
    StatusCode::NO_CONTENT
}

/// DELETE /api/realtime/{connection_id}/boards/{board_id} - leave a room.
pub async fn leave_board(
    State(registry): State<RoomRegistry>,
    Path((connection_id, board_id)): Path<(Uuid, Uuid)>,
) -> StatusCode {
    registry.leave(connection_id, board_id);
    StatusCode::NO_CONTENT
}
