/**
 * Room Registry and Broadcaster
 *
 * Tracks which live connections are interested in which board ("room" =
 * board id) and fans events out to the current members of a room.
 *
 * # Membership Model
 *
 * Membership is a pure connection-id <-> board-id relation held only here,
 * never embedded in the `Board` record or the connection handler. A
 * connection may belong to zero or more rooms; joining twice is idempotent
 * and leaving a room it never joined is a no-op.
 *
 * # Delivery
 *
 * Each connection owns an unbounded mpsc receiver drained by its SSE stream.
 * `publish` snapshots the room membership under the lock and then sends to
 * each member without awaiting: one dead connection cannot block delivery to
 * the others. Events published in order are delivered to every member in the
 * same order (FIFO per room); nothing is guaranteed across boards.
 */
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use uuid::Uuid;

use crate::realtime::event::BoardEvent;

/// Identifier of one live client connection.
pub type ConnectionId = Uuid;

#[derive(Default)]
struct Registry {
    /// Outbound channel for each live connection.
    connections: HashMap<ConnectionId, mpsc::UnboundedSender<BoardEvent>>,
    /// board id -> member connection ids.
    rooms: HashMap<Uuid, HashSet<ConnectionId>>,
    /// connection id -> rooms it belongs to.
    memberships: HashMap<ConnectionId, HashSet<Uuid>>,
}

/// Shared registry of rooms and live connections.
///
/// Cloning is cheap; all clones share the same membership table.
#[derive(Clone, Default)]
pub struct RoomRegistry {
    inner: Arc<Mutex<Registry>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new connection and hand back its event receiver.
    ///
    /// The connection belongs to no rooms until it joins one.
    pub fn connect(&self) -> (ConnectionId, mpsc::UnboundedReceiver<BoardEvent>) {
        let id = Uuid::new_v4();
        let (tx, rx) = mpsc::unbounded_channel();
        let mut inner = self.inner.lock().unwrap();
        inner.connections.insert(id, tx);
        inner.memberships.insert(id, HashSet::new());
        tracing::debug!("connection {} registered", id);
        (id, rx)
    }

    /// Join a board's room. Idempotent; unknown connections are ignored.
    pub fn join(&self, connection_id: ConnectionId, board_id: Uuid) {
        let mut inner = self.inner.lock().unwrap();
        if !inner.connections.contains_key(&connection_id) {
            tracing::warn!("join for unknown connection {}", connection_id);
            return;
        }
        inner.rooms.entry(board_id).or_default().insert(connection_id);
        inner
            .memberships
            .entry(connection_id)
            .or_default()
            .insert(board_id);
        tracing::debug!("connection {} joined board {}", connection_id, board_id);
    }

    /// Leave a board's room. No-op if the connection is not a member.
    pub fn leave(&self, connection_id: ConnectionId, board_id: Uuid) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(members) = inner.rooms.get_mut(&board_id) {
            members.remove(&connection_id);
            if members.is_empty() {
                inner.rooms.remove(&board_id);
            }
        }
        if let Some(rooms) = inner.memberships.get_mut(&connection_id) {
            rooms.remove(&board_id);
        }
    }

    /// Drop a connection, implicitly leaving every room it belonged to.
    pub fn disconnect(&self, connection_id: ConnectionId) {
        let mut inner = self.inner.lock().unwrap();
        inner.connections.remove(&connection_id);
        if let Some(rooms) = inner.memberships.remove(&connection_id) {
            for board_id in rooms {
                if let Some(members) = inner.rooms.get_mut(&board_id) {
                    members.remove(&connection_id);
                    if members.is_empty() {
                        inner.rooms.remove(&board_id);
                    }
                }
            }
        }
        tracing::debug!("connection {} disconnected", connection_id);
    }

    /// Deliver an event to every connection currently in the board's room.
    ///
    /// Fire-and-forget: a send failure (receiver dropped mid-flight) is
    /// ignored and does not affect the remaining members. Returns the number
    /// of connections the event was handed to.
    pub fn publish(&self, board_id: Uuid, event: BoardEvent) -> usize {
        // Snapshot senders under the lock so a publish never observes a
        // half-updated membership set, then send outside of it.
        let targets: Vec<mpsc::UnboundedSender<BoardEvent>> = {
            let inner = self.inner.lock().unwrap();
            match inner.rooms.get(&board_id) {
                Some(members) => members
                    .iter()
                    .filter_map(|id| inner.connections.get(id).cloned())
                    .collect(),
                None => Vec::new(),
            }
        };

        let mut delivered = 0;
        for tx in targets {
            if tx.send(event.clone()).is_ok() {
                delivered += 1;
            }
        }
        if delivered > 0 {
            tracing::debug!(
                "event {} delivered to {} connections in board {}",
                event.kind.as_str(),
                delivered,
                board_id
            );
        }
        delivered
    }

    /// Number of connections currently in a board's room.
    pub fn room_size(&self, board_id: Uuid) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.rooms.get(&board_id).map_or(0, |m| m.len())
    }

    /// Whether a connection is currently registered.
    pub fn is_connected(&self, connection_id: ConnectionId) -> bool {
        self.inner.lock().unwrap().connections.contains_key(&connection_id)
    }
}
