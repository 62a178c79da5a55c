/**
 * Board Event Types
 *
 * This module defines the events delivered over a board's room. Event names
 * are the wire-level SSE event names the browser client subscribes to.
 */
use serde::{Deserialize, Serialize};

/// Kind of board event, as seen on the wire.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum EventKind {
    /// A list was created on the board.
    ListCreated,
    /// A list (and its tasks) was deleted.
    ListDeleted,
    /// A task was created.
    TaskCreated,
    /// A task was updated or moved.
    TaskUpdated,
    /// A task was deleted.
    TaskDeleted,
    /// An activity entry was appended.
    ActivityCreated,
    /// The board itself was deleted.
    BoardDeleted,
}

impl EventKind {
    /// Wire name used as the SSE event name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ListCreated => "list:created",
            Self::ListDeleted => "list:deleted",
            Self::TaskCreated => "task:created",
            Self::TaskUpdated => "task:updated",
            Self::TaskDeleted => "task:deleted",
            Self::ActivityCreated => "activity:created",
            Self::BoardDeleted => "board:deleted",
        }
    }
}

/// One event delivered to every connection in a board's room.
///
/// The payload is the canonical post-mutation record, or for deletions the
/// deleted entity's identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BoardEvent {
    /// Event kind; serialized as the SSE event name.
    pub kind: EventKind,
    /// JSON payload for the event.
    pub data: serde_json::Value,
}

impl BoardEvent {
    /// Create a new board event.
    pub fn new(kind: EventKind, data: serde_json::Value) -> Self {
        Self { kind, data }
    }
}
