//! Realtime Layer
//!
//! Live replication of board mutations to connected clients over
//! Server-Sent Events.
//!
//! # Module Structure
//!
//! - **`event`** - Wire-level event kinds and payloads
//! - **`rooms`** - Room registry and broadcaster (connection <-> board)
//! - **`subscription`** - SSE stream and room-control endpoints

pub mod event;
pub mod rooms;
pub mod subscription;

pub use event::{BoardEvent, EventKind};
pub use rooms::{ConnectionId, RoomRegistry};
