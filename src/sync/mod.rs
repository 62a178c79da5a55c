//! Mutation Pipeline
//!
//! The mutation coordinator and the ordered update queue that feeds the
//! audit trail and the room broadcaster.
//!
//! # Pipeline
//!
//! ```text
//! handler -> Coordinator (validate, gate, apply) -> mpsc queue
//!                                                      |
//!                               fan-out task: record activity,
//!                               publish mutation event,
//!                               publish activity:created
//! ```
//!
//! The HTTP response returns as soon as the coordinator has applied the
//! change; the queue is drained by a single task, preserving FIFO order per
//! board room.

pub mod coordinator;
pub mod fanout;
pub mod update;

pub use coordinator::{Caller, Coordinator};
pub use update::BoardUpdate;
