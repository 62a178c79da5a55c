//! Activity Trail
//!
//! Append-only audit records, one per mutation, replicated live to board
//! rooms as `activity:created` events.

pub mod db;

pub use db::{Activity, ActivityKind, ActivityStore};
