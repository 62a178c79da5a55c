//! Tasks
//!
//! Units of work inside a list.

pub mod db;
pub mod handlers;

pub use db::{Task, TaskPatch, TaskStatus, TaskStore};
