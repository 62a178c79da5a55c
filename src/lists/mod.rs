//! Lists
//!
//! Ordered columns within a board.

pub mod db;
pub mod handlers;

pub use db::{List, ListStore};
