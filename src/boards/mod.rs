//! Boards
//!
//! The top-level collaboration container: ownership, collaborators, share
//! tokens and the cascade that removes a board's whole subtree.

pub mod db;
pub mod handlers;

pub use db::{Board, BoardStore};
