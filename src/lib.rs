//! Taskboard - Main Library
//!
//! Taskboard is a collaborative task-board backend built with Rust, featuring
//! boards with ordered lists and tasks, share-token access for visitors, an
//! append-only activity trail, and realtime fan-out of board mutations over
//! Server-Sent Events.
//!
//! # Module Structure
//!
//! - **`access`** - The access gate: action levels and the authorize check
//! - **`activity`** - Append-only activity records and their store
//! - **`auth`** - User accounts, session tokens, and identity extraction
//! - **`boards`** - Board records, membership, and share tokens
//! - **`lists`** - Ordered lists within a board
//! - **`tasks`** - Tasks, partial updates, and cross-list moves
//! - **`sync`** - The mutation coordinator and the ordered update queue
//! - **`realtime`** - Room registry, board events, and SSE subscriptions
//! - **`routes`** - Route configuration and middleware
//! - **`server`** - Configuration, state, and app initialization
//! - **`error`** - The API error type and its HTTP mapping
//!
//! # Usage
//!
//! ```rust,no_run
//! use taskboard::server::{create_app, ServerConfig};
//!
//! # async fn example() -> Result<(), sqlx::Error> {
//! let config = ServerConfig::from_env();
//! let app = create_app(&config).await?;
//! // Use app with axum::serve
//! # Ok(())
//! # }
//! ```

pub mod access;
pub mod activity;
pub mod auth;
pub mod boards;
pub mod error;
pub mod lists;
pub mod realtime;
pub mod routes;
pub mod server;
pub mod sync;
pub mod tasks;
