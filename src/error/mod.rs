//! Error Types
//!
//! Error taxonomy for the taskboard server and its conversion into HTTP
//! responses.
//!
//! # Module Structure
//!
//! - **`types`** - The `ApiError` enum and status-code mapping
//! - **`conversion`** - `IntoResponse` implementation for Axum handlers

pub mod types;
pub mod conversion;

pub use types::ApiError;
