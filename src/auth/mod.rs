//! Authentication
//!
//! User accounts, bcrypt credential handling, JWT session tokens and the
//! request-credential extraction helpers used by every gated endpoint.

pub mod extract;
pub mod handlers;
pub mod sessions;
pub mod users;

pub use extract::{optional_identity, require_identity, share_token_from, Identity};
