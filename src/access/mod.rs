//! Access Gate
//!
//! Per-request authorization decisions for board access: authenticated
//! membership or a time-limited share token.

pub mod gate;

pub use gate::{authorize, share_token_valid, Action, SHARE_TOKEN_TTL_DAYS};
