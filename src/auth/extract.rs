/**
 * Request Credential Extraction
 *
 * Helpers that pull the caller's credentials out of an HTTP request:
 *
 * - `require_identity` - the usual Bearer-token path for endpoints that only
 *   make sense for a logged-in user.
 * - `optional_identity` - endpoints that accept either a logged-in user or a
 *   share token. An absent or invalid Authorization header simply yields no
 *   identity here, so the access gate can fall back to the share token.
 * - `share_token_from` - share token from the `x-share-token` header or the
 *   `share`/`shareToken` query parameters.
 */
use std::collections::HashMap;

use axum::http::{header::AUTHORIZATION, HeaderMap};
use uuid::Uuid;

use crate::auth::sessions::verify_token;
use crate::error::ApiError;

/// Identity resolved from a verified session token.
#[derive(Clone, Debug)]
pub struct Identity {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

/// Resolve the caller's identity, failing if there is none.
pub fn require_identity(headers: &HeaderMap) -> Result<Identity, ApiError> {
    let token = bearer_token(headers).ok_or(ApiError::Forbidden)?;
    let claims = verify_token(token).map_err(|e| {
        tracing::warn!("invalid session token: {:?}", e);
        ApiError::Forbidden
    })?;
    let user_id = Uuid::parse_str(&claims.sub).map_err(|_| ApiError::Forbidden)?;
    Ok(Identity {
        user_id,
        email: claims.email,
        name: claims.name,
    })
}

/// Resolve the caller's identity if a valid token is present.
///
/// Anything short of a valid Bearer token yields `None` rather than an
/// error; the caller may still hold a share token.
pub fn optional_identity(headers: &HeaderMap) -> Option<Identity> {
    require_identity(headers).ok()
}

/// Share token supplied with the request, if any.
pub fn share_token_from(headers: &HeaderMap, query: &HashMap<String, String>) -> Option<String> {
    if let Some(token) = headers.get("x-share-token").and_then(|h| h.to_str().ok()) {
        if !token.is_empty() {
            return Some(token.to_string());
        }
    }
    query
        .get("share")
        .or_else(|| query.get("shareToken"))
        .filter(|t| !t.is_empty())
        .cloned()
}
