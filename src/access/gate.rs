/**
 * Access Gate
 *
 * Pure decision function answering one question: may this caller perform
 * this action on this board? Callers enforce the decision; the gate itself
 * has no side effects.
 *
 * # Decision Table
 *
 * - `Read` / `Edit`: owner, collaborator, or a valid share token.
 * - `Assign`: owner or collaborator identity. A share token is not enough to
 *   re-assign people's tasks.
 * - `Manage` (board deletion, share-token rotation): owner identity only.
 *
 * A share token is valid when it is non-empty, exactly matches the board's
 * stored token, and the board's token expiry is unset or strictly in the
 * future at evaluation time. A mismatched or expired token is a plain denial,
 * never a partial grant.
 */
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::boards::db::Board;
use crate::error::ApiError;

/// What the caller is trying to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// View the board and its children.
    Read,
    /// Create, update, delete or move lists and tasks.
    Edit,
    /// Change a task's assignee.
    Assign,
    /// Destructive board operations: delete, rotate the share token.
    Manage,
}

/// Share-token validity window on issuance.
pub const SHARE_TOKEN_TTL_DAYS: i64 = 7;

/// Decide whether the caller may perform `action` on `board`.
///
/// `actor` is the resolved authenticated identity, if any; `share_token` is
/// the token supplied with the request, if any. `now` is injected so expiry
/// is checked at a single evaluation instant.
pub fn authorize(
    board: &Board,
    actor: Option<Uuid>,
    share_token: Option<&str>,
    action: Action,
    now: DateTime<Utc>,
) -> Result<(), ApiError> {
    match action {
        Action::Read | Action::Edit => {
            let member = actor.is_some_and(|id| board.is_member(id));
            if member || share_token_valid(board, share_token, now) {
                Ok(())
            } else {
                Err(ApiError::Forbidden)
            }
        }
        Action::Assign => {
            if actor.is_some_and(|id| board.is_member(id)) {
                Ok(())
            } else {
                Err(ApiError::Forbidden)
            }
        }
        Action::Manage => {
            if actor.is_some_and(|id| board.is_owner(id)) {
                Ok(())
            } else {
                Err(ApiError::Forbidden)
            }
        }
    }
}

/// Whether the supplied token currently grants access to the board.
pub fn share_token_valid(board: &Board, supplied: Option<&str>, now: DateTime<Utc>) -> bool {
    let supplied = match supplied {
        Some(t) if !t.is_empty() => t,
        _ => return false,
    };
    let stored = match &board.share_token {
        Some(t) => t.as_str(),
        None => return false,
    };
    if supplied != stored {
        return false;
    }
    match board.share_expires {
        Some(expires) => expires > now,
        None => true,
    }
}
