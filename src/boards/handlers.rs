//! Board HTTP Handlers
//!
//! Thin wrappers over the mutation coordinator: extract credentials, parse
//! the request, delegate, serialize the result.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::activity::db::Activity;
use crate::auth::{optional_identity, require_identity, share_token_from};
use crate::boards::db::Board;
use crate::error::ApiError;
use crate::lists::db::List;
use crate::sync::coordinator::{BoardMembers, ShareGrant};
use crate::sync::{Caller, Coordinator};

fn caller_from(headers: &HeaderMap, query: &HashMap<String, String>) -> Caller {
    Caller {
        identity: optional_identity(headers),
        share_token: share_token_from(headers, query),
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateBoardRequest {
    pub title: String,
}

#[derive(Debug, serde::Serialize)]
pub struct CreateBoardResponse {
    pub board: Board,
    pub lists: Vec<List>,
}

/// POST /api/boards
pub async fn create_board(
    State(coordinator): State<Coordinator>,
    headers: HeaderMap,
    Json(request): Json<CreateBoardRequest>,
) -> Result<Json<CreateBoardResponse>, ApiError> {
    let caller = Caller {
        identity: Some(require_identity(&headers)?),
        share_token: None,
    };
    let (board, lists) = coordinator.create_board(&caller, &request.title).await?;
    Ok(Json(CreateBoardResponse { board, lists }))
}

/// GET /api/boards
pub async fn get_boards(
    State(coordinator): State<Coordinator>,
    headers: HeaderMap,
) -> Result<Json<Vec<Board>>, ApiError> {
    let caller = Caller {
        identity: Some(require_identity(&headers)?),
        share_token: None,
    };
    Ok(Json(coordinator.boards_for(&caller).await?))
}

/// DELETE /api/boards/{board_id}
pub async fn delete_board(
    State(coordinator): State<Coordinator>,
    headers: HeaderMap,
    Path(board_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let caller = Caller {
        identity: Some(require_identity(&headers)?),
        share_token: None,
    };
    coordinator.delete_board(&caller, board_id).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

/// POST /api/boards/{board_id}/share
pub async fn create_share_token(
    State(coordinator): State<Coordinator>,
    headers: HeaderMap,
    Path(board_id): Path<Uuid>,
) -> Result<Json<ShareGrant>, ApiError> {
    let caller = Caller {
        identity: Some(require_identity(&headers)?),
        share_token: None,
    };
    Ok(Json(coordinator.rotate_share_token(&caller, board_id).await?))
}

#[derive(Debug, Default, Deserialize)]
pub struct SaveSharedRequest {
    pub share: Option<String>,
}

/// POST /api/boards/{board_id}/save
pub async fn save_shared_board(
    State(coordinator): State<Coordinator>,
    headers: HeaderMap,
    Path(board_id): Path<Uuid>,
    Query(query): Query<HashMap<String, String>>,
    request: Option<Json<SaveSharedRequest>>,
) -> Result<Json<Board>, ApiError> {
    let identity = require_identity(&headers)?;
    // Token may arrive in the body or the query string.
    let share_token = request
        .and_then(|Json(r)| r.share)
        .or_else(|| share_token_from(&headers, &query));
    let caller = Caller {
        identity: Some(identity),
        share_token,
    };
    Ok(Json(coordinator.save_shared_board(&caller, board_id).await?))
}

/// GET /api/boards/{board_id}/users
pub async fn get_board_users(
    State(coordinator): State<Coordinator>,
    headers: HeaderMap,
    Path(board_id): Path<Uuid>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<BoardMembers>, ApiError> {
    let caller = caller_from(&headers, &query);
    Ok(Json(coordinator.board_members(&caller, board_id).await?))
}

/// GET /api/boards/{board_id}/activities
pub async fn get_activities(
    State(coordinator): State<Coordinator>,
    headers: HeaderMap,
    Path(board_id): Path<Uuid>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<Vec<Activity>>, ApiError> {
    let caller = caller_from(&headers, &query);
    Ok(Json(coordinator.recent_activity(&caller, board_id).await?))
}
