//! List HTTP Handlers

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::{optional_identity, share_token_from};
use crate::error::ApiError;
use crate::lists::db::List;
use crate::sync::{Caller, Coordinator};

fn caller_from(headers: &HeaderMap, query: &HashMap<String, String>) -> Caller {
    Caller {
        identity: optional_identity(headers),
        share_token: share_token_from(headers, query),
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateListRequest {
    pub title: String,
    pub position: Option<i64>,
}

/// POST /api/boards/{board_id}/lists
pub async fn create_list(
    State(coordinator): State<Coordinator>,
    headers: HeaderMap,
    Path(board_id): Path<Uuid>,
    Query(query): Query<HashMap<String, String>>,
    Json(request): Json<CreateListRequest>,
) -> Result<Json<List>, ApiError> {
    let caller = caller_from(&headers, &query);
    let list = coordinator
        .create_list(&caller, board_id, &request.title, request.position)
        .await?;
    Ok(Json(list))
}

/// GET /api/boards/{board_id}/lists
pub async fn get_lists(
    State(coordinator): State<Coordinator>,
    headers: HeaderMap,
    Path(board_id): Path<Uuid>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<Vec<List>>, ApiError> {
    let caller = caller_from(&headers, &query);
    Ok(Json(coordinator.lists_for_board(&caller, board_id).await?))
}

/// DELETE /api/boards/{board_id}/lists/{list_id}
pub async fn delete_list(
    State(coordinator): State<Coordinator>,
    headers: HeaderMap,
    Path((board_id, list_id)): Path<(Uuid, Uuid)>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let caller = caller_from(&headers, &query);
    let deleted = coordinator.delete_list(&caller, board_id, list_id).await?;
    Ok(Json(serde_json::json!({ "id": deleted })))
}
