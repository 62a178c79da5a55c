//! Task HTTP Handlers

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
use crate::sync::coordinator::CreateTask;
use crate::sync::{Caller, Coordinator};
use crate::tasks::db::{Task, TaskPatch};

fn caller_from(headers: &HeaderMap, query: &HashMap<String, String>) -> Caller {
    Caller {
        identity: optional_identity(headers),
        share_token: share_token_from(headers, query),
    }
}

/// GET /api/boards/{board_id}/tasks
pub async fn get_tasks(
    State(coordinator): State<Coordinator>,
    headers: HeaderMap,
    Path(board_id): Path<Uuid>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let caller = caller_from(&headers, &query);
    Ok(Json(coordinator.tasks_for_board(&caller, board_id).await?))
}

/// POST /api/tasks
pub async fn create_task(
    State(coordinator): State<Coordinator>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
    Json(request): Json<CreateTask>,
) -> Result<Json<Task>, ApiError> {
    let caller = caller_from(&headers, &query);
    Ok(Json(coordinator.create_task(&caller, request).await?))
}

/// PUT /api/tasks/{task_id}
pub async fn update_task(
    State(coordinator): State<Coordinator>,
    headers: HeaderMap,
    Path(task_id): Path<Uuid>,
    Query(query): Query<HashMap<String, String>>,
    Json(patch): Json<TaskPatch>,
) -> Result<Json<Task>, ApiError> {
    let caller = caller_from(&headers, &query);
    Ok(Json(coordinator.update_task(&caller, task_id, patch).await?))
}

/// DELETE /api/tasks/{task_id}
pub async fn delete_task(
    State(coordinator): State<Coordinator>,
    headers: HeaderMap,
    Path(task_id): Path<Uuid>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let caller = caller_from(&headers, &query);
    let deleted = coordinator.delete_task(&caller, task_id).await?;
    Ok(Json(serde_json::json!({ "id": deleted })))
}

#[derive(Debug, Deserialize)]
pub struct MoveTaskRequest {
    pub list: Uuid,
}

/// POST /api/tasks/{task_id}/move
pub async fn move_task(
    State(coordinator): State<Coordinator>,
    headers: HeaderMap,
    Path(task_id): Path<Uuid>,
    Query(query): Query<HashMap<String, String>>,
    Json(request): Json<MoveTaskRequest>,
) -> Result<Json<Task>, ApiError> {
    let caller = caller_from(&headers, &query);
    Ok(Json(coordinator.move_task(&caller, task_id, request.list).await?))
}
