/**
 * Mutation Coordinator
 *
 * Applies every create/update/delete/move to the record store. Each
 * operation follows the same shape: validate required fields, consult the
 * access gate, apply the change, hand a `BoardUpdate` to the fan-out queue,
 * return the canonical record.
 *
 * # Construction
 *
 * The coordinator holds explicit handles to each record collection, injected
 * at construction. Nothing here resolves a sibling collection ad hoc.
 *
 * # Serialization
 *
 * Mutations to one board are serialized on a per-board async lock. This
 * keeps a board-deletion cascade from interleaving with a concurrent
 * mutation to that board's children, and it makes the enqueue order of
 * updates equal to the order mutations were applied. Boards do not contend
 * with each other.
 *
 * # Denials
 *
 * An unauthenticated caller asking about a missing board gets the same
 * `Forbidden` as one without access, so share links cannot be used to probe
 * which board ids exist. Authenticated callers get an honest `NotFound`.
 */
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use serde_json::json;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::access::{authorize, share_token_valid, Action, SHARE_TOKEN_TTL_DAYS};
use crate::activity::db::{Activity, ActivityKind, ActivityStore};
use crate::auth::Identity;
use crate::boards::db::{Board, BoardStore};
use crate::error::ApiError;
use crate::lists::db::{List, ListStore};
use crate::realtime::event::EventKind;
use crate::sync::update::BoardUpdate;
use crate::tasks::db::{NewTask, Task, TaskPatch, TaskStatus, TaskStore};
use crate::auth::users::UserStore;

/// Credentials accompanying one request.
#[derive(Debug, Clone, Default)]
pub struct Caller {
    /// Resolved authenticated identity, if any.
    pub identity: Option<Identity>,
    /// Share token supplied with the request, if any.
    pub share_token: Option<String>,
}

impl Caller {
    pub fn actor(&self) -> Option<Uuid> {
        self.identity.as_ref().map(|i| i.user_id)
    }

    fn token(&self) -> Option<&str> {
        self.share_token.as_deref()
    }

    fn authenticated(&self) -> bool {
        self.identity.is_some()
    }
}

/// Result of a share-token rotation.
#[derive(Debug, Serialize)]
pub struct ShareGrant {
    pub share_path: String,
    pub token: String,
    pub expires: DateTime<Utc>,
}

/// Owner and collaborators of a board, with display info.
#[derive(Debug, Serialize)]
pub struct BoardMembers {
    pub owner_id: Uuid,
    pub users: Vec<MemberInfo>,
}

#[derive(Debug, Serialize)]
pub struct MemberInfo {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: &'static str,
}

/// Fields accepted when creating a task.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct CreateTask {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub board: Uuid,
    pub list: Uuid,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub position: i64,
    pub due_date: Option<DateTime<Utc>>,
}

/// Titles of the lists every new board starts with.
const DEFAULT_LISTS: [&str; 3] = ["To Do", "In Progress", "Done"];

/// The mutation coordinator. Cheap to clone; clones share the lock table
/// and the update queue.
#[derive(Clone)]
pub struct Coordinator {
    boards: BoardStore,
    lists: ListStore,
    tasks: TaskStore,
    users: UserStore,
    activities: ActivityStore,
    updates: mpsc::UnboundedSender<BoardUpdate>,
    locks: Arc<Mutex<HashMap<Uuid, Arc<tokio::sync::Mutex<()>>>>>,
}

impl Coordinator {
    pub fn new(
        boards: BoardStore,
        lists: ListStore,
        tasks: TaskStore,
        users: UserStore,
        activities: ActivityStore,
        updates: mpsc::UnboundedSender<BoardUpdate>,
    ) -> Self {
        Self {
            boards,
            lists,
            tasks,
            users,
            activities,
            updates,
            locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Per-board mutation lock.
    fn board_lock(&self, board_id: Uuid) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock().unwrap();
        locks
            .entry(board_id)
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }

    /// Hand one update to the fan-out queue. Never blocks and never fails
    /// the mutation; a closed queue only loses the advisory side channel.
    fn enqueue(&self, update: BoardUpdate) {
        if self.updates.send(update).is_err() {
            tracing::warn!("update queue closed; audit/broadcast skipped");
        }
    }

    /// Load a board, denying in a way appropriate to the caller.
    async fn board_or_deny(&self, board_id: Uuid, caller: &Caller) -> Result<Board, ApiError> {
        match self.boards.get(board_id).await? {
            Some(board) => Ok(board),
            None if caller.authenticated() => Err(ApiError::NotFound("board")),
            None => Err(ApiError::Forbidden),
        }
    }

    // ── Boards ──────────────────────────────────────────────────────────

    /// Create a board together with its three default lists.
    pub async fn create_board(
        &self,
        caller: &Caller,
        title: &str,
    ) -> Result<(Board, Vec<List>), ApiError> {
        let identity = caller.identity.as_ref().ok_or(ApiError::Forbidden)?;
        let title = title.trim();
        if title.is_empty() {
            return Err(ApiError::invalid("title is required"));
        }

        let board = self.boards.create(title, identity.user_id).await?;

        let mut lists = Vec::with_capacity(DEFAULT_LISTS.len());
        for (position, list_title) in DEFAULT_LISTS.iter().enumerate() {
            lists.push(
                self.lists
                    .create(list_title, board.id, position as i64)
                    .await?,
            );
        }

        tracing::info!("board {} created by {}", board.id, identity.user_id);
        Ok((board, lists))
    }

    /// Boards the caller owns or collaborates on, newest first.
    pub async fn boards_for(&self, caller: &Caller) -> Result<Vec<Board>, ApiError> {
        let identity = caller.identity.as_ref().ok_or(ApiError::Forbidden)?;
        Ok(self.boards.for_user(identity.user_id).await?)
    }

    /// Delete a board, cascading to its tasks, lists and activity trail.
    ///
    /// Cascade order is tasks, then lists, then activities, then the board,
    /// so no reader ever observes an orphaned child of a listed parent.
    pub async fn delete_board(&self, caller: &Caller, board_id: Uuid) -> Result<(), ApiError> {
        let lock = self.board_lock(board_id);
        let _guard = lock.lock().await;

        let board = self.board_or_deny(board_id, caller).await?;
        authorize(&board, caller.actor(), caller.token(), Action::Manage, Utc::now())?;

        self.tasks.delete_for_board(board_id).await?;
        self.lists.delete_for_board(board_id).await?;
        self.activities.delete_for_board(board_id).await?;
        self.boards.delete(board_id).await?;
        tracing::info!("board {} deleted", board_id);

        self.enqueue(BoardUpdate {
            board: board_id,
            list: None,
            task: None,
            actor: caller.actor(),
            kind: ActivityKind::BoardDeleted,
            detail: json!({ "title": board.title }),
            event: EventKind::BoardDeleted,
            payload: json!({ "id": board_id }),
            // The board's audit trail was just removed with it.
            persist: false,
        });
        Ok(())
    }

    /// Issue a fresh share token, invalidating the previous one.
    pub async fn rotate_share_token(
        &self,
        caller: &Caller,
        board_id: Uuid,
    ) -> Result<ShareGrant, ApiError> {
        let board = self.board_or_deny(board_id, caller).await?;
        authorize(&board, caller.actor(), caller.token(), Action::Manage, Utc::now())?;

        // 32 hex chars, unguessable and URL-safe.
        let token = Uuid::new_v4().simple().to_string();
        let expires = Utc::now() + Duration::days(SHARE_TOKEN_TTL_DAYS);
        self.boards.set_share_token(board_id, &token, expires).await?;
        tracing::info!("share token rotated for board {}", board_id);

        Ok(ShareGrant {
            share_path: format!("/board/{}?share={}", board_id, token),
            token,
            expires,
        })
    }

    /// Add the caller as a collaborator on a board they hold a valid share
    /// token for.
    pub async fn save_shared_board(
        &self,
        caller: &Caller,
        board_id: Uuid,
    ) -> Result<Board, ApiError> {
        let identity = caller.identity.as_ref().ok_or(ApiError::Forbidden)?;
        let board = self.board_or_deny(board_id, caller).await?;

        if !share_token_valid(&board, caller.token(), Utc::now()) {
            return Err(ApiError::Forbidden);
        }
        if board.is_owner(identity.user_id) {
            return Err(ApiError::conflict("you already own this board"));
        }
        if board.collaborators.contains(&identity.user_id) {
            return Err(ApiError::conflict("board already saved"));
        }

        self.boards.add_collaborator(board_id, identity.user_id).await?;
        self.board_or_deny(board_id, caller).await
    }

    /// Owner and collaborators of a board.
    pub async fn board_members(
        &self,
        caller: &Caller,
        board_id: Uuid,
    ) -> Result<BoardMembers, ApiError> {
        let board = self.board_or_deny(board_id, caller).await?;
        authorize(&board, caller.actor(), caller.token(), Action::Read, Utc::now())?;

        let mut users = Vec::with_capacity(1 + board.collaborators.len());
        if let Some(owner) = self.users.get(board.owner).await? {
            users.push(MemberInfo {
                id: owner.id,
                name: owner.name,
                email: owner.email,
                role: "owner",
            });
        }
        for collaborator in &board.collaborators {
            if let Some(user) = self.users.get(*collaborator).await? {
                users.push(MemberInfo {
                    id: user.id,
                    name: user.name,
                    email: user.email,
                    role: "collaborator",
                });
            }
        }
        Ok(BoardMembers {
            owner_id: board.owner,
            users,
        })
    }

    /// Recent audit entries for a board, newest first.
    pub async fn recent_activity(
        &self,
        caller: &Caller,
        board_id: Uuid,
    ) -> Result<Vec<Activity>, ApiError> {
        let board = self.board_or_deny(board_id, caller).await?;
        authorize(&board, caller.actor(), caller.token(), Action::Read, Utc::now())?;
        Ok(self.activities.recent(board_id, 100).await?)
    }

    // ── Lists ───────────────────────────────────────────────────────────

    /// Lists of a board in display order.
    pub async fn lists_for_board(
        &self,
        caller: &Caller,
        board_id: Uuid,
    ) -> Result<Vec<List>, ApiError> {
        let board = self.board_or_deny(board_id, caller).await?;
        authorize(&board, caller.actor(), caller.token(), Action::Read, Utc::now())?;
        Ok(self.lists.for_board(board_id).await?)
    }

    /// Create a list on a board.
    pub async fn create_list(
        &self,
        caller: &Caller,
        board_id: Uuid,
        title: &str,
        position: Option<i64>,
    ) -> Result<List, ApiError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ApiError::invalid("title is required"));
        }

        let lock = self.board_lock(board_id);
        let _guard = lock.lock().await;

        let board = self.board_or_deny(board_id, caller).await?;
        authorize(&board, caller.actor(), caller.token(), Action::Edit, Utc::now())?;

        let list = self.lists.create(title, board_id, position.unwrap_or(0)).await?;

        self.enqueue(BoardUpdate {
            board: board_id,
            list: Some(list.id),
            task: None,
            actor: caller.actor(),
            kind: ActivityKind::ListCreated,
            detail: json!({ "title": list.title }),
            event: EventKind::ListCreated,
            payload: serde_json::to_value(&list).unwrap_or_default(),
            persist: true,
        });
        Ok(list)
    }

    /// Delete a list and the tasks it contains.
    pub async fn delete_list(
        &self,
        caller: &Caller,
        board_id: Uuid,
        list_id: Uuid,
    ) -> Result<Uuid, ApiError> {
        let lock = self.board_lock(board_id);
        let _guard = lock.lock().await;

        let board = self.board_or_deny(board_id, caller).await?;
        authorize(&board, caller.actor(), caller.token(), Action::Edit, Utc::now())?;

        let list = match self.lists.get(list_id).await? {
            Some(list) if list.board == board_id => list,
            _ => return Err(ApiError::NotFound("list")),
        };

        self.tasks.delete_for_list(list_id).await?;
        self.lists.delete(list_id).await?;

        self.enqueue(BoardUpdate {
            board: board_id,
            list: Some(list_id),
            task: None,
            actor: caller.actor(),
            kind: ActivityKind::ListDeleted,
            detail: json!({ "id": list_id, "title": list.title }),
            event: EventKind::ListDeleted,
            payload: json!({ "id": list_id }),
            persist: true,
        });
        Ok(list_id)
    }

    // ── Tasks ───────────────────────────────────────────────────────────

    /// Tasks of a board in display order.
    pub async fn tasks_for_board(
        &self,
        caller: &Caller,
        board_id: Uuid,
    ) -> Result<Vec<Task>, ApiError> {
        let board = self.board_or_deny(board_id, caller).await?;
        authorize(&board, caller.actor(), caller.token(), Action::Read, Utc::now())?;
        Ok(self.tasks.for_board(board_id).await?)
    }

    /// Create a task in a list.
    pub async fn create_task(&self, caller: &Caller, new: CreateTask) -> Result<Task, ApiError> {
        if new.title.trim().is_empty() {
            return Err(ApiError::invalid("title, board and list are required"));
        }

        let lock = self.board_lock(new.board);
        let _guard = lock.lock().await;

        let board = self.board_or_deny(new.board, caller).await?;
        authorize(&board, caller.actor(), caller.token(), Action::Edit, Utc::now())?;

        match self.lists.get(new.list).await? {
            Some(list) if list.board == new.board => {}
            Some(_) => return Err(ApiError::invalid("list does not belong to this board")),
            None => return Err(ApiError::NotFound("list")),
        }

        let task = self
            .tasks
            .create(NewTask {
                title: new.title.trim().to_string(),
                description: new.description,
                board: new.board,
                list: new.list,
                status: new.status,
                position: new.position,
                due_date: new.due_date,
            })
            .await?;

        self.enqueue(BoardUpdate {
            board: task.board,
            list: Some(task.list),
            task: Some(task.id),
            actor: caller.actor(),
            kind: ActivityKind::TaskCreated,
            detail: json!({ "title": task.title }),
            event: EventKind::TaskCreated,
            payload: serde_json::to_value(&task).unwrap_or_default(),
            persist: true,
        });
        Ok(task)
    }

    /// Apply a partial update to a task.
    ///
    /// Setting the assignee requires the target user to exist and the caller
    /// to be a board member; a share token alone is not enough.
    pub async fn update_task(
        &self,
        caller: &Caller,
        task_id: Uuid,
        patch: TaskPatch,
    ) -> Result<Task, ApiError> {
        if patch.is_empty() {
            return Err(ApiError::invalid("no fields to update"));
        }

        let existing = self.task_or_deny(task_id, caller).await?;
        let lock = self.board_lock(existing.board);
        let _guard = lock.lock().await;

        // Re-read under the lock; the task may have been cascaded away.
        let existing = self.task_or_deny(task_id, caller).await?;
        let board = self.board_or_deny(existing.board, caller).await?;

        let action = if patch.assignee.is_some() {
            Action::Assign
        } else {
            Action::Edit
        };
        authorize(&board, caller.actor(), caller.token(), action, Utc::now())?;

        if let Some(assignee) = patch.assignee {
            if !self.users.exists(assignee).await? {
                return Err(ApiError::invalid("assignee user not found"));
            }
        }

        let task = self
            .tasks
            .update(task_id, &patch)
            .await?
            .ok_or(ApiError::NotFound("task"))?;

        self.enqueue(BoardUpdate {
            board: task.board,
            list: Some(task.list),
            task: Some(task.id),
            actor: caller.actor(),
            kind: ActivityKind::TaskUpdated,
            detail: redact_patch(&patch),
            event: EventKind::TaskUpdated,
            payload: serde_json::to_value(&task).unwrap_or_default(),
            persist: true,
        });
        Ok(task)
    }

    /// Delete a task.
    pub async fn delete_task(&self, caller: &Caller, task_id: Uuid) -> Result<Uuid, ApiError> {
        let existing = self.task_or_deny(task_id, caller).await?;
        let lock = self.board_lock(existing.board);
        let _guard = lock.lock().await;

        let existing = self.task_or_deny(task_id, caller).await?;
        let board = self.board_or_deny(existing.board, caller).await?;
        authorize(&board, caller.actor(), caller.token(), Action::Edit, Utc::now())?;

        self.tasks.delete(task_id).await?;

        self.enqueue(BoardUpdate {
            board: existing.board,
            list: Some(existing.list),
            task: Some(task_id),
            actor: caller.actor(),
            kind: ActivityKind::TaskDeleted,
            detail: json!({ "id": task_id, "title": existing.title }),
            event: EventKind::TaskDeleted,
            payload: json!({ "id": task_id }),
            persist: true,
        });
        Ok(task_id)
    }

    /// Move a task to another list on the same board.
    pub async fn move_task(
        &self,
        caller: &Caller,
        task_id: Uuid,
        destination: Uuid,
    ) -> Result<Task, ApiError> {
        let existing = self.task_or_deny(task_id, caller).await?;
        let lock = self.board_lock(existing.board);
        let _guard = lock.lock().await;

        let existing = self.task_or_deny(task_id, caller).await?;
        let board = self.board_or_deny(existing.board, caller).await?;
        authorize(&board, caller.actor(), caller.token(), Action::Edit, Utc::now())?;

        match self.lists.get(destination).await? {
            Some(list) if list.board == existing.board => {}
            Some(_) => {
                return Err(ApiError::invalid(
                    "destination list belongs to a different board",
                ))
            }
            None => return Err(ApiError::NotFound("list")),
        }

        let task = self
            .tasks
            .move_to_list(task_id, destination)
            .await?
            .ok_or(ApiError::NotFound("task"))?;

        self.enqueue(BoardUpdate {
            board: task.board,
            list: Some(task.list),
            task: Some(task.id),
            actor: caller.actor(),
            kind: ActivityKind::TaskMoved,
            detail: json!({ "list": destination }),
            // Moves surface as task:updated on the wire; only the audit
            // trail distinguishes them.
            event: EventKind::TaskUpdated,
            payload: serde_json::to_value(&task).unwrap_or_default(),
            persist: true,
        });
        Ok(task)
    }

    /// Load a task, with the same denial rules as `board_or_deny`.
    async fn task_or_deny(&self, task_id: Uuid, caller: &Caller) -> Result<Task, ApiError> {
        match self.tasks.get(task_id).await? {
            Some(task) => Ok(task),
            None if caller.authenticated() => Err(ApiError::NotFound("task")),
            None => Err(ApiError::Forbidden),
        }
    }
}

/// Projection of a task patch for the audit trail: only the fields that were
/// actually set, never the raw request body.
fn redact_patch(patch: &TaskPatch) -> serde_json::Value {
    let mut detail = serde_json::Map::new();
    if let Some(title) = &patch.title {
        detail.insert("title".into(), json!(title));
    }
    if let Some(description) = &patch.description {
        detail.insert("description".into(), json!(description));
    }
    if let Some(status) = patch.status {
        detail.insert("status".into(), json!(status));
    }
    if let Some(position) = patch.position {
        detail.insert("position".into(), json!(position));
    }
    if let Some(due_date) = patch.due_date {
        detail.insert("due_date".into(), json!(due_date));
    }
    if let Some(assignee) = patch.assignee {
        detail.insert("assignee".into(), json!(assignee));
    }
    serde_json::Value::Object(detail)
}
