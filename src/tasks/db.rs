/**
 * Task Model and Database Operations
 *
 * A task always references a board and a list that currently exist; the list
 * reference only changes through a move, which is validated to stay on the
 * same board.
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Task workflow status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
}

impl Default for TaskStatus {
    fn default() -> Self {
        Self::Todo
    }
}

/// Task record.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID.
    pub id: Uuid,
    /// Task title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Owning board. Immutable.
    pub board: Uuid,
    /// Containing list. Changed only by a move.
    pub list: Uuid,
    /// Assigned user, if any.
    pub assignee: Option<Uuid>,
    /// Workflow status.
    pub status: TaskStatus,
    /// Display position within the list.
    pub position: i64,
    /// Optional due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Fields for creating a task. `title`, `board` and `list` are required.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub board: Uuid,
    pub list: Uuid,
    pub status: TaskStatus,
    pub position: i64,
    pub due_date: Option<DateTime<Utc>>,
}

/// Partial task update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub position: Option<i64>,
    pub due_date: Option<DateTime<Utc>>,
    pub assignee: Option<Uuid>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.position.is_none()
            && self.due_date.is_none()
            && self.assignee.is_none()
    }
}

/// Task collection handle.
#[derive(Clone)]
pub struct TaskStore {
    pool: SqlitePool,
}

impl TaskStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new task.
    pub async fn create(&self, new: NewTask) -> Result<Task, sqlx::Error> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO tasks
                (id, title, description, board, list, assignee, status, position,
                 due_date, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, NULL, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id)
        .bind(&new.title)
        .bind(&new.description)
        .bind(new.board)
        .bind(new.list)
        .bind(new.status)
        .bind(new.position)
        .bind(new.due_date)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(Task {
            id,
            title: new.title,
            description: new.description,
            board: new.board,
            list: new.list,
            assignee: None,
            status: new.status,
            position: new.position,
            due_date: new.due_date,
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a task by id.
    pub async fn get(&self, id: Uuid) -> Result<Option<Task>, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, board, list, assignee, status, position,
                   due_date, created_at, updated_at
            FROM tasks
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Tasks of a board in display order.
    pub async fn for_board(&self, board: Uuid) -> Result<Vec<Task>, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, board, list, assignee, status, position,
                   due_date, created_at, updated_at
            FROM tasks
            WHERE board = ?
            ORDER BY position ASC, created_at ASC
            "#,
        )
        .bind(board)
        .fetch_all(&self.pool)
        .await
    }

    /// Apply a partial update and return the canonical record.
    pub async fn update(&self, id: Uuid, patch: &TaskPatch) -> Result<Option<Task>, sqlx::Error> {
        let now = Utc::now();
        sqlx::query(
            r#"
            UPDATE tasks SET
                title       = COALESCE(?, title),
                description = COALESCE(?, description),
                status      = COALESCE(?, status),
                position    = COALESCE(?, position),
                due_date    = COALESCE(?, due_date),
                assignee    = COALESCE(?, assignee),
                updated_at  = ?
            WHERE id = ?
            "#,
        )
        .bind(&patch.title)
        .bind(&patch.description)
        .bind(patch.status)
        .bind(patch.position)
        .bind(patch.due_date)
        .bind(patch.assignee)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.get(id).await
    }

    /// Change the task's list reference (same-board move, validated upstream).
    pub async fn move_to_list(&self, id: Uuid, list: Uuid) -> Result<Option<Task>, sqlx::Error> {
        let now = Utc::now();
        sqlx::query("UPDATE tasks SET list = ?, updated_at = ? WHERE id = ?")
            .bind(list)
            .bind(now)
            .bind(id)
            .execute(&self.pool)
            .await?;
        self.get(id).await
    }

    /// Delete one task.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every task of a list (list cascade).
    pub async fn delete_for_list(&self, list: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE list = ?")
            .bind(list)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Delete every task of a board (board cascade).
    pub async fn delete_for_board(&self, board: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE board = ?")
            .bind(board)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
