/**
 * Activity Model and Database Operations
 *
 * Immutable audit entries, one per successful mutation. Entries are append
 * only; they are never updated and only disappear when their board's cascade
 * delete removes them.
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Closed vocabulary of audit event tags.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ActivityKind {
    #[serde(rename = "board:deleted")]
    BoardDeleted,
    #[serde(rename = "list:created")]
    ListCreated,
    #[serde(rename = "list:deleted")]
    ListDeleted,
    #[serde(rename = "task:created")]
    TaskCreated,
    #[serde(rename = "task:updated")]
    TaskUpdated,
    #[serde(rename = "task:deleted")]
    TaskDeleted,
    #[serde(rename = "task:moved")]
    TaskMoved,
}

impl ActivityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BoardDeleted => "board:deleted",
            Self::ListCreated => "list:created",
            Self::ListDeleted => "list:deleted",
            Self::TaskCreated => "task:created",
            Self::TaskUpdated => "task:updated",
            Self::TaskDeleted => "task:deleted",
            Self::TaskMoved => "task:moved",
        }
    }

    fn parse(tag: &str) -> Option<Self> {
        match tag {
            "board:deleted" => Some(Self::BoardDeleted),
            "list:created" => Some(Self::ListCreated),
            "list:deleted" => Some(Self::ListDeleted),
            "task:created" => Some(Self::TaskCreated),
            "task:updated" => Some(Self::TaskUpdated),
            "task:deleted" => Some(Self::TaskDeleted),
            "task:moved" => Some(Self::TaskMoved),
            _ => None,
        }
    }
}

/// One audit entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    /// Unique entry ID.
    pub id: Uuid,
    /// Board the mutation applied to.
    pub board: Uuid,
    /// List involved, if any.
    pub list: Option<Uuid>,
    /// Task involved, if any.
    pub task: Option<Uuid>,
    /// Acting user. Absent for unauthenticated share-token actions.
    pub actor: Option<Uuid>,
    /// Display-name snapshot of the actor at mutation time.
    pub actor_name: Option<String>,
    /// Event type tag.
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    /// Event detail payload.
    pub data: serde_json::Value,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct ActivityRow {
    id: Uuid,
    board: Uuid,
    list: Option<Uuid>,
    task: Option<Uuid>,
    actor: Option<Uuid>,
    actor_name: Option<String>,
    kind: String,
    data: String,
    created_at: DateTime<Utc>,
}

impl ActivityRow {
    fn into_activity(self) -> Option<Activity> {
        let kind = ActivityKind::parse(&self.kind)?;
        let data = serde_json::from_str(&self.data).unwrap_or(serde_json::Value::Null);
        Some(Activity {
            id: self.id,
            board: self.board,
            list: self.list,
            task: self.task,
            actor: self.actor,
            actor_name: self.actor_name,
            kind,
            data,
            created_at: self.created_at,
        })
    }
}

/// Activity collection handle.
#[derive(Clone)]
pub struct ActivityStore {
    pool: SqlitePool,
}

impl ActivityStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Append one entry.
    #[allow(clippy::too_many_arguments)]
    pub async fn append(
        &self,
        board: Uuid,
        list: Option<Uuid>,
        task: Option<Uuid>,
        actor: Option<Uuid>,
        actor_name: Option<&str>,
        kind: ActivityKind,
        data: &serde_json::Value,
    ) -> Result<Activity, sqlx::Error> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO activities
                (id, board, list, task, actor, actor_name, kind, data, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id)
        .bind(board)
        .bind(list)
        .bind(task)
        .bind(actor)
        .bind(actor_name)
        .bind(kind.as_str())
        .bind(data.to_string())
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(Activity {
            id,
            board,
            list,
            task,
            actor,
            actor_name: actor_name.map(String::from),
            kind,
            data: data.clone(),
            created_at: now,
        })
    }

    /// Most recent entries for a board, newest first.
    pub async fn recent(&self, board: Uuid, limit: i64) -> Result<Vec<Activity>, sqlx::Error> {
        let rows = sqlx::query_as::<_, ActivityRow>(
            r#"
            SELECT id, board, list, task, actor, actor_name, kind, data, created_at
            FROM activities
            WHERE board = ?
            ORDER BY created_at DESC, rowid DESC
            LIMIT ?
            "#,
        )
        .bind(board)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().filter_map(ActivityRow::into_activity).collect())
    }

    /// Delete every entry of a board (board cascade).
    pub async fn delete_for_board(&self, board: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM activities WHERE board = ?")
            .bind(board)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
