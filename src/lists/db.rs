/**
 * List Model and Database Operations
 *
 * A list is an ordered column within a board. Display order is the integer
 * position, ties broken by creation time. Lists never renumber siblings.
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

/// List record.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct List {
    /// Unique list ID.
    pub id: Uuid,
    /// List title.
    pub title: String,
    /// Owning board. Immutable.
    pub board: Uuid,
    /// Display position within the board.
    pub position: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// List collection handle.
#[derive(Clone)]
pub struct ListStore {
    pool: SqlitePool,
}

impl ListStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new list on a board.
    pub async fn create(
        &self,
        title: &str,
        board: Uuid,
        position: i64,
    ) -> Result<List, sqlx::Error> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO lists (id, title, board, position, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(board)
        .bind(position)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(List {
            id,
            title: title.to_string(),
            board,
            position,
            created_at: now,
        })
    }

    /// Get a list by id.
    pub async fn get(&self, id: Uuid) -> Result<Option<List>, sqlx::Error> {
        sqlx::query_as::<_, List>(
            r#"
            SELECT id, title, board, position, created_at
            FROM lists
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Lists of a board in display order.
    pub async fn for_board(&self, board: Uuid) -> Result<Vec<List>, sqlx::Error> {
        sqlx::query_as::<_, List>(
            r#"
            SELECT id, title, board, position, created_at
            FROM lists
            WHERE board = ?
            ORDER BY position ASC, created_at ASC
            "#,
        )
        .bind(board)
        .fetch_all(&self.pool)
        .await
    }

    /// Delete one list. Its tasks are removed separately by the cascade.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM lists WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every list of a board (board cascade).
    pub async fn delete_for_board(&self, board: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM lists WHERE board = ?")
            .bind(board)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
