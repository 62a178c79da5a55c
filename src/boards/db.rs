/**
 * Board Model and Database Operations
 *
 * The board is the top-level collaboration container. It owns its lists and
 * tasks (cascade delete) and carries the optional share token that grants
 * time-limited unauthenticated access.
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Board record, with its collaborator set resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    /// Unique board ID.
    pub id: Uuid,
    /// Board title.
    pub title: String,
    /// Owning user. Immutable for the life of the board.
    pub owner: Uuid,
    /// Users the board has been shared with.
    pub collaborators: Vec<Uuid>,
    /// Current share token, if one has been issued.
    pub share_token: Option<String>,
    /// Share token expiry. `None` means the token does not expire.
    pub share_expires: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Board {
    /// Whether the user owns this board.
    pub fn is_owner(&self, user_id: Uuid) -> bool {
        self.owner == user_id
    }

    /// Whether the user is the owner or a collaborator.
    pub fn is_member(&self, user_id: Uuid) -> bool {
        self.owner == user_id || self.collaborators.contains(&user_id)
    }
}

#[derive(sqlx::FromRow)]
struct BoardRow {
    id: Uuid,
    title: String,
    owner: Uuid,
    share_token: Option<String>,
    share_expires: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl BoardRow {
    fn into_board(self, collaborators: Vec<Uuid>) -> Board {
        Board {
            id: self.id,
            title: self.title,
            owner: self.owner,
            collaborators,
            share_token: self.share_token,
            share_expires: self.share_expires,
            created_at: self.created_at,
        }
    }
}

/// Board collection handle.
#[derive(Clone)]
pub struct BoardStore {
    pool: SqlitePool,
}

impl BoardStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new board owned by `owner`.
    pub async fn create(&self, title: &str, owner: Uuid) -> Result<Board, sqlx::Error> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO boards (id, title, owner, share_token, share_expires, created_at)
            VALUES (?, ?, ?, NULL, NULL, ?)
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(owner)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(Board {
            id,
            title: title.to_string(),
            owner,
            collaborators: Vec::new(),
            share_token: None,
            share_expires: None,
            created_at: now,
        })
    }

    /// Fetch a board by id, including its collaborators.
    pub async fn get(&self, id: Uuid) -> Result<Option<Board>, sqlx::Error> {
        let row = sqlx::query_as::<_, BoardRow>(
            r#"
            SELECT id, title, owner, share_token, share_expires, created_at
            FROM boards
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let collaborators = self.collaborators_of(id).await?;
                Ok(Some(row.into_board(collaborators)))
            }
            None => Ok(None),
        }
    }

    /// Boards where the user is owner or collaborator, newest first.
    pub async fn for_user(&self, user_id: Uuid) -> Result<Vec<Board>, sqlx::Error> {
        let rows = sqlx::query_as::<_, BoardRow>(
            r#"
            SELECT DISTINCT b.id, b.title, b.owner, b.share_token, b.share_expires, b.created_at
            FROM boards b
            LEFT JOIN board_collaborators c ON c.board_id = b.id
            WHERE b.owner = ? OR c.user_id = ?
            ORDER BY b.created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let mut boards = Vec::with_capacity(rows.len());
        for row in rows {
            let collaborators = self.collaborators_of(row.id).await?;
            boards.push(row.into_board(collaborators));
        }
        Ok(boards)
    }

    /// Add a collaborator. The caller has already checked for duplicates.
    pub async fn add_collaborator(
        &self,
        board_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO board_collaborators (board_id, user_id)
            VALUES (?, ?)
            "#,
        )
        .bind(board_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Replace the board's share token and expiry. The previous token value
    /// stops working immediately.
    pub async fn set_share_token(
        &self,
        board_id: Uuid,
        token: &str,
        expires: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE boards SET share_token = ?, share_expires = ?
            WHERE id = ?
            "#,
        )
        .bind(token)
        .bind(expires)
        .bind(board_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Delete the board row itself. Children are removed first by the
    /// coordinator's cascade.
    pub async fn delete(&self, board_id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM board_collaborators WHERE board_id = ?")
            .bind(board_id)
            .execute(&self.pool)
            .await?;
        sqlx::query("DELETE FROM boards WHERE id = ?")
            .bind(board_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn collaborators_of(&self, board_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
        let rows: Vec<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT user_id FROM board_collaborators WHERE board_id = ?
            "#,
        )
        .bind(board_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }
}
