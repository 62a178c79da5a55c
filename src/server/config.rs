/**
 * Server Configuration
 *
 * Environment-driven configuration and record-store setup.
 *
 * # Configuration Sources
 *
 * - `SERVER_PORT` - listen port (default 4000)
 * - `DATABASE_URL` - SQLite URL (default `sqlite://taskboard.db?mode=rwc`)
 * - `JWT_SECRET` - session-token secret
 * - `RUST_LOG` - tracing filter
 */
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub database_url: String,
}

impl ServerConfig {
    /// Load configuration from the environment, with local-dev defaults.
    pub fn from_env() -> Self {
        let port = std::env::var("SERVER_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(4000);
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://taskboard.db?mode=rwc".to_string());
        Self { port, database_url }
    }
}

/// Connect to the record store and ensure the schema exists.
pub async fn connect_store(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    tracing::info!("connecting to record store at {}", database_url);

    // An in-memory database only exists per connection, so it must be
    // pinned to a single one. Used by the test suites.
    let mut options = SqlitePoolOptions::new();
    if database_url.contains(":memory:") {
        options = options.max_connections(1);
    }

    let pool = options.connect(database_url).await?;
    init_schema(&pool).await?;
    tracing::info!("record store ready");
    Ok(pool)
}

/// Create tables and indexes if they do not exist. Idempotent, run on every
/// startup.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let statements = [
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id            BLOB PRIMARY KEY,
            name          TEXT NOT NULL,
            email         TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            created_at    TEXT NOT NULL
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS boards (
            id            BLOB PRIMARY KEY,
            title         TEXT NOT NULL,
            owner         BLOB NOT NULL,
            share_token   TEXT,
            share_expires TEXT,
            created_at    TEXT NOT NULL
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS board_collaborators (
            board_id BLOB NOT NULL,
            user_id  BLOB NOT NULL,
            PRIMARY KEY (board_id, user_id)
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS lists (
            id         BLOB PRIMARY KEY,
            title      TEXT NOT NULL,
            board      BLOB NOT NULL,
            position   INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS tasks (
            id          BLOB PRIMARY KEY,
            title       TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            board       BLOB NOT NULL,
            list        BLOB NOT NULL,
            assignee    BLOB,
            status      TEXT NOT NULL DEFAULT 'todo',
            position    INTEGER NOT NULL DEFAULT 0,
            due_date    TEXT,
            created_at  TEXT NOT NULL,
            updated_at  TEXT NOT NULL
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS activities (
            id         BLOB PRIMARY KEY,
            board      BLOB NOT NULL,
            list       BLOB,
            task       BLOB,
            actor      BLOB,
            actor_name TEXT,
            kind       TEXT NOT NULL,
            data       TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
        "CREATE INDEX IF NOT EXISTS idx_boards_owner ON boards(owner)",
        "CREATE INDEX IF NOT EXISTS idx_lists_board ON lists(board, position)",
        "CREATE INDEX IF NOT EXISTS idx_tasks_board ON tasks(board, list, position)",
        "CREATE INDEX IF NOT EXISTS idx_tasks_assignee ON tasks(assignee)",
        "CREATE INDEX IF NOT EXISTS idx_activities_board ON activities(board, created_at)",
    ];

    for statement in statements {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}
