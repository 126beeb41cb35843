//! SQLite-backed stores.
//!
//! Both stores share one `SqlitePool`. The schema is created on connect, and
//! the `UNIQUE` constraint on `users.email` enforces email uniqueness even
//! when several connections insert at once.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use super::{new_id, BoardStore, StoreError, UserStore};
use crate::models::{normalize_email, Board, User};

const SCHEMA: [&str; 2] = [
    "CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY NOT NULL,
        email TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        created_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS boards (
        id TEXT PRIMARY KEY NOT NULL,
        title TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
];

/// Opens a pool for `database_url` and creates the tables if needed.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, StoreError> {
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;
    migrate(&pool).await?;
    Ok(pool)
}

/// A private in-memory database, useful for tests and throwaway runs.
///
/// Every SQLite connection to `:memory:` sees its own database, so the pool
/// is pinned to a single connection that is never recycled.
pub async fn connect_in_memory() -> Result<SqlitePool, StoreError> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;
    migrate(&pool).await?;
    Ok(pool)
}

pub async fn migrate(pool: &SqlitePool) -> Result<(), StoreError> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}

/// [`UserStore`] over the `users` table.
#[derive(Clone)]
pub struct SqliteUserStore {
    pool: SqlitePool,
}

impl SqliteUserStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for SqliteUserStore {
    async fn create(&self, email: &str, password_hash: &str) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, email, password_hash, created_at)
             VALUES (?, ?, ?, ?)
             RETURNING id, email, password_hash, created_at",
        )
        .bind(new_id())
        .bind(normalize_email(email))
        .bind(password_hash)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    async fn get_by_email(&self, email: &str) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, created_at FROM users WHERE email = ?",
        )
        .bind(normalize_email(email))
        .fetch_optional(&self.pool)
        .await?;
        user.ok_or(StoreError::NotFound)
    }

    async fn get_by_id(&self, id: &str) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        user.ok_or(StoreError::NotFound)
    }
}

/// [`BoardStore`] over the `boards` table.
#[derive(Clone)]
pub struct SqliteBoardStore {
    pool: SqlitePool,
}

impl SqliteBoardStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BoardStore for SqliteBoardStore {
    async fn list(&self) -> Result<Vec<Board>, StoreError> {
        let boards = sqlx::query_as::<_, Board>(
            "SELECT id, title, created_at, updated_at FROM boards
             ORDER BY created_at DESC, rowid DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(boards)
    }

    async fn get(&self, id: &str) -> Result<Board, StoreError> {
        let board = sqlx::query_as::<_, Board>(
            "SELECT id, title, created_at, updated_at FROM boards WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        board.ok_or(StoreError::NotFound)
    }

    async fn create(&self, title: &str) -> Result<Board, StoreError> {
        let now = Utc::now();
        let board = sqlx::query_as::<_, Board>(
            "INSERT INTO boards (id, title, created_at, updated_at)
             VALUES (?, ?, ?, ?)
             RETURNING id, title, created_at, updated_at",
        )
        .bind(new_id())
        .bind(title)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(board)
    }

    async fn update(&self, id: &str, title: &str) -> Result<Board, StoreError> {
        // Single statement, so concurrent renames of one board cannot interleave.
        let board = sqlx::query_as::<_, Board>(
            "UPDATE boards SET title = ?, updated_at = ? WHERE id = ?
             RETURNING id, title, created_at, updated_at",
        )
        .bind(title)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        board.ok_or(StoreError::NotFound)
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM boards WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
