//! Storage for users and boards.
//!
//! Two interchangeable backends implement [`UserStore`] and [`BoardStore`]:
//! [`memory`] keeps everything in lock-guarded maps, [`sqlite`] persists to a
//! SQLite database through `sqlx`. The backend is picked once at startup and
//! handed to the services as `Arc<dyn UserStore>` / `Arc<dyn BoardStore>`.

pub mod memory;
pub mod sqlite;

use async_trait::async_trait;
use std::fmt;
use uuid::Uuid;

use crate::models::{Board, User};

pub use memory::{MemBoardStore, MemUserStore};
pub use sqlite::{SqliteBoardStore, SqliteUserStore};

/// Mints a new entity id: a random UUID v4 in its canonical hyphenated form.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Errors produced by the store implementations.
#[derive(Debug)]
pub enum StoreError {
    /// No entity with the requested key.
    NotFound,
    /// A user with the same normalized email already exists.
    AlreadyExists,
    /// The database driver failed.
    Database(sqlx::Error),
    /// An in-memory store lock was poisoned by a panicking writer.
    Poisoned,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StoreError::NotFound => write!(f, "not found"),
            StoreError::AlreadyExists => write!(f, "user already exists"),
            StoreError::Database(e) => write!(f, "database error: {}", e),
            StoreError::Poisoned => write!(f, "store lock poisoned"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Database(e) => Some(e),
            _ => None,
        }
    }
}

/// `RowNotFound` and unique-constraint violations keep their meaning;
/// anything else is a backend failure.
impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> StoreError {
        match error {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(ref db) if db.is_unique_violation() => StoreError::AlreadyExists,
            _ => StoreError::Database(error),
        }
    }
}

/// User records keyed by id, with a unique secondary key on normalized email.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a new user. Fails with `AlreadyExists` if the normalized
    /// email is taken; the check and the insert are one atomic step.
    async fn create(&self, email: &str, password_hash: &str) -> Result<User, StoreError>;

    async fn get_by_email(&self, email: &str) -> Result<User, StoreError>;

    async fn get_by_id(&self, id: &str) -> Result<User, StoreError>;
}

/// Board records keyed by id.
#[async_trait]
pub trait BoardStore: Send + Sync {
    /// All boards, newest `created_at` first.
    async fn list(&self) -> Result<Vec<Board>, StoreError>;

    async fn get(&self, id: &str) -> Result<Board, StoreError>;

    /// Stores `title` as given; validation happens in the board service.
    async fn create(&self, title: &str) -> Result<Board, StoreError>;

    /// Replaces the title and refreshes `updated_at` in one atomic step.
    async fn update(&self, id: &str, title: &str) -> Result<Board, StoreError>;

    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}
