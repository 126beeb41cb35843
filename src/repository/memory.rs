//! In-memory stores.
//!
//! Each store keeps its state behind a single `RwLock`: reads share it,
//! every mutation holds it exclusively for the whole check-then-act sequence.
//! Nothing survives a restart.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::RwLock;

use super::{new_id, BoardStore, StoreError, UserStore};
use crate::models::{normalize_email, Board, User};

#[derive(Default)]
struct UserTable {
    users: HashMap<String, User>,
    /// normalized email -> user id; always mirrors `users`.
    email_index: HashMap<String, String>,
}

/// [`UserStore`] backed by a map plus an email index under one lock.
#[derive(Default)]
pub struct MemUserStore {
    inner: RwLock<UserTable>,
}

impl MemUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemUserStore {
    async fn create(&self, email: &str, password_hash: &str) -> Result<User, StoreError> {
        let email = normalize_email(email);
        let mut table = self.inner.write().map_err(|_| StoreError::Poisoned)?;

        if table.email_index.contains_key(&email) {
            return Err(StoreError::AlreadyExists);
        }

        let user = User {
            id: new_id(),
            email: email.clone(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        table.email_index.insert(email, user.id.clone());
        table.users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn get_by_email(&self, email: &str) -> Result<User, StoreError> {
        let email = normalize_email(email);
        let table = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        table
            .email_index
            .get(&email)
            .and_then(|id| table.users.get(id))
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn get_by_id(&self, id: &str) -> Result<User, StoreError> {
        let table = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        table.users.get(id).cloned().ok_or(StoreError::NotFound)
    }
}

/// [`BoardStore`] backed by a lock-guarded map.
#[derive(Default)]
pub struct MemBoardStore {
    boards: RwLock<HashMap<String, Board>>,
}

impl MemBoardStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BoardStore for MemBoardStore {
    async fn list(&self) -> Result<Vec<Board>, StoreError> {
        let boards = self.boards.read().map_err(|_| StoreError::Poisoned)?;
        let mut out: Vec<Board> = boards.values().cloned().collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(out)
    }

    async fn get(&self, id: &str) -> Result<Board, StoreError> {
        let boards = self.boards.read().map_err(|_| StoreError::Poisoned)?;
        boards.get(id).cloned().ok_or(StoreError::NotFound)
    }

    async fn create(&self, title: &str) -> Result<Board, StoreError> {
        let now = Utc::now();
        let board = Board {
            id: new_id(),
            title: title.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.boards
            .write()
            .map_err(|_| StoreError::Poisoned)?
            .insert(board.id.clone(), board.clone());
        Ok(board)
    }

    async fn update(&self, id: &str, title: &str) -> Result<Board, StoreError> {
        let mut boards = self.boards.write().map_err(|_| StoreError::Poisoned)?;
        let board = boards.get_mut(id).ok_or(StoreError::NotFound)?;
        board.title = title.to_string();
        board.updated_at = Utc::now();
        Ok(board.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let mut boards = self.boards.write().map_err(|_| StoreError::Poisoned)?;
        boards.remove(id).map(|_| ()).ok_or(StoreError::NotFound)
    }
}
