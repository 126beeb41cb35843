//! Board use-cases: title validation on top of a [`BoardStore`].

use std::sync::Arc;

use crate::error::AppError;
use crate::models::Board;
use crate::repository::BoardStore;

pub struct BoardService {
    boards: Arc<dyn BoardStore>,
}

impl BoardService {
    pub fn new(boards: Arc<dyn BoardStore>) -> Self {
        Self { boards }
    }

    pub async fn list_boards(&self) -> Result<Vec<Board>, AppError> {
        Ok(self.boards.list().await?)
    }

    pub async fn get_board(&self, id: &str) -> Result<Board, AppError> {
        Ok(self.boards.get(id).await?)
    }

    pub async fn create_board(&self, title: &str) -> Result<Board, AppError> {
        let title = valid_title(title)?;
        Ok(self.boards.create(title).await?)
    }

    pub async fn update_board(&self, id: &str, title: &str) -> Result<Board, AppError> {
        let title = valid_title(title)?;
        Ok(self.boards.update(id, title).await?)
    }

    pub async fn delete_board(&self, id: &str) -> Result<(), AppError> {
        Ok(self.boards.delete(id).await?)
    }
}

fn valid_title(title: &str) -> Result<&str, AppError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::BadRequest("title required".into()));
    }
    Ok(title)
}
