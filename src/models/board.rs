use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A kanban board.
///
/// Boards are not owned by any user: every authenticated caller can read,
/// rename and delete every board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    /// UUID v4 assigned at creation.
    pub id: String,
    /// Never empty or whitespace-only.
    pub title: String,
    pub created_at: DateTime<Utc>,
    /// Equal to `created_at` until the first rename.
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating or renaming a board.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct BoardInput {
    /// Trimmed by the board service; an empty result is rejected there.
    #[validate(length(max = 200))]
    pub title: String,
}
