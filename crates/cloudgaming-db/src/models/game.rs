//! Game database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for the games table
#[derive(Debug, Clone, FromRow)]
pub struct GameModel {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub platform: Option<String>,
    pub app_id: Option<String>,
    pub status: String,
    pub last_update_at: DateTime<Utc>,
}
