//! PostgreSQL implementation of GameRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use cloudgaming_core::entities::Game;
use cloudgaming_core::traits::{GameRepository, RepoResult};

use crate::models::GameModel;

use super::error::map_db_error;

/// PostgreSQL implementation of GameRepository
#[derive(Clone)]
pub struct PgGameRepository {
    pool: PgPool,
}

impl PgGameRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GameRepository for PgGameRepository {
    #[instrument(skip(self))]
    async fn list(&self) -> RepoResult<Vec<Game>> {
        let rows = sqlx::query_as::<_, GameModel>(
            r"
            SELECT id, slug, title, platform, app_id, status, last_update_at
            FROM games
            ORDER BY title ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        rows.into_iter().map(Game::try_from).collect()
    }
}
