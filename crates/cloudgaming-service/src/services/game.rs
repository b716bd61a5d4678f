//! Game catalog service

use tracing::{debug, instrument};

use crate::dto::GameResponse;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Read access to the game catalog
pub struct GameService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> GameService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// List every game in the catalog, ordered by title
    #[instrument(skip(self))]
    pub async fn list_games(&self) -> ServiceResult<Vec<GameResponse>> {
        let games = self.ctx.game_repo().list().await?;
        debug!(count = games.len(), "Listed games");
        Ok(games.into_iter().map(GameResponse::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::Duration;
    use cloudgaming_common::{CredentialStore, PasswordHashingConfig, SessionTokenService};
    use cloudgaming_core::entities::{Game, GameStatus};
    use cloudgaming_db::{InMemoryAccountRepository, InMemoryGameRepository};

    fn context(games: InMemoryGameRepository) -> ServiceContext {
        ServiceContext::builder()
            .account_repo(Arc::new(InMemoryAccountRepository::new()))
            .game_repo(Arc::new(games))
            .credentials(CredentialStore::new(&PasswordHashingConfig::fast_for_tests()).unwrap())
            .tokens(
                SessionTokenService::new("games-test-secret-0123456789abcdef", Duration::minutes(15))
                    .unwrap(),
            )
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_list_seeded_catalog_sorted_by_title() {
        let ctx = context(InMemoryGameRepository::seeded());
        let games = GameService::new(&ctx).list_games().await.unwrap();

        assert_eq!(games.len(), 3);
        let titles: Vec<&str> = games.iter().map(|g| g.title.as_str()).collect();
        let mut sorted = titles.clone();
        sorted.sort_unstable();
        assert_eq!(titles, sorted);
    }

    #[tokio::test]
    async fn test_list_empty_catalog() {
        let ctx = context(InMemoryGameRepository::new());
        let games = GameService::new(&ctx).list_games().await.unwrap();
        assert!(games.is_empty());
    }

    #[tokio::test]
    async fn test_list_carries_status_and_platform() {
        let repo = InMemoryGameRepository::new();
        repo.insert(
            Game::new("dota-2", "Dota 2")
                .with_platform("Steam", "570")
                .with_status(GameStatus::Ready),
        )
        .unwrap();
        let ctx = context(repo);

        let games = GameService::new(&ctx).list_games().await.unwrap();
        assert_eq!(games[0].slug, "dota-2");
        assert_eq!(games[0].status, GameStatus::Ready);
        assert_eq!(games[0].platform.as_deref(), Some("Steam"));
    }
}
