//! In-memory GameRepository

use async_trait::async_trait;
use parking_lot::RwLock;

use cloudgaming_core::entities::{Game, GameStatus};
use cloudgaming_core::error::DomainError;
use cloudgaming_core::traits::{GameRepository, RepoResult};

/// Game catalog held behind a read-mostly lock
#[derive(Debug, Default)]
pub struct InMemoryGameRepository {
    games: RwLock<Vec<Game>>,
}

impl InMemoryGameRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog pre-filled with the same sample games the SQL seed inserts
    pub fn seeded() -> Self {
        let repo = Self::new();
        for game in sample_games() {
            // Slugs in the sample set are distinct.
            let _ = repo.insert(game);
        }
        repo
    }

    /// Add a game; slugs are unique
    pub fn insert(&self, game: Game) -> RepoResult<()> {
        let mut games = self.games.write();
        if games.iter().any(|existing| existing.slug == game.slug) {
            return Err(DomainError::GameSlugExists);
        }
        games.push(game);
        Ok(())
    }
}

fn sample_games() -> Vec<Game> {
    vec![
        Game::new("apex-legends", "Apex Legends")
            .with_platform("EA", "1172470")
            .with_status(GameStatus::Ready),
        Game::new("fortnite", "Fortnite")
            .with_platform("Epic", "fortnite")
            .with_status(GameStatus::Prepare),
        Game::new("cs2", "Counter-Strike 2")
            .with_platform("Steam", "730")
            .with_status(GameStatus::Ready),
    ]
}

#[async_trait]
impl GameRepository for InMemoryGameRepository {
    async fn list(&self) -> RepoResult<Vec<Game>> {
        let mut games = self.games.read().clone();
        games.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(games)
    }
}
