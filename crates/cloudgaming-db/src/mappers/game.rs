//! Game entity <-> model mapper

use cloudgaming_core::entities::{Game, GameStatus};
use cloudgaming_core::error::DomainError;

use crate::models::GameModel;

/// Convert GameModel to Game entity
impl TryFrom<GameModel> for Game {
    type Error = DomainError;

    fn try_from(model: GameModel) -> Result<Self, Self::Error> {
        let status = model
            .status
            .parse::<GameStatus>()
            .map_err(DomainError::DatabaseError)?;

        Ok(Game {
            id: model.id,
            slug: model.slug,
            title: model.title,
            platform: model.platform,
            app_id: model.app_id,
            status,
            last_update_at: model.last_update_at,
        })
    }
}
