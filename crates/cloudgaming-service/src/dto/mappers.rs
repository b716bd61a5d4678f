//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use cloudgaming_common::IssuedToken;
use cloudgaming_core::entities::{Account, Game};

use super::responses::{AuthResponse, GameResponse, MeResponse};

impl From<&Account> for MeResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.to_string(),
            email: account.email.to_string(),
            status: account.status,
            created_at: account.created_at,
        }
    }
}

impl AuthResponse {
    pub fn new(account: &Account, issued: IssuedToken) -> Self {
        Self {
            id: account.id.to_string(),
            email: account.email.to_string(),
            status: account.status,
            created_at: account.created_at,
            token: issued.token,
            token_type: issued.token_type,
            expires_in: issued.expires_in,
        }
    }
}

impl From<&Game> for GameResponse {
    fn from(game: &Game) -> Self {
        Self {
            id: game.id.to_string(),
            slug: game.slug.clone(),
            title: game.title.clone(),
            platform: game.platform.clone(),
            app_id: game.app_id.clone(),
            status: game.status,
            last_update_at: game.last_update_at,
        }
    }
}

impl From<Game> for GameResponse {
    fn from(game: Game) -> Self {
        Self::from(&game)
    }
}
