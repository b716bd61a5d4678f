//! Game catalog handlers

use axum::{extract::State, Json};
use cloudgaming_service::{GameResponse, GameService};

use crate::extractors::AuthUser;
use crate::response::ApiResult;
use crate::state::AppState;

/// List the catalog
///
/// GET /games
pub async fn list_games(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> ApiResult<Json<Vec<GameResponse>>> {
    let service = GameService::new(state.service_context());
    let games = service.list_games().await?;
    Ok(Json(games))
}
