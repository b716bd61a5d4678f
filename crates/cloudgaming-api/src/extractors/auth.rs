//! Authentication extractor
//!
//! Extracts and validates session tokens from the Authorization header.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use cloudgaming_common::{SessionClaims, TokenError};
use cloudgaming_service::{AuthService, ServiceError};

use crate::response::ApiError;
use crate::state::AppState;

/// Authenticated caller extracted from a valid session token
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Claims of the validated token
    pub claims: SessionClaims,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let service = AuthService::new(app_state.service_context());

        // A header that is present but not a bearer credential counts as malformed.
        let header = TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state).await;
        let claims = match header {
            Ok(TypedHeader(Authorization(bearer))) => service.authenticate(Some(bearer.token())),
            Err(rejection) if rejection.is_missing() => service.authenticate(None),
            Err(_) => {
                tracing::warn!(reason = TokenError::Malformed.reason(), "Session token rejected");
                Err(ServiceError::unauthorized(TokenError::Malformed))
            }
        }?;

        Ok(AuthUser { claims })
    }
}
