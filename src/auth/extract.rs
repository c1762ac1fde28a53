use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use tracing::warn;

use crate::error::ApiError;
use crate::state::AppState;
use crate::store::User;

/// Authenticated principal for protected routes. The subject is resolved
/// from the store on every request, so a deleted account stops
/// authenticating even while its token is still unexpired.
///
/// A missing or non-Bearer header is rejected before any signature work.
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(ApiError::Unauthenticated("token not found"))?;

        let claims = state.jwt.verify(token).map_err(|e| {
            warn!(cause = %e, "rejected session token");
            ApiError::Unauthenticated("token invalid or expired")
        })?;

        let user = state
            .store
            .find_by_id(claims.sub)
            .await
            .map_err(ApiError::from)?
            .ok_or(ApiError::Unauthenticated("principal not found"))?;

        Ok(CurrentUser(user))
    }
}
