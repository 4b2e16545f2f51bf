use crate::api::AppState;
use crate::entities::users::Model as User;
use crate::error::InventoryError;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::async_trait;
use uuid::Uuid;

/// The logged-in user behind an `Authorization: Bearer <token>` header.
/// Rejects with 401 when the header is missing or the session is unknown.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub user: User,
    pub token: Uuid,
}

pub(crate) fn bearer_token(parts: &Parts) -> Option<Uuid> {
    let header = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?;
    Uuid::parse_str(token.trim()).ok()
}

#[async_trait]
impl FromRequestParts<AppState> for SessionUser {
    type Rejection = InventoryError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(InventoryError::Unauthorized)?;
        let user = state.service.session_user(&token).await?;
        Ok(Self { user, token })
    }
}
