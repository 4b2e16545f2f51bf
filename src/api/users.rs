use crate::api::error::JsonBody;
use crate::api::session::SessionUser;
use crate::api::AppState;
use crate::entities::users::Model as User;
use crate::error::Result;
use crate::models::{Credentials, NewUser};
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/user", get(current_user))
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    user: User,
    token: Uuid,
}

#[derive(Debug, Serialize)]
struct MessageResponse {
    message: &'static str,
}

#[instrument(skip_all, fields(username = %user.username))]
async fn register(
    State(state): State<AppState>,
    JsonBody(user): JsonBody<NewUser>,
) -> Result<(StatusCode, Json<SessionResponse>)> {
    let (user, token) = state.service.register(user).await?;
    Ok((StatusCode::CREATED, Json(SessionResponse { user, token })))
}

#[instrument(skip_all, fields(username = %credentials.username))]
async fn login(
    State(state): State<AppState>,
    JsonBody(credentials): JsonBody<Credentials>,
) -> Result<Json<SessionResponse>> {
    let (user, token) = state.service.login(credentials).await?;
    Ok(Json(SessionResponse { user, token }))
}

async fn logout(State(state): State<AppState>, session: SessionUser) -> Json<MessageResponse> {
    state.service.logout(&session.token);
    Json(MessageResponse {
        message: "Logged out",
    })
}

async fn current_user(session: SessionUser) -> Json<User> {
    Json(session.user)
}
