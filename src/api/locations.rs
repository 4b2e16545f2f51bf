use crate::api::error::JsonBody;
use crate::api::AppState;
use crate::entities::locations::Model as Location;
use crate::error::Result;
use crate::models::NewLocation;
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use tracing::instrument;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_locations).post(create_location))
        .route("/:id", get(get_location))
}

#[instrument(skip_all)]
async fn list_locations(State(state): State<AppState>) -> Result<Json<Vec<Location>>> {
    Ok(Json(state.service.list_locations().await?))
}

#[instrument(skip_all, fields(name = %location.name))]
async fn create_location(
    State(state): State<AppState>,
    JsonBody(location): JsonBody<NewLocation>,
) -> Result<(StatusCode, Json<Location>)> {
    let location = state.service.create_location(location).await?;
    Ok((StatusCode::CREATED, Json(location)))
}

#[instrument(skip_all)]
async fn get_location(
    State(state): State<AppState>,
    id: std::result::Result<Path<i32>, PathRejection>,
) -> Result<Json<Location>> {
    let Path(id) = id?;
    Ok(Json(state.service.get_location(id).await?))
}
