use crate::api::error::JsonBody;
use crate::api::session::SessionUser;
use crate::api::AppState;
use crate::entities::inventory::Model as Inventory;
use crate::entities::inventory_movements::Model as InventoryMovement;
use crate::error::Result;
use crate::models::{InventoryFilter, NewInventory, NewMovement};
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::instrument;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_inventory).post(create_inventory))
        .route("/transfer", post(transfer_inventory))
        .route("/movements", get(list_movements))
}

#[derive(Debug, Serialize)]
pub struct TransferResponse {
    message: &'static str,
    movement: InventoryMovement,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MovementQuery {
    product_id: Option<i32>,
}

#[instrument(skip_all)]
async fn list_inventory(
    State(state): State<AppState>,
    filter: std::result::Result<Query<InventoryFilter>, QueryRejection>,
) -> Result<Json<Vec<Inventory>>> {
    let Query(filter) = filter?;
    Ok(Json(state.service.list_inventory(filter).await?))
}

#[instrument(skip_all)]
async fn create_inventory(
    State(state): State<AppState>,
    JsonBody(inventory): JsonBody<NewInventory>,
) -> Result<(StatusCode, Json<Inventory>)> {
    let row = state.service.create_inventory(inventory).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

#[instrument(skip_all, fields(user = %session.user.username))]
async fn transfer_inventory(
    State(state): State<AppState>,
    session: SessionUser,
    JsonBody(movement): JsonBody<NewMovement>,
) -> Result<Json<TransferResponse>> {
    let movement = state
        .service
        .record_movement(movement, Some(session.user.id))
        .await?;
    Ok(Json(TransferResponse {
        message: "Inventory transferred successfully",
        movement,
    }))
}

#[instrument(skip_all)]
async fn list_movements(
    State(state): State<AppState>,
    query: std::result::Result<Query<MovementQuery>, QueryRejection>,
) -> Result<Json<Vec<InventoryMovement>>> {
    let Query(query) = query?;
    Ok(Json(state.service.list_movements(query.product_id).await?))
}
