use crate::api::error::JsonBody;
use crate::api::AppState;
use crate::entities::orders::Model as Order;
use crate::error::Result;
use crate::models::{NewOrder, OrderWithItems};
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use tracing::instrument;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders).post(create_order))
        .route("/:id", get(get_order))
}

#[instrument(skip_all)]
async fn list_orders(State(state): State<AppState>) -> Result<Json<Vec<Order>>> {
    Ok(Json(state.service.list_orders().await?))
}

#[instrument(skip_all, fields(customer_id = order.customer_id))]
async fn create_order(
    State(state): State<AppState>,
    JsonBody(order): JsonBody<NewOrder>,
) -> Result<(StatusCode, Json<OrderWithItems>)> {
    let order = state.service.create_order(order).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

#[instrument(skip_all)]
async fn get_order(
    State(state): State<AppState>,
    id: std::result::Result<Path<i32>, PathRejection>,
) -> Result<Json<OrderWithItems>> {
    let Path(id) = id?;
    Ok(Json(state.service.get_order(id).await?))
}
