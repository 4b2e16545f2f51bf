use crate::api::error::JsonBody;
use crate::api::AppState;
use crate::entities::products::Model as Product;
use crate::error::Result;
use crate::models::NewProduct;
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use tracing::instrument;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/:id", get(get_product))
}

#[instrument(skip_all)]
async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    Ok(Json(state.service.list_products().await?))
}

#[instrument(skip_all, fields(sku = %product.sku))]
async fn create_product(
    State(state): State<AppState>,
    JsonBody(product): JsonBody<NewProduct>,
) -> Result<(StatusCode, Json<Product>)> {
    let product = state.service.create_product(product).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

#[instrument(skip_all)]
async fn get_product(
    State(state): State<AppState>,
    id: std::result::Result<Path<i32>, PathRejection>,
) -> Result<Json<Product>> {
    let Path(id) = id?;
    Ok(Json(state.service.get_product(id).await?))
}
