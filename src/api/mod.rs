use crate::consultant::AdviceProvider;
use crate::storage::memory::MemoryStorage;
use crate::InventoryService;
use anyhow::Context;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod consultant;
pub mod error;
mod inventory;
mod locations;
mod orders;
mod products;
pub mod session;
mod stats;
mod users;
mod ws;

pub use error::{ErrorResponse, JsonBody};
pub use session::SessionUser;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<InventoryService<MemoryStorage>>,
    pub consultant: Arc<dyn AdviceProvider>,
}

impl AppState {
    pub fn new(service: InventoryService<MemoryStorage>, consultant: Arc<dyn AdviceProvider>) -> Self {
        Self {
            service: Arc::new(service),
            consultant,
        }
    }
}

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .nest("/products", products::router())
        .nest("/locations", locations::router())
        .nest("/inventory", inventory::router())
        .nest("/orders", orders::router())
        .route("/stats", get(stats::get_stats))
        .route("/consultant/advice", post(consultant::get_advice))
        .merge(users::router());

    Router::new()
        .nest("/api", api)
        .route("/ws", get(ws::subscribe))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}

pub async fn serve(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("inventory service is up and running on {}", addr);

    axum::serve(listener, router(state).into_make_service())
        .await
        .context("error running server")
}
