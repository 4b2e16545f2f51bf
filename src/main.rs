use anyhow::Result;
use futures::StreamExt;
use std::sync::Arc;
use stockroom::api::{self, AppState};
use stockroom::auth::SessionStore;
use stockroom::config::Config;
use stockroom::consultant::OpenAiConsultant;
use stockroom::storage::memory::MemoryStorage;
use stockroom::{InventoryEvent, InventoryService};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; the environment may already be set.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("stockroom=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;
    if config.consultant().api_key().is_none() {
        tracing::warn!("OPENAI_API_KEY is not set; consultant requests will fail");
    }

    let service = InventoryService::with_sessions(
        MemoryStorage::new(),
        SessionStore::with_ttl(*config.session_ttl()),
    );

    let mut events = service.subscribe();
    tokio::spawn(async move {
        while let Some(Ok(event)) = events.next().await {
            match event {
                InventoryEvent::ProductCreated(product) => {
                    tracing::debug!(id = product.id, sku = %product.sku, "event: product created")
                }
                InventoryEvent::LocationCreated(location) => {
                    tracing::debug!(id = location.id, "event: location created")
                }
                InventoryEvent::InventoryChanged(row) => tracing::debug!(
                    id = row.id,
                    quantity = row.quantity,
                    "event: inventory changed"
                ),
                InventoryEvent::MovementRecorded(movement) => {
                    tracing::debug!(id = movement.id, "event: movement recorded")
                }
                InventoryEvent::OrderCreated(order) => {
                    tracing::debug!(id = order.id, "event: order created")
                }
            }
        }
    });

    let consultant = OpenAiConsultant::new(config.consultant().clone())?;
    let state = AppState::new(service, Arc::new(consultant));

    api::serve(config.socket_addr()?, state).await
}
