pub mod api;
pub mod auth;
pub mod config;
pub mod consultant;
pub mod entities;
pub mod error;
mod models;
pub mod notifications;
pub mod stats;
pub mod storage;

pub use error::{InventoryError, Result};
pub use models::{
    Credentials, InventoryEvent, InventoryFilter, NewInventory, NewLocation, NewMovement,
    NewOrder, NewOrderItem, NewProduct, NewUser, OrderWithItems,
};

use auth::SessionStore;
use chrono::{DateTime, FixedOffset, Utc};
use entities::{inventory, inventory_movements, locations, orders, products, users};
use notifications::NotificationHub;
use stats::DashboardStats;
use storage::InventoryStorage;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use uuid::Uuid;

/// Entry point for every inventory operation. Wraps a store, keeps login
/// sessions and publishes an [`InventoryEvent`] for each change.
pub struct InventoryService<S: InventoryStorage> {
    storage: S,
    sessions: SessionStore,
    hub: NotificationHub,
}

impl<S: InventoryStorage> InventoryService<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            sessions: SessionStore::new(),
            hub: NotificationHub::new(),
        }
    }

    /// Like [`InventoryService::new`] with a caller-supplied session table,
    /// e.g. one with a custom expiry.
    pub fn with_sessions(storage: S, sessions: SessionStore) -> Self {
        Self {
            storage,
            sessions,
            hub: NotificationHub::new(),
        }
    }

    pub fn subscribe(&self) -> BroadcastStream<InventoryEvent> {
        BroadcastStream::new(self.hub.sender().subscribe())
    }

    pub fn notifications(&self) -> broadcast::Sender<InventoryEvent> {
        self.hub.sender()
    }

    fn publish(&self, event: InventoryEvent) {
        // No subscribers is not an error.
        let _ = self.hub.sender().send(event);
    }

    pub async fn create_product(&self, product: NewProduct) -> Result<products::Model> {
        product.check()?;
        let product = self.storage.create_product(product).await?;
        tracing::info!(id = product.id, sku = %product.sku, "product created");
        self.publish(InventoryEvent::ProductCreated(product.clone()));
        Ok(product)
    }

    pub async fn list_products(&self) -> Result<Vec<products::Model>> {
        self.storage.list_products().await
    }

    pub async fn get_product(&self, id: i32) -> Result<products::Model> {
        self.storage.get_product(id).await
    }

    pub async fn create_location(&self, location: NewLocation) -> Result<locations::Model> {
        location.check()?;
        let location = self.storage.create_location(location).await?;
        tracing::info!(id = location.id, name = %location.name, "location created");
        self.publish(InventoryEvent::LocationCreated(location.clone()));
        Ok(location)
    }

    pub async fn list_locations(&self) -> Result<Vec<locations::Model>> {
        self.storage.list_locations().await
    }

    pub async fn get_location(&self, id: i32) -> Result<locations::Model> {
        self.storage.get_location(id).await
    }

    pub async fn create_inventory(&self, inventory: NewInventory) -> Result<inventory::Model> {
        inventory.check()?;
        let row = self.storage.create_inventory(inventory).await?;
        self.publish(InventoryEvent::InventoryChanged(row.clone()));
        Ok(row)
    }

    pub async fn list_inventory(&self, filter: InventoryFilter) -> Result<Vec<inventory::Model>> {
        self.storage.list_inventory(filter).await
    }

    /// Records a transfer, receipt, shipment or adjustment and updates the
    /// affected stock rows.
    pub async fn record_movement(
        &self,
        movement: NewMovement,
        user_id: Option<i32>,
    ) -> Result<inventory_movements::Model> {
        movement.check()?;
        let applied = self.storage.apply_movement(movement, user_id).await?;
        tracing::info!(
            id = applied.movement.id,
            product_id = applied.movement.product_id,
            from = ?applied.movement.from_location_id,
            to = ?applied.movement.to_location_id,
            quantity = applied.movement.quantity,
            "inventory movement recorded"
        );
        for row in applied.touched {
            self.publish(InventoryEvent::InventoryChanged(row));
        }
        self.publish(InventoryEvent::MovementRecorded(applied.movement.clone()));
        Ok(applied.movement)
    }

    pub async fn list_movements(
        &self,
        product_id: Option<i32>,
    ) -> Result<Vec<inventory_movements::Model>> {
        self.storage.list_movements(product_id).await
    }

    pub async fn create_order(&self, order: NewOrder) -> Result<OrderWithItems> {
        order.check()?;
        let (order, items) = self.storage.create_order(order).await?;
        tracing::info!(id = order.id, total = %order.total, "order created");
        self.publish(InventoryEvent::OrderCreated(order.clone()));
        Ok(OrderWithItems { order, items })
    }

    pub async fn list_orders(&self) -> Result<Vec<orders::Model>> {
        self.storage.list_orders().await
    }

    pub async fn get_order(&self, id: i32) -> Result<OrderWithItems> {
        let (order, items) = self.storage.get_order(id).await?;
        Ok(OrderWithItems { order, items })
    }

    pub async fn dashboard_stats(&self, now: DateTime<FixedOffset>) -> Result<DashboardStats> {
        let products = self.storage.list_products().await?;
        let locations = self.storage.list_locations().await?;
        let inventory = self.storage.list_inventory(InventoryFilter::default()).await?;
        let orders = self.storage.list_orders().await?;
        stats::compute(&products, &locations, &inventory, &orders, now)
    }

    /// Snapshot handed to the consultant alongside the user's question.
    pub async fn consultant_context(
        &self,
        client_context: Option<serde_json::Value>,
    ) -> Result<serde_json::Value> {
        let stats = self.dashboard_stats(Utc::now().fixed_offset()).await?;
        let locations = self.storage.list_locations().await?;
        let inventory = self.storage.list_inventory(InventoryFilter::default()).await?;
        let orders = self.storage.list_orders().await?;
        Ok(serde_json::json!({
            "stats": stats,
            "locations": locations,
            "inventory": inventory,
            "orders": orders,
            "clientContext": client_context,
        }))
    }

    pub async fn register(&self, user: NewUser) -> Result<(users::Model, Uuid)> {
        use validator::Validate;
        user.validate()?;
        let digest = auth::hash_password(&user.password)?;
        let user = self.storage.create_user(&user.username, &digest).await?;
        tracing::info!(id = user.id, username = %user.username, "user registered");
        let token = self.sessions.open(user.id);
        Ok((user, token))
    }

    pub async fn login(&self, credentials: Credentials) -> Result<(users::Model, Uuid)> {
        let user = self
            .storage
            .find_user_by_username(&credentials.username)
            .await?
            .filter(|user| auth::verify_password(&credentials.password, &user.password))
            .ok_or(InventoryError::Unauthorized)?;
        let token = self.sessions.open(user.id);
        Ok((user, token))
    }

    pub fn logout(&self, token: &Uuid) -> bool {
        self.sessions.close(token)
    }

    /// Resolves a bearer token to its user.
    pub async fn session_user(&self, token: &Uuid) -> Result<users::Model> {
        let user_id = self
            .sessions
            .user_id(token)
            .ok_or(InventoryError::Unauthorized)?;
        self.storage
            .get_user(user_id)
            .await
            .map_err(|_| InventoryError::Unauthorized)
    }
}
