use crate::entities::{
    inventory, inventory_movements, locations, order_items, orders, products, users,
};
use crate::error::Result;
use crate::models::{
    InventoryFilter, NewInventory, NewLocation, NewMovement, NewOrder, NewProduct,
};
use async_trait::async_trait;

/// Result of applying a movement: the stored movement plus every inventory row
/// it touched, in source-then-destination order.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedMovement {
    pub movement: inventory_movements::Model,
    pub touched: Vec<inventory::Model>,
}

#[async_trait]
pub trait InventoryStorage: Send + Sync {
    async fn create_product(&self, product: NewProduct) -> Result<products::Model>;
    async fn list_products(&self) -> Result<Vec<products::Model>>;
    async fn get_product(&self, id: i32) -> Result<products::Model>;

    async fn create_location(&self, location: NewLocation) -> Result<locations::Model>;
    async fn list_locations(&self) -> Result<Vec<locations::Model>>;
    async fn get_location(&self, id: i32) -> Result<locations::Model>;

    async fn create_inventory(&self, inventory: NewInventory) -> Result<inventory::Model>;
    async fn list_inventory(&self, filter: InventoryFilter) -> Result<Vec<inventory::Model>>;

    async fn apply_movement(
        &self,
        movement: NewMovement,
        user_id: Option<i32>,
    ) -> Result<AppliedMovement>;
    async fn list_movements(&self, product_id: Option<i32>)
        -> Result<Vec<inventory_movements::Model>>;

    async fn create_order(
        &self,
        order: NewOrder,
    ) -> Result<(orders::Model, Vec<order_items::Model>)>;
    async fn list_orders(&self) -> Result<Vec<orders::Model>>;
    async fn get_order(&self, id: i32) -> Result<(orders::Model, Vec<order_items::Model>)>;

    async fn create_user(&self, username: &str, password_digest: &str) -> Result<users::Model>;
    async fn get_user(&self, id: i32) -> Result<users::Model>;
    async fn find_user_by_username(&self, username: &str) -> Result<Option<users::Model>>;
}

pub mod memory;
