use crate::entities::{
    inventory, inventory_movements, locations, order_items, orders, products, users,
};
use crate::error::{InventoryError, Result};
use crate::models::{
    InventoryFilter, NewInventory, NewLocation, NewMovement, NewOrder, NewProduct,
};
use crate::storage::{AppliedMovement, InventoryStorage};
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use sea_orm::prelude::{DateTimeWithTimeZone, Decimal};
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

const DEFAULT_REORDER_POINT: i32 = 10;
const DEFAULT_UNIT: &str = "piece";

/// Map-backed store. Every table draws ids from one shared counter, so an id
/// is unique across entity kinds.
pub struct MemoryStorage {
    products: DashMap<i32, products::Model>,
    locations: DashMap<i32, locations::Model>,
    inventory: DashMap<i32, inventory::Model>,
    movements: DashMap<i32, inventory_movements::Model>,
    orders: DashMap<i32, orders::Model>,
    order_items: DashMap<i32, order_items::Model>,
    users: DashMap<i32, users::Model>,
    next_id: AtomicI32,
    // Serializes check-then-write sequences (unique keys, stock movements).
    write_lock: Mutex<()>,
}

impl MemoryStorage {
    /// An empty store seeded with the default warehouse.
    pub fn new() -> Self {
        let storage = Self::empty();
        storage.insert_location(NewLocation {
            name: "Main Warehouse".to_string(),
            address: "123 Main St".to_string(),
            location_type: Some("warehouse".to_string()),
            is_active: Some(true),
            capacity: Some(1000),
        });
        storage
    }

    /// A store without the seeded warehouse.
    pub fn empty() -> Self {
        Self {
            products: DashMap::new(),
            locations: DashMap::new(),
            inventory: DashMap::new(),
            movements: DashMap::new(),
            orders: DashMap::new(),
            order_items: DashMap::new(),
            users: DashMap::new(),
            next_id: AtomicI32::new(1),
            write_lock: Mutex::new(()),
        }
    }

    fn next_id(&self) -> i32 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    // The lock guards no data of its own, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn now() -> DateTimeWithTimeZone {
        Utc::now().into()
    }

    fn insert_location(&self, data: NewLocation) -> locations::Model {
        let location = locations::Model {
            id: self.next_id(),
            name: data.name,
            address: data.address,
            location_type: data.location_type.unwrap_or_else(|| "warehouse".to_string()),
            is_active: data.is_active.unwrap_or(true),
            capacity: data.capacity,
        };
        self.locations.insert(location.id, location.clone());
        location
    }

    fn insert_inventory(&self, data: NewInventory) -> inventory::Model {
        let row = inventory::Model {
            id: self.next_id(),
            product_id: data.product_id,
            location_id: data.location_id,
            quantity: data.quantity,
            reserved_quantity: data.reserved_quantity.unwrap_or(0),
            batch_number: data.batch_number.filter(|batch| !batch.is_empty()),
            expiry_date: data.expiry_date,
            last_updated: Self::now(),
        };
        self.inventory.insert(row.id, row.clone());
        row
    }

    fn find_inventory_id(&self, product_id: i32, location_id: i32) -> Option<i32> {
        self.inventory
            .iter()
            .find(|row| row.product_id == product_id && row.location_id == location_id)
            .map(|row| *row.key())
    }

    fn ensure_product(&self, id: i32) -> Result<()> {
        if self.products.contains_key(&id) {
            Ok(())
        } else {
            Err(InventoryError::validation(format!("unknown product {id}")))
        }
    }

    fn ensure_location(&self, id: i32) -> Result<()> {
        if self.locations.contains_key(&id) {
            Ok(())
        } else {
            Err(InventoryError::validation(format!("unknown location {id}")))
        }
    }

    fn sorted<T: Clone>(map: &DashMap<i32, T>) -> Vec<T> {
        let mut rows: Vec<(i32, T)> = map
            .iter()
            .map(|row| (*row.key(), row.value().clone()))
            .collect();
        rows.sort_by_key(|(id, _)| *id);
        rows.into_iter().map(|(_, row)| row).collect()
    }

    fn items_of(&self, order_id: i32) -> Vec<order_items::Model> {
        Self::sorted(&self.order_items)
            .into_iter()
            .filter(|item| item.order_id == order_id)
            .collect()
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InventoryStorage for MemoryStorage {
    async fn create_product(&self, data: NewProduct) -> Result<products::Model> {
        let _guard = self.lock();
        if self.products.iter().any(|product| product.sku == data.sku) {
            return Err(InventoryError::validation(format!(
                "SKU {} already exists",
                data.sku
            )));
        }

        let now = Self::now();
        let product = products::Model {
            id: self.next_id(),
            name: data.name,
            sku: data.sku,
            description: data.description,
            category: data.category,
            brand: data.brand,
            price: data.price,
            unit: data.unit.unwrap_or_else(|| DEFAULT_UNIT.to_string()),
            dimensions: data.dimensions.unwrap_or_else(|| serde_json::json!({})),
            reorder_point: data.reorder_point.unwrap_or(DEFAULT_REORDER_POINT),
            minimum_stock: data.minimum_stock,
            maximum_stock: data.maximum_stock,
            created_at: now,
            updated_at: now,
        };
        self.products.insert(product.id, product.clone());

        let initial_quantity = data.initial_quantity.unwrap_or(0);
        if initial_quantity > 0 {
            let default_location = self.locations.iter().map(|location| *location.key()).min();
            if let Some(location_id) = default_location {
                self.insert_inventory(NewInventory {
                    product_id: product.id,
                    location_id,
                    quantity: initial_quantity,
                    ..Default::default()
                });
            }
        }

        Ok(product)
    }

    async fn list_products(&self) -> Result<Vec<products::Model>> {
        Ok(Self::sorted(&self.products))
    }

    async fn get_product(&self, id: i32) -> Result<products::Model> {
        self.products
            .get(&id)
            .map(|product| product.clone())
            .ok_or(InventoryError::NotFound("Product"))
    }

    async fn create_location(&self, data: NewLocation) -> Result<locations::Model> {
        Ok(self.insert_location(data))
    }

    async fn list_locations(&self) -> Result<Vec<locations::Model>> {
        Ok(Self::sorted(&self.locations))
    }

    async fn get_location(&self, id: i32) -> Result<locations::Model> {
        self.locations
            .get(&id)
            .map(|location| location.clone())
            .ok_or(InventoryError::NotFound("Location"))
    }

    async fn create_inventory(&self, data: NewInventory) -> Result<inventory::Model> {
        let _guard = self.lock();
        self.ensure_product(data.product_id)?;
        self.ensure_location(data.location_id)?;
        if self
            .find_inventory_id(data.product_id, data.location_id)
            .is_some()
        {
            return Err(InventoryError::validation(format!(
                "inventory for product {} at location {} already exists",
                data.product_id, data.location_id
            )));
        }
        Ok(self.insert_inventory(data))
    }

    async fn list_inventory(&self, filter: InventoryFilter) -> Result<Vec<inventory::Model>> {
        Ok(Self::sorted(&self.inventory)
            .into_iter()
            .filter(|row| filter.matches(row))
            .collect())
    }

    async fn apply_movement(
        &self,
        data: NewMovement,
        user_id: Option<i32>,
    ) -> Result<AppliedMovement> {
        let _guard = self.lock();
        self.ensure_product(data.product_id)?;
        for location_id in [data.from_location_id, data.to_location_id].into_iter().flatten() {
            self.ensure_location(location_id)?;
        }

        let source_id = match data.from_location_id {
            Some(location_id) => {
                let row_id = self.find_inventory_id(data.product_id, location_id);
                let available = row_id
                    .and_then(|id| self.inventory.get(&id).map(|row| row.available()))
                    .unwrap_or(0);
                if available < data.quantity {
                    return Err(InventoryError::InsufficientStock {
                        location_id,
                        available,
                        requested: data.quantity,
                    });
                }
                row_id
            }
            None => None,
        };

        // Resolve the destination before touching any row so an overflow
        // leaves the store unchanged.
        let destination = match data.to_location_id {
            Some(location_id) => match self.find_inventory_id(data.product_id, location_id) {
                Some(row_id) => {
                    let current = self
                        .inventory
                        .get(&row_id)
                        .map(|row| row.quantity)
                        .unwrap_or(0);
                    let quantity = current
                        .checked_add(data.quantity)
                        .ok_or_else(|| InventoryError::validation("quantity overflow"))?;
                    Some((location_id, Some((row_id, quantity))))
                }
                None => Some((location_id, None)),
            },
            None => None,
        };

        let now = Self::now();
        let batch_number = data.batch_number.clone().filter(|batch| !batch.is_empty());
        let mut touched = Vec::with_capacity(2);

        if let Some(row_id) = source_id {
            if let Some(mut row) = self.inventory.get_mut(&row_id) {
                row.quantity -= data.quantity;
                row.last_updated = now;
                touched.push(row.clone());
            }
        }

        match destination {
            Some((_, Some((row_id, quantity)))) => {
                if let Some(mut row) = self.inventory.get_mut(&row_id) {
                    row.quantity = quantity;
                    row.last_updated = now;
                    if batch_number.is_some() {
                        row.batch_number = batch_number.clone();
                    }
                    if data.expiry_date.is_some() {
                        row.expiry_date = data.expiry_date;
                    }
                    touched.push(row.clone());
                }
            }
            Some((location_id, None)) => touched.push(self.insert_inventory(NewInventory {
                product_id: data.product_id,
                location_id,
                quantity: data.quantity,
                reserved_quantity: Some(0),
                batch_number: batch_number.clone(),
                expiry_date: data.expiry_date,
            })),
            None => {}
        }

        let movement = inventory_movements::Model {
            id: self.next_id(),
            product_id: data.product_id,
            from_location_id: data.from_location_id,
            to_location_id: data.to_location_id,
            quantity: data.quantity,
            movement_type: data.movement_type.unwrap_or_else(|| "transfer".to_string()),
            reference: data.reference,
            reason: data.reason,
            batch_number,
            timestamp: now,
            user_id,
        };
        self.movements.insert(movement.id, movement.clone());

        Ok(AppliedMovement { movement, touched })
    }

    async fn list_movements(
        &self,
        product_id: Option<i32>,
    ) -> Result<Vec<inventory_movements::Model>> {
        Ok(Self::sorted(&self.movements)
            .into_iter()
            .filter(|movement| product_id.map_or(true, |id| movement.product_id == id))
            .collect())
    }

    async fn create_order(
        &self,
        data: NewOrder,
    ) -> Result<(orders::Model, Vec<order_items::Model>)> {
        for item in &data.items {
            self.ensure_product(item.product_id)?;
        }

        let items_total = data
            .items
            .iter()
            .try_fold(Decimal::ZERO, |total, item| {
                item.price
                    .checked_mul(Decimal::from(item.quantity))
                    .and_then(|line| total.checked_add(line))
            })
            .ok_or_else(|| InventoryError::validation("order total overflow"))?;
        let order = orders::Model {
            id: self.next_id(),
            customer_id: data.customer_id,
            status: data.status.unwrap_or_else(|| "pending".to_string()),
            total: data.total.unwrap_or(items_total),
            created_at: Self::now(),
        };
        self.orders.insert(order.id, order.clone());

        let items = data
            .items
            .into_iter()
            .map(|item| {
                let item = order_items::Model {
                    id: self.next_id(),
                    order_id: order.id,
                    product_id: item.product_id,
                    quantity: item.quantity,
                    price: item.price,
                };
                self.order_items.insert(item.id, item.clone());
                item
            })
            .collect();

        Ok((order, items))
    }

    async fn list_orders(&self) -> Result<Vec<orders::Model>> {
        Ok(Self::sorted(&self.orders))
    }

    async fn get_order(&self, id: i32) -> Result<(orders::Model, Vec<order_items::Model>)> {
        let order = self
            .orders
            .get(&id)
            .map(|order| order.clone())
            .ok_or(InventoryError::NotFound("Order"))?;
        Ok((order, self.items_of(id)))
    }

    async fn create_user(&self, username: &str, password_digest: &str) -> Result<users::Model> {
        let _guard = self.lock();
        if self.users.iter().any(|user| user.username == username) {
            return Err(InventoryError::validation("Username already exists"));
        }
        let user = users::Model {
            id: self.next_id(),
            username: username.to_string(),
            password: password_digest.to_string(),
            role: "user".to_string(),
            created_at: Self::now(),
        };
        self.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: i32) -> Result<users::Model> {
        self.users
            .get(&id)
            .map(|user| user.clone())
            .ok_or(InventoryError::NotFound("User"))
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<users::Model>> {
        Ok(self
            .users
            .iter()
            .find(|user| user.username == username)
            .map(|user| user.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget(sku: &str) -> NewProduct {
        NewProduct {
            name: "Widget".to_string(),
            sku: sku.to_string(),
            price: Decimal::new(250, 2),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_seeded_warehouse() -> Result<()> {
        let storage = MemoryStorage::new();
        let locations = storage.list_locations().await?;
        assert_eq!(locations.len(), 1);
        assert_eq!(locations[0].name, "Main Warehouse");
        assert_eq!(locations[0].capacity, Some(1000));
        assert!(locations[0].is_active);
        Ok(())
    }

    #[tokio::test]
    async fn test_ids_are_shared_across_tables() -> Result<()> {
        let storage = MemoryStorage::empty();
        let location = storage
            .create_location(NewLocation {
                name: "Store".into(),
                address: "1 High St".into(),
                ..Default::default()
            })
            .await?;
        let product = storage.create_product(widget("W-1")).await?;
        assert_eq!(location.id, 1);
        assert_eq!(product.id, 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_product_defaults_and_initial_stock() -> Result<()> {
        let storage = MemoryStorage::new();
        let product = storage
            .create_product(NewProduct {
                initial_quantity: Some(25),
                ..widget("W-1")
            })
            .await?;
        assert_eq!(product.unit, "piece");
        assert_eq!(product.reorder_point, 10);
        assert_eq!(product.dimensions, serde_json::json!({}));

        let rows = storage
            .list_inventory(InventoryFilter {
                product_id: Some(product.id),
                location_id: None,
            })
            .await?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].quantity, 25);
        assert_eq!(rows[0].location_id, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_sku_rejected() -> Result<()> {
        let storage = MemoryStorage::new();
        storage.create_product(widget("W-1")).await?;
        let result = storage.create_product(widget("W-1")).await;
        assert!(matches!(result, Err(InventoryError::Validation(_))));
        assert_eq!(storage.list_products().await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_get_nonexistent_product() {
        let storage = MemoryStorage::new();
        let result = storage.get_product(42).await;
        assert!(matches!(result, Err(InventoryError::NotFound("Product"))));
        tokio_test::assert_ok!(storage.get_location(1).await);
    }

    #[tokio::test]
    async fn test_inventory_requires_known_references() -> Result<()> {
        let storage = MemoryStorage::new();
        let product = storage.create_product(widget("W-1")).await?;
        let unknown_location = storage
            .create_inventory(NewInventory {
                product_id: product.id,
                location_id: 999,
                quantity: 1,
                ..Default::default()
            })
            .await;
        assert!(matches!(unknown_location, Err(InventoryError::Validation(_))));

        storage
            .create_inventory(NewInventory {
                product_id: product.id,
                location_id: 1,
                quantity: 1,
                ..Default::default()
            })
            .await?;
        let duplicate = storage
            .create_inventory(NewInventory {
                product_id: product.id,
                location_id: 1,
                quantity: 1,
                ..Default::default()
            })
            .await;
        assert!(matches!(duplicate, Err(InventoryError::Validation(_))));
        Ok(())
    }

    #[tokio::test]
    async fn test_transfer_moves_stock() -> Result<()> {
        let storage = MemoryStorage::new();
        let store = storage
            .create_location(NewLocation {
                name: "Downtown".into(),
                address: "5 Market St".into(),
                location_type: Some("store".into()),
                ..Default::default()
            })
            .await?;
        let product = storage
            .create_product(NewProduct {
                initial_quantity: Some(20),
                ..widget("W-1")
            })
            .await?;

        let applied = storage
            .apply_movement(
                NewMovement {
                    product_id: product.id,
                    from_location_id: Some(1),
                    to_location_id: Some(store.id),
                    quantity: 8,
                    batch_number: Some("B-7".into()),
                    ..Default::default()
                },
                Some(99),
            )
            .await?;

        assert_eq!(applied.movement.movement_type, "transfer");
        assert_eq!(applied.movement.user_id, Some(99));
        assert_eq!(applied.touched.len(), 2);
        assert_eq!(applied.touched[0].quantity, 12);
        assert_eq!(applied.touched[1].quantity, 8);
        assert_eq!(applied.touched[1].batch_number.as_deref(), Some("B-7"));

        let movements = storage.list_movements(Some(product.id)).await?;
        assert_eq!(movements.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_transfer_rejects_overdraw() -> Result<()> {
        let storage = MemoryStorage::new();
        let product = storage
            .create_product(NewProduct {
                initial_quantity: Some(3),
                ..widget("W-1")
            })
            .await?;

        let result = storage
            .apply_movement(
                NewMovement {
                    product_id: product.id,
                    from_location_id: Some(1),
                    quantity: 5,
                    movement_type: Some("shipment".into()),
                    ..Default::default()
                },
                None,
            )
            .await;
        assert!(matches!(
            result,
            Err(InventoryError::InsufficientStock {
                available: 3,
                requested: 5,
                ..
            })
        ));

        let rows = storage.list_inventory(InventoryFilter::default()).await?;
        assert_eq!(rows[0].quantity, 3);
        assert!(storage.list_movements(None).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_receipt_creates_destination_row() -> Result<()> {
        let storage = MemoryStorage::new();
        let product = storage.create_product(widget("W-1")).await?;
        let applied = storage
            .apply_movement(
                NewMovement {
                    product_id: product.id,
                    to_location_id: Some(1),
                    quantity: 40,
                    movement_type: Some("receipt".into()),
                    ..Default::default()
                },
                None,
            )
            .await?;
        assert_eq!(applied.touched.len(), 1);
        assert_eq!(applied.touched[0].quantity, 40);
        assert_eq!(applied.touched[0].reserved_quantity, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_order_total_defaults_to_items() -> Result<()> {
        let storage = MemoryStorage::new();
        let product = storage.create_product(widget("W-1")).await?;
        let (order, items) = storage
            .create_order(NewOrder {
                customer_id: 4,
                items: vec![crate::models::NewOrderItem {
                    product_id: product.id,
                    quantity: 3,
                    price: Decimal::new(250, 2),
                }],
                ..Default::default()
            })
            .await?;
        assert_eq!(order.total, Decimal::new(750, 2));
        assert_eq!(order.status, "pending");
        assert_eq!(items.len(), 1);

        let (fetched, fetched_items) = storage.get_order(order.id).await?;
        assert_eq!(fetched, order);
        assert_eq!(fetched_items, items);
        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() -> Result<()> {
        let storage = MemoryStorage::new();
        storage.create_user("alice", "digest").await?;
        tokio_test::assert_err!(storage.create_user("alice", "other").await);
        let found = storage.find_user_by_username("alice").await?;
        assert_eq!(found.map(|user| user.role), Some("user".to_string()));
        Ok(())
    }

    #[tokio::test]
    async fn test_receipt_overflow_is_rejected_and_store_stays_writable() -> Result<()> {
        let storage = MemoryStorage::new();
        let product = storage
            .create_product(NewProduct {
                initial_quantity: Some(i32::MAX),
                ..widget("W-1")
            })
            .await?;

        let result = storage
            .apply_movement(
                NewMovement {
                    product_id: product.id,
                    to_location_id: Some(1),
                    quantity: 1,
                    movement_type: Some("receipt".into()),
                    ..Default::default()
                },
                None,
            )
            .await;
        assert!(matches!(result, Err(InventoryError::Validation(ref m)) if m == "quantity overflow"));

        let rows = storage.list_inventory(InventoryFilter::default()).await?;
        assert_eq!(rows[0].quantity, i32::MAX);
        assert!(storage.list_movements(None).await?.is_empty());

        tokio_test::assert_ok!(storage.create_product(widget("W-2")).await);
        Ok(())
    }

    #[tokio::test]
    async fn test_transfer_overflow_leaves_source_untouched() -> Result<()> {
        let storage = MemoryStorage::new();
        let outlet = storage
            .create_location(NewLocation {
                name: "Outlet".into(),
                address: "3 Quay".into(),
                ..Default::default()
            })
            .await?;
        let product = storage
            .create_product(NewProduct {
                initial_quantity: Some(5),
                ..widget("W-1")
            })
            .await?;
        storage
            .apply_movement(
                NewMovement {
                    product_id: product.id,
                    to_location_id: Some(outlet.id),
                    quantity: i32::MAX,
                    movement_type: Some("receipt".into()),
                    ..Default::default()
                },
                None,
            )
            .await?;

        let result = storage
            .apply_movement(
                NewMovement {
                    product_id: product.id,
                    from_location_id: Some(1),
                    to_location_id: Some(outlet.id),
                    quantity: 5,
                    ..Default::default()
                },
                None,
            )
            .await;
        assert!(result.is_err());

        let warehouse = storage
            .list_inventory(InventoryFilter {
                product_id: Some(product.id),
                location_id: Some(1),
            })
            .await?;
        assert_eq!(warehouse[0].quantity, 5);
        Ok(())
    }

    #[tokio::test]
    async fn test_order_total_overflow_rejected() -> Result<()> {
        let storage = MemoryStorage::new();
        let product = storage.create_product(widget("W-1")).await?;
        let result = storage
            .create_order(NewOrder {
                customer_id: 1,
                items: vec![crate::models::NewOrderItem {
                    product_id: product.id,
                    quantity: 2,
                    price: Decimal::MAX,
                }],
                ..Default::default()
            })
            .await;
        assert!(matches!(result, Err(InventoryError::Validation(_))));
        assert!(storage.list_orders().await?.is_empty());
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_transfers_do_not_lose_updates() -> Result<()> {
        const TRANSFERS: i32 = 64;

        let storage = std::sync::Arc::new(MemoryStorage::new());
        let outlet = storage
            .create_location(NewLocation {
                name: "Outlet".into(),
                address: "3 Quay".into(),
                ..Default::default()
            })
            .await?;
        let product = storage
            .create_product(NewProduct {
                initial_quantity: Some(TRANSFERS),
                ..widget("W-1")
            })
            .await?;

        let (product_id, outlet_id) = (product.id, outlet.id);

        let handles: Vec<_> = (0..TRANSFERS)
            .map(|_| {
                let storage = storage.clone();
                tokio::spawn(async move {
                    storage
                        .apply_movement(
                            NewMovement {
                                product_id,
                                from_location_id: Some(1),
                                to_location_id: Some(outlet_id),
                                quantity: 1,
                                ..Default::default()
                            },
                            None,
                        )
                        .await
                })
            })
            .collect();
        for handle in handles {
            handle.await.expect("transfer task panicked")?;
        }

        let quantity_at = |location_id| {
            let storage = storage.clone();
            async move {
                storage
                    .list_inventory(InventoryFilter {
                        product_id: Some(product_id),
                        location_id: Some(location_id),
                    })
                    .await
                    .map(|rows| rows[0].quantity)
            }
        };
        assert_eq!(quantity_at(1).await?, 0);
        assert_eq!(quantity_at(outlet_id).await?, TRANSFERS);
        assert_eq!(
            storage.list_movements(Some(product_id)).await?.len(),
            TRANSFERS as usize
        );
        Ok(())
    }
}
