use crate::entities::inventory::Model as Inventory;
use crate::entities::inventory_movements::Model as InventoryMovement;
use crate::entities::locations::Model as Location;
use crate::entities::order_items::Model as OrderItem;
use crate::entities::orders::Model as Order;
use crate::entities::products::Model as Product;
use crate::error::{InventoryError, Result};
use chrono::{DateTime, FixedOffset, NaiveDate};
use sea_orm::prelude::{Decimal, Json};
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

pub const LOCATION_TYPES: &[&str] = &["warehouse", "store", "supplier"];
pub const MOVEMENT_TYPES: &[&str] = &["transfer", "adjustment", "receipt", "shipment"];
pub const ORDER_STATUSES: &[&str] = &["pending", "completed", "cancelled"];

/// Change notifications fanned out to websocket subscribers.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub enum InventoryEvent {
    ProductCreated(Product),
    LocationCreated(Location),
    InventoryChanged(Inventory),
    MovementRecorded(InventoryMovement),
    OrderCreated(Order),
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 64))]
    pub sku: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub price: Decimal,
    pub unit: Option<String>,
    pub dimensions: Option<Json>,
    #[validate(range(min = 0))]
    pub reorder_point: Option<i32>,
    #[validate(range(min = 0))]
    pub minimum_stock: Option<i32>,
    #[validate(range(min = 0))]
    pub maximum_stock: Option<i32>,
    #[validate(range(min = 0))]
    pub initial_quantity: Option<i32>,
}

impl NewProduct {
    pub fn check(&self) -> Result<()> {
        self.validate()?;
        if self.price.is_sign_negative() {
            return Err(InventoryError::validation("price must not be negative"));
        }
        if let (Some(min), Some(max)) = (self.minimum_stock, self.maximum_stock) {
            if min > max {
                return Err(InventoryError::validation(
                    "minimumStock must not exceed maximumStock",
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewLocation {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1))]
    pub address: String,
    #[serde(rename = "type")]
    pub location_type: Option<String>,
    pub is_active: Option<bool>,
    #[validate(range(min = 0))]
    pub capacity: Option<i32>,
}

impl NewLocation {
    pub fn check(&self) -> Result<()> {
        self.validate()?;
        check_one_of("type", self.location_type.as_deref(), LOCATION_TYPES)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewInventory {
    pub product_id: i32,
    pub location_id: i32,
    #[validate(range(min = 0))]
    pub quantity: i32,
    #[validate(range(min = 0))]
    pub reserved_quantity: Option<i32>,
    pub batch_number: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub expiry_date: Option<DateTime<FixedOffset>>,
}

impl NewInventory {
    pub fn check(&self) -> Result<()> {
        self.validate()?;
        if self.reserved_quantity.unwrap_or(0) > self.quantity {
            return Err(InventoryError::validation(
                "reservedQuantity must not exceed quantity",
            ));
        }
        Ok(())
    }
}

/// A stock movement request. A transfer names both locations, a receipt only
/// the destination and a shipment only the source.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewMovement {
    pub product_id: i32,
    pub from_location_id: Option<i32>,
    pub to_location_id: Option<i32>,
    #[validate(range(min = 1))]
    pub quantity: i32,
    #[serde(rename = "type")]
    pub movement_type: Option<String>,
    pub reference: Option<String>,
    pub reason: Option<String>,
    pub batch_number: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub expiry_date: Option<DateTime<FixedOffset>>,
}

impl NewMovement {
    pub fn check(&self) -> Result<()> {
        self.validate()?;
        check_one_of("type", self.movement_type.as_deref(), MOVEMENT_TYPES)?;
        match (self.from_location_id, self.to_location_id) {
            (None, None) => Err(InventoryError::validation(
                "Must specify at least one location",
            )),
            (Some(from), Some(to)) if from == to => Err(InventoryError::validation(
                "source and destination locations must differ",
            )),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderItem {
    pub product_id: i32,
    #[validate(range(min = 1))]
    pub quantity: i32,
    pub price: Decimal,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub customer_id: i32,
    pub status: Option<String>,
    pub total: Option<Decimal>,
    #[serde(default)]
    #[validate(nested)]
    pub items: Vec<NewOrderItem>,
}

impl NewOrder {
    pub fn check(&self) -> Result<()> {
        self.validate()?;
        check_one_of("status", self.status.as_deref(), ORDER_STATUSES)?;
        if self.total.is_none() && self.items.is_empty() {
            return Err(InventoryError::validation(
                "an order needs a total or at least one item",
            ));
        }
        let negative_price = self.items.iter().any(|item| item.price.is_sign_negative());
        if negative_price || self.total.is_some_and(|total| total.is_sign_negative()) {
            return Err(InventoryError::validation("amounts must not be negative"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewUser {
    #[validate(length(min = 3, max = 64))]
    pub username: String,
    #[validate(length(min = 6))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryFilter {
    pub product_id: Option<i32>,
    pub location_id: Option<i32>,
}

impl InventoryFilter {
    pub fn matches(&self, row: &Inventory) -> bool {
        self.product_id.map_or(true, |id| row.product_id == id)
            && self.location_id.map_or(true, |id| row.location_id == id)
    }
}

fn check_one_of(field: &str, value: Option<&str>, allowed: &[&str]) -> Result<()> {
    match value {
        Some(value) if !allowed.contains(&value) => Err(InventoryError::validation(format!(
            "{field} must be one of {}",
            allowed.join(", ")
        ))),
        _ => Ok(()),
    }
}

/// Accepts RFC 3339 timestamps as well as the bare `YYYY-MM-DD` a date input
/// produces (taken as midnight UTC). Empty strings mean "no date".
fn deserialize_optional_date<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<DateTime<FixedOffset>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    let Some(raw) = raw.filter(|raw| !raw.trim().is_empty()) else {
        return Ok(None);
    };
    if let Ok(parsed) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(parsed));
    }
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| Some(midnight.and_utc().fixed_offset()))
        .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {raw}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_product_payload_accepts_string_price() {
        let product: NewProduct = serde_json::from_value(json!({
            "name": "Widget",
            "sku": "W-1",
            "price": "19.99",
            "reorderPoint": 5
        }))
        .unwrap();
        assert_eq!(product.price, Decimal::new(1999, 2));
        assert!(product.check().is_ok());
    }

    #[test]
    fn test_product_payload_rejects_empty_sku_and_bad_bounds() {
        let mut product = NewProduct {
            name: "Widget".into(),
            sku: "".into(),
            price: Decimal::ONE,
            ..Default::default()
        };
        assert!(matches!(product.check(), Err(InventoryError::Validation(_))));

        product.sku = "W-1".into();
        product.minimum_stock = Some(10);
        product.maximum_stock = Some(5);
        assert!(matches!(product.check(), Err(InventoryError::Validation(_))));
    }

    #[test]
    fn test_movement_requires_a_location() {
        let movement = NewMovement {
            product_id: 1,
            quantity: 3,
            ..Default::default()
        };
        match movement.check() {
            Err(InventoryError::Validation(message)) => {
                assert_eq!(message, "Must specify at least one location")
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_movement_rejects_unknown_type_and_zero_quantity() {
        let movement = NewMovement {
            product_id: 1,
            to_location_id: Some(2),
            quantity: 0,
            ..Default::default()
        };
        assert!(movement.check().is_err());

        let movement = NewMovement {
            quantity: 1,
            movement_type: Some("teleport".into()),
            ..movement
        };
        assert!(movement.check().is_err());
    }

    #[test]
    fn test_expiry_date_accepts_plain_dates() {
        let inventory: NewInventory = serde_json::from_value(json!({
            "productId": 1,
            "locationId": 2,
            "quantity": 4,
            "expiryDate": "2024-12-31"
        }))
        .unwrap();
        let expiry = inventory.expiry_date.unwrap();
        assert_eq!(expiry.to_rfc3339(), "2024-12-31T00:00:00+00:00");

        let inventory: NewInventory = serde_json::from_value(json!({
            "productId": 1,
            "locationId": 2,
            "quantity": 4,
            "expiryDate": ""
        }))
        .unwrap();
        assert!(inventory.expiry_date.is_none());
    }

    #[test]
    fn test_order_needs_total_or_items() {
        let order = NewOrder {
            customer_id: 7,
            ..Default::default()
        };
        assert!(order.check().is_err());

        let order = NewOrder {
            customer_id: 7,
            status: Some("shipped".into()),
            total: Some(Decimal::TEN),
            items: vec![],
        };
        assert!(order.check().is_err());
    }

    #[test]
    fn test_inventory_filter() {
        let filter = InventoryFilter {
            product_id: Some(1),
            location_id: None,
        };
        let row = Inventory {
            id: 3,
            product_id: 1,
            location_id: 2,
            quantity: 5,
            reserved_quantity: 0,
            batch_number: None,
            expiry_date: None,
            last_updated: chrono::Utc::now().into(),
        };
        assert!(filter.matches(&row));
        assert!(!InventoryFilter {
            location_id: Some(9),
            ..filter
        }
        .matches(&row));
    }
}
