pub mod inventory;
pub mod inventory_movements;
pub mod locations;
pub mod order_items;
pub mod orders;
pub mod products;
pub mod users;
