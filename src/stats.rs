//! Dashboard aggregates, recomputed from the full collections on every call.

use crate::entities::inventory::Model as Inventory;
use crate::entities::locations::Model as Location;
use crate::entities::orders::Model as Order;
use crate::entities::products::Model as Product;
use crate::error::{InventoryError, Result};
use anyhow::anyhow;
use chrono::{DateTime, Datelike, FixedOffset};
use sea_orm::prelude::Decimal;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Assumed cost-of-goods share of revenue used for the turnover estimate.
const COST_OF_GOODS_RATIO: f64 = 0.7;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_products: usize,
    pub total_locations: usize,
    pub total_orders: usize,
    pub low_stock_products: usize,
    pub expiring_products: usize,
    pub total_inventory_value: Decimal,
    pub total_revenue: Decimal,
    pub inventory_turnover: f64,
    pub stockout_risk: f64,
    pub seasonal_trends: Vec<&'static str>,
    pub recommendations: Vec<&'static str>,
}

pub fn compute(
    products: &[Product],
    locations: &[Location],
    inventory: &[Inventory],
    orders: &[Order],
    now: DateTime<FixedOffset>,
) -> Result<DashboardStats> {
    let by_id: HashMap<i32, &Product> = products.iter().map(|p| (p.id, p)).collect();

    let mut total_inventory_value = Decimal::ZERO;
    let mut low_stock = HashSet::new();
    let mut expiring = HashSet::new();

    for row in inventory {
        let Some(product) = by_id.get(&row.product_id) else {
            continue;
        };
        let available = row.available();
        total_inventory_value = product
            .price
            .checked_mul(Decimal::from(available))
            .and_then(|value| total_inventory_value.checked_add(value))
            .ok_or_else(|| overflow("total inventory value"))?;

        if available <= product.reorder_point {
            low_stock.insert(product.id);
        }
        if row.expiry_date.is_some_and(|expiry| expiry <= now) {
            expiring.insert(product.id);
        }
    }

    let total_revenue = orders
        .iter()
        .filter(|order| order.status != "cancelled")
        .try_fold(Decimal::ZERO, |total, order| total.checked_add(order.total))
        .ok_or_else(|| overflow("total revenue"))?;

    let inventory_turnover = ratio(total_revenue, total_inventory_value) * COST_OF_GOODS_RATIO;
    let stockout_risk = if products.is_empty() {
        0.0
    } else {
        low_stock.len() as f64 / products.len() as f64 * 100.0
    };

    Ok(DashboardStats {
        total_products: products.len(),
        total_locations: locations.iter().filter(|l| l.is_active).count(),
        total_orders: orders.len(),
        low_stock_products: low_stock.len(),
        expiring_products: expiring.len(),
        total_inventory_value,
        total_revenue,
        inventory_turnover,
        stockout_risk,
        seasonal_trends: seasonal_trends(now.month()),
        recommendations: recommendations(low_stock.len(), expiring.len(), inventory_turnover),
    })
}

fn overflow(figure: &str) -> InventoryError {
    InventoryError::Internal(anyhow!("{figure} overflows the decimal range"))
}

fn ratio(numerator: Decimal, denominator: Decimal) -> f64 {
    if denominator <= Decimal::ZERO {
        return 0.0;
    }
    let numerator: f64 = numerator.try_into().unwrap_or(0.0);
    let denominator: f64 = denominator.try_into().unwrap_or(0.0);
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Canned messages keyed by calendar quarter.
pub fn seasonal_trends(month: u32) -> Vec<&'static str> {
    match month {
        1..=3 => vec![
            "Post-holiday returns peak in January",
            "Clear winter stock before spring lines arrive",
        ],
        4..=6 => vec![
            "Spring demand rising for outdoor goods",
            "Plan mid-year promotions and restock bestsellers",
        ],
        7..=9 => vec![
            "Back-to-school demand peaks in August",
            "Start building stock for the Q4 surge",
        ],
        _ => vec!["Holiday season approaching", "Prepare inventory for Q4 surge"],
    }
}

fn recommendations(low_stock: usize, expiring: usize, turnover: f64) -> Vec<&'static str> {
    let mut advice = vec!["Optimize stock levels for seasonal demand"];
    if low_stock > 0 {
        advice.push("Consider restocking high-turnover items");
    }
    if expiring > 0 {
        advice.push("Clear or write off expired batches");
    }
    if turnover > 0.0 && turnover < 1.0 {
        advice.push("Inventory is turning slowly; review slow movers");
    }
    advice
}
