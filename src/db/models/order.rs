//! Order domain model and wire forms

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A persisted order. Immutable once stored.
///
/// `total` is always derived from `quantity * unit_price` and never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Store-assigned identifier
    pub id: i64,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: Decimal,
    /// Ingestion time, stamped by the order service
    pub occurred_at: DateTime<Utc>,
    /// Insertion time, assigned by the store
    pub recorded_at: DateTime<Utc>,
}

impl Order {
    /// Line total, derived
    pub fn total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// A validated order waiting to be persisted (no id yet)
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: Decimal,
    pub occurred_at: DateTime<Utc>,
}

/// Wire form of an order, carrying the derived total
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: i64,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: Decimal,
    pub occurred_at: DateTime<Utc>,
    pub recorded_at: DateTime<Utc>,
    pub total: Decimal,
}

impl From<&Order> for OrderResponse {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id,
            product_name: order.product_name.clone(),
            quantity: order.quantity,
            unit_price: order.unit_price,
            occurred_at: order.occurred_at,
            recorded_at: order.recorded_at,
            total: order.total(),
        }
    }
}

/// Per-product revenue aggregate returned by the store,
/// pre-sorted by `total_sales` descending
#[derive(Debug, Clone)]
pub struct ProductSales {
    pub name: String,
    pub total_sales: Decimal,
    pub quantity_sold: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_is_derived_from_quantity_and_price() {
        let order = Order {
            id: 1,
            product_name: "Coffee Deluxe".to_string(),
            quantity: 3,
            unit_price: "4.50".parse().unwrap(),
            occurred_at: Utc::now(),
            recorded_at: Utc::now(),
        };

        assert_eq!(order.total(), "13.50".parse::<Decimal>().unwrap());

        let response = OrderResponse::from(&order);
        assert_eq!(response.total, order.total());
    }
}
