//! Sales analytics snapshot types and the aggregator that computes them

mod aggregator;

pub use aggregator::Aggregator;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::db::OrderResponse;

/// A point-in-time view of sales metrics.
///
/// Recomputed fresh from the store on every accepted order (and on demand
/// for the read endpoint); never mutated in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    /// Sum of all order totals, zero when no orders exist
    pub total_revenue: Decimal,
    pub total_orders: i64,
    /// Sorted by total sales descending, at most 5 entries
    pub top_products: Vec<TopProduct>,
    /// Newest first, at most 10 entries
    pub recent_orders: Vec<OrderResponse>,
    /// Trailing-window revenue momentum, signed percentage.
    /// Intentionally volatile at low order volume.
    pub revenue_change_percent: f64,
    pub orders_in_last_minute: i64,
}

/// One row of the top-products ranking
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopProduct {
    pub name: String,
    pub total_sales: Decimal,
    pub quantity_sold: i64,
    pub percentage_of_revenue: f64,
}
