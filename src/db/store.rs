//! Order storage abstraction
//!
//! The analytics pipeline only ever talks to storage through [`OrderStore`],
//! so the persistence engine can be swapped without touching the pipeline.
//! Aggregate queries return `None` for "no data" (SQL `SUM` semantics); the
//! aggregator normalizes that to zero.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::models::{NewOrder, Order, ProductSales};
use crate::utils::AppResult;

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persist an order, assigning its id and recording time
    async fn insert(&self, order: NewOrder) -> AppResult<Order>;

    /// Sum of `quantity * unit_price` over all orders
    async fn total_revenue(&self) -> AppResult<Option<Decimal>>;

    /// Count of all orders
    async fn total_order_count(&self) -> AppResult<Option<i64>>;

    /// Revenue grouped by product, sorted by total sales descending.
    /// Ties are broken by first-seen product so the ordering is deterministic.
    async fn top_products_by_revenue(&self) -> AppResult<Vec<ProductSales>>;

    /// All orders ordered by recording time, newest first
    async fn recent_orders(&self) -> AppResult<Vec<Order>>;

    /// Revenue of orders recorded at or after `since`
    async fn revenue_since(&self, since: DateTime<Utc>) -> AppResult<Option<Decimal>>;

    /// Count of orders recorded at or after `since`
    async fn count_since(&self, since: DateTime<Utc>) -> AppResult<Option<i64>>;
}
