//! In-memory order store
//!
//! Reference [`OrderStore`] implementation backing the default wiring and
//! the test suite. Rows live in insertion order behind an async `RwLock`;
//! aggregate queries scan, which is fine for the bounded lifetime of a
//! single live session.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tokio::sync::RwLock;

use super::models::{NewOrder, Order, ProductSales};
use super::store::OrderStore;
use crate::utils::AppResult;

#[derive(Debug, Default)]
pub struct MemoryOrderStore {
    orders: RwLock<Vec<Order>>,
    next_id: AtomicI64,
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fully-formed row, keeping its `recorded_at` as given.
    ///
    /// Used to seed back-dated orders for windowed queries in tests and demos;
    /// production ingestion goes through [`OrderStore::insert`].
    pub async fn seed(&self, mut order: Order) -> Order {
        order.id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let mut orders = self.orders.write().await;
        orders.push(order.clone());
        order
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn insert(&self, order: NewOrder) -> AppResult<Order> {
        let row = Order {
            id: self.next_id.fetch_add(1, Ordering::Relaxed) + 1,
            product_name: order.product_name,
            quantity: order.quantity,
            unit_price: order.unit_price,
            occurred_at: order.occurred_at,
            recorded_at: Utc::now(),
        };
        let mut orders = self.orders.write().await;
        orders.push(row.clone());
        Ok(row)
    }

    async fn total_revenue(&self) -> AppResult<Option<Decimal>> {
        let orders = self.orders.read().await;
        if orders.is_empty() {
            return Ok(None);
        }
        Ok(Some(orders.iter().map(Order::total).sum()))
    }

    async fn total_order_count(&self) -> AppResult<Option<i64>> {
        let orders = self.orders.read().await;
        Ok(Some(orders.len() as i64))
    }

    async fn top_products_by_revenue(&self) -> AppResult<Vec<ProductSales>> {
        let orders = self.orders.read().await;

        // (total, quantity, first-seen index) keyed by product name
        let mut grouped: HashMap<String, (Decimal, i64, usize)> = HashMap::new();
        for (idx, order) in orders.iter().enumerate() {
            let entry = grouped
                .entry(order.product_name.clone())
                .or_insert((Decimal::ZERO, 0, idx));
            entry.0 += order.total();
            entry.1 += order.quantity;
        }

        let mut rows: Vec<(String, Decimal, i64, usize)> = grouped
            .into_iter()
            .map(|(name, (total, qty, first))| (name, total, qty, first))
            .collect();
        // Descending by revenue, ties by first-seen product
        rows.sort_by(|a, b| b.1.cmp(&a.1).then(a.3.cmp(&b.3)));

        Ok(rows
            .into_iter()
            .map(|(name, total_sales, quantity_sold, _)| ProductSales {
                name,
                total_sales,
                quantity_sold,
            })
            .collect())
    }

    async fn recent_orders(&self) -> AppResult<Vec<Order>> {
        let orders = self.orders.read().await;
        let mut rows: Vec<Order> = orders.clone();
        rows.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
        Ok(rows)
    }

    async fn revenue_since(&self, since: DateTime<Utc>) -> AppResult<Option<Decimal>> {
        let orders = self.orders.read().await;
        let mut total = Decimal::ZERO;
        let mut matched = false;
        for order in orders.iter().filter(|o| o.recorded_at >= since) {
            total += order.total();
            matched = true;
        }
        Ok(matched.then_some(total))
    }

    async fn count_since(&self, since: DateTime<Utc>) -> AppResult<Option<i64>> {
        let orders = self.orders.read().await;
        Ok(Some(
            orders.iter().filter(|o| o.recorded_at >= since).count() as i64,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn new_order(name: &str, quantity: i64, price: &str) -> NewOrder {
        NewOrder {
            product_name: name.to_string(),
            quantity,
            unit_price: price.parse().unwrap(),
            occurred_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn insert_assigns_sequential_ids() {
        let store = MemoryOrderStore::new();
        let a = store.insert(new_order("Espresso", 1, "2.50")).await.unwrap();
        let b = store.insert(new_order("Latte", 2, "3.80")).await.unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(store.total_order_count().await.unwrap(), Some(2));
    }

    #[tokio::test]
    async fn empty_store_reports_no_revenue() {
        let store = MemoryOrderStore::new();
        assert_eq!(store.total_revenue().await.unwrap(), None);
        assert_eq!(store.revenue_since(Utc::now()).await.unwrap(), None);
        assert_eq!(store.count_since(Utc::now()).await.unwrap(), Some(0));
    }

    #[tokio::test]
    async fn top_products_sorted_desc_with_first_seen_tie_break() {
        let store = MemoryOrderStore::new();
        store.insert(new_order("Latte", 1, "5.00")).await.unwrap();
        store.insert(new_order("Mocha", 1, "5.00")).await.unwrap();
        store.insert(new_order("Espresso", 4, "2.50")).await.unwrap();

        let top = store.top_products_by_revenue().await.unwrap();
        assert_eq!(top[0].name, "Espresso");
        assert_eq!(top[0].total_sales, "10.00".parse::<Decimal>().unwrap());
        // Latte and Mocha tie at 5.00; Latte was seen first
        assert_eq!(top[1].name, "Latte");
        assert_eq!(top[2].name, "Mocha");
    }

    #[tokio::test]
    async fn recent_orders_newest_first() {
        let store = MemoryOrderStore::new();
        let now = Utc::now();
        for (name, age_secs) in [("Old", 300), ("Mid", 120), ("New", 5)] {
            store
                .seed(Order {
                    id: 0,
                    product_name: name.to_string(),
                    quantity: 1,
                    unit_price: Decimal::ONE,
                    occurred_at: now - Duration::seconds(age_secs),
                    recorded_at: now - Duration::seconds(age_secs),
                })
                .await;
        }

        let recent = store.recent_orders().await.unwrap();
        let names: Vec<&str> = recent.iter().map(|o| o.product_name.as_str()).collect();
        assert_eq!(names, vec!["New", "Mid", "Old"]);
    }

    #[tokio::test]
    async fn windowed_queries_filter_on_recorded_at() {
        let store = MemoryOrderStore::new();
        let now = Utc::now();
        store
            .seed(Order {
                id: 0,
                product_name: "Inside".to_string(),
                quantity: 1,
                unit_price: "10.00".parse().unwrap(),
                occurred_at: now,
                recorded_at: now - Duration::seconds(30),
            })
            .await;
        store
            .seed(Order {
                id: 0,
                product_name: "Outside".to_string(),
                quantity: 1,
                unit_price: "99.00".parse().unwrap(),
                occurred_at: now,
                recorded_at: now - Duration::seconds(90),
            })
            .await;

        let since = now - Duration::seconds(60);
        assert_eq!(
            store.revenue_since(since).await.unwrap(),
            Some("10.00".parse().unwrap())
        );
        assert_eq!(store.count_since(since).await.unwrap(), Some(1));
    }
}
