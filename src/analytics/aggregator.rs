//! Metrics aggregation
//!
//! Recomputes the full [`Analytics`] snapshot from the order store. The
//! snapshot read path never fails: an aggregate that errors or comes back
//! empty is substituted with its zero value, so dashboards always get a
//! best-effort view.

use std::sync::Arc;

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use super::{Analytics, TopProduct};
use crate::db::{OrderResponse, OrderStore};
use crate::utils::AppResult;

/// How many products the ranking keeps
const TOP_PRODUCT_LIMIT: usize = 5;
/// How many orders the recent list keeps
const RECENT_ORDER_LIMIT: usize = 10;

pub struct Aggregator {
    store: Arc<dyn OrderStore>,
    /// Trailing momentum window length in seconds
    window_secs: i64,
}

impl Aggregator {
    pub fn new(store: Arc<dyn OrderStore>, window_secs: i64) -> Self {
        Self { store, window_secs }
    }

    /// Compute a fresh snapshot.
    ///
    /// All windowed queries share one evaluation instant, captured once at
    /// entry; otherwise the current and previous windows would skew against
    /// each other while the store queries run.
    pub async fn compute(&self) -> Analytics {
        let now = Utc::now();
        let window = Duration::seconds(self.window_secs);

        let total_revenue =
            unwrap_aggregate(self.store.total_revenue().await, "total_revenue");
        let total_orders =
            unwrap_aggregate(self.store.total_order_count().await, "total_order_count");

        // Top products: pre-sorted by the store, truncated here
        let product_rows = match self.store.top_products_by_revenue().await {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!(error = %e, "Top products query failed, substituting empty list");
                Vec::new()
            }
        };
        // Revenue floor of 1 keeps the percentage defined when revenue is 0
        let denominator = if total_revenue.is_zero() {
            Decimal::ONE
        } else {
            total_revenue
        };
        let top_products: Vec<TopProduct> = product_rows
            .into_iter()
            .take(TOP_PRODUCT_LIMIT)
            .map(|p| {
                let percentage = (p.total_sales / denominator * Decimal::ONE_HUNDRED)
                    .to_f64()
                    .unwrap_or(0.0);
                TopProduct {
                    name: p.name,
                    total_sales: p.total_sales,
                    quantity_sold: p.quantity_sold,
                    percentage_of_revenue: percentage,
                }
            })
            .collect();

        let recent_orders: Vec<OrderResponse> = match self.store.recent_orders().await {
            Ok(rows) => rows
                .iter()
                .take(RECENT_ORDER_LIMIT)
                .map(OrderResponse::from)
                .collect(),
            Err(e) => {
                tracing::warn!(error = %e, "Recent orders query failed, substituting empty list");
                Vec::new()
            }
        };

        // Momentum: current window vs the one before it. The store only
        // exposes revenue-since, so the previous window is the difference
        // of the two trailing sums.
        let current = unwrap_aggregate(
            self.store.revenue_since(now - window).await,
            "revenue_since(window)",
        );
        let trailing_two = unwrap_aggregate(
            self.store.revenue_since(now - window * 2).await,
            "revenue_since(2x window)",
        );
        let previous = trailing_two - current;

        let revenue_change_percent = if previous > Decimal::ZERO {
            ((current - previous) / previous * Decimal::ONE_HUNDRED)
                .to_f64()
                .unwrap_or(0.0)
        } else if current > Decimal::ZERO {
            100.0
        } else {
            0.0
        };

        let orders_in_last_minute = unwrap_aggregate(
            self.store.count_since(now - window).await,
            "count_since(window)",
        );

        Analytics {
            total_revenue,
            total_orders,
            top_products,
            recent_orders,
            revenue_change_percent,
            orders_in_last_minute,
        }
    }
}

/// Normalize an aggregate query result: "no data" and query failure both
/// degrade to the zero value (failures are logged)
fn unwrap_aggregate<T: Default>(result: AppResult<Option<T>>, query: &str) -> T {
    match result {
        Ok(value) => value.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(query, error = %e, "Aggregate query failed, substituting zero");
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MemoryOrderStore, NewOrder, Order};
    use chrono::DateTime;

    fn aggregator(store: &Arc<MemoryOrderStore>) -> Aggregator {
        Aggregator::new(store.clone() as Arc<dyn OrderStore>, 60)
    }

    fn new_order(name: &str, quantity: i64, price: &str) -> NewOrder {
        NewOrder {
            product_name: name.to_string(),
            quantity,
            unit_price: price.parse().unwrap(),
            occurred_at: Utc::now(),
        }
    }

    fn backdated(name: &str, quantity: i64, price: &str, age_secs: i64) -> Order {
        let at = Utc::now() - Duration::seconds(age_secs);
        Order {
            id: 0,
            product_name: name.to_string(),
            quantity,
            unit_price: price.parse().unwrap(),
            occurred_at: at,
            recorded_at: at,
        }
    }

    #[tokio::test]
    async fn empty_store_yields_all_zeros() {
        let store = Arc::new(MemoryOrderStore::new());
        let snapshot = aggregator(&store).compute().await;

        assert_eq!(snapshot.total_revenue, Decimal::ZERO);
        assert_eq!(snapshot.total_orders, 0);
        assert!(snapshot.top_products.is_empty());
        assert!(snapshot.recent_orders.is_empty());
        assert_eq!(snapshot.revenue_change_percent, 0.0);
        assert_eq!(snapshot.orders_in_last_minute, 0);
    }

    #[tokio::test]
    async fn single_order_snapshot() {
        let store = Arc::new(MemoryOrderStore::new());
        store
            .insert(new_order("Coffee Deluxe", 3, "4.50"))
            .await
            .unwrap();

        let snapshot = aggregator(&store).compute().await;

        assert_eq!(snapshot.total_revenue, "13.50".parse::<Decimal>().unwrap());
        assert_eq!(snapshot.total_orders, 1);
        assert_eq!(snapshot.top_products.len(), 1);

        let top = &snapshot.top_products[0];
        assert_eq!(top.name, "Coffee Deluxe");
        assert_eq!(top.total_sales, "13.50".parse::<Decimal>().unwrap());
        assert_eq!(top.quantity_sold, 3);
        assert!((top.percentage_of_revenue - 100.0).abs() < 1e-9);

        // Fresh order, empty previous window: momentum pegs at +100
        assert_eq!(snapshot.revenue_change_percent, 100.0);
        assert_eq!(snapshot.orders_in_last_minute, 1);
        assert_eq!(snapshot.recent_orders.len(), 1);
        assert_eq!(
            snapshot.recent_orders[0].total,
            "13.50".parse::<Decimal>().unwrap()
        );
    }

    #[tokio::test]
    async fn top_products_percentages_split_revenue() {
        let store = Arc::new(MemoryOrderStore::new());
        store.insert(new_order("Latte", 3, "10.00")).await.unwrap();
        store.insert(new_order("Muffin", 2, "5.00")).await.unwrap();

        let snapshot = aggregator(&store).compute().await;

        assert_eq!(snapshot.top_products[0].name, "Latte");
        assert!((snapshot.top_products[0].percentage_of_revenue - 75.0).abs() < 1e-9);
        assert!((snapshot.top_products[1].percentage_of_revenue - 25.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn rankings_and_recent_orders_are_bounded() {
        let store = Arc::new(MemoryOrderStore::new());
        for i in 0..12 {
            store
                .insert(new_order(&format!("Product {i}"), 1, "1.00"))
                .await
                .unwrap();
        }

        let snapshot = aggregator(&store).compute().await;

        assert_eq!(snapshot.top_products.len(), 5);
        assert_eq!(snapshot.recent_orders.len(), 10);
        assert_eq!(snapshot.total_orders, 12);
    }

    #[tokio::test]
    async fn revenue_collapse_reports_minus_hundred() {
        let store = Arc::new(MemoryOrderStore::new());
        // Two orders worth 100 in the previous window, nothing current
        store.seed(backdated("Latte", 10, "6.00", 90)).await;
        store.seed(backdated("Muffin", 8, "5.00", 90)).await;

        let snapshot = aggregator(&store).compute().await;

        assert!((snapshot.revenue_change_percent - (-100.0)).abs() < 1e-9);
        assert_eq!(snapshot.orders_in_last_minute, 0);
    }

    #[tokio::test]
    async fn revenue_growth_matches_percentage_formula() {
        let store = Arc::new(MemoryOrderStore::new());
        store.seed(backdated("Latte", 4, "10.00", 90)).await; // previous: 40
        store.seed(backdated("Latte", 10, "10.00", 20)).await; // current: 100

        let snapshot = aggregator(&store).compute().await;

        // (100 - 40) / 40 * 100
        assert!((snapshot.revenue_change_percent - 150.0).abs() < 1e-9);
        assert_eq!(snapshot.orders_in_last_minute, 1);
    }

    #[tokio::test]
    async fn failing_store_degrades_to_zeros() {
        struct FailingStore;

        #[async_trait::async_trait]
        impl OrderStore for FailingStore {
            async fn insert(&self, _order: NewOrder) -> crate::utils::AppResult<Order> {
                Err(crate::utils::AppError::database("down"))
            }
            async fn total_revenue(&self) -> crate::utils::AppResult<Option<Decimal>> {
                Err(crate::utils::AppError::database("down"))
            }
            async fn total_order_count(&self) -> crate::utils::AppResult<Option<i64>> {
                Err(crate::utils::AppError::database("down"))
            }
            async fn top_products_by_revenue(
                &self,
            ) -> crate::utils::AppResult<Vec<crate::db::ProductSales>> {
                Err(crate::utils::AppError::database("down"))
            }
            async fn recent_orders(&self) -> crate::utils::AppResult<Vec<Order>> {
                Err(crate::utils::AppError::database("down"))
            }
            async fn revenue_since(
                &self,
                _since: DateTime<Utc>,
            ) -> crate::utils::AppResult<Option<Decimal>> {
                Err(crate::utils::AppError::database("down"))
            }
            async fn count_since(
                &self,
                _since: DateTime<Utc>,
            ) -> crate::utils::AppResult<Option<i64>> {
                Err(crate::utils::AppError::database("down"))
            }
        }

        let aggregator = Aggregator::new(Arc::new(FailingStore), 60);
        let snapshot = aggregator.compute().await;

        assert_eq!(snapshot.total_revenue, Decimal::ZERO);
        assert_eq!(snapshot.total_orders, 0);
        assert!(snapshot.top_products.is_empty());
        assert!(snapshot.recent_orders.is_empty());
        assert_eq!(snapshot.revenue_change_percent, 0.0);
    }
}
