//! Order ingestion orchestration
//!
//! Composes the store, the aggregator, the recommendation engine and the
//! dashboard hub into the submit pipeline:
//!
//! ```text
//! submit ──▶ stamp time ──▶ persist ──▶ recompute analytics
//!                                             │
//!                          new_order ◀────────┤
//!                          analytics_update ◀─┘  (fan-out via hub)
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::analytics::{Aggregator, Analytics};
use crate::db::{NewOrder, OrderResponse, OrderStore};
use crate::live::{DashboardHub, EventKind};
use crate::recommend::{Recommendation, Recommender};
use crate::utils::AppResult;

/// A validated order submission, as handed over by the HTTP layer
#[derive(Debug, Clone)]
pub struct CreateOrder {
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: Decimal,
    /// When absent, ingestion time is stamped by the service, not trusted
    /// from the caller, keeping the windowed analytics consistent
    pub occurred_at: Option<DateTime<Utc>>,
}

pub struct OrderService {
    store: Arc<dyn OrderStore>,
    aggregator: Aggregator,
    recommender: Recommender,
    hub: DashboardHub,
}

impl OrderService {
    pub fn new(
        store: Arc<dyn OrderStore>,
        aggregator: Aggregator,
        recommender: Recommender,
        hub: DashboardHub,
    ) -> Self {
        Self {
            store,
            aggregator,
            recommender,
            hub,
        }
    }

    /// Accept an order: persist, recompute, fan out.
    ///
    /// Storage failure aborts the submission before any event is published.
    /// For one submission `new_order` always precedes the `analytics_update`
    /// that reflects it; the hub's bounded per-connection queues keep a slow
    /// dashboard from stalling this call.
    pub async fn submit(&self, request: CreateOrder) -> AppResult<OrderResponse> {
        let order = self
            .store
            .insert(NewOrder {
                product_name: request.product_name,
                quantity: request.quantity,
                unit_price: request.unit_price,
                occurred_at: request.occurred_at.unwrap_or_else(Utc::now),
            })
            .await?;

        let response = OrderResponse::from(&order);
        tracing::info!(
            order_id = order.id,
            product = %order.product_name,
            total = %order.total(),
            "Order accepted"
        );

        let snapshot = self.aggregator.compute().await;

        // Delivery failures stay inside the hub; an encoding failure would
        // drop the event for every dashboard at once, so it is logged loudly
        if let Err(e) = self.hub.broadcast(EventKind::NewOrder, &response) {
            tracing::error!(target: "broadcast", error = %e, "Failed to publish new_order");
        }
        if let Err(e) = self.hub.broadcast(EventKind::AnalyticsUpdate, &snapshot) {
            tracing::error!(target: "broadcast", error = %e, "Failed to publish analytics_update");
        }

        Ok(response)
    }

    /// Best-effort snapshot for the read endpoint
    pub async fn analytics(&self) -> Analytics {
        self.aggregator.compute().await
    }

    /// Recommendations against a fresh snapshot
    pub async fn recommendations(&self) -> Vec<Recommendation> {
        let snapshot = self.aggregator.compute().await;
        self.recommender.recommend(&snapshot).await
    }
}
