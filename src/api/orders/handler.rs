//! Order API Handlers

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::OrderResponse;
use crate::services::CreateOrder;
use crate::utils::{AppError, AppResult};

/// Create order request body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: Decimal,
    /// Optional business timestamp; ingestion time is stamped server-side
    pub occurred_at: Option<DateTime<Utc>>,
}

/// POST /api/orders - Submit a new order
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<Json<OrderResponse>> {
    // 1. Validate input; nothing invalid reaches the pipeline
    let product_name = payload.product_name.trim();
    if product_name.is_empty() {
        return Err(AppError::validation("Product name is required"));
    }
    if payload.quantity <= 0 {
        return Err(AppError::validation("Quantity must be positive"));
    }
    if payload.unit_price <= Decimal::ZERO {
        return Err(AppError::validation("Unit price must be positive"));
    }

    // 2. Hand over to the ingestion pipeline
    let response = state
        .orders
        .submit(CreateOrder {
            product_name: product_name.to_string(),
            quantity: payload.quantity,
            unit_price: payload.unit_price,
            occurred_at: payload.occurred_at,
        })
        .await?;

    Ok(Json(response))
}
