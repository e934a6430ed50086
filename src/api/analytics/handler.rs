//! Analytics API Handlers

use axum::{Json, extract::State};

use crate::analytics::Analytics;
use crate::core::ServerState;

/// GET /api/analytics - Current snapshot
///
/// Always answers with a best-effort snapshot, never an error body.
pub async fn get_analytics(State(state): State<ServerState>) -> Json<Analytics> {
    Json(state.orders.analytics().await)
}
