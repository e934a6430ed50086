//! Recommendations API Handlers

use axum::{Json, extract::State};

use crate::core::ServerState;
use crate::recommend::Recommendation;

/// GET /api/recommendations - Suggestions for the current snapshot
///
/// Provider failures never surface here; the engine falls back internally.
pub async fn get_recommendations(State(state): State<ServerState>) -> Json<Vec<Recommendation>> {
    Json(state.orders.recommendations().await)
}
