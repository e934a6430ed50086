//! Recommendations API Module

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/recommendations", get(handler::get_recommendations))
}
