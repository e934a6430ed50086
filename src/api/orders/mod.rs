//! Order API Module
//!
//! Order submission entry point. All pipeline work happens in OrderService.

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

/// Order router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new().route("/", post(handler::create))
}
