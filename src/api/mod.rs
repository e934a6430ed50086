//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`orders`] - 订单提交接口
//! - [`analytics`] - 分析快照读取接口
//! - [`recommendations`] - 推荐读取接口
//! - [`ws`] - 仪表盘 WebSocket 订阅

pub mod analytics;
pub mod health;
pub mod orders;
pub mod recommendations;
pub mod ws;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};

/// Assemble the full application router
pub fn router(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(orders::router())
        .merge(analytics::router())
        .merge(recommendations::router())
        .merge(ws::router())
        .layer(TraceLayer::new_for_http())
        // Dashboard frontend runs on its own origin during development
        .layer(CorsLayer::permissive())
        .with_state(state)
}
