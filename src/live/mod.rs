//! DashboardHub - 实时仪表盘分发
//!
//! 管理所有在线 dashboard 连接并向它们推送事件。
//!
//! ```text
//! OrderService ──▶ broadcast(kind, data)
//!                        │  serialize once
//!                        ▼
//!                  DashboardHub
//!                    connections: DashMap<Uuid, mpsc::Sender>
//!                        │ try_send (bounded, 不阻塞发布方)
//!        ┌───────────────┼───────────────┐
//!        ▼               ▼               ▼
//!   WS task 1       WS task 2       WS task N
//! ```
//!
//! ## 失败语义
//!
//! - 单个连接发送失败 (队列满 / 已关闭): 本轮广播内移除该连接，其余不受影响
//! - 载荷序列化失败: 向调用方返回错误 (该事件对所有订阅者同时丢失，必须显式暴露)

use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::utils::{AppError, AppResult};

/// 每连接出站队列容量 (默认值)
///
/// 跟不上的连接会被移除，而不是无限缓冲。
const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// Outbound wire event kinds. Fixed strings for dashboard compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Connected,
    NewOrder,
    AnalyticsUpdate,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Connected => "connected",
            EventKind::NewOrder => "new_order",
            EventKind::AnalyticsUpdate => "analytics_update",
        }
    }
}

/// Wire envelope: one JSON object per message, `{"type": ..., "data": ...}`
#[derive(Serialize)]
struct WireEvent<'a, T: Serialize> {
    #[serde(rename = "type")]
    kind: &'static str,
    data: &'a T,
}

/// Serialize an event envelope once, for delivery to every connection
fn encode_event<T: Serialize>(kind: EventKind, data: &T) -> AppResult<String> {
    serde_json::to_string(&WireEvent {
        kind: kind.as_str(),
        data,
    })
    .map_err(AppError::from)
}

/// 仪表盘连接 hub
///
/// 系统中唯一的共享可变状态。连接注册 / 注销 / 广播来自互不协调的
/// 任务，DashMap 保证无需调用方加锁。
#[derive(Clone)]
pub struct DashboardHub {
    /// connection id → 该连接的出站队列
    connections: Arc<DashMap<Uuid, mpsc::Sender<String>>>,
    queue_capacity: usize,
    /// 关闭信号令牌 (服务停机时通知所有 WS 任务)
    shutdown_token: CancellationToken,
}

impl DashboardHub {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_QUEUE_CAPACITY)
    }

    /// 创建指定出站队列容量的 hub
    pub fn with_capacity(queue_capacity: usize) -> Self {
        Self {
            connections: Arc::new(DashMap::new()),
            queue_capacity,
            shutdown_token: CancellationToken::new(),
        }
    }

    /// Register a new dashboard connection.
    ///
    /// Returns the connection id and the receiving end of its outbound
    /// queue; the caller (the WebSocket task) owns the receiver and writes
    /// each queued message to the socket. A `connected` acknowledgement is
    /// queued for this connection only before it joins the live set.
    pub fn register(&self) -> (Uuid, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(self.queue_capacity);
        let id = Uuid::new_v4();

        match encode_event(EventKind::Connected, &"WebSocket connection established") {
            // Fresh queue, the ack always fits
            Ok(ack) => {
                let _ = tx.try_send(ack);
            }
            Err(e) => {
                tracing::error!(target: "broadcast", error = %e, "Failed to encode connect ack");
            }
        }

        self.connections.insert(id, tx);
        tracing::info!(connection_id = %id, live = self.connections.len(), "Dashboard connected");
        (id, rx)
    }

    /// Remove a connection. Idempotent; safe to call from both the
    /// disconnect path and the broadcast failure path.
    pub fn unregister(&self, id: &Uuid) {
        if self.connections.remove(id).is_some() {
            tracing::info!(connection_id = %id, live = self.connections.len(), "Dashboard disconnected");
        }
    }

    /// Deliver one event to every live connection.
    ///
    /// The payload is serialized once. A connection whose queue is full or
    /// closed is removed as part of this pass and receives neither this
    /// event nor any later one. Delivery failures never fail the caller;
    /// only a serialization failure does, since that would silently drop
    /// the event for every subscriber at once.
    ///
    /// Returns the number of live connections after the pass.
    pub fn broadcast<T: Serialize>(&self, kind: EventKind, data: &T) -> AppResult<usize> {
        let message = encode_event(kind, data)?;

        // Collect failures first, remove after the iteration
        let mut dead: Vec<Uuid> = Vec::new();
        for entry in self.connections.iter() {
            match entry.value().try_send(message.clone()) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    tracing::warn!(
                        connection_id = %entry.key(),
                        event = kind.as_str(),
                        "Outbound queue full, dropping slow dashboard"
                    );
                    dead.push(*entry.key());
                }
                Err(TrySendError::Closed(_)) => {
                    tracing::debug!(connection_id = %entry.key(), "Connection gone, removing");
                    dead.push(*entry.key());
                }
            }
        }
        for id in dead {
            self.connections.remove(&id);
        }

        Ok(self.connections.len())
    }

    /// 当前在线连接数
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// 获取关闭令牌 (WS 任务监听停机信号)
    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.shutdown_token
    }

    /// 优雅关闭: 通知所有 WS 任务退出
    pub fn shutdown(&self) {
        tracing::info!("Shutting down dashboard hub");
        self.shutdown_token.cancel();
    }
}

impl Default for DashboardHub {
    fn default() -> Self {
        Self::new()
    }
}
