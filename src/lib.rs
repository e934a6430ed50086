//! Sales Pulse - 实时销售分析服务
//!
//! # 架构概述
//!
//! 订单提交触发一条单向管线：
//!
//! ```text
//! 订单 ──▶ 持久化 ──▶ 重算分析快照 ──▶ hub 扇出到 N 个仪表盘
//! ```
//!
//! 核心功能：
//!
//! - **分析聚合** (`analytics`): 滚动窗口销售指标快照
//! - **推荐引擎** (`recommend`): 规则分类 + 可插拔 AI 委托
//! - **仪表盘 hub** (`live`): 并发连接集合与事件扇出
//! - **订单管线** (`services`): 接收 / 持久化 / 重算 / 广播编排
//! - **HTTP API** (`api`): RESTful 接口 + WebSocket 订阅
//!
//! # 模块结构
//!
//! ```text
//! src/
//! ├── core/          # 配置、状态、服务器
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 存储抽象和模型
//! ├── analytics/     # 指标聚合
//! ├── recommend/     # 推荐引擎
//! ├── live/          # 仪表盘 hub
//! ├── services/      # 订单管线编排
//! └── utils/         # 工具函数
//! ```

pub mod analytics;
pub mod api;
pub mod core;
pub mod db;
pub mod live;
pub mod recommend;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use crate::core::{Config, Server, ServerState};
pub use crate::live::{DashboardHub, EventKind};
pub use crate::services::{CreateOrder, OrderService};
pub use crate::utils::{AppError, AppResult};

// Re-export logger functions
pub use crate::utils::logger::{init_logger, init_logger_with_file};

pub fn print_banner() {
    println!(
        r#"
   _____       __            ____        __
  / ___/____ _/ /__  _____  / __ \__  __/ /_______
  \__ \/ __ `/ / _ \/ ___/ / /_/ / / / / / ___/ _ \
 ___/ / /_/ / /  __(__  ) / ____/ /_/ / (__  )  __/
/____/\__,_/_/\___/____/ /_/    \__,_/_/____/\___/
    "#
    );
}
