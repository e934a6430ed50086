//! 数据层
//!
//! # 结构
//!
//! - [`models`] - 订单模型和 wire 结构
//! - [`store`] - 存储抽象 ([`OrderStore`])
//! - [`memory`] - 内存实现 (默认装配 + 测试)

pub mod memory;
pub mod models;
pub mod store;

pub use memory::MemoryOrderStore;
pub use models::{NewOrder, Order, OrderResponse, ProductSales};
pub use store::OrderStore;
