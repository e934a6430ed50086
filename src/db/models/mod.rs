//! Data models

mod order;

pub use order::{NewOrder, Order, OrderResponse, ProductSales};
