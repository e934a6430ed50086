//! Application services

pub mod order_service;

pub use order_service::{CreateOrder, OrderService};
