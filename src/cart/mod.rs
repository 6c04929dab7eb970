//! Shopping Cart Domain Module
//!
//! This module contains all shopping cart business logic, including:
//! - Domain models (CartItem, CartState, CartEvent)
//! - Pure cart transforms (add, set quantity, remove, totals)
//! - The key-value storage port and its implementations
//! - Change notification
//! - The cart store service
//! - REST API handlers

pub mod handlers;
pub mod helpers;
pub mod models;
pub mod notifier;
pub mod service;
pub mod store;

// Re-export commonly used types for convenience
pub use handlers::routes;
pub use service::CartStore;
pub use store::{JsonFileStore, KeyValueStore, MemoryStore};
