//! Catalog Domain Module
//!
//! Search results and product pages sourced from the upstream
//! shopping-search API:
//! - Domain models (Product, ProductDetail, Price, ...)
//! - Field extraction helpers (price, rating, image dedup)
//! - Schema detection and normalization
//! - Upstream HTTP client
//! - REST API handlers

pub mod client;
pub mod handlers;
pub mod helpers;
pub mod models;
pub mod normalizer;

// Re-export commonly used types for convenience
pub use client::CatalogClient;
pub use handlers::routes;
