//! Storefront Library
//!
//! This library provides the core functionality for a storefront backend:
//! product search and detail pages normalized from a third-party
//! shopping-search API, and a persisted shopping cart with change
//! notification.

// Domain modules
pub mod cart;
pub mod catalog;

// Infrastructure
pub mod config;
pub mod error;
pub mod logging;
pub mod router;
pub mod state;
