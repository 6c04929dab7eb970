//! Shopping Cart Domain Models
//!
//! This module contains all data structures related to the shopping cart
//! business domain. The persisted record is the serialized [`CartState`].

use serde::{Deserialize, Serialize};

// =============================================================================
// Cart Domain Models
// =============================================================================

/// Returns the default quantity (1) for cart items
fn default_quantity() -> u32 {
    1
}

/// Represents a line item in the shopping cart
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Product identifier, unique within the cart
    #[serde(rename = "product_id")]
    pub product_id: String,

    pub title: String,

    /// Price of a single unit
    #[serde(alias = "price")]
    pub unit_price: f64,

    pub currency: String,

    pub thumbnail: String,

    /// Quantity of this item, at least 1 while the item exists
    #[serde(default = "default_quantity")]
    pub quantity: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviews: Option<u64>,
}

/// Highest unit price accepted into the cart
pub const MAX_UNIT_PRICE: f64 = 1_000_000_000.0;

/// Whether `price` can be carried in the cart without breaking the totals
pub fn is_valid_unit_price(price: f64) -> bool {
    price.is_finite() && (0.0..=MAX_UNIT_PRICE).contains(&price)
}

impl CartItem {
    /// `unit_price * quantity`
    pub fn line_total(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }
}

/// Input for adding a product: a line item without its quantity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewCartItem {
    #[serde(rename = "product_id")]
    pub product_id: String,

    pub title: String,

    #[serde(alias = "price")]
    pub unit_price: f64,

    #[serde(default = "default_currency")]
    pub currency: String,

    #[serde(default)]
    pub thumbnail: String,

    #[serde(default)]
    pub source: Option<String>,

    #[serde(default)]
    pub rating: Option<f64>,

    #[serde(default)]
    pub reviews: Option<u64>,
}

fn default_currency() -> String {
    "$".to_string()
}

impl NewCartItem {
    /// Whether the unit price is a finite amount in `0..=MAX_UNIT_PRICE`
    pub fn has_valid_price(&self) -> bool {
        is_valid_unit_price(self.unit_price)
    }

    /// Turns the input into a line item with quantity 1
    pub fn into_line_item(self) -> CartItem {
        CartItem {
            product_id: self.product_id,
            title: self.title,
            unit_price: self.unit_price,
            currency: self.currency,
            thumbnail: self.thumbnail,
            quantity: 1,
            source: self.source,
            rating: self.rating,
            reviews: self.reviews,
        }
    }
}

/// The persisted cart record. Totals are derived from `items`.
///
/// Stored totals are never trusted on load; they are recomputed from the
/// line items, so a damaged total cannot make the record unreadable.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartState {
    #[serde(default)]
    pub items: Vec<CartItem>,

    #[serde(default, skip_deserializing)]
    pub total_items: u64,

    #[serde(default, skip_deserializing)]
    pub total_price: f64,
}

impl CartState {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// =============================================================================
// Change Notification
// =============================================================================

/// Kind of mutation that produced a [`CartEvent`]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CartChange {
    Added,
    QuantitySet,
    Removed,
    Cleared,
}

/// Emitted once per mutating cart operation
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartEvent {
    pub change: CartChange,

    /// Product the operation targeted (`None` for clear)
    #[serde(rename = "product_id", skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,

    /// Cart contents after the mutation
    pub state: CartState,
}

// =============================================================================
// HTTP Payloads
// =============================================================================

/// Input for the set-quantity endpoint
#[derive(Debug, Deserialize)]
pub struct QuantityInput {
    /// Absolute quantity; zero or negative removes the item
    pub quantity: i64,
}

/// Response for the quantity lookup endpoint
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantityResponse {
    pub product_id: String,

    pub quantity: u32,
}
