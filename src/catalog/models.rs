//! Catalog Domain Models
//!
//! Stable internal shapes that both upstream schemas are normalized into.

use serde::{Deserialize, Serialize};

// =============================================================================
// Constants
// =============================================================================

/// Cover image used for search results without a thumbnail
pub const SEARCH_PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/400x400?text=No+Image";
/// Cover image used for product details without any image
pub const DETAIL_PLACEHOLDER_IMAGE: &str =
    "https://via.placeholder.com/400x400?text=Product+Image";
/// Title used when the upstream detail record has none
pub const DEFAULT_DETAIL_TITLE: &str = "Product Title Not Available";
/// Title used for variants without one
pub const DEFAULT_VARIANT_TITLE: &str = "Variant";
/// Display price used when none is supplied
pub const DEFAULT_DISPLAY_PRICE: &str = "$0";
/// Currency symbol used when none can be derived
pub const DEFAULT_CURRENCY: &str = "$";
/// Marker of the low-quality image proxy
pub const DEGRADED_PROXY_PATTERN: &str = "encrypted-tbn";

// =============================================================================
// Value Objects
// =============================================================================

/// Numeric price with its currency symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price {
    pub amount: f64,
    pub currency: String,
}

impl Default for Price {
    fn default() -> Self {
        Self {
            amount: 0.0,
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

/// Review score and number of reviews
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub score: f64,
    pub count: u64,
}

// =============================================================================
// Products
// =============================================================================

/// A search-result entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Opaque upstream identifier, the cart key
    #[serde(rename = "product_id")]
    pub product_id: String,

    pub title: String,

    /// Cover image (placeholder when absent upstream)
    pub image: String,

    pub price: Price,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,

    /// Link to the product on the provider side
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Merchant or seller name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller: Option<String>,

    /// Promotional label such as `Best seller`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
}

/// One selectable variation of a product (colour, size, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    /// Variation group the variant belongs to, e.g. `color`
    pub group: String,

    pub title: String,

    pub price: Price,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_product_id: Option<String>,
}

/// Full product page record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,

    /// Gallery, deduplicated, cover first
    pub images: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_icon: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_price: Option<Price>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub badges: Vec<String>,

    #[serde(default)]
    pub variants: Vec<Variant>,
}

/// Normalized search response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    pub products: Vec<Product>,

    /// Upstream-reported hit count, or the number of products returned
    pub total_results: u64,

    pub page: u64,
}

/// Body of a successful `GET /api/search`
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub query: String,

    #[serde(flatten)]
    pub results: SearchResults,
}
