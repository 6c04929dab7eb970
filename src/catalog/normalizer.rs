//! Upstream Response Normalizer
//!
//! Two search schemas reach us: the Google-Shopping style payload with a
//! top-level `shopping_results` list, and the aggregator payload nesting
//! results under `content.organic` or `content.results`. The schema is
//! resolved once into a [`SearchPayload`] and each variant has its own
//! mapping function.

use super::helpers::*;
use super::models::*;
use serde_json::Value;
use tracing::debug;

// =============================================================================
// Search
// =============================================================================

/// Search payload with its schema resolved
#[derive(Debug, Clone, Copy)]
pub enum SearchPayload<'a> {
    /// `shopping_results: [...]`
    GoogleShopping(&'a [Value]),
    /// `content.organic: [...]` or `content.results: [...]`
    Aggregator(&'a [Value]),
}

impl<'a> SearchPayload<'a> {
    /// Detects the schema by the presence of its result container.
    ///
    /// Returns `None` when the payload reports an `error` or carries no
    /// result array.
    pub fn detect(payload: &'a Value) -> Option<Self> {
        if payload.get("error").is_some() {
            return None;
        }

        if let Some(items) = payload.get("shopping_results").and_then(Value::as_array) {
            return Some(Self::GoogleShopping(items));
        }

        let content = payload.get("content")?;
        content
            .get("organic")
            .and_then(Value::as_array)
            .or_else(|| content.get("results").and_then(Value::as_array))
            .map(|items| Self::Aggregator(items))
    }

    fn entries(&self) -> &'a [Value] {
        match *self {
            Self::GoogleShopping(items) | Self::Aggregator(items) => items,
        }
    }
}

/// Normalizes a raw search payload.
///
/// `None` signals failure or a missing result container; an empty product
/// list is a successful search with no hits.
pub fn normalize_search(payload: &Value) -> Option<SearchResults> {
    let detected = SearchPayload::detect(payload)?;

    let products: Vec<Product> = detected
        .entries()
        .iter()
        .filter_map(|entry| match detected {
            SearchPayload::GoogleShopping(_) => normalize_shopping_entry(entry),
            SearchPayload::Aggregator(_) => normalize_aggregator_entry(entry),
        })
        .collect();

    let total_results = reported_total(payload).unwrap_or(products.len() as u64);
    let page = reported_page(payload).unwrap_or(1);

    Some(SearchResults {
        products,
        total_results,
        page,
    })
}

/// Maps one `shopping_results` entry.
fn normalize_shopping_entry(entry: &Value) -> Option<Product> {
    let url = str_field(entry, "product_link").map(String::from);
    let product_id = id_field(entry, "product_id").or_else(|| url.clone());
    let Some(product_id) = product_id else {
        debug!("Skipping shopping result without identifier");
        return None;
    };

    Some(Product {
        product_id,
        title: str_field(entry, "title").unwrap_or_default().to_string(),
        image: str_field(entry, "thumbnail")
            .unwrap_or(SEARCH_PLACEHOLDER_IMAGE)
            .to_string(),
        price: extract_price(entry.get("extracted_price"), str_field(entry, "price")),
        rating: extract_rating(entry.get("rating"), entry.get("reviews")),
        url,
        seller: str_field(entry, "source").map(String::from),
        badge: str_field(entry, "badge").map(String::from),
    })
}

/// Maps one aggregator entry, where price and rating are nested objects.
fn normalize_aggregator_entry(entry: &Value) -> Option<Product> {
    let url = str_field(entry, "url").map(String::from);
    let product_id = id_field(entry, "product_id").or_else(|| url.clone());
    let Some(product_id) = product_id else {
        debug!("Skipping aggregator result without identifier");
        return None;
    };

    let price = match entry.get("price") {
        Some(Value::Object(price)) => {
            let currency = price
                .get("currency")
                .and_then(Value::as_str)
                .filter(|c| !c.trim().is_empty())
                .unwrap_or(DEFAULT_CURRENCY);
            Price {
                amount: parse_score(price.get("price")),
                currency: currency.to_string(),
            }
        }
        Some(Value::String(display)) => extract_price(None, Some(display.as_str())),
        Some(Value::Number(_)) => extract_price(entry.get("price"), None),
        _ => Price::default(),
    };

    let rating = entry
        .get("rating")
        .filter(|r| r.is_object())
        .and_then(|r| extract_rating(r.get("rating"), r.get("count")));

    let seller = entry
        .get("seller")
        .and_then(|s| s.get("name"))
        .and_then(Value::as_str)
        .map(String::from);

    Some(Product {
        product_id,
        title: str_field(entry, "title").unwrap_or_default().to_string(),
        image: str_field(entry, "image")
            .unwrap_or(SEARCH_PLACEHOLDER_IMAGE)
            .to_string(),
        price,
        rating,
        url,
        seller,
        badge: str_field(entry, "badge").map(String::from),
    })
}

fn reported_total(payload: &Value) -> Option<u64> {
    let candidates = [
        payload.pointer("/search_information/total_results"),
        payload.pointer("/content/page_details/total_results"),
        payload.pointer("/content/total_results"),
    ];
    candidates
        .into_iter()
        .flatten()
        .map(|v| parse_count(Some(v)))
        .find(|total| *total > 0)
}

fn reported_page(payload: &Value) -> Option<u64> {
    payload
        .pointer("/pagination/current_page")
        .or_else(|| payload.pointer("/content/last_visible_page"))
        .and_then(Value::as_u64)
        .filter(|page| *page > 0)
}

// =============================================================================
// Product detail
// =============================================================================

/// Detail payload with its shape resolved
#[derive(Debug, Clone, Copy)]
pub enum DetailPayload<'a> {
    /// Record nested under `product_results`
    Nested(&'a Value),
    /// Record returned as the top-level object
    Flat(&'a Value),
}

impl<'a> DetailPayload<'a> {
    pub fn detect(payload: &'a Value) -> Option<Self> {
        let object = payload.as_object()?;
        if object.contains_key("error") {
            return None;
        }

        if let Some(nested) = object.get("product_results").filter(|v| v.is_object()) {
            return Some(Self::Nested(nested));
        }

        if object.contains_key("title") || object.contains_key("product_id") {
            return Some(Self::Flat(payload));
        }

        None
    }

    fn record(&self) -> &'a Value {
        match *self {
            Self::Nested(record) | Self::Flat(record) => record,
        }
    }
}

/// Normalizes a product-detail payload.
///
/// `requested_id` fills in the identifier when the record omits it, keeping
/// the id stable between the search entry and the detail page.
pub fn normalize_detail(payload: &Value, requested_id: &str) -> Option<ProductDetail> {
    let record = DetailPayload::detect(payload)?.record();

    let product_id = id_field(record, "product_id")
        .or_else(|| Some(requested_id.trim().to_string()).filter(|id| !id.is_empty()))?;

    let display_price = record
        .get("prices")
        .and_then(Value::as_array)
        .and_then(|prices| prices.first())
        .and_then(Value::as_str)
        .or_else(|| str_field(record, "price"))
        .unwrap_or(DEFAULT_DISPLAY_PRICE);

    let extracted_old = record
        .get("extracted_old_price")
        .filter(|v| !v.is_null());
    let old_price = match (str_field(record, "old_price"), extracted_old) {
        (None, None) => None,
        (display, extracted) => Some(extract_price(extracted, display)),
    };

    let (cover, images) = select_images(record);

    let product = Product {
        product_id,
        title: str_field(record, "title")
            .unwrap_or(DEFAULT_DETAIL_TITLE)
            .to_string(),
        image: cover,
        price: extract_price(record.get("extracted_price"), Some(display_price)),
        rating: extract_rating(record.get("rating"), record.get("reviews")),
        url: str_field(record, "product_link").map(String::from),
        seller: str_field(record, "source").map(String::from),
        badge: str_field(record, "badge").map(String::from),
    };

    Some(ProductDetail {
        product,
        images,
        description: str_field(record, "description").map(String::from),
        source_name: str_field(record, "source").map(String::from),
        source_icon: str_field(record, "source_icon").map(String::from),
        delivery: str_field(record, "delivery").map(String::from),
        old_price,
        tag: str_field(record, "tag").map(String::from),
        badges: record
            .get("badges")
            .and_then(Value::as_array)
            .map(|badges| {
                badges
                    .iter()
                    .filter_map(Value::as_str)
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default(),
        variants: extract_variants(record),
    })
}

/// Picks the cover image and assembles the gallery.
///
/// Cover preference: canonical thumbnail, first direct (non-proxy) media
/// URL, first media URL, generic thumbnail, placeholder. The gallery keeps
/// proxy URLs as secondary images and always starts with a real cover.
pub fn select_images(record: &Value) -> (String, Vec<String>) {
    let canonical = str_field(record, "serpapi_thumbnail");
    let generic = str_field(record, "thumbnail");
    let media: Vec<&str> = record
        .get("media")
        .and_then(Value::as_array)
        .map(|media| {
            media
                .iter()
                .filter_map(|m| str_field(m, "link"))
                .collect()
        })
        .unwrap_or_default();

    let cover = canonical
        .or_else(|| media.iter().copied().find(|url| !is_degraded_proxy(url)))
        .or_else(|| media.first().copied())
        .or(generic);

    let gallery = cover
        .into_iter()
        .chain(canonical)
        .chain(media.iter().copied())
        .chain(generic)
        .map(String::from);

    (
        cover.unwrap_or(DETAIL_PLACEHOLDER_IMAGE).to_string(),
        dedupe_preserving_order(gallery),
    )
}

/// Flattens every variation group (`color`, `size`, ...) into one list.
fn extract_variants(record: &Value) -> Vec<Variant> {
    let Some(groups) = record.get("variations").and_then(Value::as_object) else {
        return Vec::new();
    };

    groups
        .iter()
        .filter_map(|(group, entries)| entries.as_array().map(|entries| (group, entries)))
        .flat_map(|(group, entries)| {
            entries.iter().map(move |entry| Variant {
                group: group.clone(),
                title: str_field(entry, "title")
                    .unwrap_or(DEFAULT_VARIANT_TITLE)
                    .to_string(),
                price: extract_price(
                    entry.get("extracted_price"),
                    Some(str_field(entry, "price").unwrap_or(DEFAULT_DISPLAY_PRICE)),
                ),
                thumbnail: str_field(entry, "thumbnail").map(String::from),
                variant_product_id: id_field(entry, "product_id"),
            })
        })
        .collect()
}
