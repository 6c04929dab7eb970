//! Upstream catalog client
//!
//! Fetches raw payloads from the shopping-search API and hands them to the
//! normalizer. Every call is independent and performs a single attempt.

use super::models::{Product, ProductDetail, SearchResults};
use super::normalizer::{normalize_detail, normalize_search};
use crate::config::CatalogConfig;
use crate::error::CatalogError;
use reqwest::{Client, Url};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, info, warn};

const SEARCH_ENGINE: &str = "google_shopping";
const PRODUCT_ENGINE: &str = "google_product";

/// HTTP client for the search and product-detail endpoints
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: Client,
    config: CatalogConfig,
}

impl CatalogClient {
    pub fn new(config: CatalogConfig) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "Falling back to default HTTP client");
                Client::new()
            });

        Self { http, config }
    }

    /// Runs a search and normalizes the result list.
    pub async fn search(&self, query: &str) -> Result<SearchResults, CatalogError> {
        let payload = self
            .get_json(&[("engine", SEARCH_ENGINE), ("q", query)])
            .await?;
        let results = normalize_search(&payload).ok_or(CatalogError::NotFound)?;

        info!(
            query,
            products = results.products.len(),
            total = results.total_results,
            "Search normalized"
        );
        Ok(results)
    }

    /// Fetches and normalizes a single product record.
    pub async fn product(&self, product_id: &str) -> Result<ProductDetail, CatalogError> {
        let payload = self
            .get_json(&[("engine", PRODUCT_ENGINE), ("product_id", product_id)])
            .await?;
        let detail = normalize_detail(&payload, product_id).ok_or(CatalogError::NotFound)?;

        debug!(
            product_id,
            images = detail.images.len(),
            variants = detail.variants.len(),
            "Product normalized"
        );
        Ok(detail)
    }

    /// Search results with paging info, or `None` on any failure.
    pub async fn search_results(&self, query: &str) -> Option<SearchResults> {
        match self.search(query).await {
            Ok(results) => Some(results),
            Err(e) => {
                log_failure("search", query, &e);
                None
            }
        }
    }

    /// Products matching `query`, or `None` on any failure.
    pub async fn search_products(&self, query: &str) -> Option<Vec<Product>> {
        self.search_results(query)
            .await
            .map(|results| results.products)
    }

    /// Product detail for `product_id`, or `None` when missing or failed.
    pub async fn fetch_product_detail(&self, product_id: &str) -> Option<ProductDetail> {
        match self.product(product_id).await {
            Ok(detail) => Some(detail),
            Err(e) => {
                log_failure("product", product_id, &e);
                None
            }
        }
    }

    async fn get_json(&self, params: &[(&str, &str)]) -> Result<Value, CatalogError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(CatalogError::MissingApiKey)?;

        let request = self
            .http
            .get(&self.config.base_url)
            .query(params)
            .query(&[
                ("gl", self.config.gl.as_str()),
                ("hl", self.config.hl.as_str()),
                ("api_key", api_key),
            ])
            .build()?;

        debug!(url = %redacted(request.url()), "Upstream request");

        let response = self.http.execute(request).await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(CatalogError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

/// `url` with the `api_key` query value masked
fn redacted(url: &Url) -> String {
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(name, value)| {
            let value = if name == "api_key" {
                "***".to_string()
            } else {
                value.into_owned()
            };
            (name.into_owned(), value)
        })
        .collect();

    let mut masked = url.clone();
    masked.query_pairs_mut().clear().extend_pairs(pairs);
    masked.to_string()
}

fn log_failure(operation: &str, subject: &str, err: &CatalogError) {
    match err {
        CatalogError::NotFound => info!(operation, subject, "No upstream results"),
        CatalogError::MissingApiKey => error!(operation, error = %err, "Catalog not configured"),
        _ => error!(operation, subject, error = %err, "Upstream fetch failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redaction_masks_encoded_keys() {
        let key = "a+b/c=d";
        let request = Client::new()
            .get("http://localhost/search.json")
            .query(&[("q", "kettle"), ("api_key", key)])
            .build()
            .unwrap();
        assert!(!request.url().as_str().contains(key));

        let logged = redacted(request.url());

        assert!(logged.contains("q=kettle"));
        assert!(logged.contains("api_key=***") || logged.contains("api_key=%2A%2A%2A"));
        assert!(!logged.contains("a%2Bb"));
        assert!(!logged.contains(key));
    }
}
