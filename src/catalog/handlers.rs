//! REST API handlers for search and product pages
//!
//! Failures never leak upstream details: the body carries an `error` marker
//! so the UI can tell "loading failed" apart from "no products found".

use super::models::SearchResponse;
use crate::state::SharedState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

/// Creates routes for catalog operations
pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/api/search", get(search))
        .route("/api/product", get(product))
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    q: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProductParams {
    product_id: Option<String>,
}

/// Endpoint: GET /api/search?q=
async fn search(
    State(state): State<SharedState>,
    Query(params): Query<SearchParams>,
) -> impl IntoResponse {
    let Some(query) = params.q.map(|q| q.trim().to_string()).filter(|q| !q.is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "No search query provided" })),
        )
            .into_response();
    };

    match state.catalog.search_results(&query).await {
        Some(results) => Json(SearchResponse { query, results }).into_response(),
        None => (
            StatusCode::BAD_GATEWAY,
            Json(json!({ "error": "Loading failed", "query": query })),
        )
            .into_response(),
    }
}

/// Endpoint: GET /api/product?product_id=
async fn product(
    State(state): State<SharedState>,
    Query(params): Query<ProductParams>,
) -> impl IntoResponse {
    let Some(product_id) = params
        .product_id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
    else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Product ID is required" })),
        )
            .into_response();
    };

    match state.catalog.fetch_product_detail(&product_id).await {
        Some(detail) => Json(detail).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Product not found", "product_id": product_id })),
        )
            .into_response(),
    }
}
