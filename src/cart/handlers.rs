//! REST API handlers for shopping cart operations
//!
//! This module implements HTTP endpoints over the cart store and a
//! Server-Sent Events stream that pushes the new cart state after every
//! mutation.

use super::models::*;
use crate::state::SharedState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    routing::{get, post, put},
    Json, Router,
};
use futures_util::stream::{self, Stream};
use serde_json::json;
use std::convert::Infallible;
use tokio::sync::mpsc;
use tracing::warn;

/// Name of the SSE event carrying a fresh cart state
pub const CART_UPDATED_EVENT: &str = "cartUpdated";

/// Creates routes for cart-related operations
pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/api/cart", get(get_cart).delete(clear_cart))
        .route("/api/cart/items", post(add_item))
        .route(
            "/api/cart/items/:product_id",
            put(set_quantity).delete(remove_item),
        )
        .route("/api/cart/items/:product_id/quantity", get(item_quantity))
        .route("/api/cart/events", get(cart_events))
}

fn bad_request(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": message.into() })),
    )
        .into_response()
}

/// Endpoint: GET /api/cart
async fn get_cart(State(state): State<SharedState>) -> Json<CartState> {
    Json(state.cart.read())
}

/// Endpoint: DELETE /api/cart
async fn clear_cart(State(state): State<SharedState>) -> Json<CartState> {
    Json(state.cart.clear())
}

/// Endpoint: POST /api/cart/items
/// Adds one unit of the product, aggregating with an existing line.
async fn add_item(
    State(state): State<SharedState>,
    body: Result<Json<NewCartItem>, JsonRejection>,
) -> Response {
    let item = match body {
        Ok(Json(item)) => item,
        Err(e) => {
            warn!(error = %e.body_text(), "Rejected cart item");
            return bad_request("Invalid cart item");
        }
    };

    if item.product_id.trim().is_empty() {
        return bad_request("Product ID is required");
    }
    if !item.has_valid_price() {
        warn!(
            product_id = %item.product_id,
            unit_price = item.unit_price,
            "Rejected cart item price"
        );
        return bad_request("Invalid cart item");
    }

    Json(state.cart.add(item)).into_response()
}

/// Endpoint: PUT /api/cart/items/:product_id
async fn set_quantity(
    State(state): State<SharedState>,
    Path(product_id): Path<String>,
    body: Result<Json<QuantityInput>, JsonRejection>,
) -> Response {
    match body {
        Ok(Json(input)) => {
            Json(state.cart.set_quantity(&product_id, input.quantity)).into_response()
        }
        Err(e) => {
            warn!(error = %e.body_text(), "Rejected quantity update");
            bad_request("Invalid quantity")
        }
    }
}

/// Endpoint: DELETE /api/cart/items/:product_id
async fn remove_item(
    State(state): State<SharedState>,
    Path(product_id): Path<String>,
) -> Json<CartState> {
    Json(state.cart.remove(&product_id))
}

/// Endpoint: GET /api/cart/items/:product_id/quantity
async fn item_quantity(
    State(state): State<SharedState>,
    Path(product_id): Path<String>,
) -> Json<QuantityResponse> {
    let quantity = state.cart.quantity_of(&product_id);
    Json(QuantityResponse {
        product_id,
        quantity,
    })
}

/// Endpoint: GET /api/cart/events
/// Streams one `cartUpdated` event per mutation until the client goes away.
async fn cart_events(
    State(state): State<SharedState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let (tx, rx) = mpsc::unbounded_channel::<CartEvent>();
    let subscription = state.cart.subscribe(move |event| {
        let _ = tx.send(event.clone());
    });

    // The subscription travels with the stream and is dropped with it.
    let events = stream::unfold((rx, subscription), |(mut rx, subscription)| async move {
        let event = rx.recv().await?;
        Some((Ok(to_sse_event(&event)), (rx, subscription)))
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}

fn to_sse_event(event: &CartEvent) -> Event {
    match Event::default().event(CART_UPDATED_EVENT).json_data(event) {
        Ok(sse) => sse,
        Err(e) => {
            warn!(error = %e, "Failed to encode cart event");
            Event::default().event(CART_UPDATED_EVENT).data("{}")
        }
    }
}
