//! Integration tests for the cart REST API
//!
//! These tests drive the full router and verify:
//! - Line-item aggregation and derived totals
//! - Absolute quantity updates and removal at zero
//! - Clearing and idempotent removal
//! - Change notification over Server-Sent Events
//! - Persistence through the file-backed store

use axum::body::Body;
use axum::http::{Request, StatusCode};
use futures_util::StreamExt;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::util::ServiceExt; // for `oneshot`

use storefront_rust::cart::{CartStore, JsonFileStore, KeyValueStore, MemoryStore};
use storefront_rust::catalog::CatalogClient;
use storefront_rust::config::CatalogConfig;
use storefront_rust::router::create_app_router;
use storefront_rust::state::{AppState, SharedState};

/// Helper function to create a test app instance over the given storage
fn create_test_app_with(storage: Arc<dyn KeyValueStore>) -> (axum::Router, SharedState) {
    let state = Arc::new(AppState::new(
        CatalogClient::new(CatalogConfig::default()),
        CartStore::new(storage, "walmart-cart"),
    ));
    (create_app_router(state.clone()), state)
}

fn create_test_app() -> (axum::Router, SharedState) {
    create_test_app_with(Arc::new(MemoryStore::new()))
}

/// Helper function to send a JSON request and get the response
async fn send_rest_request(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let body = match body {
        Some(body) => Body::from(serde_json::to_string(&body).unwrap()),
        None => Body::empty(),
    };
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body)
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(json!({}));

    (status, body)
}

fn kettle() -> Value {
    json!({
        "product_id": "P1",
        "title": "Electric Kettle",
        "unitPrice": 9.99,
        "currency": "$",
        "thumbnail": "https://img/kettle.jpg",
        "source": "Walmart"
    })
}

#[tokio::test]
async fn test_empty_cart_on_first_access() {
    let (app, _) = create_test_app();

    let (status, body) = send_rest_request(&app, "GET", "/api/cart", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "items": [], "totalItems": 0, "totalPrice": 0.0 }));
}

#[tokio::test]
async fn test_add_same_product_three_times() {
    let (app, _) = create_test_app();

    for _ in 0..3 {
        let (status, _) = send_rest_request(&app, "POST", "/api/cart/items", Some(kettle())).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, body) = send_rest_request(&app, "GET", "/api/cart", None).await;
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["product_id"], "P1");
    assert_eq!(items[0]["quantity"], 3);
    assert_eq!(body["totalItems"], 3);
    assert_eq!(body["totalPrice"], 29.97);

    let (_, body) = send_rest_request(&app, "GET", "/api/cart/items/P1/quantity", None).await;
    assert_eq!(body, json!({ "productId": "P1", "quantity": 3 }));
}

#[tokio::test]
async fn test_legacy_price_field_is_accepted() {
    let (app, _) = create_test_app();

    let item = json!({
        "product_id": "P2",
        "title": "Toaster",
        "price": 24.5,
        "thumbnail": ""
    });
    let (status, body) = send_rest_request(&app, "POST", "/api/cart/items", Some(item)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"][0]["unitPrice"], 24.5);
    assert_eq!(body["items"][0]["currency"], "$");
}

#[tokio::test]
async fn test_invalid_items_are_rejected() {
    let (app, state) = create_test_app();

    let (status, body) = send_rest_request(
        &app,
        "POST",
        "/api/cart/items",
        Some(json!({ "title": "no id or price" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let mut blank = kettle();
    blank["product_id"] = json!("  ");
    let (status, body) = send_rest_request(&app, "POST", "/api/cart/items", Some(blank)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Product ID is required");

    for price in [json!(1e307), json!(-3.0)] {
        let mut mispriced = kettle();
        mispriced["unitPrice"] = price;
        let (status, body) =
            send_rest_request(&app, "POST", "/api/cart/items", Some(mispriced)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid cart item");
    }

    assert!(state.cart.read().is_empty());
}

#[tokio::test]
async fn test_set_quantity_and_remove_at_zero() {
    let (app, _) = create_test_app();
    send_rest_request(&app, "POST", "/api/cart/items", Some(kettle())).await;

    let (status, body) = send_rest_request(
        &app,
        "PUT",
        "/api/cart/items/P1",
        Some(json!({ "quantity": 4 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"][0]["quantity"], 4);
    assert_eq!(body["totalItems"], 4);
    assert_eq!(body["totalPrice"], 39.96);

    let (_, body) = send_rest_request(
        &app,
        "PUT",
        "/api/cart/items/P1",
        Some(json!({ "quantity": 0 })),
    )
    .await;
    assert_eq!(body["items"].as_array().unwrap().len(), 0);
    assert_eq!(body["totalItems"], 0);

    let (_, body) = send_rest_request(&app, "GET", "/api/cart/items/P1/quantity", None).await;
    assert_eq!(body["quantity"], 0);
}

#[tokio::test]
async fn test_remove_unknown_product_is_noop() {
    let (app, _) = create_test_app();
    let (_, before) = send_rest_request(&app, "POST", "/api/cart/items", Some(kettle())).await;

    let (status, after) = send_rest_request(&app, "DELETE", "/api/cart/items/ghost", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(after, before);
}

#[tokio::test]
async fn test_clear_cart() {
    let (app, _) = create_test_app();
    send_rest_request(&app, "POST", "/api/cart/items", Some(kettle())).await;
    send_rest_request(&app, "PUT", "/api/cart/items/P1", Some(json!({ "quantity": 7 }))).await;

    let (status, body) = send_rest_request(&app, "DELETE", "/api/cart", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "items": [], "totalItems": 0, "totalPrice": 0.0 }));
}

#[tokio::test]
async fn test_cart_events_stream() {
    let (app, state) = create_test_app();

    let request = Request::builder()
        .method("GET")
        .uri("/api/cart/events")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap();
    assert_eq!(content_type, "text/event-stream");
    assert_eq!(state.cart.notifier().listener_count(), 1);

    let mut events = response.into_body().into_data_stream();

    send_rest_request(&app, "POST", "/api/cart/items", Some(kettle())).await;

    let chunk = tokio::time::timeout(Duration::from_secs(5), events.next())
        .await
        .expect("cart event within timeout")
        .expect("stream still open")
        .unwrap();
    let frame = String::from_utf8(chunk.to_vec()).unwrap();

    assert!(frame.contains("event: cartUpdated"));
    assert!(frame.contains("\"change\":\"added\""));
    assert!(frame.contains("\"totalItems\":1"));

    drop(events);
    assert_eq!(state.cart.notifier().listener_count(), 0);
}

#[tokio::test]
async fn test_cart_survives_restart_with_file_store() {
    let dir = tempfile::tempdir().unwrap();

    {
        let (app, _) = create_test_app_with(Arc::new(JsonFileStore::new(dir.path())));
        send_rest_request(&app, "POST", "/api/cart/items", Some(kettle())).await;
        send_rest_request(&app, "POST", "/api/cart/items", Some(kettle())).await;
    }

    let (app, _) = create_test_app_with(Arc::new(JsonFileStore::new(dir.path())));
    let (_, body) = send_rest_request(&app, "GET", "/api/cart", None).await;

    assert_eq!(body["items"][0]["quantity"], 2);
    assert_eq!(body["totalPrice"], 19.98);
    assert!(dir.path().join("walmart-cart.json").exists());
}
