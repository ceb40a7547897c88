//! Cart, checkout and cart panel behavior over the HTTP API.

use std::time::Duration;

use axum::http::StatusCode;
use marche_integration_tests::{TestApp, discounted_product, product, variant};
use marche_storefront::config::StorefrontConfig;
use serde_json::json;

// =============================================================================
// Cart Lines
// =============================================================================

#[tokio::test]
async fn test_add_update_remove_scenario() {
    let app = TestApp::new();

    let res = app
        .post("/api/cart/items", json!({ "product": product("p1", 1000), "quantity": 2 }))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["totalItems"], 2);
    assert_eq!(res.body["subtotal"], "2000");

    let res = app
        .post("/api/cart/items", json!({ "product": product("p1", 1000) }))
        .await;
    let items = res.body["items"].as_array().cloned().unwrap_or_default();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["quantity"], 3);

    let res = app.patch("/api/cart/items/p1", json!({ "quantity": 0 })).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["items"], json!([]));
    assert_eq!(res.body["totalItems"], 0);
}

#[tokio::test]
async fn test_variants_are_separate_lines() {
    let app = TestApp::new();
    let shirt = product("shirt", 8000);

    app.post(
        "/api/cart/items",
        json!({ "product": shirt, "variant": variant("m", 8500, "M") }),
    )
    .await;
    let res = app
        .post(
            "/api/cart/items",
            json!({ "product": shirt, "variant": variant("l", 9000, "L") }),
        )
        .await;

    let items = res.body["items"].as_array().cloned().unwrap_or_default();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["id"], "shirt-m");
    assert_eq!(items[0]["variantLabel"], "M");
    assert_eq!(items[1]["price"], "9000");
    assert_eq!(res.body["subtotal"], "17500");
}

#[tokio::test]
async fn test_zero_quantity_add_is_rejected() {
    let app = TestApp::new();
    let res = app
        .post("/api/cart/items", json!({ "product": product("p1", 1000), "quantity": 0 }))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(app.get("/api/cart").await.body["totalItems"], 0);
}

#[tokio::test]
async fn test_malformed_body_is_rejected() {
    let app = TestApp::new();
    let res = app
        .post("/api/cart/items", json!({ "quantity": 1 }))
        .await;
    assert!(res.status.is_client_error());
}

#[tokio::test]
async fn test_unknown_line_operations_are_noops() {
    let app = TestApp::new();
    app.post("/api/cart/items", json!({ "product": product("p1", 1000) }))
        .await;

    let res = app.patch("/api/cart/items/nope", json!({ "quantity": 5 })).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["totalItems"], 1);

    let res = app.delete("/api/cart/items/nope").await;
    assert_eq!(res.body["totalItems"], 1);

    let res = app.delete("/api/cart/items/p1").await;
    assert_eq!(res.body["totalItems"], 0);
}

#[tokio::test]
async fn test_clear_empties_cart_and_last_added() {
    let app = TestApp::new();
    let res = app
        .post("/api/cart/items", json!({ "product": product("p1", 1000) }))
        .await;
    assert_eq!(res.body["lastAddedItem"]["productId"], "p1");

    let res = app.delete("/api/cart").await;
    assert_eq!(res.body["items"], json!([]));
    assert!(res.body["lastAddedItem"].is_null());
}

#[tokio::test]
async fn test_savings_from_compare_at_price() {
    let app = TestApp::new();
    let res = app
        .post(
            "/api/cart/items",
            json!({ "product": discounted_product("p1", 8000, 10000), "quantity": 2 }),
        )
        .await;
    assert_eq!(res.body["totalSavings"], "4000");
    assert_eq!(res.body["subtotalDisplay"], "16 000 FCFA");
}

// =============================================================================
// Checkout
// =============================================================================

#[tokio::test]
async fn test_shipping_charged_at_threshold() {
    let app = TestApp::new();
    app.post(
        "/api/cart/items",
        json!({ "product": product("p1", 25000), "quantity": 2 }),
    )
    .await;

    let res = app.get("/api/checkout/summary").await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["subtotal"], "50000");
    assert_eq!(res.body["shipping"], "3275");
    assert_eq!(res.body["total"], "53275");
    assert_eq!(res.body["freeShipping"], false);
}

#[tokio::test]
async fn test_shipping_free_above_threshold() {
    let app = TestApp::new();
    app.post("/api/cart/items", json!({ "product": product("p1", 50001) }))
        .await;

    let res = app.get("/api/checkout/summary").await;
    assert_eq!(res.body["shipping"], "0");
    assert_eq!(res.body["total"], "50001");
    assert_eq!(res.body["freeShipping"], true);
    assert_eq!(res.body["shippingDisplay"], "Free");
}

// =============================================================================
// Cart Panel
// =============================================================================

#[tokio::test]
async fn test_panel_open_close_toggle() {
    let app = TestApp::new();
    assert_eq!(app.get("/api/cart").await.body["isOpen"], false);

    assert_eq!(app.post_empty("/api/cart/open").await.body["isOpen"], true);
    assert_eq!(app.post_empty("/api/cart/close").await.body["isOpen"], false);
    assert_eq!(app.post_empty("/api/cart/toggle").await.body["isOpen"], true);
    assert_eq!(app.post_empty("/api/cart/toggle").await.body["isOpen"], false);
}

#[tokio::test(start_paused = true)]
async fn test_panel_opens_after_reveal_delay() {
    let app = TestApp::with_config(StorefrontConfig {
        cart_reveal_delay: Duration::from_millis(300),
        ..StorefrontConfig::default()
    });

    let res = app
        .post("/api/cart/items", json!({ "product": product("p1", 1000) }))
        .await;
    assert_eq!(res.body["isOpen"], false);

    tokio::time::sleep(Duration::from_millis(301)).await;
    assert_eq!(app.get("/api/cart").await.body["isOpen"], true);
}

#[tokio::test(start_paused = true)]
async fn test_close_cancels_pending_reveal() {
    let app = TestApp::with_config(StorefrontConfig {
        cart_reveal_delay: Duration::from_millis(300),
        ..StorefrontConfig::default()
    });

    app.post("/api/cart/items", json!({ "product": product("p1", 1000) }))
        .await;
    app.post_empty("/api/cart/close").await;

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(app.get("/api/cart").await.body["isOpen"], false);
}
