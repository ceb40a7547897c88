//! Wishlist and comparison behavior over the HTTP API.

use axum::http::StatusCode;
use marche_integration_tests::{TestApp, discounted_product, product, variant};
use serde_json::json;

// =============================================================================
// Wishlist
// =============================================================================

#[tokio::test]
async fn test_wishlist_add_is_idempotent() {
    let app = TestApp::new();
    for _ in 0..3 {
        let res = app
            .post("/api/wishlist/items", json!({ "product": product("p1", 2000) }))
            .await;
        assert_eq!(res.status, StatusCode::OK);
    }

    let res = app.get("/api/wishlist").await;
    assert_eq!(res.body["count"], 1);
    assert_eq!(res.body["items"][0]["productId"], "p1");
}

#[tokio::test]
async fn test_wishlist_toggle_twice_restores_state() {
    let app = TestApp::new();
    let body = json!({ "product": product("p1", 2000), "variant": variant("s", 2000, "S") });

    let res = app.post("/api/wishlist/toggle", body.clone()).await;
    assert_eq!(res.body["inWishlist"], true);
    assert_eq!(res.body["items"][0]["id"], "p1-s");

    let res = app.post("/api/wishlist/toggle", body).await;
    assert_eq!(res.body["inWishlist"], false);
    assert_eq!(res.body["count"], 0);
}

#[tokio::test]
async fn test_wishlist_toggle_announces_change() {
    let app = TestApp::new();
    let body = json!({ "product": product("p1", 2000) });
    app.post("/api/wishlist/toggle", body.clone()).await;
    app.post("/api/wishlist/toggle", body).await;

    let res = app.get("/api/notifications").await;
    let titles: Vec<String> = res.body["items"]
        .as_array()
        .cloned()
        .unwrap_or_default()
        .iter()
        .filter_map(|n| n["title"].as_str().map(String::from))
        .collect();
    assert_eq!(titles, vec!["Added to wishlist", "Removed from wishlist"]);
}

#[tokio::test]
async fn test_wishlist_remove_and_clear() {
    let app = TestApp::new();
    for id in ["a", "b"] {
        app.post("/api/wishlist/items", json!({ "product": product(id, 1000) }))
            .await;
    }

    let res = app.delete("/api/wishlist/items/a").await;
    assert_eq!(res.body["count"], 1);

    let res = app.delete("/api/wishlist/items/unknown").await;
    assert_eq!(res.body["count"], 1);

    let res = app.delete("/api/wishlist").await;
    assert_eq!(res.body["count"], 0);
}

// =============================================================================
// Compare
// =============================================================================

#[tokio::test]
async fn test_compare_rejects_fifth_product() {
    let app = TestApp::new();
    for id in ["a", "b", "c", "d"] {
        let res = app
            .post("/api/compare", json!({ "product": product(id, 1000) }))
            .await;
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(res.body["success"], true);
    }

    let res = app
        .post("/api/compare", json!({ "product": product("e", 1000) }))
        .await;
    assert_eq!(res.status, StatusCode::CONFLICT);
    assert_eq!(res.body["success"], false);
    assert_eq!(res.body["message"], "You can compare at most 4 products");

    let res = app.get("/api/compare").await;
    assert_eq!(res.body["items"].as_array().map(Vec::len), Some(4));
    assert_eq!(res.body["maxItems"], 4);
}

#[tokio::test]
async fn test_compare_rejects_duplicate() {
    let app = TestApp::new();
    app.post("/api/compare", json!({ "product": product("a", 1000) }))
        .await;

    let res = app
        .post("/api/compare", json!({ "product": product("a", 1000) }))
        .await;
    assert_eq!(res.status, StatusCode::CONFLICT);
    assert_eq!(res.body["success"], false);
}

#[tokio::test]
async fn test_compare_toggle_outcomes_are_uniform() {
    let app = TestApp::new();
    let body = json!({ "product": product("a", 1000) });

    let added = app.post("/api/compare/toggle", body.clone()).await;
    assert_eq!(added.status, StatusCode::OK);
    assert_eq!(added.body["success"], true);

    let removed = app.post("/api/compare/toggle", body).await;
    assert_eq!(removed.status, StatusCode::OK);
    assert_eq!(removed.body["success"], true);
    assert!(removed.body["message"].is_string());

    assert_eq!(app.get("/api/compare").await.body["items"], json!([]));
}

#[tokio::test]
async fn test_compare_toggle_when_full_warns() {
    let app = TestApp::new();
    for id in ["a", "b", "c", "d"] {
        app.post("/api/compare", json!({ "product": product(id, 1000) }))
            .await;
    }

    let res = app
        .post("/api/compare/toggle", json!({ "product": product("e", 1000) }))
        .await;
    assert_eq!(res.status, StatusCode::CONFLICT);

    let notes = app.get("/api/notifications").await;
    let last = notes.body["items"]
        .as_array()
        .and_then(|items| items.last().cloned())
        .unwrap_or_default();
    assert_eq!(last["type"], "warning");
}

#[tokio::test]
async fn test_compare_remove_and_clear() {
    let app = TestApp::new();
    for id in ["a", "b"] {
        app.post("/api/compare", json!({ "product": product(id, 1000) }))
            .await;
    }

    let res = app.delete("/api/compare/items/a").await;
    assert_eq!(res.body["items"].as_array().map(Vec::len), Some(1));

    let res = app.delete("/api/compare").await;
    assert_eq!(res.body["items"], json!([]));
}

#[tokio::test]
async fn test_saved_and_compared_products_show_discount() {
    let app = TestApp::new();
    app.post(
        "/api/wishlist/items",
        json!({ "product": discounted_product("p1", 15000, 20000) }),
    )
    .await;
    app.post(
        "/api/compare",
        json!({ "product": discounted_product("p1", 15000, 20000) }),
    )
    .await;

    let saved = app.get("/api/wishlist").await;
    assert_eq!(saved.body["items"][0]["discountPercentage"], 25);
    assert_eq!(saved.body["items"][0]["priceDisplay"], "15 000 FCFA");

    let compared = app.get("/api/compare").await;
    assert_eq!(compared.body["items"][0]["discountPercentage"], 25);
}
