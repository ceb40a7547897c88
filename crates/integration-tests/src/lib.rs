//! Integration tests for Marché.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p marche-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `storefront_cart` - Cart, checkout and panel state over HTTP
//! - `storefront_lists` - Wishlist and comparison over HTTP
//! - `storefront_notifications` - Notification lifetime and dismissal
//! - `storefront_sessions` - Shopper identity, isolation and persistence
//!
//! Tests drive the storefront router in-process through
//! `tower::ServiceExt::oneshot`; no server or network is involved.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{HeaderMap, HeaderValue, Method, Request, StatusCode, header};
use axum::Router;
use marche_core::ShopperId;
use marche_storefront::config::StorefrontConfig;
use marche_storefront::middleware::SHOPPER_ID_HEADER;
use marche_storefront::persist::{KeyValueStore, MemoryStore};
use marche_storefront::state::AppState;
use serde_json::{Value, json};
use tower::ServiceExt;

/// A response decoded for assertions.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    pub set_cookie: Option<String>,
    pub headers: HeaderMap,
}

/// In-process storefront with a fixed shopper identity.
pub struct TestApp {
    router: Router,
    store: Arc<dyn KeyValueStore>,
    pub shopper: ShopperId,
}

impl TestApp {
    /// App with an immediate cart reveal and an in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(StorefrontConfig {
            cart_reveal_delay: std::time::Duration::ZERO,
            ..StorefrontConfig::default()
        })
    }

    /// App with custom configuration and a fresh in-memory store.
    #[must_use]
    pub fn with_config(config: StorefrontConfig) -> Self {
        Self::with_store(config, Arc::new(MemoryStore::new()))
    }

    /// App over an existing store, e.g. to simulate a restart.
    #[must_use]
    pub fn with_store(config: StorefrontConfig, store: Arc<dyn KeyValueStore>) -> Self {
        let state = AppState::with_store(config, Arc::clone(&store));
        Self {
            router: marche_storefront::app(state),
            store,
            shopper: ShopperId::generate(),
        }
    }

    /// The store backing this app.
    #[must_use]
    pub fn store(&self) -> Arc<dyn KeyValueStore> {
        Arc::clone(&self.store)
    }

    /// Send a request as this app's shopper.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the body cannot be read.
    #[allow(clippy::unwrap_used)]
    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        let shopper = HeaderValue::from_str(&self.shopper.to_string()).unwrap();
        self.send_with(method, uri, body, |builder| {
            builder.header(SHOPPER_ID_HEADER, shopper)
        })
        .await
    }

    /// Send a request with caller-supplied headers and no shopper header.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the body cannot be read.
    #[allow(clippy::unwrap_used)]
    pub async fn send_with(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        headers: impl FnOnce(axum::http::request::Builder) -> axum::http::request::Builder,
    ) -> TestResponse {
        let mut builder = headers(Request::builder().method(method).uri(uri));
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(serde_json::to_vec(&value).unwrap())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        TestResponse {
            status,
            body,
            set_cookie,
            headers,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn post_empty(&self, uri: &str) -> TestResponse {
        self.send(Method::POST, uri, None).await
    }

    pub async fn patch(&self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::PATCH, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.send(Method::DELETE, uri, None).await
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Catalog product JSON.
#[must_use]
pub fn product(id: &str, price: u64) -> Value {
    json!({
        "id": id,
        "name": format!("Product {id}"),
        "slug": id,
        "basePrice": price,
        "images": [{ "url": format!("/img/{id}.jpg"), "alt": "" }],
        "sku": format!("SKU-{id}"),
    })
}

/// Catalog product JSON with a compare-at price.
#[must_use]
pub fn discounted_product(id: &str, price: u64, compare_at: u64) -> Value {
    let mut value = product(id, price);
    value["compareAtPrice"] = json!(compare_at);
    value
}

/// Catalog variant JSON with a single size attribute.
#[must_use]
pub fn variant(id: &str, price: u64, size: &str) -> Value {
    json!({
        "id": id,
        "price": price,
        "stock": 5,
        "attributes": [{ "name": "Size", "value": size }],
    })
}
