//! Fixtures shared by the storefront unit tests.

use std::sync::Arc;
use std::time::Duration;

use marche_core::{Product, ProductId, ProductImage, ShopperId};
use rust_decimal::Decimal;

use crate::persist::{KeyValueStore, MemoryStore};
use crate::shopper::{Shopper, ShopperSettings};

pub fn product(id: &str, price: i64) -> Product {
    Product {
        id: ProductId::new(id),
        name: format!("Product {id}"),
        slug: format!("product-{id}"),
        base_price: Decimal::from(price),
        compare_at_price: None,
        images: vec![ProductImage {
            url: format!("/img/{id}.jpg"),
            alt: String::new(),
        }],
        brand: None,
        category: None,
        sku: format!("SKU-{id}"),
    }
}

pub fn settings(cart_reveal_delay: Duration) -> ShopperSettings {
    ShopperSettings {
        cart_reveal_delay,
        ..ShopperSettings::default()
    }
}

/// A fresh shopper over `store`.
pub fn shopper_in(store: Arc<dyn KeyValueStore>, cart_reveal_delay: Duration) -> Shopper {
    Shopper::open(ShopperId::generate(), store, settings(cart_reveal_delay))
}

/// A fresh shopper over its own memory store, revealing the cart immediately.
pub fn shopper() -> Shopper {
    shopper_in(Arc::new(MemoryStore::new()), Duration::ZERO)
}
