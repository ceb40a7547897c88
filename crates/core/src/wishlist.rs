//! Wishlist reducer.
//!
//! Entries use the same identity scheme as cart lines but carry no quantity:
//! membership is boolean and adding a present identity is a no-op.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::normalize::Normalize;
use crate::types::{ItemKey, Priced, Product, ProductId, Variant, VariantId};

/// Storage key for the persisted wishlist slice.
pub const WISHLIST_STORAGE_KEY: &str = "wishlist-storage";

/// A saved-for-later product reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItem {
    pub id: ItemKey,
    pub product_id: ProductId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<VariantId>,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Decimal>,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_label: Option<String>,
    pub added_at: DateTime<Utc>,
}

impl WishlistItem {
    fn snapshot(product: &Product, variant: Option<&Variant>) -> Self {
        Self {
            id: ItemKey::for_product(&product.id, variant.map(|v| &v.id)),
            product_id: product.id.clone(),
            variant_id: variant.map(|v| v.id.clone()),
            name: product.name.clone(),
            slug: product.slug.clone(),
            price: variant.map_or(product.base_price, |v| v.price),
            original_price: variant
                .and_then(|v| v.compare_at_price)
                .or(product.compare_at_price),
            image: product.primary_image().to_owned(),
            variant_label: variant.and_then(Variant::label),
            added_at: Utc::now(),
        }
    }
}

impl Priced for WishlistItem {
    fn unit_price(&self) -> Decimal {
        self.price
    }

    fn original_price(&self) -> Option<Decimal> {
        self.original_price
    }
}

/// The shopper's wishlist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wishlist {
    #[serde(default)]
    items: Vec<WishlistItem>,
}

impl Wishlist {
    #[must_use]
    pub fn items(&self) -> &[WishlistItem] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Save a product. Returns `false` if the identity was already present.
    pub fn add(&mut self, product: &Product, variant: Option<&Variant>) -> bool {
        if self.contains(&product.id, variant.map(|v| &v.id)) {
            return false;
        }
        self.items.push(WishlistItem::snapshot(product, variant));
        true
    }

    /// Remove an entry by id. Returns whether an entry was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id.as_str() != id);
        self.items.len() != before
    }

    #[must_use]
    pub fn contains(&self, product_id: &ProductId, variant_id: Option<&VariantId>) -> bool {
        let key = ItemKey::for_product(product_id, variant_id);
        self.items.iter().any(|item| item.id == key)
    }

    /// Add when absent, remove when present. Returns membership afterwards.
    pub fn toggle(&mut self, product: &Product, variant: Option<&Variant>) -> bool {
        let key = ItemKey::for_product(&product.id, variant.map(|v| &v.id));
        if self.remove(key.as_str()) {
            false
        } else {
            self.items.push(WishlistItem::snapshot(product, variant));
            true
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl Normalize for Wishlist {
    /// Keep the first entry for each id.
    fn normalize(&mut self) -> usize {
        let before = self.items.len();
        let mut seen = HashSet::with_capacity(before);
        self.items.retain(|item| seen.insert(item.id.clone()));
        before - self.items.len()
    }
}
