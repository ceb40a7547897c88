//! Shopping cart reducer.
//!
//! Lines are keyed by [`ItemKey`]: the product id, or product and variant id
//! together, so two variants of one product sit on separate lines while
//! re-adding the same identity merges into the existing line.
//!
//! # Invariants
//!
//! - Every line has `quantity >= 1`. Updating a line to zero or less removes it.
//! - A line's unit price is the snapshot taken when the line was created.
//!   Later adds of the same identity only change the quantity.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::normalize::Normalize;
use crate::types::{ItemKey, Priced, Product, ProductId, Variant, VariantId};

/// Storage key for the persisted cart slice.
pub const CART_STORAGE_KEY: &str = "cart-storage";

/// One row in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub id: ItemKey,
    pub product_id: ProductId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<VariantId>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_label: Option<String>,
    pub image: String,
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Decimal>,
    pub quantity: u32,
    /// Advisory only; the cart does not enforce it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
    pub added_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LineItem {
    fn snapshot(
        product: &Product,
        variant: Option<&Variant>,
        quantity: u32,
        now: DateTime<Utc>,
    ) -> Self {
        let (price, original_price) = variant.map_or(
            (product.base_price, product.compare_at_price),
            |variant| {
                (
                    variant.price,
                    variant.compare_at_price.or(product.compare_at_price),
                )
            },
        );

        Self {
            id: ItemKey::for_product(&product.id, variant.map(|v| &v.id)),
            product_id: product.id.clone(),
            variant_id: variant.map(|v| v.id.clone()),
            name: product.name.clone(),
            variant_label: variant.and_then(Variant::label),
            image: product.primary_image().to_owned(),
            price,
            original_price,
            quantity,
            stock: variant.map(|v| v.stock),
            added_at: now,
            updated_at: now,
        }
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }

    /// Amount saved on this line against its original price.
    #[must_use]
    pub fn savings(&self) -> Decimal {
        match self.original_price {
            Some(original) if original > self.price => {
                (original - self.price) * Decimal::from(self.quantity)
            }
            _ => Decimal::ZERO,
        }
    }
}

impl Priced for LineItem {
    fn unit_price(&self) -> Decimal {
        self.price
    }

    fn original_price(&self) -> Option<Decimal> {
        self.original_price
    }
}

/// The shopper's cart.
///
/// Only `items` is persisted; the panel flag and the last-added line are
/// session-local and start fresh on every load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    #[serde(default)]
    items: Vec<LineItem>,
    #[serde(skip)]
    is_open: bool,
    #[serde(skip)]
    last_added_item: Option<LineItem>,
}

impl Cart {
    /// Lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Whether the cart panel is revealed.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.is_open
    }

    /// The line touched by the most recent add.
    #[must_use]
    pub const fn last_added_item(&self) -> Option<&LineItem> {
        self.last_added_item.as_ref()
    }

    /// Add `quantity` units of a product (and optional variant).
    ///
    /// An existing line with the same identity has its quantity increased and
    /// its timestamps refreshed; its price is left untouched. Returns the
    /// affected line, or `None` when `quantity` is zero.
    pub fn add(
        &mut self,
        product: &Product,
        variant: Option<&Variant>,
        quantity: u32,
    ) -> Option<&LineItem> {
        if quantity == 0 {
            return None;
        }

        let now = Utc::now();
        let key = ItemKey::for_product(&product.id, variant.map(|v| &v.id));
        let index = match self.items.iter().position(|item| item.id == key) {
            Some(index) => {
                let line = self.items.get_mut(index)?;
                line.quantity = line.quantity.saturating_add(quantity);
                line.added_at = now;
                line.updated_at = now;
                index
            }
            None => {
                self.items
                    .push(LineItem::snapshot(product, variant, quantity, now));
                self.items.len() - 1
            }
        };

        let line = self.items.get(index)?;
        self.last_added_item = Some(line.clone());
        Some(line)
    }

    /// Set a line's quantity. Zero or less removes the line.
    ///
    /// Unknown ids are ignored. Returns whether the cart changed.
    pub fn update_quantity(&mut self, id: &str, quantity: i64) -> bool {
        if quantity <= 0 {
            return self.remove(id);
        }

        let Some(line) = self.items.iter_mut().find(|item| item.id.as_str() == id) else {
            return false;
        };
        line.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        line.updated_at = Utc::now();
        true
    }

    /// Remove a line. Returns whether a line was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id.as_str() != id);
        self.items.len() != before
    }

    /// Empty the cart and forget the last-added line.
    pub fn clear(&mut self) {
        self.items.clear();
        self.last_added_item = None;
    }

    pub fn open(&mut self) {
        self.is_open = true;
    }

    pub fn close(&mut self) {
        self.is_open = false;
    }

    /// Flip the panel flag and return the new value.
    pub fn toggle(&mut self) -> bool {
        self.is_open = !self.is_open;
        self.is_open
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of `price * quantity` across all lines.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// Sum of per-line savings against original prices.
    #[must_use]
    pub fn total_savings(&self) -> Decimal {
        self.items.iter().map(LineItem::savings).sum()
    }

    #[must_use]
    pub fn is_in_cart(&self, product_id: &ProductId, variant_id: Option<&VariantId>) -> bool {
        self.find(product_id, variant_id).is_some()
    }

    /// Quantity held for an identity, or 0 when absent.
    #[must_use]
    pub fn item_quantity(&self, product_id: &ProductId, variant_id: Option<&VariantId>) -> u32 {
        self.find(product_id, variant_id)
            .map_or(0, |item| item.quantity)
    }

    /// Look up a line by its id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id.as_str() == id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn find(&self, product_id: &ProductId, variant_id: Option<&VariantId>) -> Option<&LineItem> {
        let key = ItemKey::for_product(product_id, variant_id);
        self.items.iter().find(|item| item.id == key)
    }
}

impl Normalize for Cart {
    /// Drop zero-quantity lines and fold duplicate ids into the first line.
    fn normalize(&mut self) -> usize {
        let before = self.items.len();
        let mut kept: Vec<LineItem> = Vec::with_capacity(before);
        for line in std::mem::take(&mut self.items) {
            if line.quantity == 0 {
                continue;
            }
            match kept.iter_mut().find(|existing| existing.id == line.id) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(line.quantity);
                    existing.updated_at = existing.updated_at.max(line.updated_at);
                }
                None => kept.push(line),
            }
        }
        self.items = kept;
        before - self.items.len()
    }
}
