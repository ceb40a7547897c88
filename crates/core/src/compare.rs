//! Product comparison set.
//!
//! Identity is the product id alone. The set is bounded by `max_items`;
//! adding past the bound fails instead of evicting an older entry.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::normalize::Normalize;
use crate::types::{Priced, Product, ProductId};

/// Storage key for the persisted compare slice.
pub const COMPARE_STORAGE_KEY: &str = "compare-storage";

/// Maximum number of products compared side by side.
pub const MAX_COMPARE_ITEMS: usize = 4;

/// A product selected for comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareItem {
    pub product_id: ProductId,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Decimal>,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub sku: String,
    pub added_at: DateTime<Utc>,
}

impl CompareItem {
    fn snapshot(product: &Product) -> Self {
        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            slug: product.slug.clone(),
            price: product.base_price,
            original_price: product.compare_at_price,
            image: product.primary_image().to_owned(),
            brand: product.brand.as_ref().map(|b| b.name.clone()),
            category: product.category.as_ref().map(|c| c.name.clone()),
            sku: product.sku.clone(),
            added_at: Utc::now(),
        }
    }
}

impl Priced for CompareItem {
    fn unit_price(&self) -> Decimal {
        self.price
    }

    fn original_price(&self) -> Option<Decimal> {
        self.original_price
    }
}

/// Why a product could not be added to the comparison.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompareError {
    #[error("{name} is already in your comparison")]
    AlreadyPresent { name: String },

    #[error("You can compare at most {max} products")]
    Full { max: usize },
}

/// A successful change to the comparison set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompareChange {
    Added { name: String },
    Removed { name: String },
}

impl CompareChange {
    /// User-facing description of the change.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Added { name } => format!("{name} was added to your comparison"),
            Self::Removed { name } => format!("{name} was removed from your comparison"),
        }
    }
}

/// Result shape surfaced to callers: `{success, message}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompareOutcome {
    pub success: bool,
    pub message: String,
}

impl From<Result<CompareChange, CompareError>> for CompareOutcome {
    fn from(result: Result<CompareChange, CompareError>) -> Self {
        match result {
            Ok(change) => Self {
                success: true,
                message: change.message(),
            },
            Err(err) => Self {
                success: false,
                message: err.to_string(),
            },
        }
    }
}

/// The shopper's comparison set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompareList {
    #[serde(default)]
    items: Vec<CompareItem>,
    #[serde(skip, default = "default_max_items")]
    max_items: usize,
}

const fn default_max_items() -> usize {
    MAX_COMPARE_ITEMS
}

impl Default for CompareList {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            max_items: MAX_COMPARE_ITEMS,
        }
    }
}

impl CompareList {
    #[must_use]
    pub fn items(&self) -> &[CompareItem] {
        &self.items
    }

    #[must_use]
    pub const fn max_items(&self) -> usize {
        self.max_items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add a product to the comparison.
    ///
    /// # Errors
    ///
    /// Returns [`CompareError::AlreadyPresent`] if the product is already
    /// compared, or [`CompareError::Full`] if the set is at capacity. The set
    /// is unchanged in both cases.
    pub fn add(&mut self, product: &Product) -> Result<CompareChange, CompareError> {
        if self.contains(&product.id) {
            return Err(CompareError::AlreadyPresent {
                name: product.name.clone(),
            });
        }
        if self.items.len() >= self.max_items {
            return Err(CompareError::Full {
                max: self.max_items,
            });
        }
        self.items.push(CompareItem::snapshot(product));
        Ok(CompareChange::Added {
            name: product.name.clone(),
        })
    }

    /// Remove a product. Returns the removed entry, if any.
    pub fn remove(&mut self, product_id: &ProductId) -> Option<CompareItem> {
        let index = self
            .items
            .iter()
            .position(|item| &item.product_id == product_id)?;
        Some(self.items.remove(index))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.items.iter().any(|item| &item.product_id == product_id)
    }

    /// Remove the product if compared, otherwise add it.
    ///
    /// Both branches report through the same result type so callers can
    /// surface a message either way.
    ///
    /// # Errors
    ///
    /// Propagates the failure from [`CompareList::add`] when adding.
    pub fn toggle(&mut self, product: &Product) -> Result<CompareChange, CompareError> {
        match self.remove(&product.id) {
            Some(removed) => Ok(CompareChange::Removed { name: removed.name }),
            None => self.add(product),
        }
    }
}

impl Normalize for CompareList {
    /// Keep the first entry per product, then cut the set down to `max_items`.
    fn normalize(&mut self) -> usize {
        let before = self.items.len();
        let mut seen = HashSet::with_capacity(before);
        self.items.retain(|item| seen.insert(item.product_id.clone()));
        self.items.truncate(self.max_items);
        before - self.items.len()
    }
}
