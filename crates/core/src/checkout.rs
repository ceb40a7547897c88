//! Checkout totals derived from a cart.
//!
//! Nothing here is stored: every figure is recomputed from the cart on each
//! read, since the cart can change between reads.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::Cart;

/// Subtotal above which shipping is free.
pub const FREE_SHIPPING_THRESHOLD: i64 = 50_000;

/// Flat shipping fee charged at or below the threshold.
pub const FLAT_SHIPPING_FEE: i64 = 3_275;

/// Flat-rate shipping with a free-shipping threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingPolicy {
    pub free_shipping_threshold: Decimal,
    pub flat_fee: Decimal,
}

impl Default for ShippingPolicy {
    fn default() -> Self {
        Self {
            free_shipping_threshold: Decimal::from(FREE_SHIPPING_THRESHOLD),
            flat_fee: Decimal::from(FLAT_SHIPPING_FEE),
        }
    }
}

impl ShippingPolicy {
    /// Shipping fee for a subtotal. Free only when strictly above the threshold.
    #[must_use]
    pub fn fee_for(&self, subtotal: Decimal) -> Decimal {
        if self.qualifies(subtotal) {
            Decimal::ZERO
        } else {
            self.flat_fee
        }
    }

    #[must_use]
    pub fn qualifies(&self, subtotal: Decimal) -> bool {
        subtotal > self.free_shipping_threshold
    }
}

/// Order totals shown at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSummary {
    pub item_count: u64,
    pub subtotal: Decimal,
    pub savings: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
    pub free_shipping: bool,
}

impl CheckoutSummary {
    #[must_use]
    pub fn from_cart(cart: &Cart, policy: &ShippingPolicy) -> Self {
        let subtotal = cart.subtotal();
        let shipping = policy.fee_for(subtotal);
        Self {
            item_count: cart.total_items(),
            subtotal,
            savings: cart.total_savings(),
            shipping,
            total: subtotal + shipping,
            free_shipping: policy.qualifies(subtotal),
        }
    }
}
