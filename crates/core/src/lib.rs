//! Marché Core - Shopper state types and reducers.
//!
//! This crate provides the shopper-facing state used across all Marché components:
//! - `storefront` - JSON API that hosts one state container per shopper
//! - `cli` - Command-line tools that inspect and edit persisted shopper state
//!
//! # Architecture
//!
//! The core crate contains only types and pure reducers - no I/O, no timers,
//! no persistence. Every mutation is a plain method on an owned value, so the
//! reducers can be tested without any storage medium. Persisting a slice after
//! each change is the job of the storefront's persistence subscriber.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, and catalog snapshots
//! - [`cart`] - Line items keyed by product/variant identity
//! - [`wishlist`] - Saved-for-later product references
//! - [`compare`] - Bounded side-by-side comparison set
//! - [`notification`] - Transient user-facing messages
//! - [`checkout`] - Shipping policy and order totals derived from a cart
//! - [`normalize`] - Invariant repair for state loaded from storage

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod compare;
pub mod normalize;
pub mod notification;
pub mod types;
pub mod wishlist;

#[cfg(test)]
pub(crate) mod test_support;

pub use cart::{CART_STORAGE_KEY, Cart, LineItem};
pub use checkout::{CheckoutSummary, FLAT_SHIPPING_FEE, FREE_SHIPPING_THRESHOLD, ShippingPolicy};
pub use compare::{
    COMPARE_STORAGE_KEY, CompareChange, CompareError, CompareItem, CompareList, CompareOutcome,
    MAX_COMPARE_ITEMS,
};
pub use normalize::Normalize;
pub use notification::{
    DEFAULT_NOTIFICATION_DURATION_MS, MAX_LIVE_NOTIFICATIONS, MAX_NOTIFICATION_DURATION_MS,
    Notification, NotificationDraft, NotificationId, NotificationKind, NotificationQueue,
};
pub use types::*;
pub use wishlist::{WISHLIST_STORAGE_KEY, Wishlist, WishlistItem};
