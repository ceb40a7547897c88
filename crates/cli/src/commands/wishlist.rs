//! Wishlist commands.

use marche_core::{Product, Variant};
use marche_storefront::actions::toggle_wishlist_with_notification;
use marche_storefront::routes::wishlist::{ToggleView, WishlistView};
use marche_storefront::shopper::Shopper;
use serde_json::Value;

use super::{CliError, log_notifications, to_output};

fn view(shopper: &Shopper) -> WishlistView {
    shopper.wishlist().read(|wishlist| WishlistView::from(wishlist))
}

/// Show saved products.
///
/// # Errors
///
/// Returns `CliError::Output` if the wishlist cannot be encoded.
pub fn show(shopper: &Shopper) -> Result<Value, CliError> {
    to_output(&view(shopper))
}

/// Save a product; saving it again changes nothing.
///
/// # Errors
///
/// Returns `CliError::Output` if the wishlist cannot be encoded.
pub fn add(
    shopper: &Shopper,
    product: &Product,
    variant: Option<&Variant>,
) -> Result<Value, CliError> {
    if !shopper.add_to_wishlist(product, variant) {
        tracing::info!(product_id = %product.id, "Already in wishlist");
    }
    to_output(&view(shopper))
}

/// Flip a product's saved state.
///
/// # Errors
///
/// Returns `CliError::Output` if the wishlist cannot be encoded.
pub fn toggle(
    shopper: &Shopper,
    product: &Product,
    variant: Option<&Variant>,
) -> Result<Value, CliError> {
    let in_wishlist = toggle_wishlist_with_notification(shopper, product, variant);
    log_notifications(shopper);
    to_output(&ToggleView {
        in_wishlist,
        wishlist: view(shopper),
    })
}

/// Remove a saved entry.
///
/// # Errors
///
/// Returns `CliError::Output` if the wishlist cannot be encoded.
pub fn remove(shopper: &Shopper, id: &str) -> Result<Value, CliError> {
    if !shopper.remove_from_wishlist(id) {
        tracing::warn!(item_id = %id, "No such wishlist entry");
    }
    to_output(&view(shopper))
}

/// Remove every saved entry.
///
/// # Errors
///
/// Returns `CliError::Output` if the wishlist cannot be encoded.
pub fn clear(shopper: &Shopper) -> Result<Value, CliError> {
    shopper.clear_wishlist();
    to_output(&view(shopper))
}
