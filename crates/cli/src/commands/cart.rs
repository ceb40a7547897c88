//! Cart and checkout commands.

use marche_core::{Product, Variant};
use marche_storefront::actions::add_to_cart_with_notification;
use marche_storefront::routes::cart::CartView;
use marche_storefront::routes::checkout::CheckoutView;
use marche_storefront::shopper::Shopper;
use serde_json::Value;

use super::{CliError, log_notifications, to_output};

fn view(shopper: &Shopper) -> Result<Value, CliError> {
    to_output(&shopper.cart().read(|cart| CartView::from(cart)))
}

/// Show the cart with totals.
///
/// # Errors
///
/// Returns `CliError::Output` if the cart cannot be encoded.
pub fn show(shopper: &Shopper) -> Result<Value, CliError> {
    view(shopper)
}

/// Add a product to the cart.
///
/// # Errors
///
/// Returns `CliError::ZeroQuantity` when `quantity` is zero.
pub fn add(
    shopper: &Shopper,
    product: &Product,
    variant: Option<&Variant>,
    quantity: u32,
) -> Result<Value, CliError> {
    let line = add_to_cart_with_notification(shopper, product, variant, quantity)
        .ok_or(CliError::ZeroQuantity)?;
    log_notifications(shopper);
    tracing::debug!(line_id = %line.id, quantity = line.quantity, "Cart line updated");
    view(shopper)
}

/// Set a line's quantity; zero or less removes it.
///
/// # Errors
///
/// Returns `CliError::Output` if the cart cannot be encoded.
pub fn update(shopper: &Shopper, id: &str, quantity: i64) -> Result<Value, CliError> {
    if !shopper.update_quantity(id, quantity) {
        tracing::warn!(line_id = %id, "No such cart line");
    }
    view(shopper)
}

/// Remove a line.
///
/// # Errors
///
/// Returns `CliError::Output` if the cart cannot be encoded.
pub fn remove(shopper: &Shopper, id: &str) -> Result<Value, CliError> {
    if !shopper.remove_from_cart(id) {
        tracing::warn!(line_id = %id, "No such cart line");
    }
    view(shopper)
}

/// Empty the cart.
///
/// # Errors
///
/// Returns `CliError::Output` if the cart cannot be encoded.
pub fn clear(shopper: &Shopper) -> Result<Value, CliError> {
    shopper.clear_cart();
    view(shopper)
}

/// Checkout totals for the cart.
///
/// # Errors
///
/// Returns `CliError::Output` if the summary cannot be encoded.
pub fn checkout(shopper: &Shopper) -> Result<Value, CliError> {
    to_output(&CheckoutView::from(shopper.checkout_summary()))
}
